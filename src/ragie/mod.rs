//! Ragie.ai retrieval integration.

pub mod client;
pub mod envelope;
pub mod types;

use async_trait::async_trait;

pub use client::RagieClient;
pub use envelope::{ENVELOPE_RULES, extract_chunks, map_chunk, map_chunks, parse_document};
pub use types::{ChunkRecord, DEFAULT_TOP_K, RagieError, RetrievalRequest, normalize_partition};

/// Interface implemented by single-query retrieval backends.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Run one query and return its chunks in remote order.
    async fn retrieve(&self, request: &RetrievalRequest) -> Result<Vec<ChunkRecord>, RagieError>;
}
