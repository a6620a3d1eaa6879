//! Request, record, and error types shared by the Ragie client and helpers.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of chunks requested per query.
pub const DEFAULT_TOP_K: u32 = 20;

/// Errors returned while interacting with the Ragie retrieval endpoint.
#[derive(Debug, Error)]
pub enum RagieError {
    /// Endpoint failed to parse or normalize.
    #[error("Invalid Ragie endpoint: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before a usable response arrived.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Ragie responded with a non-success status code.
    #[error("Unexpected Ragie response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from Ragie.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Response body could not be interpreted as a retrieval envelope.
    #[error("Malformed Ragie response: {0}")]
    MalformedResponse(String),
    /// A single entry in the chunk list was not an object.
    #[error("Malformed chunk at position {index}: expected an object")]
    MalformedChunk {
        /// Position of the offending entry in the remote list.
        index: usize,
    },
}

/// Body sent to `POST /retrievals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetrievalRequest {
    /// Natural-language query text.
    pub query: String,
    /// Maximum number of chunks to return.
    pub top_k: u32,
    /// Partition scoping the search; omitted from the body when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    /// Optional cap on chunks returned from any single document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_chunks_per_document: Option<u32>,
}

impl RetrievalRequest {
    /// Build a request, dropping partitions that are blank or the literal `none`.
    pub fn new(query: impl Into<String>, top_k: u32, partition: Option<&str>) -> Self {
        Self {
            query: query.into(),
            top_k,
            partition: normalize_partition(partition),
            max_chunks_per_document: None,
        }
    }

    /// Limit how many chunks a single document may contribute.
    pub fn with_max_chunks_per_document(mut self, limit: u32) -> Self {
        self.max_chunks_per_document = Some(limit);
        self
    }
}

/// Normalized `{source, text}` pair produced from one remote chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Source URL, document id, or `unknown`.
    pub source: String,
    /// Chunk text; empty when the remote omitted it.
    pub text: String,
}

/// Return the partition to send, or `None` when it should be left out of the body.
pub fn normalize_partition(partition: Option<&str>) -> Option<String> {
    partition
        .map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("none"))
        .map(str::to_string)
}
