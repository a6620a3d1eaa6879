#![deny(missing_docs)]

//! Curriculum retrieval over Ragie.ai, normalized for agent consumption.

/// Environment-driven configuration management.
pub mod config;
/// Multi-query orchestration with per-query failure isolation.
pub mod curriculum;
/// Context rendering helpers for downstream agents.
pub mod format;
/// Structured logging and tracing setup.
pub mod logging;
/// Ragie.ai retrieval client and response normalization.
pub mod ragie;

pub use config::{ConfigError, RagieConfig};
pub use curriculum::{
    AggregateResult, BatchOptions, CurriculumError, PerQueryResult, Queries, curriculum_rag,
    curriculum_rag_with_config, curriculum_rag_with_options, run_batch,
};
pub use ragie::{ChunkRecord, RagieClient, RagieError, RetrievalRequest, Retriever};
