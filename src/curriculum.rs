//! Multi-query orchestration over a [`Retriever`].
//!
//! Each query is attempted exactly once. A failing query is logged and reported with no chunks;
//! it never aborts the rest of the batch. Results always line up with the input queries.

use crate::config::{ConfigError, RagieConfig};
use crate::ragie::{
    ChunkRecord, DEFAULT_TOP_K, RagieClient, RagieError, RetrievalRequest, Retriever,
};
use futures_util::{StreamExt, stream};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that stop a batch before any query is attempted.
#[derive(Debug, Error)]
pub enum CurriculumError {
    /// Credentials or other settings were missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The HTTP client could not be constructed.
    #[error("Failed to initialize Ragie client: {0}")]
    Client(#[from] RagieError),
    /// Caller asked for zero chunks per query.
    #[error("top_k must be greater than zero")]
    InvalidTopK,
}

/// One query or an ordered list of queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Queries(Vec<String>);

impl Queries {
    /// Number of queries in the batch.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the batch holds no queries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the queries in input order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Consume the batch, returning the queries in input order.
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for Queries {
    fn from(query: &str) -> Self {
        Self(vec![query.to_string()])
    }
}

impl From<String> for Queries {
    fn from(query: String) -> Self {
        Self(vec![query])
    }
}

impl From<Vec<String>> for Queries {
    fn from(queries: Vec<String>) -> Self {
        Self(queries)
    }
}

impl From<Vec<&str>> for Queries {
    fn from(queries: Vec<&str>) -> Self {
        Self(queries.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Queries {
    fn from(queries: &[&str]) -> Self {
        Self(queries.iter().map(|query| (*query).to_string()).collect())
    }
}

impl From<&[String]> for Queries {
    fn from(queries: &[String]) -> Self {
        Self(queries.to_vec())
    }
}

/// Chunks retrieved for a single query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerQueryResult {
    /// Query exactly as supplied by the caller.
    pub query: String,
    /// Normalized chunks; empty when the query failed.
    pub data: Vec<ChunkRecord>,
}

/// Combined reply for a batch, one result per input query in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Normalized input queries.
    pub queries: Vec<String>,
    /// Per-query results aligned with `queries`.
    pub results: Vec<PerQueryResult>,
}

/// Settings applied to every query in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Chunks requested per query.
    pub top_k: u32,
    /// Partition forwarded to each request.
    pub partition: Option<String>,
    /// Optional per-document chunk cap forwarded to each request.
    pub max_chunks_per_document: Option<u32>,
    /// Number of queries allowed in flight at once.
    pub max_concurrency: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

impl BatchOptions {
    /// Sequential batch with no partition.
    pub fn new(top_k: u32) -> Self {
        Self {
            top_k,
            partition: None,
            max_chunks_per_document: None,
            max_concurrency: 1,
        }
    }

    /// Derive batch options from runtime configuration.
    pub fn from_config(config: &RagieConfig, top_k: u32) -> Self {
        Self {
            partition: config.partition.clone(),
            max_concurrency: config.max_concurrency,
            ..Self::new(top_k)
        }
    }

    /// Scope every request to a partition.
    pub fn with_partition(mut self, partition: impl Into<String>) -> Self {
        self.partition = Some(partition.into());
        self
    }

    /// Cap how many chunks a single document may contribute.
    pub fn with_max_chunks_per_document(mut self, limit: u32) -> Self {
        self.max_chunks_per_document = Some(limit);
        self
    }

    /// Allow up to `limit` queries in flight.
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit;
        self
    }

    fn request_for(&self, query: &str) -> RetrievalRequest {
        let request = RetrievalRequest::new(query, self.top_k, self.partition.as_deref());
        match self.max_chunks_per_document {
            Some(limit) => request.with_max_chunks_per_document(limit),
            None => request,
        }
    }
}

/// Retrieve curriculum passages for one or more queries using environment configuration.
///
/// Reads `RAGIE_API_KEY` and `RAGIE_PARTITION_ID` (plus the optional tuning variables) on every
/// call. A missing key fails before any request is sent.
pub async fn curriculum_rag(
    queries: impl Into<Queries>,
    top_k: u32,
) -> Result<AggregateResult, CurriculumError> {
    let config = RagieConfig::from_env()?;
    curriculum_rag_with_config(queries, top_k, &config).await
}

/// Retrieve curriculum passages using an explicit configuration.
pub async fn curriculum_rag_with_config(
    queries: impl Into<Queries>,
    top_k: u32,
    config: &RagieConfig,
) -> Result<AggregateResult, CurriculumError> {
    let options = BatchOptions::from_config(config, top_k);
    curriculum_rag_with_options(queries, config, &options).await
}

/// Retrieve curriculum passages with explicit configuration and batch options.
pub async fn curriculum_rag_with_options(
    queries: impl Into<Queries>,
    config: &RagieConfig,
    options: &BatchOptions,
) -> Result<AggregateResult, CurriculumError> {
    config.validate()?;
    if options.top_k == 0 {
        return Err(CurriculumError::InvalidTopK);
    }
    let client = RagieClient::new(config)?;
    Ok(run_batch(&client, queries.into(), options).await)
}

/// Run every query against `retriever`, isolating per-query failures.
pub async fn run_batch(
    retriever: &dyn Retriever,
    queries: Queries,
    options: &BatchOptions,
) -> AggregateResult {
    let queries = queries.into_vec();
    tracing::info!(
        queries = queries.len(),
        top_k = options.top_k,
        partition = ?options.partition,
        concurrency = options.max_concurrency,
        "Starting curriculum retrieval"
    );

    let results: Vec<PerQueryResult> = stream::iter(queries.iter().cloned())
        .map(|query| retrieve_isolated(retriever, query, options))
        .buffered(options.max_concurrency.max(1))
        .collect()
        .await;

    let empty = results.iter().filter(|result| result.data.is_empty()).count();
    tracing::info!(
        queries = results.len(),
        empty,
        "Curriculum retrieval finished"
    );

    AggregateResult { queries, results }
}

async fn retrieve_isolated(
    retriever: &dyn Retriever,
    query: String,
    options: &BatchOptions,
) -> PerQueryResult {
    let request = options.request_for(&query);
    let data = match retriever.retrieve(&request).await {
        Ok(records) => records,
        Err(error) => {
            tracing::warn!(query = %query, error = %error, "Retrieval error; returning no chunks");
            Vec::new()
        }
    };
    PerQueryResult { query, data }
}
