//! HTTP client wrapper for the Ragie retrieval endpoint.

use crate::config::RagieConfig;
use crate::ragie::{
    Retriever,
    envelope::{extract_chunks, map_chunks, parse_document},
    types::{ChunkRecord, RagieError, RetrievalRequest},
};
use async_trait::async_trait;
use reqwest::{Client, header::ACCEPT};

const RETRIEVALS_PATH: &str = "retrievals";

/// Lightweight HTTP client for Ragie retrievals.
pub struct RagieClient {
    pub(crate) client: Client,
    pub(crate) endpoint: String,
    pub(crate) api_key: String,
}

impl RagieClient {
    /// Construct a client from an explicit configuration.
    pub fn new(config: &RagieConfig) -> Result<Self, RagieError> {
        let client = Client::builder()
            .user_agent(concat!("curriculum-rag/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        let base_url = normalize_base_url(&config.endpoint).map_err(RagieError::InvalidUrl)?;
        let endpoint = format_endpoint(&base_url, RETRIEVALS_PATH);
        tracing::debug!(
            url = %endpoint,
            timeout_secs = config.timeout.as_secs(),
            has_api_key = !config.api_key.is_empty(),
            "Initialized Ragie HTTP client"
        );

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    /// Full URL that retrieval requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run one retrieval and return the normalized chunks in remote order.
    pub async fn retrieve(
        &self,
        request: &RetrievalRequest,
    ) -> Result<Vec<ChunkRecord>, RagieError> {
        tracing::debug!(
            query = %request.query,
            top_k = request.top_k,
            partition = ?request.partition,
            "Requesting Ragie retrieval"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = RagieError::UnexpectedStatus { status, body };
            tracing::error!(query = %request.query, error = %error, "Ragie retrieval failed");
            return Err(error);
        }

        let body = response.text().await?;
        let document = parse_document(&body)?;
        let records = map_chunks(extract_chunks(&document)?)?;
        tracing::debug!(
            query = %request.query,
            chunks = records.len(),
            "Ragie retrieval completed"
        );
        Ok(records)
    }
}

#[async_trait]
impl Retriever for RagieClient {
    async fn retrieve(&self, request: &RetrievalRequest) -> Result<Vec<ChunkRecord>, RagieError> {
        RagieClient::retrieve(self, request).await
    }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

fn format_endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
