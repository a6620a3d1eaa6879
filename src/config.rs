use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default base URL of the Ragie.ai API.
pub const DEFAULT_ENDPOINT: &str = "https://api.ragie.ai";
/// Default request timeout applied to every retrieval call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for Ragie retrievals.
///
/// Built once at the boundary (usually via [`RagieConfig::from_env`]) and passed explicitly into
/// the orchestration entry points.
#[derive(Clone)]
pub struct RagieConfig {
    /// Bearer credential sent with every request.
    pub api_key: String,
    /// Optional partition scoping which documents are searched.
    pub partition: Option<String>,
    /// Base URL of the Ragie API; `/retrievals` is appended.
    pub endpoint: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Number of queries allowed in flight at once. `1` keeps execution sequential.
    pub max_concurrency: usize,
}

impl RagieConfig {
    /// Build a configuration with defaults for everything except the credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            partition: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_concurrency: 1,
        }
    }

    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source, validating along the way.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = optional("RAGIE_API_KEY")
            .ok_or_else(|| ConfigError::MissingVariable("RAGIE_API_KEY".to_string()))?;

        let timeout_secs = optional("RAGIE_TIMEOUT_SECS")
            .map(|value| parse_positive(&value, "RAGIE_TIMEOUT_SECS"))
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let max_concurrency = optional("RAGIE_MAX_CONCURRENCY")
            .map(|value| parse_positive(&value, "RAGIE_MAX_CONCURRENCY"))
            .transpose()?
            .unwrap_or(1);

        Ok(Self {
            api_key,
            partition: optional("RAGIE_PARTITION_ID"),
            endpoint: optional("RAGIE_API_ENDPOINT")
                .map(|value| value.trim().to_string())
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            max_concurrency: usize::try_from(max_concurrency)
                .map_err(|_| ConfigError::InvalidValue("RAGIE_MAX_CONCURRENCY".to_string()))?,
        })
    }

    /// Reject configurations that cannot authenticate or would never run a query.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingVariable("RAGIE_API_KEY".to_string()));
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::InvalidValue("RAGIE_MAX_CONCURRENCY".to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for RagieConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagieConfig")
            .field("api_key", &"<redacted>")
            .field("partition", &self.partition)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("max_concurrency", &self.max_concurrency)
            .finish()
    }
}

fn parse_positive(value: &str, key: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::InvalidValue(key.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        let err = RagieConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable(ref key) if key == "RAGIE_API_KEY"));

        let err = RagieConfig::from_lookup(lookup(&[("RAGIE_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable(_)));
    }

    #[test]
    fn defaults_apply_when_only_the_key_is_set() {
        let config = RagieConfig::from_lookup(lookup(&[("RAGIE_API_KEY", "secret")]))
            .expect("config");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.partition, None);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_concurrency, 1);
    }

    #[test]
    fn optional_values_are_parsed() {
        let config = RagieConfig::from_lookup(lookup(&[
            ("RAGIE_API_KEY", "secret"),
            ("RAGIE_PARTITION_ID", "teamA"),
            ("RAGIE_API_ENDPOINT", "http://localhost:9000/"),
            ("RAGIE_TIMEOUT_SECS", "5"),
            ("RAGIE_MAX_CONCURRENCY", "4"),
        ]))
        .expect("config");
        assert_eq!(config.partition.as_deref(), Some("teamA"));
        assert_eq!(config.endpoint, "http://localhost:9000/");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_concurrency, 4);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = RagieConfig::from_lookup(lookup(&[
            ("RAGIE_API_KEY", "secret"),
            ("RAGIE_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == "RAGIE_TIMEOUT_SECS"));

        let err = RagieConfig::from_lookup(lookup(&[
            ("RAGIE_API_KEY", "secret"),
            ("RAGIE_MAX_CONCURRENCY", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn validate_catches_hand_built_empty_key() {
        assert!(RagieConfig::new("").validate().is_err());
        assert!(RagieConfig::new("key").validate().is_ok());
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let rendered = format!("{:?}", RagieConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }
}
