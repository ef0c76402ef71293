use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use rcmsg_core::domain::{FetchFailure, Properties};
use rcmsg_core::impls::StaticClient;

/// rcmsg configuration (JSON file, every key optional)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Parser name stamped on every message
    pub parser: String,

    /// Type tag of every line read
    pub message_type: String,

    /// Properties requested for every message
    pub properties: Vec<String>,

    /// Modules interested in every message
    pub interested: Vec<String>,

    /// Logging modules to register
    pub modules: Vec<String>,

    /// Number of workers
    pub workers: usize,

    /// Immediate retries after a failed fetch
    pub max_retries: u32,

    /// Log level (overridden by RUST_LOG)
    pub log_level: String,

    /// Fixture client answering lookups
    pub client: FixtureConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            parser: "lines".to_string(),
            message_type: "edit".to_string(),
            properties: vec!["diffSize".to_string()],
            interested: vec!["logger".to_string()],
            modules: vec!["logger".to_string()],
            workers: 4,
            max_retries: 2,
            log_level: "info".to_string(),
            client: FixtureConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load from configuration file
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Fixture client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    pub name: String,

    /// Property values returned by every lookup
    pub values: Properties,

    /// Number of lookups that fail before the fixture starts answering
    pub fail_first: u32,

    /// Error code of the failing lookups
    pub fail_code: String,

    /// Simulated lookup latency
    pub latency_ms: Option<u64>,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            name: "fixture".to_string(),
            values: Properties::new().with("diffSize", serde_json::json!(0)),
            fail_first: 0,
            fail_code: "unavailable".to_string(),
            latency_ms: None,
        }
    }
}

impl FixtureConfig {
    pub fn build(&self) -> StaticClient {
        let mut client = StaticClient::new(&self.name, self.values.clone()).failing_first(
            self.fail_first,
            FetchFailure::new(&self.fail_code, "fixture lookup failed"),
        );
        if let Some(ms) = self.latency_ms {
            client = client.with_latency(std::time::Duration::from_millis(ms));
        }
        client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config: CliConfig =
            serde_json::from_str(r#"{ "workers": 1, "client": { "fail_first": 3 } }"#).unwrap();

        assert_eq!(config.workers, 1);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.message_type, "edit");
        assert_eq!(config.client.fail_first, 3);
        assert_eq!(config.client.name, "fixture");
    }
}
