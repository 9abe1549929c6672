use serde::{Deserialize, Serialize};

/// Base URL used when neither the config file nor the environment set one.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Default log filter directive.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Client configuration persisted in `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            log_level: default_log_level(),
        }
    }
}

impl ClientConfig {
    /// Base URL without a trailing slash, ready for `format!("{}/path/")`.
    pub fn normalized_base_url(&self) -> String {
        self.api_base_url.trim_end_matches('/').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(r#"log_level = "debug""#).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_normalized_base_url() {
        let config = ClientConfig {
            api_base_url: "https://diq.example.com/api//".to_string(),
            ..Default::default()
        };
        assert_eq!(config.normalized_base_url(), "https://diq.example.com/api");
    }
}
