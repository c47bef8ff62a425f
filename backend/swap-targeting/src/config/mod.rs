use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

/// Environment variable prefix, e.g. `SWAP_TARGETING__API_BASE_URL`
pub const ENV_PREFIX: &str = "SWAP_TARGETING";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Swap API
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,

    // Browsing identity
    pub user_id: Option<Uuid>,
    pub active_swap_id: Option<Uuid>,

    // Feed / search
    pub page_size: u32,
    pub search_debounce_ms: u64,

    // Observability
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        Self::builder()?
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Builder pre-loaded with defaults; callers add their own sources.
    pub fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        config::Config::builder()
            .set_default("api_base_url", "http://localhost:3001")?
            .set_default("request_timeout_secs", 10)?
            .set_default("page_size", 20)?
            .set_default("search_debounce_ms", 300)?
            .set_default("log_level", "info")?
            .set_default("log_format", "text")
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.is_empty() {
            return Err(anyhow!("API base URL is required"));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(anyhow!("API base URL must start with http:// or https://"));
        }

        if self.page_size == 0 || self.page_size > 100 {
            return Err(anyhow!("Page size must be between 1 and 100"));
        }

        if self.request_timeout_secs == 0 {
            return Err(anyhow!("Request timeout must be greater than 0"));
        }

        if !matches!(self.log_format.as_str(), "text" | "json") {
            return Err(anyhow!("Log format must be 'text' or 'json'"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> Config {
        Config {
            api_base_url: "http://localhost:3001".to_string(),
            api_token: None,
            request_timeout_secs: 10,
            user_id: None,
            active_swap_id: None,
            page_size: 20,
            search_debounce_ms: 300,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(create_test_config().validate().is_ok());
    }

    #[test]
    fn test_invalid_page_size() {
        let mut config = create_test_config();
        config.page_size = 0;
        assert!(config.validate().is_err());

        config.page_size = 500;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_base_url_and_log_format() {
        let mut config = create_test_config();
        config.api_base_url = "localhost:3001".to_string();
        assert!(config.validate().is_err());

        let mut config = create_test_config();
        config.log_format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_defaults_and_overrides() {
        let config: Config = Config::builder()
            .unwrap()
            .add_source(config::File::from_str(
                r#"{
                    "api_token": "abc.def.ghi",
                    "user_id": "1b2c3d4e-5f60-4a7b-8c9d-0e1f2a3b4c5d",
                    "page_size": 50
                }"#,
                config::FileFormat::Json,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.api_base_url, "http://localhost:3001");
        assert_eq!(config.api_token.as_deref(), Some("abc.def.ghi"));
        assert!(config.user_id.is_some());
        assert!(config.active_swap_id.is_none());
        assert_eq!(config.page_size, 50);
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert!(config.validate().is_ok());
    }
}
