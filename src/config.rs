//! Configuration management for the InfraNodus MCP Server
//!
//! Handles environment variables and configuration loading. The resulting
//! [`Config`] is built once at startup and handed to the API client.

use crate::error::{ConfigError, Result};

/// Configuration for the InfraNodus MCP Server
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token for the InfraNodus API (anonymous access when absent)
    pub api_key: Option<String>,

    /// Base URL of the InfraNodus API, without trailing slash
    pub api_base: String,
}

impl Config {
    /// Create a configuration from explicit values
    pub fn new(api_key: Option<String>, api_base: impl Into<String>) -> Result<Self> {
        let api_base = normalize_base(api_base.into())?;
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Ok(Self { api_key, api_base })
    }

    /// Create a configuration from the process environment
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(infranodus::API_KEY_ENV).ok();
        let api_base = std::env::var(infranodus::API_BASE_ENV)
            .ok()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| infranodus::DEFAULT_API_BASE.to_string());

        Self::new(api_key, api_base)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: infranodus::DEFAULT_API_BASE.to_string(),
        }
    }
}

fn normalize_base(url: String) -> Result<String> {
    let url = url.trim().trim_end_matches('/').to_string();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidApiBase { url }.into());
    }
    Ok(url)
}

/// InfraNodus API constants
pub mod infranodus {
    /// Default base URL for the InfraNodus API
    pub const DEFAULT_API_BASE: &str = "https://infranodus.com/api/v1";

    /// Environment variable holding the API key
    pub const API_KEY_ENV: &str = "INFRANODUS_API_KEY";

    /// Environment variable overriding the API base URL
    pub const API_BASE_ENV: &str = "INFRANODUS_API_BASE";

    /// Where users obtain an API key
    pub const API_ACCESS_URL: &str = "https://infranodus.com/api-access";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = Config::new(Some("secret".to_string()), "https://example.com/api/").unwrap();
        assert_eq!(config.api_base, "https://example.com/api");
        assert!(config.has_api_key());
    }

    #[test]
    fn test_blank_key_is_anonymous() {
        let config = Config::new(Some("   ".to_string()), infranodus::DEFAULT_API_BASE).unwrap();
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_invalid_base_rejected() {
        assert!(Config::new(None, "infranodus.com").is_err());
    }

    #[test]
    fn test_default_base() {
        let config = Config::default();
        assert_eq!(config.api_base, "https://infranodus.com/api/v1");
        assert!(config.api_key.is_none());
    }
}
