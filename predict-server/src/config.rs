//! Configuration module

use std::env;
use std::time::Duration;

use phishguard_core::{constants, ExtractorConfig};

/// Default listening port
pub const DEFAULT_PORT: u16 = 10000;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Model artifact written by the trainer
    pub model_path: String,

    /// Fetch submitted pages for content signals
    pub fetch_page: bool,

    /// Resolve submitted hosts for the DNS signal
    pub resolve_dns: bool,

    /// Page fetch / DNS timeout in seconds
    pub fetch_timeout_secs: u64,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            model_path: constants::DEFAULT_MODEL_PATH.to_string(),
            fetch_page: true,
            resolve_dns: true,
            fetch_timeout_secs: constants::DEFAULT_FETCH_TIMEOUT_SECS,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),

            model_path: constants::get_model_path(),

            fetch_page: constants::env_flag("FETCH_PAGE", true),

            resolve_dns: constants::env_flag("RESOLVE_DNS", true),

            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(constants::DEFAULT_FETCH_TIMEOUT_SECS),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            fetch_page: self.fetch_page,
            resolve_dns: self.resolve_dns,
            timeout: Duration::from_secs(self.fetch_timeout_secs),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_config_follows_flags() {
        let config = Config {
            fetch_page: false,
            resolve_dns: true,
            fetch_timeout_secs: 3,
            ..Default::default()
        };
        let extractor = config.extractor_config();

        assert!(!extractor.fetch_page);
        assert!(extractor.resolve_dns);
        assert_eq!(extractor.timeout, Duration::from_secs(3));
        assert!(!config.is_production());
        assert_eq!(Config::default().port, 10000);
    }
}
