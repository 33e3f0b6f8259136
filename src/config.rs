//! Configuration module for StatForge
//!
//! Loads the driver settings from environment variables. The composition
//! core takes everything it needs as arguments; only the CLI reads this.

use envconfig::Envconfig;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{validate_site_domain, Granularity};

/// Main configuration structure for StatForge
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct Config {
    /// Logging configuration
    #[serde(flatten)]
    #[envconfig(nested = true)]
    pub logging: LoggingConfig,

    /// Composition defaults
    #[serde(flatten)]
    #[envconfig(nested = true)]
    pub compose: ComposeConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct LoggingConfig {
    /// Log level
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: String,

    /// Environment (development, staging, production)
    #[envconfig(from = "ENVIRONMENT", default = "development")]
    pub environment: String,
}

impl LoggingConfig {
    /// Check if running in development mode
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Composition defaults applied when a request leaves them out
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct ComposeConfig {
    /// Path to a referrer registry JSON file; the built-in table is used when unset
    #[envconfig(from = "REFERRER_REGISTRY_PATH")]
    pub registry_path: Option<String>,

    /// Site domain used for self-referral detection when a request has none
    #[envconfig(from = "DEFAULT_SITE_DOMAIN")]
    pub default_site_domain: Option<String>,

    /// Granularity used when a request has none
    #[envconfig(from = "DEFAULT_GRANULARITY", default = "daily")]
    pub default_granularity: String,
}

impl ComposeConfig {
    /// Parsed default granularity
    pub fn granularity(&self) -> Result<Granularity> {
        Granularity::from_str(&self.default_granularity).map_err(Error::from)
    }

    /// Normalized default site domain, if any
    pub fn site_domain(&self) -> Option<String> {
        validate_site_domain(self.default_site_domain.clone())
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenv::dotenv().ok();

        Config::init_from_env().map_err(Error::from)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.logging.log_level.trim().is_empty() {
            return Err(Error::config("Log level cannot be empty"));
        }

        self.compose.granularity()?;

        if let Some(path) = &self.compose.registry_path {
            if path.trim().is_empty() {
                return Err(Error::config("Referrer registry path cannot be empty"));
            }
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!(
            environment = %self.logging.environment,
            log_level = %self.logging.log_level,
            "Logging configuration"
        );

        tracing::info!(
            registry = %self.compose.registry_path.as_deref().unwrap_or("builtin"),
            default_site_domain = ?self.compose.site_domain(),
            default_granularity = %self.compose.default_granularity,
            "Compose configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            logging: LoggingConfig {
                log_level: "debug".to_string(),
                environment: "development".to_string(),
            },
            compose: ComposeConfig {
                registry_path: None,
                default_site_domain: Some("  HTTPS://Shop.Test/ ".to_string()),
                default_granularity: "hourly".to_string(),
            },
        }
    }

    #[test]
    fn test_logging_config_environment() {
        let config = test_config();
        assert!(config.logging.is_development());
        assert!(!config.logging.is_production());
    }

    #[test]
    fn test_compose_defaults() {
        let config = test_config();
        assert_eq!(config.compose.granularity().unwrap(), Granularity::Hourly);
        assert_eq!(config.compose.site_domain(), Some("shop.test".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_granularity_rejected() {
        let mut config = test_config();
        config.compose.default_granularity = "weekly".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_empty_registry_path_rejected() {
        let mut config = test_config();
        config.compose.registry_path = Some("  ".to_string());
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
