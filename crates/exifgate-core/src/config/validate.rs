//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "fetch.timeout_ms must be > 0".into(),
            ));
        }
        if self.fetch.max_body_mb == 0 {
            return Err(ConfigError::ValidationError(
                "fetch.max_body_mb must be > 0".into(),
            ));
        }
        if self.cache.enabled && self.cache.max_entries == 0 {
            return Err(ConfigError::ValidationError(
                "cache.max_entries must be > 0 when the cache is enabled".into(),
            ));
        }
        if self.auth.secret_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.secret_name must not be empty".into(),
            ));
        }
        if let Some(header) = &self.auth.session_header {
            if header.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "auth.session_header must not be empty when set".into(),
                ));
            }
        }
        if !self.server.route.starts_with('/') {
            return Err(ConfigError::ValidationError(
                "server.route must start with '/'".into(),
            ));
        }
        if !matches!(self.output.format.as_str(), "json" | "jsonl") {
            return Err(ConfigError::ValidationError(
                "output.format must be \"json\" or \"jsonl\"".into(),
            ));
        }
        Ok(())
    }
}
