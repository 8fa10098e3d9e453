//! Configuration validation rules.
//!
//! Applied to `AppConfig` after it has been loaded from environment,
//! files, or defaults.

use std::collections::HashSet;

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `app_prefix` or `version` is empty,
    /// and `ConfigError::Invalid` if:
    /// - `origin` is not an absolute http(s) URL
    /// - a manifest entry is empty, unresolvable, or a duplicate
    /// - `timeout_ms` is set below 100ms or above 5 minutes
    /// - `max_redirects` exceeds 20
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        // An empty prefix would put every co-hosted bucket in scope for deletion.
        if self.app_prefix.is_empty() {
            return Err(ConfigError::Missing {
                field: "app_prefix".into(),
                hint: "Set LANTERN_APP_PREFIX environment variable".into(),
            });
        }
        if self.version.is_empty() {
            return Err(ConfigError::Missing {
                field: "version".into(),
                hint: "Set LANTERN_VERSION environment variable".into(),
            });
        }

        let requests = self.manifest_requests()?;
        let mut seen = HashSet::new();
        for request in &requests {
            if !seen.insert(request.url.as_str()) {
                return Err(invalid("manifest", format!("duplicate entry: {}", request.url)));
            }
        }
        if requests.is_empty() {
            tracing::warn!("manifest is empty; install will provision an empty bucket");
        }

        if let Some(timeout_ms) = self.timeout_ms {
            if timeout_ms < 100 {
                return Err(invalid("timeout_ms", "must be at least 100ms"));
            }
            if timeout_ms > 300_000 {
                return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
            }
        }

        if self.max_redirects > 20 {
            return Err(invalid("max_redirects", "must not exceed 20"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_prefix() {
        let config = AppConfig { app_prefix: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Missing { field, .. }) if field == "app_prefix"));
    }

    #[test]
    fn test_validate_empty_version() {
        let config = AppConfig { version: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Missing { field, .. }) if field == "version"));
    }

    #[test]
    fn test_validate_bad_origin() {
        let config = AppConfig { origin: "not a url".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "origin"));
    }

    #[test]
    fn test_validate_empty_manifest_entry() {
        let config = AppConfig { manifest: vec!["./index.html".into(), "  ".into()], ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "manifest"));
    }

    #[test]
    fn test_validate_duplicate_after_resolution() {
        let config = AppConfig { manifest: vec!["./index.html".into(), "/index.html".into()], ..Default::default() };
        let result = config.validate();
        assert!(
            matches!(result, Err(ConfigError::Invalid { field, reason }) if field == "manifest" && reason.contains("duplicate"))
        );
    }

    #[test]
    fn test_validate_empty_manifest_allowed() {
        let config = AppConfig { manifest: Vec::new(), ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let too_small = AppConfig { timeout_ms: Some(50), ..Default::default() };
        assert!(matches!(too_small.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));

        let too_large = AppConfig { timeout_ms: Some(301_000), ..Default::default() };
        assert!(matches!(too_large.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));

        let edges = [Some(100), Some(300_000), None];
        for timeout_ms in edges {
            let config = AppConfig { timeout_ms, ..Default::default() };
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_validate_max_redirects() {
        let config = AppConfig { max_redirects: 21, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_redirects"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }
}
