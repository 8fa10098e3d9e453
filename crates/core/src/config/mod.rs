//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (LANTERN_*)
//! 2. TOML config file (if LANTERN_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::Request;
use crate::request::resolve;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (LANTERN_*)
/// 2. TOML config file (if LANTERN_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Namespace shared by every bucket this application owns.
    ///
    /// Set via LANTERN_APP_PREFIX environment variable.
    #[serde(default = "default_app_prefix")]
    pub app_prefix: String,

    /// Release tag; the active bucket is `app_prefix + version`.
    ///
    /// Set via LANTERN_VERSION environment variable.
    #[serde(default = "default_version")]
    pub version: String,

    /// Site origin that relative manifest paths resolve against.
    ///
    /// Set via LANTERN_ORIGIN environment variable.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Asset paths provisioned at install, in order.
    #[serde(default = "default_manifest")]
    pub manifest: Vec<String>,

    /// Path to SQLite cache database.
    ///
    /// Set via LANTERN_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for network requests.
    ///
    /// Set via LANTERN_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Optional transport timeout in milliseconds. Unset means none.
    ///
    /// Set via LANTERN_TIMEOUT_MS environment variable.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Maximum number of redirects the transport follows.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Run install and activate when the host starts.
    ///
    /// Set via LANTERN_AUTO_START environment variable.
    #[serde(default = "default_true")]
    pub auto_start: bool,
}

fn default_app_prefix() -> String {
    "FoodFest-".into()
}

fn default_version() -> String {
    "version_01".into()
}

fn default_origin() -> String {
    "http://localhost:8080/".into()
}

fn default_manifest() -> Vec<String> {
    [
        "./index.html",
        "./events.html",
        "./tickets.html",
        "./schedule.html",
        "./assets/css/style.css",
        "./assets/css/bootstrap.css",
        "./assets/css/tickets.css",
        "./dist/app.bundle.js",
        "./dist/events.bundle.js",
        "./dist/tickets.bundle.js",
        "./dist/schedule.bundle.js",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./lantern-cache.sqlite")
}

fn default_user_agent() -> String {
    "lantern/0.1".into()
}

fn default_max_redirects() -> usize {
    5
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_prefix: default_app_prefix(),
            version: default_version(),
            origin: default_origin(),
            manifest: default_manifest(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: None,
            max_redirects: default_max_redirects(),
            auto_start: true,
        }
    }
}

impl AppConfig {
    /// Name of the active bucket.
    pub fn bucket_name(&self) -> String {
        format!("{}{}", self.app_prefix, self.version)
    }

    /// Transport timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Parsed site origin.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `origin` is not an absolute http(s) URL.
    pub fn origin_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.origin)
            .map_err(|e| ConfigError::Invalid { field: "origin".into(), reason: e.to_string() })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => {
                Err(ConfigError::Invalid { field: "origin".into(), reason: format!("unsupported scheme: {scheme}") })
            }
        }
    }

    /// Manifest entries resolved against the origin as GET requests.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the origin or any entry cannot be resolved.
    pub fn manifest_requests(&self) -> Result<Vec<Request>, ConfigError> {
        let origin = self.origin_url()?;
        self.manifest
            .iter()
            .map(|path| {
                resolve(&origin, path)
                    .map(Request::get)
                    .map_err(|e| ConfigError::Invalid { field: "manifest".into(), reason: format!("{path}: {e}") })
            })
            .collect()
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `LANTERN_`
    /// 2. TOML file from `LANTERN_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("LANTERN_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("LANTERN_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
