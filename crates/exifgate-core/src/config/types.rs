//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory for persistent state (file-backed secrets)
    pub data_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("~/.exifgate"),
        }
    }
}

/// Remote fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Maximum accepted body size in megabytes
    pub max_body_mb: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Max retry attempts for transient failures
    pub retry_attempts: u32,

    /// Base delay between retries in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_body_mb: 25,
            user_agent: format!("exifgate/{}", env!("CARGO_PKG_VERSION")),
            retry_attempts: 2,
            retry_delay_ms: 500,
        }
    }
}

/// Lookup result cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether successful lookups are cached
    pub enabled: bool,

    /// Time-to-live of a cache entry in seconds
    pub ttl_secs: u64,

    /// Maximum number of cached entries
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 86_400,
            max_entries: 1024,
        }
    }
}

/// Authentication settings for the HTTP endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Require authentication on the lookup endpoint
    pub enabled: bool,

    /// Name under which the TOTP secret is stored
    pub secret_name: String,

    /// Header set by a trusted front-end when the caller already has a session.
    /// Unset means no caller is ever treated as session-authenticated.
    pub session_header: Option<String>,

    /// Issuer label used in provisioning URIs
    pub issuer: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            secret_name: "totp_secret".to_string(),
            session_header: None,
            issuer: "exifgate".to_string(),
        }
    }
}

/// HTTP endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,

    /// Path of the lookup route
    pub route: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            route: "/exif".to_string(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
