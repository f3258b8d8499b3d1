//! Error types for exifgate.
//!
//! Lookup failures carry the exact, client-facing messages of the lookup
//! endpoint in their `Display` impls; everything that reaches a response body
//! is rendered through `to_string()`.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for exifgate operations.
#[derive(Error, Debug)]
pub enum ExifGateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Lookup pipeline errors
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// Secret persistence errors
    #[error("Secret store error: {0}")]
    SecretStore(#[from] SecretStoreError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Failures of the remote resource fetcher.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network-level failure; the message comes from the HTTP client as-is.
    #[error("{0}")]
    Transport(String),

    /// The remote server answered with a non-success status.
    #[error("Remote image returned HTTP {0}.")]
    Status(u16),

    /// The remote server answered 2xx with no bytes.
    #[error("Remote image returned an empty body.")]
    EmptyBody,

    /// The body exceeded the configured size limit.
    #[error("Remote image exceeds the {max_mb}MB size limit.")]
    TooLarge { max_mb: u64 },

    /// The request did not complete in time.
    #[error("Remote image request timed out after {timeout_ms}ms.")]
    Timeout { timeout_ms: u64 },

    /// The URL could not be parsed or uses an unsupported scheme.
    #[error("Invalid image URL: {0}")]
    InvalidUrl(String),
}

/// Failures of a single metadata lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No URL was supplied.
    #[error("No image URL provided.")]
    MissingUrl,

    /// Fetching the remote resource failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The fetched bytes are not a recognized image format.
    #[error("URL does not point to a valid image.")]
    NotAnImage,

    /// No metadata, or the decoder rejected the data.
    #[error("EXIF Not Found for image")]
    ExifNotFound,

    /// No metadata extractor is available in this build.
    #[error("exif_read_data function not found!")]
    ExtractorUnavailable,
}

/// Failures of a secret store backend.
#[derive(Error, Debug)]
pub enum SecretStoreError {
    /// Reading or writing a secret file failed
    #[error("Secret I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The secret name cannot be used as a storage key.
    #[error("Invalid secret name: {0:?}")]
    InvalidName(String),

    /// A stored secret could not be decoded.
    #[error("Stored secret {0:?} is corrupt")]
    Corrupt(String),
}

impl From<FetchError> for ExifGateError {
    fn from(err: FetchError) -> Self {
        Self::Lookup(LookupError::Fetch(err))
    }
}

/// Convenience type alias for exifgate results.
pub type Result<T> = std::result::Result<T, ExifGateError>;

/// Convenience type alias for lookup results.
pub type LookupResult<T> = std::result::Result<T, LookupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_lookup_messages() {
        assert_eq!(
            LookupError::Fetch(FetchError::Status(404)).to_string(),
            "Remote image returned HTTP 404."
        );
        assert_eq!(
            LookupError::Fetch(FetchError::EmptyBody).to_string(),
            "Remote image returned an empty body."
        );
        assert_eq!(
            LookupError::NotAnImage.to_string(),
            "URL does not point to a valid image."
        );
        assert_eq!(LookupError::ExifNotFound.to_string(), "EXIF Not Found for image");
        assert_eq!(
            LookupError::ExtractorUnavailable.to_string(),
            "exif_read_data function not found!"
        );
    }

    #[test]
    fn test_transport_message_passes_through() {
        let err = LookupError::from(FetchError::Transport("dns error: no such host".into()));
        assert_eq!(err.to_string(), "dns error: no such host");
    }
}
