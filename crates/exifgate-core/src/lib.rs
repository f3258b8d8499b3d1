//! ExifGate Core - image metadata lookup behind a one-time-password gate.
//!
//! Given the URL of a remote image, ExifGate fetches it, confirms it is an
//! image, reads its EXIF block and returns a canonical JSON-friendly record.
//! Access can be guarded by a TOTP credential gate.
//!
//! # Architecture
//!
//! ```text
//! URL → Fetch → Sniff → Extract EXIF → Normalize → { success, data }
//!                                          ↑
//!                     rational / GPS / timestamp canonicalization
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use exifgate_core::{Config, ExifLookup};
//!
//! #[tokio::main]
//! async fn main() -> exifgate_core::Result<()> {
//!     let config = Config::load()?;
//!     let lookup = ExifLookup::from_config(&config)?;
//!
//!     let response = lookup.respond("https://example.com/photo.jpg").await;
//!     println!("{}", serde_json::to_string(&response)?);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod auth;
pub mod config;
pub mod error;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use auth::{AuthRejection, CredentialGate, FileSecretStore, OtpSecret, SecretStore};
pub use config::Config;
pub use error::{
    ConfigError, ExifGateError, FetchError, LookupError, LookupResult, Result, SecretStoreError,
};
pub use metadata::normalize;
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{ExifLookup, LookupOptions};
pub use types::{CanonicalValue, LookupResponse, NormalizedRecord, RawRecord, RawValue};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
