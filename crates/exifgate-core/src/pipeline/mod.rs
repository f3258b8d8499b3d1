//! Image lookup pipeline components.
//!
//! - **fetch**: Retrieve image bytes over HTTP(S)
//! - **retry**: Backoff policy for transient fetch failures
//! - **validate**: Sniff whether fetched bytes are an image
//! - **extract**: Read raw EXIF fields from image bytes
//! - **cache**: Keyed cache of normalized results
//! - **processor**: Orchestrates the full lookup

pub mod cache;
pub mod extract;
pub mod fetch;
pub mod processor;
pub mod retry;
pub mod validate;

// Re-exports for convenient access
pub use cache::{cache_key, KeyValueCache, MemoryCache};
pub use extract::{ExifExtractor, MetadataExtractor, NotFound};
pub use fetch::{HttpFetcher, ResourceFetcher};
pub use processor::{ExifLookup, LookupOptions};
pub use validate::{ImageTypeValidator, MagicBytesValidator};
