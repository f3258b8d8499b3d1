//! Lookup orchestration - wires together fetch, sniff, extract and normalize.

use std::sync::Arc;
use std::time::Instant;

use super::cache::{cache_key, KeyValueCache, MemoryCache};
use super::extract::{ExifExtractor, MetadataExtractor};
use super::fetch::{HttpFetcher, ResourceFetcher};
use super::validate::{ImageTypeValidator, MagicBytesValidator};
use crate::config::Config;
use crate::error::{FetchError, LookupError, LookupResult};
use crate::metadata::normalize;
use crate::types::{LookupResponse, NormalizedRecord};

/// Options for controlling a single lookup.
#[derive(Debug, Clone, Default)]
pub struct LookupOptions {
    /// Ignore any cached result and do not store a new one
    pub bypass_cache: bool,
}

/// The metadata lookup service.
///
/// Every collaborator is shared, so one instance can serve concurrent
/// requests.
#[derive(Clone)]
pub struct ExifLookup {
    fetcher: Arc<dyn ResourceFetcher>,
    validator: Arc<dyn ImageTypeValidator>,
    extractor: Option<Arc<dyn MetadataExtractor>>,
    cache: Option<Arc<dyn KeyValueCache>>,
}

impl ExifLookup {
    /// Create a lookup around `fetcher` with the default validator and
    /// EXIF extractor, and no cache.
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self {
            fetcher,
            validator: Arc::new(MagicBytesValidator::new()),
            extractor: Some(Arc::new(ExifExtractor::new())),
            cache: None,
        }
    }

    /// Build the production lookup: HTTP fetcher, plus a memory cache if enabled.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(config.fetch.clone())?;
        let lookup = Self::new(Arc::new(fetcher));
        Ok(if config.cache.enabled {
            lookup.with_cache(Arc::new(MemoryCache::from_config(&config.cache)))
        } else {
            lookup
        })
    }

    pub fn with_validator(mut self, validator: Arc<dyn ImageTypeValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Replace the extractor; `None` models a build without EXIF support.
    pub fn with_extractor(mut self, extractor: Option<Arc<dyn MetadataExtractor>>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn KeyValueCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Look up the metadata of the image at `url`.
    pub async fn lookup(&self, url: &str) -> LookupResult<NormalizedRecord> {
        self.lookup_with_options(url, &LookupOptions::default())
            .await
    }

    /// Look up with custom options.
    pub async fn lookup_with_options(
        &self,
        url: &str,
        options: &LookupOptions,
    ) -> LookupResult<NormalizedRecord> {
        let url = url.trim();
        if url.is_empty() {
            return Err(LookupError::MissingUrl);
        }
        let extractor = self
            .extractor
            .clone()
            .ok_or(LookupError::ExtractorUnavailable)?;

        let start = Instant::now();
        tracing::debug!("Looking up: {}", url);

        let cache = if options.bypass_cache {
            None
        } else {
            self.cache.as_deref()
        };
        let key = cache_key(url);

        if let Some(record) = cache.and_then(|c| Self::cached(c, &key)) {
            tracing::debug!("Cache hit for {} ({} fields)", url, record.len());
            return Ok(record);
        }

        // Fetch
        let fetch_start = Instant::now();
        let bytes = self.fetcher.fetch(url).await?;
        tracing::trace!("  Fetch: {:?} ({} bytes)", fetch_start.elapsed(), bytes.len());

        // Sniff
        if !self.validator.is_image(&bytes) {
            return Err(LookupError::NotAnImage);
        }

        // Extract (off the async runtime; parsing is CPU-bound)
        let extract_start = Instant::now();
        let raw = tokio::task::spawn_blocking(move || extractor.extract(&bytes))
            .await
            .map_err(|e| {
                tracing::warn!("Extraction task failed: {e}");
                LookupError::ExifNotFound
            })?
            .map_err(|_| LookupError::ExifNotFound)?;
        tracing::trace!("  Extract: {:?} ({} raw fields)", extract_start.elapsed(), raw.len());

        // Normalize
        let record = normalize(&raw);

        if let Some(cache) = cache {
            match serde_json::to_string(&record) {
                Ok(json) => cache.set(&key, json),
                Err(e) => tracing::warn!("Cannot cache lookup for {}: {e}", url),
            }
        }

        tracing::debug!(
            "Looked up {} in {:?} ({} fields)",
            url,
            start.elapsed(),
            record.len()
        );
        Ok(record)
    }

    /// Look up and wrap the outcome in the response envelope.
    pub async fn respond(&self, url: &str) -> LookupResponse {
        self.respond_with_options(url, &LookupOptions::default())
            .await
    }

    pub async fn respond_with_options(&self, url: &str, options: &LookupOptions) -> LookupResponse {
        let result = self.lookup_with_options(url, options).await;
        if let Err(e) = &result {
            tracing::info!("Lookup failed for {:?}: {}", url, e);
        }
        result.into()
    }

    fn cached(cache: &dyn KeyValueCache, key: &str) -> Option<NormalizedRecord> {
        let json = cache.get(key)?;
        serde_json::from_str(&json)
            .map_err(|e| tracing::warn!("Discarding unreadable cache entry {key}: {e}"))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_options_default() {
        let options = LookupOptions::default();
        assert!(!options.bypass_cache);
    }

    #[test]
    fn test_from_config_respects_cache_toggle() {
        let mut config = Config::default();
        assert!(ExifLookup::from_config(&config).unwrap().cache.is_some());

        config.cache.enabled = false;
        assert!(ExifLookup::from_config(&config).unwrap().cache.is_none());
    }

    #[tokio::test]
    async fn test_blank_url_is_rejected_before_fetching() {
        let config = Config::default();
        let lookup = ExifLookup::from_config(&config).unwrap();
        assert_eq!(lookup.lookup("   ").await, Err(LookupError::MissingUrl));
    }
}
