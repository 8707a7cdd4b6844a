//! Fetch orchestration: HTTP resource in, cached canonical series out.
//!
//! Each source is independent; a failing fetch surfaces as a [`FeedError`]
//! for that source only and never poisons the cache or other sources.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::SeriesCache;
use crate::http_client::{HttpClient, HttpError, HttpRequest};
use crate::normalize::{document_records, normalize};
use crate::Series;

/// One fetchable series: where it lives and how to read its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    key: String,
    url: String,
    value_key: Option<String>,
    params: Vec<(String, String)>,
}

impl SourceSpec {
    /// `key` identifies the series in the cache; `url` is the JSON resource.
    pub fn new(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: url.into(),
            value_key: None,
            params: Vec::new(),
        }
    }

    /// Probe this field before the generic value candidates, e.g. `fees`
    /// or `buybacks_usd`.
    pub fn with_value_key(mut self, value_key: impl Into<String>) -> Self {
        self.value_key = Some(value_key.into());
        self
    }

    /// Append a query parameter, percent-encoded when the URL is built.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value_key(&self) -> Option<&str> {
        self.value_key.as_deref()
    }

    /// Full request URL with encoded query parameters.
    pub fn request_url(&self) -> String {
        if self.params.is_empty() {
            return self.url.clone();
        }

        let query = self
            .params
            .iter()
            .map(|(name, value)| {
                format!("{}={}", urlencoding::encode(name), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&");

        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.url, separator, query)
    }
}

/// Failure loading one series. Other sources are unaffected.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("transport error: {0}")]
    Transport(#[from] HttpError),

    #[error("unexpected status {status} from '{url}'")]
    Status { status: u16, url: String },

    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("no series records found in document from '{url}'")]
    UnexpectedShape { url: String },
}

/// Fetches, normalizes, and caches series by source key.
#[derive(Clone)]
pub struct FeedClient {
    http: Arc<dyn HttpClient>,
    cache: SeriesCache,
    timeout_ms: u64,
}

impl FeedClient {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            cache: SeriesCache::new(),
            timeout_ms: 10_000,
        }
    }

    pub fn with_cache(mut self, cache: SeriesCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    /// Load a series, serving from the cache when possible.
    pub async fn load(&self, spec: &SourceSpec) -> Result<Arc<Series>, FeedError> {
        if let Some(cached) = self.cache.get(spec.key()).await {
            debug!(key = spec.key(), "series cache hit");
            return Ok(cached);
        }

        self.reload(spec).await
    }

    /// Fetch unconditionally and overwrite the cache entry.
    pub async fn reload(&self, spec: &SourceSpec) -> Result<Arc<Series>, FeedError> {
        let url = spec.request_url();
        debug!(key = spec.key(), url = url.as_str(), "fetching series");

        let request = HttpRequest::get(&url).with_timeout_ms(self.timeout_ms);
        let response = self.http.execute(request).await.inspect_err(|error| {
            warn!(key = spec.key(), %error, "series fetch failed");
        })?;

        if !response.is_success() {
            warn!(key = spec.key(), status = response.status, "series fetch rejected");
            return Err(FeedError::Status {
                status: response.status,
                url,
            });
        }

        let document: serde_json::Value = serde_json::from_str(&response.body)?;
        let records = document_records(&document).ok_or(FeedError::UnexpectedShape { url })?;

        let series = normalize(records, spec.value_key());
        debug!(key = spec.key(), points = series.len(), "series normalized");

        Ok(self.cache.put(spec.key(), series).await)
    }
}
