//! # Chartfeed Core
//!
//! Series normalization and temporal queries for financial chart feeds.
//!
//! ## Overview
//!
//! Metric APIs and static chart documents ship time series in loosely
//! agreed-on JSON shapes. This crate turns them into canonical, queryable
//! series and answers the questions a chart frontend asks:
//!
//! - **Normalizer**: heterogeneous records in, strictly ascending
//!   `{time, value}` series out
//! - **Temporal query engine**: nearest-at-or-before lookup, per-range
//!   percent change, range filtering
//! - **Transforms**: cumulative sums, scaling, aligned ratios for derived
//!   datasets
//! - **Feed client**: async fetch with an in-memory cache keyed by source
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | In-memory series cache keyed by source |
//! | [`domain`] | Canonical types (Point, Series, RangeToken, UtcDateTime) |
//! | [`error`] | Core error types |
//! | [`feed`] | Fetch orchestration and per-source failure isolation |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`normalize`] | Raw record probing and series construction |
//! | [`query`] | Temporal queries and range arithmetic |
//! | [`transform`] | Derived-series construction |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chartfeed_core::{change_summary, FeedClient, ReqwestHttpClient, SourceSpec};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FeedClient::new(Arc::new(ReqwestHttpClient::new()));
//!     let spec = SourceSpec::new("pump:price", "https://example.test/data/pump.json");
//!
//!     let series = client.load(&spec).await?;
//!     for change in change_summary(&series) {
//!         println!("{}: {:?}", change.range, change.percent);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Failure semantics
//!
//! Malformed records are dropped during normalization rather than failing a
//! batch. Queries over empty series return `None` instead of raising, and no
//! computed percent change is ever NaN or infinite. A fetch failure is scoped
//! to its one source.

pub mod cache;
pub mod domain;
pub mod error;
pub mod feed;
pub mod http_client;
pub mod normalize;
pub mod query;
pub mod transform;

// Re-export commonly used types at crate root for convenience

// Caching
pub use cache::SeriesCache;

// Domain models
pub use domain::{Point, RangeToken, Series, UtcDateTime};

// Error types
pub use error::{CoreError, ValidationError};

// Feed client
pub use feed::{FeedClient, FeedError, SourceSpec};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};

// Normalization
pub use normalize::{document_records, normalize, GENERIC_VALUE_KEYS, TIMESTAMP_KEYS, VALUE_KEYS};

// Temporal queries
pub use query::{
    baseline_time, baseline_value, change_over_range, change_summary, filter_by_range,
    percent_change, value_at_or_before, RangeChange,
};

// Transforms
pub use transform::{cumulative, ratio, scale};
