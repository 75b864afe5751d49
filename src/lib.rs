//! Search aggregator: fans a free-text query out to two document collections,
//! concatenates the hits and enriches each one with its related entries.
//!
//! The store is reached through the [`store::DocumentStore`] trait; the
//! shipped implementation talks to Solr cores over HTTP.

pub mod config;
pub mod error;
pub mod metrics;
pub mod network;
pub mod results;
pub mod search;
pub mod store;
pub mod web;

pub use config::Settings;
pub use error::{QueryFailure, StoreError};
pub use results::{EnrichedRecord, Record, RelatedEntry};
pub use search::SearchAggregator;
pub use store::DocumentStore;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for store requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 5;

/// Maximum timeout that can be set
pub const MAX_TIMEOUT: u64 = 30;
