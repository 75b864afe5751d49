//! Document store module
//!
//! Defines the DocumentStore trait and the Solr implementation the service
//! talks to, plus a registry of named collection targets.

mod registry;
mod solr;
mod traits;

pub use registry::CollectionRegistry;
pub use solr::{SolrCollection, SolrStore};
pub use traits::*;
