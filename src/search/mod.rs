//! Search orchestration module
//!
//! Runs the query against both collections, concatenates the hits and
//! enriches each one with its related entries.

mod executor;

pub use executor::SearchAggregator;
