//! HTTP networking module
//!
//! Provides the HTTP client used to reach the document store.

mod client;

pub use client::HttpClient;
