//! Record types produced by the aggregator
//!
//! Store documents are untyped; this module defines the typed projections and
//! converts at the boundary.

mod types;

pub use types::*;
