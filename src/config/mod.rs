//! Configuration module for the search aggregator
//!
//! Handles loading and validating settings from YAML files and environment variables.
//! Settings are passed explicitly to the components that need them; there is no
//! process-wide settings instance.

mod settings;

pub use settings::*;
