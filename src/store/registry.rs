//! Collection registry for managing configured store targets

use super::solr::SolrCollection;
use crate::config::Settings;
use crate::error::StoreError;
use std::collections::HashMap;
use tracing::info;

/// Registry of all configured collections
#[derive(Debug, Default)]
pub struct CollectionRegistry {
    /// Collections by name
    collections: HashMap<String, SolrCollection>,
}

impl CollectionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            collections: HashMap::new(),
        }
    }

    /// Build a registry from the configured collections
    pub fn from_settings(settings: &Settings) -> Result<Self, StoreError> {
        let mut registry = Self::new();

        for config in &settings.collections {
            let collection = SolrCollection::from_config(config)?;
            info!(
                "Loaded collection: {} ({})",
                config.name,
                collection.select_url()
            );
            registry.register(collection);
        }

        Ok(registry)
    }

    /// Register a collection, replacing any previous one with the same name
    pub fn register(&mut self, collection: SolrCollection) {
        self.collections
            .insert(collection.name().to_string(), collection);
    }

    /// Get a collection by name
    pub fn get(&self, name: &str) -> Option<&SolrCollection> {
        self.collections.get(name)
    }

    /// Check if a collection exists
    pub fn contains(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    /// Get number of registered collections
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
