//! Application state shared across handlers

use crate::config::Settings;
use crate::metrics::Metrics;
use crate::network::HttpClient;
use crate::search::SearchAggregator;
use crate::store::{CollectionRegistry, DocumentStore, SolrStore};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search aggregator
    pub aggregator: Arc<SearchAggregator>,
    /// Metrics shared with the aggregator
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create new application state backed by the configured Solr collections
    pub fn new(settings: Settings, client: HttpClient) -> anyhow::Result<Self> {
        let registry = Arc::new(CollectionRegistry::from_settings(&settings)?);
        let store = Arc::new(SolrStore::new(client, registry));
        Ok(Self::with_store(settings, store))
    }

    /// Create application state over any document store
    pub fn with_store(settings: Settings, store: Arc<dyn DocumentStore>) -> Self {
        let metrics = Arc::new(Metrics::new());
        let aggregator = Arc::new(
            SearchAggregator::new(store, &settings.aggregator).with_metrics(metrics.clone()),
        );

        Self {
            settings: Arc::new(settings),
            aggregator,
            metrics,
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
