//! Solr-backed document store
//!
//! Talks to the standard select handler: `GET /{base_path}/{core}/select?q=...&wt=json`.

use super::registry::CollectionRegistry;
use super::traits::*;
use crate::config::CollectionConfig;
use crate::error::StoreError;
use crate::network::HttpClient;
use crate::results::Document;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Longest slice of an error body kept for logging
const MAX_ERROR_BODY: usize = 200;

/// A single Solr core reachable at a configured endpoint
#[derive(Debug, Clone)]
pub struct SolrCollection {
    name: String,
    select_url: Url,
    rows: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SelectResponse {
    response: SelectBody,
}

#[derive(Debug, Deserialize)]
struct SelectBody {
    #[serde(default)]
    docs: Vec<Document>,
}

impl SolrCollection {
    /// Build a collection from its configuration
    pub fn from_config(config: &CollectionConfig) -> Result<Self, StoreError> {
        let base = format!("{}://{}:{}/", config.protocol, config.host, config.port);
        let mut select_url = Url::parse(&base).map_err(|e| {
            StoreError::Config(format!("collection '{}': {}: {}", config.name, base, e))
        })?;

        select_url
            .path_segments_mut()
            .map_err(|_| {
                StoreError::Config(format!("collection '{}': {} cannot be a base", config.name, base))
            })?
            .pop_if_empty()
            .extend(config.base_path.split('/').filter(|s| !s.is_empty()))
            .push(&config.core)
            .push("select");

        Ok(Self {
            name: config.name.clone(),
            select_url,
            rows: config.rows,
        })
    }

    /// Collection name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full URL of the select handler
    pub fn select_url(&self) -> &Url {
        &self.select_url
    }

    /// Build the select request for a query
    pub fn request(&self, query: &str) -> StoreRequest {
        let mut request = StoreRequest::get(self.select_url.as_str())
            .param("q", query)
            .param("wt", "json")
            .header("Accept", "application/json");

        if let Some(rows) = self.rows {
            request = request.param("rows", rows.to_string());
        }

        request
    }

    /// Parse the select response into documents
    pub fn response(&self, response: StoreResponse) -> Result<Vec<Document>, StoreError> {
        if !response.is_success() {
            return Err(StoreError::Status {
                status: response.status,
                body: response.text.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let parsed: SelectResponse = response.json()?;
        Ok(parsed.response.docs)
    }
}

/// Document store backed by one or more Solr cores
#[derive(Clone)]
pub struct SolrStore {
    client: HttpClient,
    registry: Arc<CollectionRegistry>,
}

impl SolrStore {
    /// Create a new store over the given collections
    pub fn new(client: HttpClient, registry: Arc<CollectionRegistry>) -> Self {
        Self { client, registry }
    }
}

#[async_trait]
impl DocumentStore for SolrStore {
    async fn query(&self, collection: &str, query: &str) -> Result<Vec<Document>, StoreError> {
        let target = self
            .registry
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;

        let request = target.request(query);
        debug!("Querying {} at {}: {}", collection, target.select_url(), query);

        let response = self.client.execute(request).await?;
        let url = response.url.clone();
        let docs = target.response(response)?;

        debug!("Collection {} returned {} documents from {}", collection, docs.len(), url);
        Ok(docs)
    }
}
