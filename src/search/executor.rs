//! Search execution: fan-out, concatenation and per-record enrichment

use crate::config::{AggregatorSettings, RecordFields, RelatedFields};
use crate::error::{QueryFailure, StoreError};
use crate::metrics::Metrics;
use crate::results::{Document, EnrichedRecord, Record, RelatedEntry};
use crate::store::{field_query, DocumentStore};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Search aggregator that queries two collections and enriches every hit
/// with its related entries
///
/// Each call to [`search`](Self::search) is a stateless pipeline; the only
/// state shared between calls is the store handle and the metrics counters.
pub struct SearchAggregator {
    /// Store holding both collections
    store: Arc<dyn DocumentStore>,
    /// Collection whose hits come first
    primary: String,
    /// Collection searched second and used for enrichment lookups
    related: String,
    record_fields: RecordFields,
    related_fields: RelatedFields,
    /// Upper bound on in-flight lookups per request
    max_concurrent_lookups: usize,
    metrics: Arc<Metrics>,
}

impl SearchAggregator {
    /// Create a new aggregator over `store`
    pub fn new(store: Arc<dyn DocumentStore>, settings: &AggregatorSettings) -> Self {
        Self {
            store,
            primary: settings.primary_collection.clone(),
            related: settings.related_collection.clone(),
            record_fields: settings.record_fields.clone(),
            related_fields: settings.related_fields.clone(),
            max_concurrent_lookups: settings.max_concurrent_lookups.max(1),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Share an existing metrics collector
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Metrics recorded by this aggregator
    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Search both collections and return the enriched, concatenated hits.
    ///
    /// Primary hits precede related-collection hits, each group in store
    /// order. Every record, including those from the related collection,
    /// gets the related entries whose owner id equals its id.
    ///
    /// # Errors
    ///
    /// Returns [`QueryFailure`] if any store query fails. No partial results
    /// are returned.
    pub async fn search(&self, query: &str) -> Result<Vec<EnrichedRecord>, QueryFailure> {
        self.metrics.inc_search();
        info!(
            "Executing search '{}' on {} and {}",
            query, self.primary, self.related
        );

        match self.run(query).await {
            Ok(records) => {
                info!("Search '{}' returned {} records", query, records.len());
                debug!("Enriched results for '{}': {:?}", query, records);
                Ok(records)
            }
            Err(e) => {
                self.metrics.inc_failed_search();
                error!("Error executing search query '{}': {}", query, e);
                Err(QueryFailure::from(e))
            }
        }
    }

    async fn run(&self, query: &str) -> Result<Vec<EnrichedRecord>, StoreError> {
        let (primary_docs, related_docs) = futures::try_join!(
            self.query_collection(&self.primary, query),
            self.query_collection(&self.related, query),
        )?;

        debug!(
            "Combining {} hits from {} with {} hits from {}",
            primary_docs.len(),
            self.primary,
            related_docs.len(),
            self.related
        );

        let records: Vec<Record> = primary_docs
            .iter()
            .chain(related_docs.iter())
            .map(|doc| Record::from_document(doc, &self.record_fields))
            .collect();

        self.enrich(records).await
    }

    /// Attach related entries to every record.
    ///
    /// Lookups complete in any order; results are put back by original index.
    /// The first failed lookup drops the ones still in flight.
    async fn enrich(&self, records: Vec<Record>) -> Result<Vec<EnrichedRecord>, StoreError> {
        let total = records.len();

        let completed: Vec<(usize, EnrichedRecord)> = stream::iter(records.into_iter().enumerate())
            .map(|(index, mut record)| async move {
                record.related_entries = self.related_entries(&record).await?;
                Ok::<_, StoreError>((index, record))
            })
            .buffer_unordered(self.max_concurrent_lookups)
            .try_collect()
            .await?;

        let mut slots: Vec<Option<EnrichedRecord>> = vec![None; total];
        for (index, record) in completed {
            slots[index] = Some(record);
        }

        Ok(slots.into_iter().flatten().collect())
    }

    /// Look up the entries owned by `record`
    async fn related_entries(&self, record: &Record) -> Result<Vec<RelatedEntry>, StoreError> {
        let Some(ref id) = record.id else {
            debug!("Record without id, skipping enrichment lookup");
            return Ok(Vec::new());
        };

        let lookup = field_query(&self.related_fields.owner_id, id);
        let docs = self.query_collection(&self.related, &lookup).await?;

        Ok(docs
            .iter()
            .map(|doc| RelatedEntry::from_document(doc, &self.related_fields))
            .filter(|entry| entry.owner_id.as_deref() == Some(id.as_str()))
            .collect())
    }

    /// Query one collection, recording timing and errors
    async fn query_collection(
        &self,
        collection: &str,
        query: &str,
    ) -> Result<Vec<Document>, StoreError> {
        let start = Instant::now();

        match self.store.query(collection, query).await {
            Ok(docs) => {
                self.metrics
                    .record_success(collection, start.elapsed().as_millis() as u64);
                Ok(docs)
            }
            Err(e) => {
                warn!("Query '{}' against {} failed: {}", query, collection, e);
                self.metrics.record_error(collection);
                Err(e)
            }
        }
    }
}
