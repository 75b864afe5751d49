//! Record type definitions and conversion from raw store documents

use crate::config::{RecordFields, RelatedFields};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw document as returned by the store: a flat string-keyed mapping
pub type Document = serde_json::Map<String, Value>;

/// A primary search result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Identifier, unique within its collection
    pub id: Option<String>,
    /// Content description
    pub description: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// Entries owned by this record, empty until enrichment
    #[serde(default)]
    pub related_entries: Vec<RelatedEntry>,
}

/// A record whose related entries have been attached
pub type EnrichedRecord = Record;

impl Record {
    /// Create a record with just an id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Project a store document onto a record
    pub fn from_document(doc: &Document, fields: &RecordFields) -> Self {
        Self {
            id: field_str(doc, &fields.id),
            description: field_str(doc, &fields.description),
            name: field_str(doc, &fields.name),
            related_entries: Vec::new(),
        }
    }

    /// Add a name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A secondary document associated with a record via its owner id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedEntry {
    pub owner_id: Option<String>,
    pub token: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl RelatedEntry {
    /// Project a store document onto a related entry
    pub fn from_document(doc: &Document, fields: &RelatedFields) -> Self {
        Self {
            owner_id: field_str(doc, &fields.owner_id),
            token: field_str(doc, &fields.token),
            status: field_str(doc, &fields.status),
            created_at: field_str(doc, &fields.created_at),
            updated_at: field_str(doc, &fields.updated_at),
        }
    }
}

/// Read a document field as a string.
///
/// Multi-valued fields yield their first value; nulls, objects and empty
/// arrays count as absent.
pub fn field_str(doc: &Document, key: &str) -> Option<String> {
    scalar_str(doc.get(key)?)
}

fn scalar_str(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => items.first().and_then(scalar_str),
        Value::Null | Value::Object(_) => None,
    }
}
