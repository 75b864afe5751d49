//! Settings structures for the aggregator configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub collections: Vec<CollectionConfig>,
    pub aggregator: AggregatorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            server: ServerSettings::default(),
            outgoing: OutgoingSettings::default(),
            collections: default_collections(),
            aggregator: AggregatorSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (AGGREGATOR_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("AGGREGATOR_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("AGGREGATOR_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("AGGREGATOR_BIND_ADDRESS") {
            self.server.bind_address = val;
        }

        let endpoint = EndpointOverride {
            host: std::env::var("AGGREGATOR_STORE_HOST").ok(),
            port: std::env::var("AGGREGATOR_STORE_PORT")
                .ok()
                .and_then(|p| p.parse().ok()),
            protocol: std::env::var("AGGREGATOR_STORE_PROTOCOL").ok(),
        };
        self.apply_endpoint(&endpoint);
    }

    /// Point every collection at another store endpoint (e.g. a tunnel instead of localhost)
    pub fn apply_endpoint(&mut self, endpoint: &EndpointOverride) {
        for collection in &mut self.collections {
            if let Some(ref host) = endpoint.host {
                collection.host = host.clone();
            }
            if let Some(port) = endpoint.port {
                collection.port = port;
            }
            if let Some(ref protocol) = endpoint.protocol {
                collection.protocol = protocol.clone();
            }
        }
    }

    /// Get collection config by name
    pub fn get_collection(&self, name: &str) -> Option<&CollectionConfig> {
        self.collections.iter().find(|c| c.name == name)
    }

    /// Check that the aggregator refers to configured collections and that
    /// every collection endpoint is usable
    pub fn validate(&self) -> Result<()> {
        for collection in &self.collections {
            if collection.name.is_empty() {
                bail!("Collection with core '{}' has no name", collection.core);
            }
            if collection.core.is_empty() {
                bail!("Collection '{}' has no core", collection.name);
            }
            if !matches!(collection.protocol.as_str(), "http" | "https") {
                bail!(
                    "Collection '{}' has unsupported protocol '{}'",
                    collection.name,
                    collection.protocol
                );
            }
        }

        for name in [
            &self.aggregator.primary_collection,
            &self.aggregator.related_collection,
        ] {
            if self.get_collection(name).is_none() {
                bail!("Aggregator refers to unknown collection '{}'", name);
            }
        }

        let timeout = self.outgoing.request_timeout;
        if !timeout.is_finite() || timeout <= 0.0 {
            bail!("outgoing.request_timeout must be a positive number of seconds, got {}", timeout);
        }

        if self.aggregator.max_concurrent_lookups == 0 {
            bail!("aggregator.max_concurrent_lookups must be greater than 0");
        }

        Ok(())
    }
}

/// Store endpoint fields that can be overridden for all collections at once
#[derive(Debug, Clone, Default)]
pub struct EndpointOverride {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub protocol: Option<String>,
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name reported by the health endpoint
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "search-aggregator".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 3000,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Request timeout in seconds
    pub request_timeout: f64,
    /// Pool max idle connections per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: crate::DEFAULT_TIMEOUT as f64,
            pool_maxsize: 20,
            verify_ssl: true,
        }
    }
}

/// A named collection target in the document store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Name the aggregator refers to
    pub name: String,
    /// Core (index) name on the store
    pub core: String,
    /// Store host
    pub host: String,
    /// Store port
    pub port: u16,
    /// "http" or "https"
    pub protocol: String,
    /// Path prefix in front of the core name
    pub base_path: String,
    /// Number of documents to request (store default when unset, 10 for Solr).
    /// On the related collection this also caps the entries attached to each record.
    pub rows: Option<u32>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            core: String::new(),
            host: "localhost".to_string(),
            port: 8983,
            protocol: "http".to_string(),
            base_path: "solr".to_string(),
            rows: None,
        }
    }
}

/// Fan-out and enrichment settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorSettings {
    /// Collection searched first; its records lead the output
    pub primary_collection: String,
    /// Collection searched second and used as the enrichment source
    pub related_collection: String,
    /// Upper bound on in-flight enrichment lookups per request
    pub max_concurrent_lookups: usize,
    /// Document field names for records
    pub record_fields: RecordFields,
    /// Document field names for related entries
    pub related_fields: RelatedFields,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            primary_collection: "content".to_string(),
            related_collection: "apiKey".to_string(),
            max_concurrent_lookups: 16,
            record_fields: RecordFields::default(),
            related_fields: RelatedFields::default(),
        }
    }
}

/// Mapping from record attributes to store document fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordFields {
    pub id: String,
    pub description: String,
    pub name: String,
}

impl Default for RecordFields {
    fn default() -> Self {
        Self {
            id: "ID".to_string(),
            description: "contentDesc".to_string(),
            name: "name_s".to_string(),
        }
    }
}

/// Mapping from related entry attributes to store document fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedFields {
    /// Also the field the enrichment lookup filters on
    pub owner_id: String,
    pub token: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Default for RelatedFields {
    fn default() -> Self {
        Self {
            owner_id: "userId".to_string(),
            token: "apiKey".to_string(),
            status: "status".to_string(),
            created_at: "addedDate".to_string(),
            updated_at: "lastUpdate".to_string(),
        }
    }
}

/// Default collection configurations
fn default_collections() -> Vec<CollectionConfig> {
    vec![
        CollectionConfig {
            name: "content".to_string(),
            core: "content".to_string(),
            ..Default::default()
        },
        CollectionConfig {
            name: "apiKey".to_string(),
            core: "apiKey".to_string(),
            ..Default::default()
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 3000);
        assert!(!settings.general.debug);
        assert_eq!(settings.collections.len(), 2);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_collection_lookup() {
        let settings = Settings::default();
        let content = settings.get_collection("content");
        assert!(content.is_some());
        assert_eq!(content.unwrap().port, 8983);
        assert!(settings.get_collection("contact").is_none());
    }

    #[test]
    fn test_from_yaml_partial() {
        let yaml = r#"
server:
  port: 4000
collections:
  - name: docs
    core: content_v2
    host: solr.internal
  - name: keys
    core: apiKey
    rows: 50
aggregator:
  primary_collection: docs
  related_collection: keys
  related_fields:
    owner_id: ownerId
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.server.port, 4000);
        assert_eq!(settings.server.bind_address, "127.0.0.1");

        let docs = settings.get_collection("docs").unwrap();
        assert_eq!(docs.host, "solr.internal");
        assert_eq!(docs.port, 8983);
        assert_eq!(docs.base_path, "solr");
        assert_eq!(settings.get_collection("keys").unwrap().rows, Some(50));

        assert_eq!(settings.aggregator.related_fields.owner_id, "ownerId");
        assert_eq!(settings.aggregator.related_fields.token, "apiKey");
        assert_eq!(settings.aggregator.record_fields.id, "ID");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_collection() {
        let mut settings = Settings::default();
        settings.aggregator.related_collection = "contact".to_string();
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("contact"));
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut settings = Settings::default();
        settings.aggregator.max_concurrent_lookups = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_protocol() {
        let mut settings = Settings::default();
        settings.collections[0].protocol = "ftp".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_timeout() {
        for yaml in [
            "outgoing:\n  request_timeout: -1.0\n",
            "outgoing:\n  request_timeout: 0.0\n",
            "outgoing:\n  request_timeout: .nan\n",
        ] {
            let settings = Settings::from_yaml(yaml).unwrap();
            let err = settings.validate().unwrap_err();
            assert!(err.to_string().contains("request_timeout"), "{yaml}");
        }
    }

    #[test]
    fn test_apply_endpoint() {
        let mut settings = Settings::default();
        settings.apply_endpoint(&EndpointOverride {
            host: Some("abc123.tunnel.example".to_string()),
            port: Some(443),
            protocol: Some("https".to_string()),
        });

        for collection in &settings.collections {
            assert_eq!(collection.host, "abc123.tunnel.example");
            assert_eq!(collection.port, 443);
            assert_eq!(collection.protocol, "https");
        }
        assert_eq!(settings.get_collection("apiKey").unwrap().core, "apiKey");
    }

    #[test]
    fn test_apply_empty_endpoint_keeps_collections() {
        let mut settings = Settings::default();
        settings.apply_endpoint(&EndpointOverride::default());
        assert_eq!(settings.collections[0].host, "localhost");
        assert_eq!(settings.collections[0].protocol, "http");
    }
}
