//! Store traits and request/response types

use crate::error::StoreError;
use crate::results::Document;
use async_trait::async_trait;
use std::collections::HashMap;

/// A queryable document store holding several named collections
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Run `query` against `collection`, returning documents in store order
    async fn query(&self, collection: &str, query: &str) -> Result<Vec<Document>, StoreError>;
}

/// HTTP request to be made against a collection
#[derive(Debug, Clone)]
pub struct StoreRequest {
    /// URL to request
    pub url: String,
    /// Query parameters, sent in order
    pub params: Vec<(String, String)>,
    /// Request headers
    pub headers: HashMap<String, String>,
}

impl StoreRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: Vec::new(),
            headers: HashMap::new(),
        }
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Look up a query parameter
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP response from a collection request
#[derive(Debug)]
pub struct StoreResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl StoreResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_str(&self.text).map_err(|e| StoreError::Parse(e.to_string()))
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Build a query matching documents whose `field` equals `value` exactly.
///
/// The value is sent as a quoted phrase so ids containing query syntax
/// (spaces, colons, wildcards) cannot widen the match.
pub fn field_query(field: &str, value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("{}:\"{}\"", field, escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_query_plain() {
        assert_eq!(field_query("userId", "1"), r#"userId:"1""#);
    }

    #[test]
    fn test_field_query_escapes_quotes_and_backslashes() {
        assert_eq!(
            field_query("userId", r#"a"b\c"#),
            r#"userId:"a\"b\\c""#
        );
    }

    #[test]
    fn test_field_query_keeps_syntax_inside_phrase() {
        assert_eq!(field_query("userId", "x OR *:*"), r#"userId:"x OR *:*""#);
    }

    #[test]
    fn test_request_builder() {
        let request = StoreRequest::get("http://localhost:8983/solr/content/select")
            .param("q", "alpha")
            .param("wt", "json")
            .header("Accept", "application/json");

        assert_eq!(request.get_param("q"), Some("alpha"));
        assert_eq!(request.get_param("rows"), None);
        assert_eq!(request.params[1].0, "wt");
        assert!(request.headers.contains_key("Accept"));
    }

    #[test]
    fn test_response_status() {
        let ok = StoreResponse {
            status: 200,
            text: "{}".into(),
            url: String::new(),
        };
        let bad = StoreResponse {
            status: 503,
            text: String::new(),
            url: String::new(),
        };
        assert!(ok.is_success());
        assert!(!bad.is_success());
        assert!(bad.json::<serde_json::Value>().is_err());
    }
}
