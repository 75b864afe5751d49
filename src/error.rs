//! Error types for the aggregator
//!
//! [`StoreError`] carries the detail of a failed store interaction and is only
//! ever logged. Callers of the aggregator see [`QueryFailure`], which says
//! nothing about what went wrong downstream.

/// Errors raised while talking to the document store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The request could not be sent or the response body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("store returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The store answered with a body that is not a select response.
    #[error("parse error: {0}")]
    Parse(String),

    /// No collection with this name is configured.
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// A collection endpoint could not be turned into a URL.
    #[error("config error: {0}")]
    Config(String),
}

/// Opaque failure of a search request.
///
/// Any downstream error maps to this; the detail stays in the server log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Failed to execute search query")]
pub struct QueryFailure;

impl From<StoreError> for QueryFailure {
    fn from(_: StoreError) -> Self {
        QueryFailure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_status() {
        let err = StoreError::Status {
            status: 400,
            body: "undefined field userId".into(),
        };
        assert_eq!(
            err.to_string(),
            "store returned status 400: undefined field userId"
        );
    }

    #[test]
    fn display_unknown_collection() {
        let err = StoreError::UnknownCollection("contact".into());
        assert_eq!(err.to_string(), "unknown collection: contact");
    }

    #[test]
    fn query_failure_hides_detail() {
        let failure: QueryFailure = StoreError::Parse("missing response.docs".into()).into();
        assert_eq!(failure.to_string(), "Failed to execute search query");
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StoreError>();
        assert_send_sync::<QueryFailure>();
    }
}
