//! HTTP request handlers

use super::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info_span, Instrument};
use uuid::Uuid;

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search query
    pub query: Option<String>,
    /// Short alias for `query`
    pub q: Option<String>,
}

/// JSON body for search
#[derive(Debug, Deserialize)]
pub struct SearchBody {
    pub query: Option<String>,
}

/// Error body returned to clients; never carries store detail
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Search handler (query string)
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    run_search(&state, params.query.or(params.q)).await
}

/// Search handler (JSON body)
pub async fn search_json(State(state): State<AppState>, Json(body): Json<SearchBody>) -> Response {
    run_search(&state, body.query).await
}

async fn run_search(state: &AppState, query: Option<String>) -> Response {
    let query = match query {
        Some(q) if !q.trim().is_empty() => q,
        _ => {
            return error_response(StatusCode::BAD_REQUEST, "Missing required argument: query");
        }
    };

    let span = info_span!("search", request_id = %Uuid::new_v4());

    match state.aggregator.search(&query).instrument(span).await {
        Ok(records) => Json(records).into_response(),
        Err(failure) => error_response(StatusCode::BAD_GATEWAY, &failure.to_string()),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "instance": state.instance_name(),
    }))
}

/// Stats handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "total_searches": state.metrics.get_total_searches(),
        "failed_searches": state.metrics.get_failed_searches(),
        "collections": state.metrics.get_collection_stats(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::error::StoreError;
    use crate::results::Document;
    use crate::store::DocumentStore;
    use crate::web::create_router;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Returns one hit per collection for any free-text query and no related entries
    struct StaticStore;

    #[async_trait]
    impl DocumentStore for StaticStore {
        async fn query(&self, collection: &str, query: &str) -> Result<Vec<Document>, StoreError> {
            if query.starts_with("userId:") {
                return Ok(Vec::new());
            }
            let doc = json!({ "ID": format!("{}-1", collection), "name_s": query });
            match doc {
                Value::Object(map) => Ok(vec![map]),
                _ => unreachable!(),
            }
        }
    }

    struct FailingStore;

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn query(&self, _: &str, _: &str) -> Result<Vec<Document>, StoreError> {
            Err(StoreError::Status {
                status: 500,
                body: "java.lang.NullPointerException at solr internals".to_string(),
            })
        }
    }

    fn app(store: Arc<dyn DocumentStore>) -> axum::Router {
        create_router(AppState::with_store(Settings::default(), store))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_search_get() {
        let response = app(Arc::new(StaticStore))
            .oneshot(
                Request::get("/search?query=alpha")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body[0]["id"], "content-1");
        assert_eq!(body[0]["name"], "alpha");
        assert_eq!(body[1]["id"], "apiKey-1");
        assert_eq!(body[1]["relatedEntries"], json!([]));
    }

    #[tokio::test]
    async fn test_search_q_alias() {
        let response = app(Arc::new(StaticStore))
            .oneshot(Request::get("/search?q=beta").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await[0]["name"], "beta");
    }

    #[tokio::test]
    async fn test_search_post() {
        let response = app(Arc::new(StaticStore))
            .oneshot(
                Request::post("/search")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"query": "gamma"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_query() {
        let response = app(Arc::new(StaticStore))
            .oneshot(Request::get("/search?query=%20").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_failure_is_opaque() {
        let response = app(Arc::new(FailingStore))
            .oneshot(Request::get("/search?query=alpha").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body, json!({ "error": "Failed to execute search query" }));
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Arc::new(StaticStore))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["instance"], "search-aggregator");
    }

    #[tokio::test]
    async fn test_stats_after_search() {
        let app = app(Arc::new(StaticStore));
        app.clone()
            .oneshot(Request::get("/search?query=alpha").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let response = app
            .oneshot(Request::get("/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;

        assert_eq!(body["total_searches"], 1);
        assert_eq!(body["failed_searches"], 0);
        assert_eq!(body["collections"]["content"]["queries"], 1);
    }
}
