//! Axum router and handlers.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::discovery::LiteratureSearch;
use crate::error::SearchError;
use crate::models::LiteratureRequest;

/// Response header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Upper bound on one request, covering all three search tiers.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Create the HTTP router.
pub fn create_router(search: Arc<LiteratureSearch>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/api/literature", post(handle_literature))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(assign_request_id))
                .layer(timeout_layer(REQUEST_TIMEOUT))
                .layer(CorsLayer::permissive()),
        )
        .with_state(search)
}

/// Requests running past `limit` are answered with 408.
fn timeout_layer(limit: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, limit)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "puzzle-literature",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn handle_literature(
    State(search): State<Arc<LiteratureSearch>>,
    Json(request): Json<LiteratureRequest>,
) -> Response {
    tracing::debug!(query = %request.query, "Handling literature request");

    match search.search(&request).await {
        Ok(response) => Json(response).into_response(),
        Err(err) => error_response(&err),
    }
}

fn error_response(err: &SearchError) -> Response {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    if status.is_server_error() {
        tracing::error!(error = %err, "Literature request failed");
    }
    (status, Json(serde_json::json!({ "error": err.to_user_message() }))).into_response()
}

/// Tag each request with a fresh id, visible in logs and echoed in the response.
async fn assign_request_id(request: Request, next: Next) -> Response {
    let id = uuid::Uuid::new_v4().simple().to_string();
    let span = tracing::info_span!("request", id = %id, path = %request.uri().path());

    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}
