//! scratchpad-api - HTTP surfaces for scratchpad
//!
//! Three adapters share one [`NoteService`]:
//! - a JSON REST API under `/api`
//! - read-only HTML pages and fragments for browsing
//! - an MCP (JSON-RPC 2.0) tool endpoint at `/mcp`

pub mod config;
pub mod handlers;
pub mod mcp;
pub mod query_types;

use std::sync::Arc;

use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::error;
use utoipa::OpenApi;
use uuid::Uuid;

use scratchpad_core::defaults::MAX_BODY_SIZE_BYTES;
use scratchpad_core::{CategorySummary, CreateNoteRequest, Note, NoteService};

use handlers::notes::CountResponse;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<NoteService>,
}

impl AppState {
    pub fn new(service: NoteService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

// =============================================================================
// OPENAPI
// =============================================================================

/// OpenAPI document for the JSON API, served at `/api/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Scratchpad API",
        description = "Categorized markdown notes with full-text search"
    ),
    paths(
        handlers::notes::create_note,
        handlers::notes::list_notes,
        handlers::notes::search_notes,
        handlers::notes::recent_notes,
        handlers::notes::count_notes,
        handlers::notes::get_note,
        handlers::notes::delete_note,
        handlers::notes::list_categories,
    ),
    components(schemas(Note, CreateNoteRequest, CategorySummary, CountResponse)),
    tags(
        (name = "Notes", description = "Note capture and retrieval"),
        (name = "Categories", description = "Category summaries"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    use handlers::{notes, web};

    Router::new()
        .route("/health", get(health_check))
        .route("/api/openapi.json", get(openapi_json))
        // REST API
        .route("/api/notes", post(notes::create_note).get(notes::list_notes))
        .route("/api/notes/search", get(notes::search_notes))
        .route("/api/notes/recent", get(notes::recent_notes))
        .route("/api/notes/count", get(notes::count_notes))
        .route(
            "/api/notes/:id",
            get(notes::get_note).delete(notes::delete_note),
        )
        .route("/api/categories", get(notes::list_categories))
        // Web UI (read-only)
        .route("/", get(web::home_page))
        .route("/category/:name", get(web::category_page))
        .route("/search", get(web::search_page))
        .route("/fragments/notes", get(web::notes_fragment))
        .route("/fragments/search", get(web::search_fragment))
        // MCP tools
        .route("/mcp", post(mcp::handle_mcp))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(CatchPanicLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT]),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE_BYTES))
        .with_state(state)
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    ServiceUnavailable(String),
    Internal(scratchpad_core::Error),
}

impl From<scratchpad_core::Error> for ApiError {
    fn from(err: scratchpad_core::Error) -> Self {
        use scratchpad_core::Error;
        match err {
            Error::Validation(msg) => ApiError::BadRequest(msg),
            Error::InvalidIdentifier(msg) => {
                ApiError::BadRequest(format!("invalid note ID: {}", msg))
            }
            Error::NotFound(_) => ApiError::NotFound("note not found".to_string()),
            Error::Unavailable(msg) => ApiError::ServiceUnavailable(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl ApiError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::ServiceUnavailable(msg) => {
                error!(subsystem = "api", error = %msg, "Store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service unavailable".to_string(),
                )
            }
            ApiError::Internal(err) => {
                // Store details stay in the logs.
                error!(subsystem = "api", error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = self.status_and_message();

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scratchpad_core::Error;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let (status, msg) =
            ApiError::from(Error::Validation("content is required".into())).status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(msg, "content is required");
    }

    #[test]
    fn test_not_found_and_invalid_id() {
        let (status, _) = ApiError::from(Error::NotFound(Uuid::nil())).status_and_message();
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, msg) =
            ApiError::from(Error::InvalidIdentifier("abc".into())).status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(msg.contains("abc"));
    }

    #[test]
    fn test_store_failures_are_generic() {
        let (status, msg) =
            ApiError::from(Error::Internal("connection reset".into())).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(msg, "internal error");

        let (status, _) =
            ApiError::from(Error::Unavailable("list timed out".into())).status_and_message();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    mod routing {
        use super::*;
        use axum::body::Body;
        use axum::http::Request as HttpRequest;
        use scratchpad_db::MemoryNoteStore;
        use tower::ServiceExt;

        fn test_app() -> Router {
            let store = Arc::new(MemoryNoteStore::new());
            router(AppState::new(NoteService::new(store)))
        }

        #[tokio::test]
        async fn test_request_id_is_set() {
            let req = HttpRequest::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap();

            let resp = test_app().oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            let id = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
            assert!(Uuid::parse_str(id).is_ok());
        }

        #[tokio::test]
        async fn test_request_id_is_propagated() {
            let req = HttpRequest::builder()
                .uri("/health")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap();

            let resp = test_app().oneshot(req).await.unwrap();
            assert_eq!(resp.headers().get("x-request-id").unwrap(), "abc-123");
        }

        #[tokio::test]
        async fn test_oversized_body_rejected() {
            let req = HttpRequest::builder()
                .method(Method::POST)
                .uri("/api/notes")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::CONTENT_LENGTH, (MAX_BODY_SIZE_BYTES + 1).to_string())
                .body(Body::from(vec![b' '; MAX_BODY_SIZE_BYTES + 1]))
                .unwrap();

            let resp = test_app().oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        }

        #[tokio::test]
        async fn test_unknown_route_is_404() {
            let req = HttpRequest::builder()
                .uri("/api/nope")
                .body(Body::empty())
                .unwrap();

            let resp = test_app().oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        }
    }
}
