//! HTTP route handlers.

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::cache::{ArtifactKind, CachedArtifact};

use super::state::AppState;

const CACHE_CONTROL_VALUE: &str = "public, max-age=0";

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(ArtifactKind::Feed.path(), get(feed))
        .route(
            ArtifactKind::PathwayEvolutions.path(),
            get(pathway_evolutions),
        )
        .route(ArtifactKind::CalendarDates.path(), get(calendar_dates))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn feed(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    serve_artifact(&state, ArtifactKind::Feed, &method, &headers)
}

async fn pathway_evolutions(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    serve_artifact(&state, ArtifactKind::PathwayEvolutions, &method, &headers)
}

async fn calendar_dates(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    serve_artifact(&state, ArtifactKind::CalendarDates, &method, &headers)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

/// Answer GET or HEAD for one artifact of the live snapshot.
///
/// The artifact is loaded once, so body and validators always belong to the
/// same snapshot even if a new one is published mid-request.
fn serve_artifact(
    state: &AppState,
    kind: ArtifactKind,
    method: &Method,
    request_headers: &HeaderMap,
) -> Result<Response, AppError> {
    let artifact = state
        .store
        .current_artifact(kind)
        .ok_or(AppError::Unavailable)?;

    let mut headers = artifact_headers(&artifact)?;

    if if_none_match(request_headers, &artifact.etag) {
        debug!(path = kind.path(), etag = %artifact.etag, "not modified");
        return Ok((StatusCode::NOT_MODIFIED, headers).into_response());
    }

    headers.insert(
        header::CONTENT_LENGTH,
        HeaderValue::from(artifact.content_length()),
    );

    let body = if *method == Method::HEAD {
        Body::empty()
    } else {
        Body::from(artifact.bytes.clone())
    };

    debug!(
        path = kind.path(),
        %method,
        bytes = artifact.content_length(),
        "serving artifact"
    );

    Ok((StatusCode::OK, headers, body).into_response())
}

/// Headers sent with every artifact response, except `content-length`.
fn artifact_headers(artifact: &CachedArtifact) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE));
    headers.insert(header::VARY, HeaderValue::from_static("accept-encoding"));
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(artifact.content_type()),
    );
    headers.insert(header::ETAG, header_value(&artifact.etag)?);
    headers.insert(
        header::LAST_MODIFIED,
        header_value(&artifact.last_modified_header())?,
    );
    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(value).map_err(|e| AppError::Internal {
        message: format!("invalid header value {value:?}: {e}"),
    })
}

/// Whether `If-None-Match` names the current etag (weak comparison).
fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .any(|candidate| {
            candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
        })
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// No snapshot has been published yet
    Unavailable,
    NotFound,
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "no facility data fetched yet".to_string(),
            ),
            AppError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            warn!(%status, error = %message, "request failed");
        } else {
            debug!(%status, error = %message, "request rejected");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
