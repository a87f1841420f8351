//! API key authentication middleware.
//!
//! Every `/api` route requires an `X-API-KEY` header matching the
//! configured key. Anything else is a 401 envelope before the handler runs.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;

use super::response;
use super::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if provided == Some(state.api_key.as_str()) {
        next.run(request).await
    } else {
        tracing::debug!(path = request.uri().path(), "rejected request with missing or invalid API key");
        response::error(StatusCode::UNAUTHORIZED, "Unauthorized")
    }
}
