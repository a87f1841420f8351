//! HTTP boundary — routing, authentication, validation, and envelopes.
//!
//! The repository owns all the semantics; this module only maps HTTP onto
//! it. `router()` returns a composable axum `Router`; `serve()` binds a
//! listener and runs it.
//!
//! ## Routes
//!
//! - `GET    /api/cities` — paginated listing (`page`, `per_page`,
//!   `search`, `sort_by`, `sort_order`)
//! - `POST   /api/cities` — create
//! - `GET    /api/cities/:id` — fetch one
//! - `PUT    /api/cities/:id` — partial update
//! - `DELETE /api/cities/:id` — delete
//! - `GET    /up` — unauthenticated health probe
//!
//! All `/api` routes sit behind the `X-API-KEY` middleware. Unmatched
//! routes return a 404 JSON envelope.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;

use crate::repository::CityRepository;

mod auth;
mod error;
mod handlers;
mod response;
mod validate;

pub use auth::API_KEY_HEADER;
pub use error::{ApiError, ValidationErrors};

/// Shared state for all handlers: the repository and the accepted API key.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<CityRepository>,
    pub api_key: String,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cities = Router::new()
        .route("/cities", get(handlers::list).post(handlers::store))
        .route(
            "/cities/:id",
            get(handlers::show)
                .put(handlers::update)
                .delete(handlers::destroy),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .nest("/api", cities)
        .route("/up", get(handlers::up))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// Serve the API at the given address (e.g. `"127.0.0.1:3000"`).
pub async fn serve(state: AppState, addr: &str) -> Result<(), std::io::Error> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await
}

/// Log one line per request: method, path, status, latency.
async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %method,
        path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "handled request"
    );
    response
}
