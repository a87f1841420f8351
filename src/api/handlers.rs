//! The resource handlers: list, store, show, update, destroy, plus the
//! health probe and the unmatched-route fallback.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::repository::{PageRequest, SortKey, SortOrder};

use super::error::{ApiError, ValidationErrors};
use super::{response, validate, AppState};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    page: Option<i64>,
    per_page: Option<i64>,
    search: Option<String>,
    sort_by: Option<String>,
    sort_order: Option<String>,
}

/// `GET /api/cities` — paginated listing with search and sort.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(15);

    // Pagination bounds are rejected here, before the repository sees them.
    let mut errors = ValidationErrors::new();
    if page < 1 {
        errors
            .entry("page".into())
            .or_default()
            .push("The page field must be at least 1.".into());
    }
    if per_page < 1 {
        errors
            .entry("per_page".into())
            .or_default()
            .push("The per page field must be at least 1.".into());
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let request = PageRequest {
        page: page as usize,
        per_page: per_page as usize,
        search: params.search,
        sort_by: SortKey::parse(params.sort_by.as_deref().unwrap_or("founded_at")),
        sort_order: SortOrder::parse(params.sort_order.as_deref().unwrap_or("desc")),
    };

    let result = state.repo.paginate(&request)?;
    Ok(response::paginated(
        "Cities retrieved successfully.",
        &result.items,
        &result.meta,
    ))
}

/// A missing, non-JSON, or unparseable body is treated as empty input, so
/// it fails field validation inside the envelope instead of surfacing the
/// extractor's bare-text rejection.
fn body_or_null(body: Result<Json<Value>, JsonRejection>) -> Value {
    match body {
        Ok(Json(value)) => value,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unreadable request body, validating as empty");
            Value::Null
        }
    }
}

/// `POST /api/cities` — create a city from a complete, valid body.
pub async fn store(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let body = body_or_null(body);
    let input = validate::city_input(&body).map_err(ApiError::Validation)?;
    let city = state.repo.create(input)?;

    tracing::info!(id = %city.id, name = %city.name, "created city");
    Ok(response::success(
        StatusCode::CREATED,
        "City created successfully.",
        response::city_resource(&city),
    ))
}

/// `GET /api/cities/{id}`.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let city = state
        .repo
        .find(&id)?
        .ok_or(ApiError::NotFound("City not found."))?;

    Ok(response::success(
        StatusCode::OK,
        "City retrieved successfully.",
        response::city_resource(&city),
    ))
}

/// `PUT /api/cities/{id}` — partial update, any subset of the four fields.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let body = body_or_null(body);
    let patch = validate::city_patch(&body).map_err(ApiError::Validation)?;
    let city = state
        .repo
        .update(&id, patch)?
        .ok_or(ApiError::NotFound("City not found."))?;

    tracing::info!(id = %city.id, "updated city");
    Ok(response::success(
        StatusCode::OK,
        "City updated successfully.",
        response::city_resource(&city),
    ))
}

/// `DELETE /api/cities/{id}`.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    if !state.repo.delete(&id)? {
        return Err(ApiError::NotFound("City not found."));
    }

    tracing::info!(%id, "deleted city");
    Ok(response::success(
        StatusCode::OK,
        "City deleted successfully.",
        Value::Null,
    ))
}

/// `GET /up` — unauthenticated health probe.
pub async fn up() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Fallback for unmatched routes: a 404 envelope instead of a bare body.
pub async fn not_found() -> Response {
    response::error(StatusCode::NOT_FOUND, "Resource not found.")
}
