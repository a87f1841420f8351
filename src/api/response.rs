//! Response envelope builders.
//!
//! Every response the service produces is wrapped in the same envelope:
//! `{status, message, data}` for success, `{status, message}` for errors,
//! plus `meta` on paginated listings.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::city::City;
use crate::repository::PageMeta;

pub fn success(code: StatusCode, message: &str, data: Value) -> Response {
    (
        code,
        Json(json!({
            "status": "success",
            "message": message,
            "data": data,
        })),
    )
        .into_response()
}

pub fn error(code: StatusCode, message: &str) -> Response {
    (
        code,
        Json(json!({
            "status": "error",
            "message": message,
        })),
    )
        .into_response()
}

pub fn paginated(message: &str, items: &[City], meta: &PageMeta) -> Response {
    let data: Vec<Value> = items.iter().map(city_resource).collect();
    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "message": message,
            "data": data,
            "meta": meta,
        })),
    )
        .into_response()
}

/// The API representation of a city: the five entity fields plus a self
/// link.
pub fn city_resource(city: &City) -> Value {
    json!({
        "id": city.id,
        "name": city.name,
        "country": city.country,
        "population": city.population,
        "founded_at": city.founded_at,
        "links": {
            "self": format!("/api/cities/{}", city.id),
        },
    })
}
