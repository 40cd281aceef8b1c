//! Shared helpers for the thin business handlers.

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::app::errors;

pub fn parse_id(Path(raw): Path<String>, what: &str) -> Result<Uuid, Response> {
    raw.parse::<Uuid>()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, format!("invalid {what} id")))
}

/// The JSON object body, or `{}` when absent or not an object.
pub fn body_object(body: Option<Json<Value>>) -> Map<String, Value> {
    match body {
        Some(Json(Value::Object(map))) => map,
        _ => Map::new(),
    }
}

/// Copy the listed keys from `body` into a fresh metadata object.
pub fn pick(body: &Map<String, Value>, keys: &[&str]) -> Value {
    let picked: Map<String, Value> = keys
        .iter()
        .filter_map(|k| body.get(*k).map(|v| ((*k).to_owned(), v.clone())))
        .collect();
    Value::Object(picked)
}

pub fn empty_list() -> Response {
    Json(Value::Array(Vec::new())).into_response()
}
