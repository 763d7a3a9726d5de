//! # Settings Routes
//!
//! Key/value settings: stored as strings, surfaced as JSON values
//! (booleans and structures round-trip through their string encoding).

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::routes::Success;
use crate::AppState;
use jamal_core::validation::validate_setting_key;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(all).post(set_many))
        .route("/{key}", get(get_one).put(set_one).delete(remove))
}

/// GET /: every setting as one JSON object.
async fn all(State(state): State<AppState>) -> Result<Json<Map<String, Value>>, ApiError> {
    let settings = state.db.settings().all().await?;
    Ok(Json(settings))
}

/// GET /{key}: one setting; the body is `null` when the key is absent.
async fn get_one(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let value = state.db.settings().get(&key).await?;
    Ok(Json(value.unwrap_or(Value::Null)))
}

/// Body of PUT /{key}.
#[derive(Debug, Deserialize)]
struct SettingBody {
    value: Value,
}

/// PUT /{key}: set one setting.
async fn set_one(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(body): Json<SettingBody>,
) -> Result<Json<Success>, ApiError> {
    validate_setting_key(&key)?;

    state.db.settings().set(&key, &body.value).await?;
    Ok(Success::ok())
}

/// POST /: set several settings in one request:
/// `{"currentStore": "depot", "showProfitMargins": false}`.
async fn set_many(
    State(state): State<AppState>,
    Json(values): Json<Map<String, Value>>,
) -> Result<Json<Success>, ApiError> {
    for key in values.keys() {
        validate_setting_key(key)?;
    }

    state.db.settings().set_many(&values).await?;
    Ok(Success::ok())
}

/// DELETE /{key}.
async fn remove(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Success>, ApiError> {
    state.db.settings().delete(&key).await?;
    Ok(Success::ok())
}
