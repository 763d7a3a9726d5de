//! # Store Routes
//!
//! Store CRUD and the multi-store comparison view.
//!
//! Whether a second `isMain` store is allowed depends on the configured
//! [`jamal_core::MainStorePolicy`]; under `enforce-single` it is a 409.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::routes::Success;
use crate::AppState;
use jamal_core::validation::validate_store_id;
use jamal_core::{NewStore, Store, StoreComparison, StorePatch};
use jamal_db::repository::store::generate_store_id;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/comparison", get(comparison))
        .route("/{id}", get(get_store).patch(update).delete(remove))
}

/// GET /: all stores, main store(s) first.
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Store>>, ApiError> {
    let stores = state.db.stores().list().await?;
    Ok(Json(stores))
}

/// GET /comparison: per-store revenue/transactions/average; zero-sale
/// stores included with zeroed metrics.
async fn comparison(State(state): State<AppState>) -> Result<Json<Vec<StoreComparison>>, ApiError> {
    let comparison = state.db.reports().store_comparison().await?;
    Ok(Json(comparison))
}

/// GET /{id}: one store, 404 when absent.
async fn get_store(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Store>, ApiError> {
    let store = state
        .db
        .stores()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Store", &id))?;
    Ok(Json(store))
}

/// Response of POST /.
#[derive(Debug, Serialize)]
struct StoreCreated {
    success: bool,
    id: String,
}

/// POST /: create a store. The id is caller-assigned or generated.
async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewStore>,
) -> Result<Json<StoreCreated>, ApiError> {
    let name = input.name.as_deref().unwrap_or("").trim().to_string();
    if name.is_empty() {
        return Err(ApiError::validation("name est requis"));
    }

    let id = input
        .id
        .filter(|i| !i.trim().is_empty())
        .unwrap_or_else(generate_store_id);
    validate_store_id(&id)?;

    let is_main = input.is_main.unwrap_or(false);
    if is_main {
        state
            .db
            .stores()
            .assert_main_allowed(state.config.main_store_policy, &id)
            .await?;
    }

    debug!(id = %id, name = %name, is_main, "POST /stores");

    let now = Utc::now();
    let store = Store {
        id: id.clone(),
        name,
        address: input.address,
        phone: input.phone,
        is_main,
        created_at: now,
        updated_at: now,
    };
    state.db.stores().insert(&store).await.map_err(|err| {
        // The id is the only unique column on stores
        match err {
            jamal_db::DbError::UniqueViolation { .. } => {
                ApiError::conflict(format!("id '{}' already exists", id))
            }
            other => other.into(),
        }
    })?;

    Ok(Json(StoreCreated { success: true, id }))
}

/// PATCH /{id}: partial update; promoting to main checks the policy.
async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<StorePatch>,
) -> Result<Json<Success>, ApiError> {
    if patch.is_main == Some(true) {
        state
            .db
            .stores()
            .assert_main_allowed(state.config.main_store_policy, &id)
            .await?;
    }

    state.db.stores().update(&id, &patch).await?;
    Ok(Success::ok())
}

/// DELETE /{id}: deletion fails with 409 while products or sales still
/// reference the store (the schema's foreign keys are the only guard).
async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Success>, ApiError> {
    state.db.stores().delete(&id).await?;
    Ok(Success::ok())
}
