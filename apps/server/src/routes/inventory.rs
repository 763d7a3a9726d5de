//! # Inventory Routes
//!
//! REST surface over the inventory ledger.
//!
//! | Method | Path                        | Action                          |
//! |--------|-----------------------------|---------------------------------|
//! | GET    | /inventory?storeId=         | list products                   |
//! | GET    | /inventory/low-stock        | products with stock <= minStock |
//! | GET    | /inventory/category/{name}  | products of one category        |
//! | GET    | /inventory/barcode/{code}   | product or null                 |
//! | POST   | /inventory                  | create product                  |
//! | PATCH  | /inventory/stock            | apply a stock delta             |
//! | PATCH  | /inventory/{id}             | partial update                  |
//! | DELETE | /inventory/{id}?storeId=    | hard delete                     |

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::routes::{AffectedRows, StoreQuery, Success};
use crate::AppState;
use jamal_core::{NewProduct, Product, ProductPatch};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/low-stock", get(low_stock))
        .route("/category/{category}", get(by_category))
        .route("/barcode/{barcode}", get(by_barcode))
        .route("/stock", patch(adjust_stock))
        .route("/{id}", patch(update).delete(remove))
}

/// GET /: all products of a store, ordered by name.
async fn list(
    State(state): State<AppState>,
    Query(q): Query<StoreQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let store_id = q.store_or(&state.config.default_store_id);
    debug!(store_id = %store_id, "GET /inventory");

    let products = state.db.ledger().list(store_id).await?;
    Ok(Json(products))
}

/// GET /low-stock: products at or below their threshold, most deficient
/// first.
async fn low_stock(
    State(state): State<AppState>,
    Query(q): Query<StoreQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let store_id = q.store_or(&state.config.default_store_id);
    let products = state.db.ledger().low_stock(store_id).await?;
    Ok(Json(products))
}

/// GET /category/{category}: products of one category.
async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(q): Query<StoreQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let store_id = q.store_or(&state.config.default_store_id);
    let products = state.db.ledger().by_category(&category, store_id).await?;
    Ok(Json(products))
}

/// GET /barcode/{barcode}: exact lookup; the body is `null` when no
/// product carries the barcode.
async fn by_barcode(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> Result<Json<Option<Product>>, ApiError> {
    let product = state.db.ledger().find_by_barcode(&barcode).await?;
    Ok(Json(product))
}

/// POST /: create a product. 409 on a duplicate barcode.
async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<NewProduct>,
) -> Result<Json<Product>, ApiError> {
    // Uniform store fallback across the whole API
    if input.store_id.as_deref().map_or(true, |s| s.trim().is_empty()) {
        input.store_id = Some(state.config.default_store_id.clone());
    }

    let product = state.db.ledger().add_product(input).await?;
    Ok(Json(product))
}

/// Body of PATCH /stock.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StockUpdate {
    product_name: Option<String>,
    quantity_change: Option<i64>,
    store_id: Option<String>,
}

/// PATCH /stock: apply a signed stock delta (clamped at zero; missing
/// products are auto-created by the ledger).
async fn adjust_stock(
    State(state): State<AppState>,
    Json(body): Json<StockUpdate>,
) -> Result<Json<Success>, ApiError> {
    let name = body.product_name.as_deref().unwrap_or("").trim().to_string();
    if name.is_empty() {
        return Err(ApiError::validation("productName est requis"));
    }
    let delta = body
        .quantity_change
        .ok_or_else(|| ApiError::validation("quantityChange est requis"))?;

    let store_id = body
        .store_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| state.config.default_store_id.clone());

    state.db.ledger().adjust_stock(&name, &store_id, delta).await?;
    Ok(Success::ok())
}

/// PATCH /{id}: partial update; a missing id reports zero affected rows.
async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<AffectedRows>, ApiError> {
    let store_id = patch
        .store_id
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| state.config.default_store_id.clone());

    let affected = state
        .db
        .ledger()
        .update_product(&id, &store_id, &patch)
        .await?;
    Ok(AffectedRows::from(affected))
}

/// DELETE /{id}: hard delete; sale history keeps its snapshots.
async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<StoreQuery>,
) -> Result<Json<AffectedRows>, ApiError> {
    let store_id = q.store_or(&state.config.default_store_id);
    let affected = state.db.ledger().delete_product(&id, store_id).await?;
    Ok(AffectedRows::from(affected))
}
