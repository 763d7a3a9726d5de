//! # Category Routes
//!
//! Category CRUD. Duplicate names surface as 409, never the legacy
//! insert-or-ignore silence.

use axum::extract::{Path, State};
use axum::routing::{get, patch};
use axum::{Json, Router};

use crate::error::ApiError;
use crate::routes::Success;
use crate::AppState;
use jamal_core::validation::validate_category_name;
use jamal_core::{Category, CategoryPatch, NewCategory};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", patch(update).delete(remove))
}

/// GET /: all categories, ordered by name.
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state.db.categories().list().await?;
    Ok(Json(categories))
}

/// POST /: create a category. 409 when the name already exists.
async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewCategory>,
) -> Result<Json<Category>, ApiError> {
    let name = input.name.as_deref().unwrap_or("").trim().to_string();
    validate_category_name(&name)?;

    let category = state
        .db
        .categories()
        .insert(&name, input.description.as_deref())
        .await?;
    Ok(Json(category))
}

/// PATCH /{id}: partial update.
async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<CategoryPatch>,
) -> Result<Json<Success>, ApiError> {
    if let Some(name) = patch.name.as_deref() {
        validate_category_name(name)?;
    }

    state.db.categories().update(&id, &patch).await?;
    Ok(Success::ok())
}

/// DELETE /{id}: products keep their (now dangling) category label.
async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Success>, ApiError> {
    state.db.categories().delete(&id).await?;
    Ok(Success::ok())
}
