//! # REST Routes
//!
//! Route assembly and the pieces shared by every resource module.
//!
//! ## Surface
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  /inventory    products + stock adjustments (the inventory ledger)     │
//! │  /sales        sale recording/deletion + reports + CSV export          │
//! │  /stores       store CRUD + comparison                                 │
//! │  /categories   category CRUD                                           │
//! │  /settings     key/value settings                                      │
//! │  /health       liveness + database reachability                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Status convention: 200 on success including mutations, 400 validation
//! (French message), 404 checked not-found, 409 conflicts, 500 database
//! failures.

pub mod categories;
pub mod inventory;
pub mod sales;
pub mod settings;
pub mod stores;

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/inventory", inventory::router())
        .nest("/sales", sales::router())
        .nest("/stores", stores::router())
        .nest("/categories", categories::router())
        .nest("/settings", settings::router())
        .layer(middleware::from_fn_with_state(state.clone(), cors))
        .with_state(state)
}

// =============================================================================
// Shared Extractors & Responses
// =============================================================================

/// The ubiquitous `?storeId=` query parameter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreQuery {
    pub store_id: Option<String>,
}

impl StoreQuery {
    /// The requested store, or the given fallback when omitted/empty.
    pub fn store_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.store_filter().unwrap_or(fallback)
    }

    /// The requested store as an optional filter (`None` = all stores).
    pub fn store_filter(&self) -> Option<&str> {
        self.store_id.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// `{"success": true}`, the legacy mutation acknowledgement.
#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub fn ok() -> Json<Success> {
        Json(Success { success: true })
    }
}

/// `{"success": true, "affectedRows": n}`, for mutations whose no-op case is
/// observable through the row count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedRows {
    pub success: bool,
    pub affected_rows: u64,
}

impl AffectedRows {
    pub fn from(affected_rows: u64) -> Json<AffectedRows> {
        Json(AffectedRows {
            success: true,
            affected_rows,
        })
    }
}

// =============================================================================
// Health
// =============================================================================

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    database: bool,
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    let database = state.db.health_check().await;
    Json(Health {
        status: if database { "ok" } else { "degraded" },
        database,
    })
}

// =============================================================================
// CORS
// =============================================================================

/// Minimal CORS layer: the dashboard runs on another origin in
/// development. Answers preflight directly and stamps the configured
/// allow-origin on every response.
async fn cors(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    let origin = HeaderValue::from_str(&state.config.cors_origin)
        .unwrap_or_else(|_| HeaderValue::from_static("*"));

    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, PATCH, DELETE, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );

    response
}
