//! # Sales Routes
//!
//! REST surface over the sales recorder and the reporting queries.
//!
//! | Method | Path              | Action                                   |
//! |--------|-------------------|------------------------------------------|
//! | GET    | /sales?storeId=   | flat sale list                           |
//! | GET    | /sales/daily      | day summaries                            |
//! | GET    | /sales/range      | day summaries in a date range            |
//! | GET    | /sales/day/{date} | the sales of one day                     |
//! | GET    | /sales/stats      | aggregate totals                         |
//! | GET    | /sales/categories | per-category totals                      |
//! | GET    | /sales/top        | top products by quantity                 |
//! | GET    | /sales/export     | CSV of the flat list                     |
//! | POST   | /sales            | record a sale (decrements stock)         |
//! | DELETE | /sales/{id}       | delete a sale (restores stock)           |

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::routes::{StoreQuery, Success};
use crate::AppState;
use jamal_core::{CategorySales, DailySalesSummary, Money, NewSale, Sale, SalesStats, TopProduct};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/daily", get(daily))
        .route("/range", get(range))
        .route("/day/{date}", get(for_day))
        .route("/stats", get(stats))
        .route("/categories", get(by_category))
        .route("/top", get(top))
        .route("/export", get(export_csv))
        .route("/{id}", delete(remove))
}

/// GET /: flat sale list, newest first. Without `storeId` the list spans
/// every store.
async fn list(
    State(state): State<AppState>,
    Query(q): Query<StoreQuery>,
) -> Result<Json<Vec<Sale>>, ApiError> {
    debug!(store_id = ?q.store_filter(), "GET /sales");
    let sales = state.db.sales().list(q.store_filter()).await?;
    Ok(Json(sales))
}

/// GET /daily: sales grouped by (day, store), newest day first.
async fn daily(
    State(state): State<AppState>,
    Query(q): Query<StoreQuery>,
) -> Result<Json<Vec<DailySalesSummary>>, ApiError> {
    let days = state.db.reports().daily_summary(q.store_filter()).await?;
    Ok(Json(days))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RangeQuery {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    store_id: Option<String>,
}

/// GET /range: day summaries within an inclusive date range.
async fn range(
    State(state): State<AppState>,
    Query(q): Query<RangeQuery>,
) -> Result<Json<Vec<DailySalesSummary>>, ApiError> {
    let start = q
        .start_date
        .ok_or_else(|| ApiError::validation("startDate est requis"))?;
    let end = q
        .end_date
        .ok_or_else(|| ApiError::validation("endDate est requis"))?;

    let store_id = q.store_id.as_deref().filter(|s| !s.trim().is_empty());
    let days = state
        .db
        .reports()
        .daily_summary_range(start, end, store_id)
        .await?;
    Ok(Json(days))
}

/// GET /day/{date}: the individual sales of one calendar day.
async fn for_day(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    Query(q): Query<StoreQuery>,
) -> Result<Json<Vec<Sale>>, ApiError> {
    let sales = state.db.sales().for_day(date, q.store_filter()).await?;
    Ok(Json(sales))
}

/// GET /stats: total days, revenue, items sold, transactions.
async fn stats(
    State(state): State<AppState>,
    Query(q): Query<StoreQuery>,
) -> Result<Json<SalesStats>, ApiError> {
    let stats = state.db.reports().stats(q.store_filter()).await?;
    Ok(Json(stats))
}

/// GET /categories: per-category totals, biggest first.
async fn by_category(
    State(state): State<AppState>,
    Query(q): Query<StoreQuery>,
) -> Result<Json<Vec<CategorySales>>, ApiError> {
    let categories = state
        .db
        .reports()
        .sales_by_category(q.store_filter())
        .await?;
    Ok(Json(categories))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopQuery {
    limit: Option<i64>,
    store_id: Option<String>,
}

/// GET /top: top-selling products by summed quantity.
async fn top(
    State(state): State<AppState>,
    Query(q): Query<TopQuery>,
) -> Result<Json<Vec<TopProduct>>, ApiError> {
    let limit = q.limit.unwrap_or(10).clamp(1, 100);
    let store_id = q.store_id.as_deref().filter(|s| !s.trim().is_empty());
    let top = state.db.reports().top_products(limit, store_id).await?;
    Ok(Json(top))
}

/// Response of POST /.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaleCreated {
    success: bool,
    id: String,
    total_price: i64,
}

/// POST /: record a sale. The stock decrement happens in the same
/// transaction as the insert.
async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewSale>,
) -> Result<Json<SaleCreated>, ApiError> {
    let sale = state.db.recorder().record_sale(input).await?;

    Ok(Json(SaleCreated {
        success: true,
        id: sale.id,
        total_price: sale.total_price_cents,
    }))
}

/// DELETE /{id}: delete a sale and restore its quantity to stock.
/// 404 when the id doesn't exist.
async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Success>, ApiError> {
    state.db.recorder().delete_sale(&id).await?;
    Ok(Success::ok())
}

// =============================================================================
// CSV Export
// =============================================================================

/// GET /export: the flat sale list as CSV, amounts formatted as money.
async fn export_csv(
    State(state): State<AppState>,
    Query(q): Query<StoreQuery>,
) -> Result<Response, ApiError> {
    let sales = state.db.sales().list(q.store_filter()).await?;

    let mut csv = String::from("date,produit,categorie,quantite,prixUnitaire,total,magasin,notes\n");
    for sale in &sales {
        let row = [
            sale.sale_date.to_string(),
            csv_field(&sale.product_name),
            csv_field(&sale.category),
            sale.quantity.to_string(),
            csv_field(&Money::from_cents(sale.unit_price_cents).to_string()),
            csv_field(&Money::from_cents(sale.total_price_cents).to_string()),
            csv_field(&sale.store_id),
            csv_field(sale.notes.as_deref().unwrap_or("")),
        ];
        csv.push_str(&row.join(","));
        csv.push('\n');
    }

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"ventes.csv\"",
        ),
    ];
    Ok((headers, csv).into_response())
}

/// Quotes a CSV field when it contains a separator, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("Marteau"), "Marteau");
        // Money display uses a comma decimal separator, so it must quote
        assert_eq!(csv_field("40,00 DH"), "\"40,00 DH\"");
        assert_eq!(csv_field("dit \"ok\""), "\"dit \"\"ok\"\"\"");
    }
}
