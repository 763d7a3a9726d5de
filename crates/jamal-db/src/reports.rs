//! # Reporting Queries
//!
//! Read-only aggregations over the sale log.
//!
//! ## Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Reporting Layer                                    │
//! │                                                                         │
//! │  daily_summary        GROUP BY (sale_date, store_id), date desc        │
//! │  sales_by_category    GROUP BY category, total desc                    │
//! │  top_products         GROUP BY product_name, quantity desc, LIMIT      │
//! │  store_comparison     stores LEFT JOIN sales: zero-sale stores kept,   │
//! │                       avg guarded against division by zero             │
//! │  stats                days / revenue / items / transactions            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every call re-queries the database; no result is cached in-process,
//! so readers always see the ledger's latest state.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::error::DbResult;
use jamal_core::{CategorySales, DailySalesSummary, SalesStats, StoreComparison, TopProduct};

/// Read-only reporting queries.
#[derive(Debug, Clone)]
pub struct ReportsRepository {
    pool: SqlitePool,
}

impl ReportsRepository {
    /// Creates a new ReportsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportsRepository { pool }
    }

    /// Sales grouped by (day, store), newest day first.
    /// `store_id = None` covers every store.
    pub async fn daily_summary(&self, store_id: Option<&str>) -> DbResult<Vec<DailySalesSummary>> {
        let rows = sqlx::query_as::<_, DailySalesSummary>(
            r#"
            SELECT
                sales.sale_date,
                sales.store_id,
                s.name AS store_name,
                COUNT(*) AS items_count,
                COALESCE(SUM(sales.total_price_cents), 0) AS total_cents
            FROM sales
            LEFT JOIN stores s ON s.id = sales.store_id
            WHERE (?1 IS NULL OR sales.store_id = ?1)
            GROUP BY sales.sale_date, sales.store_id
            ORDER BY sales.sale_date DESC
            "#,
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Day summaries restricted to an inclusive date range.
    pub async fn daily_summary_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        store_id: Option<&str>,
    ) -> DbResult<Vec<DailySalesSummary>> {
        let rows = sqlx::query_as::<_, DailySalesSummary>(
            r#"
            SELECT
                sales.sale_date,
                sales.store_id,
                s.name AS store_name,
                COUNT(*) AS items_count,
                COALESCE(SUM(sales.total_price_cents), 0) AS total_cents
            FROM sales
            LEFT JOIN stores s ON s.id = sales.store_id
            WHERE sales.sale_date BETWEEN ?1 AND ?2
              AND (?3 IS NULL OR sales.store_id = ?3)
            GROUP BY sales.sale_date, sales.store_id
            ORDER BY sales.sale_date DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Sales totals per category, biggest first.
    pub async fn sales_by_category(&self, store_id: Option<&str>) -> DbResult<Vec<CategorySales>> {
        let rows = sqlx::query_as::<_, CategorySales>(
            r#"
            SELECT
                category,
                COUNT(*) AS sales_count,
                COALESCE(SUM(quantity), 0) AS total_quantity,
                COALESCE(SUM(total_price_cents), 0) AS total_cents
            FROM sales
            WHERE (?1 IS NULL OR store_id = ?1)
            GROUP BY category
            ORDER BY total_cents DESC
            "#,
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Top-selling products by summed quantity.
    pub async fn top_products(
        &self,
        limit: i64,
        store_id: Option<&str>,
    ) -> DbResult<Vec<TopProduct>> {
        let rows = sqlx::query_as::<_, TopProduct>(
            r#"
            SELECT
                product_name,
                COALESCE(SUM(quantity), 0) AS total_quantity,
                COALESCE(SUM(total_price_cents), 0) AS total_cents,
                COUNT(*) AS sales_count
            FROM sales
            WHERE (?1 IS NULL OR store_id = ?1)
            GROUP BY product_name
            ORDER BY total_quantity DESC
            LIMIT ?2
            "#,
        )
        .bind(store_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Per-store aggregates, main store(s) first, then by revenue.
    ///
    /// Stores with no sales keep a row with zeroed metrics; the average
    /// transaction is 0 rather than a division by zero.
    pub async fn store_comparison(&self) -> DbResult<Vec<StoreComparison>> {
        let rows = sqlx::query_as::<_, StoreComparison>(
            r#"
            SELECT
                s.id,
                s.name,
                s.is_main,
                COALESCE(SUM(x.total_price_cents), 0) AS revenue_cents,
                COUNT(x.id) AS transactions,
                COALESCE(SUM(x.quantity), 0) AS items_sold,
                CASE
                    WHEN COUNT(x.id) > 0
                    THEN COALESCE(SUM(x.total_price_cents), 0) / COUNT(x.id)
                    ELSE 0
                END AS avg_transaction_cents
            FROM stores s
            LEFT JOIN sales x ON x.store_id = s.id
            GROUP BY s.id, s.name, s.is_main
            ORDER BY s.is_main DESC, revenue_cents DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Global totals: distinct sale days, revenue, items sold,
    /// transactions.
    pub async fn stats(&self, store_id: Option<&str>) -> DbResult<SalesStats> {
        let stats = sqlx::query_as::<_, SalesStats>(
            r#"
            SELECT
                COUNT(DISTINCT sale_date) AS total_days,
                COALESCE(SUM(total_price_cents), 0) AS revenue_cents,
                COALESCE(SUM(quantity), 0) AS items_sold,
                COUNT(*) AS transactions
            FROM sales
            WHERE (?1 IS NULL OR store_id = ?1)
            "#,
        )
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use jamal_core::{NewSale, Store};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn add_store(db: &Database, id: &str, name: &str) {
        let now = Utc::now();
        db.stores()
            .insert(&Store {
                id: id.to_string(),
                name: name.to_string(),
                address: None,
                phone: None,
                is_main: false,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }

    async fn record(db: &Database, name: &str, date: &str, qty: i64, unit: i64, store: &str) {
        db.recorder()
            .record_sale(NewSale {
                product_name: Some(name.to_string()),
                quantity: qty,
                unit_price_cents: unit,
                sale_date: date.parse().ok(),
                store_id: Some(store.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_daily_summary_groups_and_orders() {
        let db = test_db().await;

        record(&db, "Marteau", "2024-09-01", 2, 4000, "main").await;
        record(&db, "Clous", "2024-09-01", 1, 500, "main").await;
        record(&db, "Vis", "2024-09-02", 3, 200, "main").await;

        let days = db.reports().daily_summary(None).await.unwrap();
        assert_eq!(days.len(), 2);

        // Newest day first
        assert_eq!(days[0].sale_date.to_string(), "2024-09-02");
        assert_eq!(days[0].items_count, 1);
        assert_eq!(days[0].total_cents, 600);
        assert_eq!(days[0].store_name.as_deref(), Some("Quincaillerie Jamal"));

        assert_eq!(days[1].sale_date.to_string(), "2024-09-01");
        assert_eq!(days[1].items_count, 2);
        assert_eq!(days[1].total_cents, 8500);
    }

    #[tokio::test]
    async fn test_daily_summary_range() {
        let db = test_db().await;

        record(&db, "Marteau", "2024-08-30", 1, 4000, "main").await;
        record(&db, "Clous", "2024-09-01", 1, 500, "main").await;
        record(&db, "Vis", "2024-09-05", 1, 200, "main").await;

        let days = db
            .reports()
            .daily_summary_range(
                "2024-09-01".parse().unwrap(),
                "2024-09-04".parse().unwrap(),
                None,
            )
            .await
            .unwrap();

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].sale_date.to_string(), "2024-09-01");
    }

    #[tokio::test]
    async fn test_sales_by_category_ordering() {
        let db = test_db().await;

        db.ledger()
            .add_product(jamal_core::NewProduct {
                name: Some("Marteau".to_string()),
                category: Some("Outillage".to_string()),
                stock: Some(10),
                ..Default::default()
            })
            .await
            .unwrap();

        record(&db, "Marteau", "2024-09-01", 1, 4000, "main").await;
        record(&db, "Inconnu", "2024-09-01", 2, 100, "main").await;

        let categories = db.reports().sales_by_category(None).await.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].category, "Outillage");
        assert_eq!(categories[0].total_cents, 4000);
        assert_eq!(categories[1].category, "Non catégorisé");
        assert_eq!(categories[1].total_quantity, 2);
    }

    #[tokio::test]
    async fn test_top_products_by_quantity() {
        let db = test_db().await;

        record(&db, "Vis", "2024-09-01", 10, 50, "main").await;
        record(&db, "Vis", "2024-09-02", 5, 50, "main").await;
        record(&db, "Marteau", "2024-09-01", 2, 4000, "main").await;

        let top = db.reports().top_products(10, None).await.unwrap();
        assert_eq!(top[0].product_name, "Vis");
        assert_eq!(top[0].total_quantity, 15);
        assert_eq!(top[0].sales_count, 2);
        assert_eq!(top[1].product_name, "Marteau");

        let limited = db.reports().top_products(1, None).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_store_comparison_keeps_zero_sale_stores() {
        let db = test_db().await;
        add_store(&db, "depot", "Dépôt Annexe").await;

        record(&db, "Marteau", "2024-09-01", 2, 4000, "main").await;
        record(&db, "Clous", "2024-09-02", 1, 1000, "main").await;

        let comparison = db.reports().store_comparison().await.unwrap();
        assert_eq!(comparison.len(), 2);

        // Main store first
        let main = &comparison[0];
        assert_eq!(main.id, "main");
        assert!(main.is_main);
        assert_eq!(main.revenue_cents, 9000);
        assert_eq!(main.transactions, 2);
        assert_eq!(main.items_sold, 3);
        assert_eq!(main.avg_transaction_cents, 4500);

        // Zero-sale store appears with zeroed metrics, no division error
        let depot = &comparison[1];
        assert_eq!(depot.id, "depot");
        assert_eq!(depot.revenue_cents, 0);
        assert_eq!(depot.transactions, 0);
        assert_eq!(depot.avg_transaction_cents, 0);
    }

    #[tokio::test]
    async fn test_stats() {
        let db = test_db().await;

        record(&db, "Marteau", "2024-09-01", 2, 4000, "main").await;
        record(&db, "Clous", "2024-09-01", 5, 100, "main").await;
        record(&db, "Vis", "2024-09-02", 1, 200, "main").await;

        let stats = db.reports().stats(None).await.unwrap();
        assert_eq!(stats.total_days, 2);
        assert_eq!(stats.revenue_cents, 8700);
        assert_eq!(stats.items_sold, 8);
        assert_eq!(stats.transactions, 3);
    }

    #[tokio::test]
    async fn test_stats_empty_database_is_zeroed() {
        let db = test_db().await;

        let stats = db.reports().stats(None).await.unwrap();
        assert_eq!(stats.total_days, 0);
        assert_eq!(stats.revenue_cents, 0);
        assert_eq!(stats.transactions, 0);
    }

    #[tokio::test]
    async fn test_store_filter() {
        let db = test_db().await;
        add_store(&db, "depot", "Dépôt Annexe").await;

        record(&db, "Marteau", "2024-09-01", 1, 4000, "main").await;
        record(&db, "Clous", "2024-09-01", 1, 500, "depot").await;

        let main_only = db.reports().stats(Some("main")).await.unwrap();
        assert_eq!(main_only.transactions, 1);
        assert_eq!(main_only.revenue_cents, 4000);

        let days = db.reports().daily_summary(Some("depot")).await.unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].store_id, "depot");
    }
}
