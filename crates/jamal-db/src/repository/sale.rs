//! # Sale Repository
//!
//! Database operations for sale rows.
//!
//! One row per transaction, the canonical persistence model. Each row
//! carries a nullable `product_id` (stable reference, NULL after the
//! product is deleted) plus frozen `product_name`/`category` snapshots.
//!
//! Writes that must stay consistent with the inventory ledger (insert,
//! delete) only exist as connection-level primitives here; the
//! [`crate::recorder::SalesRecorder`] wraps them in a transaction together
//! with the stock delta.

use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use jamal_core::Sale;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Lists sales, newest first. `store_id = None` returns every store.
    pub async fn list(&self, store_id: Option<&str>) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT
                id, product_id, product_name, category, quantity,
                unit_price_cents, total_price_cents, sale_date,
                store_id, notes, created_at
            FROM sales
            WHERE (?1 IS NULL OR store_id = ?1)
            ORDER BY sale_date DESC, created_at DESC
            "#,
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists the sales of one calendar day, newest first.
    pub async fn for_day(&self, day: NaiveDate, store_id: Option<&str>) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT
                id, product_id, product_name, category, quantity,
                unit_price_cents, total_price_cents, sale_date,
                store_id, notes, created_at
            FROM sales
            WHERE sale_date = ?1 AND (?2 IS NULL OR store_id = ?2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(day)
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT
                id, product_id, product_name, category, quantity,
                unit_price_cents, total_price_cents, sale_date,
                store_id, notes, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Inserts a sale row on an existing connection.
    ///
    /// Connection-level so the recorder can pair it with the stock delta
    /// in one transaction.
    pub(crate) async fn insert_on(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, product = %sale.product_name, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, product_id, product_name, category, quantity,
                unit_price_cents, total_price_cents, sale_date,
                store_id, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.product_id)
        .bind(&sale.product_name)
        .bind(&sale.category)
        .bind(sale.quantity)
        .bind(sale.unit_price_cents)
        .bind(sale.total_price_cents)
        .bind(sale.sale_date)
        .bind(&sale.store_id)
        .bind(&sale.notes)
        .bind(sale.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Fetches a sale for update/delete on an existing connection.
    pub(crate) async fn get_by_id_on(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT
                id, product_id, product_name, category, quantity,
                unit_price_cents, total_price_cents, sale_date,
                store_id, notes, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(sale)
    }

    /// Deletes a sale row on an existing connection.
    pub(crate) async fn delete_on(conn: &mut SqliteConnection, id: &str) -> DbResult<u64> {
        debug!(id = %id, "Deleting sale");

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Helper to generate a new sale ID.
pub fn generate_sale_id() -> String {
    Uuid::new_v4().to_string()
}
