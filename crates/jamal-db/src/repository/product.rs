//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Per-store listing and low-stock filtering
//! - Barcode lookup
//! - Partial updates (PATCH semantics via COALESCE)
//! - The clamped stock-delta primitive used by the inventory ledger
//!
//! ## Clamped Stock Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  ❌ WRONG: read stock, compute in Rust, write absolute value           │
//! │     (two round trips; concurrent sales lose updates)                   │
//! │                                                                         │
//! │  ✅ CORRECT: one relative update, clamped in SQL                       │
//! │     UPDATE products SET stock = MAX(0, stock + ?) WHERE name = ? ...   │
//! │                                                                         │
//! │  The clamp is the ledger's core invariant: no caller ever observes     │
//! │  negative stock, whatever delta sequence arrives.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use jamal_core::{Product, ProductPatch};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let products = repo.list("main").await?;
/// let product = repo.find_by_barcode("6111024000015").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products of a store, ordered by name.
    pub async fn list(&self, store_id: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, name, category, barcode,
                cost_cents, price_cents, stock, min_stock,
                store_id, created_at, updated_at
            FROM products
            WHERE store_id = ?1
            ORDER BY name
            "#,
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Lists products at or below their low-stock threshold.
    ///
    /// Ordered by ascending `(stock - min_stock)`: the most deficient
    /// product comes first.
    pub async fn low_stock(&self, store_id: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, name, category, barcode,
                cost_cents, price_cents, stock, min_stock,
                store_id, created_at, updated_at
            FROM products
            WHERE store_id = ?1 AND stock <= min_stock
            ORDER BY (stock - min_stock)
            "#,
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Lists products of one category in a store, ordered by name.
    pub async fn by_category(&self, category: &str, store_id: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, name, category, barcode,
                cost_cents, price_cents, stock, min_stock,
                store_id, created_at, updated_at
            FROM products
            WHERE category = ?1 AND store_id = ?2
            ORDER BY name
            "#,
        )
        .bind(category)
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, name, category, barcode,
                cost_cents, price_cents, stock, min_stock,
                store_id, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Exact barcode lookup across all stores.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - No product carries this barcode (not an error)
    pub async fn find_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, name, category, barcode,
                cost_cents, price_cents, stock, min_stock,
                store_id, created_at, updated_at
            FROM products
            WHERE barcode = ?1
            "#,
        )
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Looks a product up by name within a store.
    ///
    /// Stock adjustments and sale snapshots match on (name, store), the
    /// legacy duck-typed key, kept alongside the stable id reference.
    pub async fn find_by_name(&self, name: &str, store_id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, name, category, barcode,
                cost_cents, price_cents, stock, min_stock,
                store_id, created_at, updated_at
            FROM products
            WHERE name = ?1 AND store_id = ?2
            LIMIT 1
            "#,
        )
        .bind(name)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(())` - Inserted
    /// * `Err(DbError::UniqueViolation)` - Barcode already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_on(&mut conn, product).await
    }

    /// Inserts a product on an existing connection (usable inside a
    /// transaction; the ledger's auto-create path needs this).
    pub(crate) async fn insert_on(conn: &mut SqliteConnection, product: &Product) -> DbResult<()> {
        debug!(name = %product.name, store_id = %product.store_id, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, category, barcode,
                cost_cents, price_cents, stock, min_stock,
                store_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.barcode)
        .bind(product.cost_cents)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.min_stock)
        .bind(&product.store_id)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Applies a clamped stock delta to the product matched by (name, store).
    ///
    /// `stock' = MAX(0, stock + delta)`: negative results are clamped to
    /// zero in the same statement, so no reader ever observes a negative
    /// count.
    ///
    /// ## Returns
    /// The number of rows updated (0 when no product matches; the caller
    /// decides whether to auto-create).
    pub(crate) async fn clamped_stock_update_on(
        conn: &mut SqliteConnection,
        name: &str,
        store_id: &str,
        delta: i64,
        now: DateTime<Utc>,
    ) -> DbResult<u64> {
        debug!(name = %name, store_id = %store_id, delta = %delta, "Applying stock delta");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = MAX(0, stock + ?3), updated_at = ?4
            WHERE name = ?1 AND store_id = ?2
            "#,
        )
        .bind(name)
        .bind(store_id)
        .bind(delta)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Partially updates a product: only the fields present in the patch
    /// change, everything else keeps its value. `updated_at` refreshes on
    /// any match.
    ///
    /// ## Returns
    /// The number of rows updated. A missing id yields `Ok(0)`, not an
    /// error. This is the legacy no-op-success contract, made observable through
    /// the row count.
    pub async fn update(&self, id: &str, store_id: &str, patch: &ProductPatch) -> DbResult<u64> {
        debug!(id = %id, store_id = %store_id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = COALESCE(?3, name),
                category = COALESCE(?4, category),
                barcode = COALESCE(?5, barcode),
                cost_cents = COALESCE(?6, cost_cents),
                price_cents = COALESCE(?7, price_cents),
                stock = COALESCE(?8, stock),
                min_stock = COALESCE(?9, min_stock),
                updated_at = ?10
            WHERE id = ?1 AND store_id = ?2
            "#,
        )
        .bind(id)
        .bind(store_id)
        .bind(&patch.name)
        .bind(&patch.category)
        .bind(&patch.barcode)
        .bind(patch.cost_cents)
        .bind(patch.price_cents)
        .bind(patch.stock)
        .bind(patch.min_stock)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Hard-deletes a product.
    ///
    /// Never cascades to sales: sale rows keep their name/category
    /// snapshots and their `product_id` goes NULL, so history stays
    /// readable.
    ///
    /// ## Returns
    /// The number of rows deleted (0 when the id didn't exist).
    pub async fn delete(&self, id: &str, store_id: &str) -> DbResult<u64> {
        debug!(id = %id, store_id = %store_id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1 AND store_id = ?2")
            .bind(id)
            .bind(store_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Counts all products (for diagnostics and seed idempotency).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}
