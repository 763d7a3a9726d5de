//! # Inventory Ledger
//!
//! Authoritative stock counts per (product name, store), with low-stock
//! classification.
//!
//! ## Stock Consistency Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    The Ledger's Three Rules                             │
//! │                                                                         │
//! │  1. CLAMP      stock' = MAX(0, stock + delta), applied in SQL in one   │
//! │                statement. No caller ever observes negative stock.      │
//! │                                                                         │
//! │  2. AUTO-CREATE  adjust_stock("Rivets", "main", -3) with no such       │
//! │                product creates it: category "Non catégorisé",          │
//! │                stock MAX(0, -3) = 0, min_stock 5. A sale never fails   │
//! │                just because inventory wasn't pre-populated.            │
//! │                                                                         │
//! │  3. LOW STOCK  stock <= min_stock, reported most-deficient first       │
//! │                (ascending stock - min_stock).                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ledger re-validates its inputs even though the REST boundary already
//! did: it is reachable as a library, not only behind the routes.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::repository::product::{generate_product_id, ProductRepository};
use jamal_core::validation::{
    validate_barcode, validate_price_cents, validate_product_name, validate_stock_level,
    validate_store_id,
};
use jamal_core::{
    NewProduct, Product, ProductPatch, DEFAULT_CATEGORY, DEFAULT_MIN_STOCK, DEFAULT_STORE_ID,
    UNCATEGORIZED,
};

/// The inventory ledger service.
///
/// Wraps [`ProductRepository`] with the stock consistency rules. Reads
/// delegate straight through; writes validate first.
#[derive(Debug, Clone)]
pub struct InventoryLedger {
    pool: SqlitePool,
    products: ProductRepository,
}

impl InventoryLedger {
    /// Creates a new InventoryLedger.
    pub fn new(pool: SqlitePool) -> Self {
        let products = ProductRepository::new(pool.clone());
        InventoryLedger { pool, products }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// All products of a store, ordered by name.
    pub async fn list(&self, store_id: &str) -> DbResult<Vec<Product>> {
        self.products.list(store_id).await
    }

    /// Products at or below their low-stock threshold, most deficient
    /// first. Repeated calls with no intervening writes return identical
    /// results (plain query, no side effects).
    pub async fn low_stock(&self, store_id: &str) -> DbResult<Vec<Product>> {
        self.products.low_stock(store_id).await
    }

    /// Products of one category in a store.
    pub async fn by_category(&self, category: &str, store_id: &str) -> DbResult<Vec<Product>> {
        self.products.by_category(category, store_id).await
    }

    /// Exact barcode lookup. `None` when absent, not an error.
    pub async fn find_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        self.products.find_by_barcode(barcode).await
    }

    /// Product by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        self.products.get_by_id(id).await
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Creates a product with the shop's defaults.
    ///
    /// ## Defaults
    /// - category: `"Autres"`
    /// - cost/selling price: 0
    /// - stock: 0, min_stock: 5
    /// - store: `"main"`
    ///
    /// ## Errors
    /// - `Validation` - missing name, negative numeric field, bad barcode
    /// - `UniqueViolation` - barcode already registered (always surfaced,
    ///   never swallowed)
    pub async fn add_product(&self, input: NewProduct) -> DbResult<Product> {
        let name = input.name.as_deref().unwrap_or("").trim().to_string();
        validate_product_name(&name)?;

        let barcode = match input.barcode.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(code) => {
                validate_barcode(code)?;
                Some(code.to_string())
            }
        };

        let cost_cents = input.cost_cents.unwrap_or(0);
        let price_cents = input.price_cents.unwrap_or(0);
        let stock = input.stock.unwrap_or(0);
        let min_stock = input.min_stock.unwrap_or(DEFAULT_MIN_STOCK);
        validate_price_cents("costPrice", cost_cents)?;
        validate_price_cents("sellingPrice", price_cents)?;
        validate_stock_level("stock", stock)?;
        validate_stock_level("minStock", min_stock)?;

        let store_id = input
            .store_id
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STORE_ID.to_string());
        validate_store_id(&store_id)?;

        let category = input
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name,
            category,
            barcode,
            cost_cents,
            price_cents,
            stock,
            min_stock,
            store_id,
            created_at: now,
            updated_at: now,
        };

        self.products.insert(&product).await.map_err(|err| {
            // Rewrite the raw constraint message into the user-facing
            // conflict: the barcode is the only unique column on products.
            match err {
                DbError::UniqueViolation { .. } => DbError::duplicate(
                    "barcode",
                    product.barcode.clone().unwrap_or_default(),
                ),
                other => other,
            }
        })?;

        info!(id = %product.id, name = %product.name, store_id = %product.store_id, "Product created");
        Ok(product)
    }

    /// Applies a signed stock delta to the product matched by
    /// (name, store): `stock' = MAX(0, stock + delta)`.
    ///
    /// When no product matches, a placeholder is auto-created instead
    /// (category `"Non catégorisé"`, stock `MAX(0, delta)`, min_stock 5)
    /// so selling something never stocked still succeeds.
    pub async fn adjust_stock(&self, name: &str, store_id: &str, delta: i64) -> DbResult<()> {
        validate_product_name(name)?;
        validate_store_id(store_id)?;

        let mut tx = self.pool.begin().await?;
        Self::apply_stock_delta(&mut tx, name, store_id, delta, Utc::now()).await?;
        tx.commit().await?;

        Ok(())
    }

    /// The delta + auto-create step on an existing connection.
    ///
    /// Shared with the sales recorder, which runs it inside the same
    /// transaction as the sale insert.
    pub(crate) async fn apply_stock_delta(
        conn: &mut SqliteConnection,
        name: &str,
        store_id: &str,
        delta: i64,
        now: DateTime<Utc>,
    ) -> DbResult<()> {
        let affected =
            ProductRepository::clamped_stock_update_on(conn, name, store_id, delta, now).await?;

        if affected == 0 {
            let placeholder = Product {
                id: generate_product_id(),
                name: name.to_string(),
                category: UNCATEGORIZED.to_string(),
                barcode: None,
                cost_cents: 0,
                price_cents: 0,
                stock: delta.max(0),
                min_stock: DEFAULT_MIN_STOCK,
                store_id: store_id.to_string(),
                created_at: now,
                updated_at: now,
            };
            ProductRepository::insert_on(conn, &placeholder).await?;

            info!(
                name = %name,
                store_id = %store_id,
                stock = placeholder.stock,
                "Auto-created product for stock adjustment"
            );
        }

        Ok(())
    }

    /// Partially updates a product.
    ///
    /// ## Returns
    /// The number of rows updated. An empty patch or a missing id is a
    /// no-op `Ok(0)`, matching the legacy contract.
    pub async fn update_product(
        &self,
        id: &str,
        store_id: &str,
        patch: &ProductPatch,
    ) -> DbResult<u64> {
        if patch.is_empty() {
            return Ok(0);
        }

        if let Some(name) = patch.name.as_deref() {
            validate_product_name(name)?;
        }
        if let Some(barcode) = patch.barcode.as_deref() {
            validate_barcode(barcode)?;
        }
        if let Some(cents) = patch.cost_cents {
            validate_price_cents("costPrice", cents)?;
        }
        if let Some(cents) = patch.price_cents {
            validate_price_cents("sellingPrice", cents)?;
        }
        if let Some(stock) = patch.stock {
            validate_stock_level("stock", stock)?;
        }
        if let Some(min_stock) = patch.min_stock {
            validate_stock_level("minStock", min_stock)?;
        }

        self.products.update(id, store_id, patch).await
    }

    /// Hard-deletes a product. Sales keep their snapshots.
    pub async fn delete_product(&self, id: &str, store_id: &str) -> DbResult<u64> {
        self.products.delete(id, store_id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_product(name: &str, stock: i64, min_stock: i64) -> NewProduct {
        NewProduct {
            name: Some(name.to_string()),
            stock: Some(stock),
            min_stock: Some(min_stock),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_add_product_defaults() {
        let db = test_db().await;
        let ledger = db.ledger();

        let product = ledger
            .add_product(NewProduct {
                name: Some("Marteau".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(product.category, "Autres");
        assert_eq!(product.stock, 0);
        assert_eq!(product.min_stock, 5);
        assert_eq!(product.store_id, "main");
        assert_eq!(product.cost_cents, 0);
    }

    #[tokio::test]
    async fn test_add_product_requires_name() {
        let db = test_db().await;
        let err = db.ledger().add_product(NewProduct::default()).await;
        assert!(matches!(err, Err(DbError::Validation(_))));
    }

    #[tokio::test]
    async fn test_add_product_rejects_negative_price() {
        let db = test_db().await;
        let err = db
            .ledger()
            .add_product(NewProduct {
                name: Some("Clous".to_string()),
                price_cents: Some(-100),
                ..Default::default()
            })
            .await;
        assert!(matches!(err, Err(DbError::Validation(_))));
    }

    #[tokio::test]
    async fn test_duplicate_barcode_is_conflict() {
        let db = test_db().await;
        let ledger = db.ledger();

        ledger
            .add_product(NewProduct {
                name: Some("Tournevis".to_string()),
                barcode: Some("6111024000015".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let err = ledger
            .add_product(NewProduct {
                name: Some("Tournevis plat".to_string()),
                barcode: Some("6111024000015".to_string()),
                ..Default::default()
            })
            .await;

        match err {
            Err(DbError::UniqueViolation { field, value }) => {
                assert_eq!(field, "barcode");
                assert_eq!(value, "6111024000015");
            }
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stock_never_goes_negative() {
        let db = test_db().await;
        let ledger = db.ledger();

        ledger.add_product(new_product("Vis", 10, 5)).await.unwrap();

        // Selling more than available clamps to zero
        ledger.adjust_stock("Vis", "main", -25).await.unwrap();
        let products = ledger.list("main").await.unwrap();
        assert_eq!(products[0].stock, 0);

        // Restocking works from the clamped floor
        ledger.adjust_stock("Vis", "main", 7).await.unwrap();
        let products = ledger.list("main").await.unwrap();
        assert_eq!(products[0].stock, 7);
    }

    #[tokio::test]
    async fn test_adjust_stock_auto_creates_missing_product() {
        let db = test_db().await;
        let ledger = db.ledger();

        ledger
            .adjust_stock("NeverSeenItem", "main", -3)
            .await
            .unwrap();

        let products = ledger.list("main").await.unwrap();
        assert_eq!(products.len(), 1);
        let created = &products[0];
        assert_eq!(created.name, "NeverSeenItem");
        assert_eq!(created.category, "Non catégorisé");
        assert_eq!(created.stock, 0); // MAX(0, -3)
        assert_eq!(created.min_stock, 5);
    }

    #[tokio::test]
    async fn test_adjust_stock_auto_creates_on_positive_delta_too() {
        let db = test_db().await;
        let ledger = db.ledger();

        ledger.adjust_stock("Rivets", "main", 12).await.unwrap();

        let products = ledger.list("main").await.unwrap();
        assert_eq!(products[0].stock, 12);
        assert_eq!(products[0].category, "Non catégorisé");
    }

    #[tokio::test]
    async fn test_low_stock_ordering() {
        let db = test_db().await;
        let ledger = db.ledger();

        // A(stock=2, min=5) deficiency -3, B(1, 10) deficiency -9,
        // C(20, 5) not low
        ledger.add_product(new_product("A", 2, 5)).await.unwrap();
        ledger.add_product(new_product("B", 1, 10)).await.unwrap();
        ledger.add_product(new_product("C", 20, 5)).await.unwrap();

        let low = ledger.low_stock("main").await.unwrap();
        let names: Vec<&str> = low.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);

        // Idempotent: same result with no intervening writes
        let again = ledger.low_stock("main").await.unwrap();
        let names_again: Vec<&str> = again.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, names_again);
    }

    #[tokio::test]
    async fn test_boundary_stock_equal_to_min_is_low() {
        let db = test_db().await;
        let ledger = db.ledger();

        ledger.add_product(new_product("Joint", 5, 5)).await.unwrap();

        let low = ledger.low_stock("main").await.unwrap();
        assert_eq!(low.len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_barcode_absent_is_none() {
        let db = test_db().await;
        let found = db.ledger().find_by_barcode("0000000000000").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_update_product_partial() {
        let db = test_db().await;
        let ledger = db.ledger();

        let product = ledger.add_product(new_product("Pince", 8, 3)).await.unwrap();

        let affected = ledger
            .update_product(
                &product.id,
                "main",
                &ProductPatch {
                    price_cents: Some(2500),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let updated = ledger.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(updated.price_cents, 2500);
        // Untouched fields keep their values
        assert_eq!(updated.stock, 8);
        assert_eq!(updated.name, "Pince");
    }

    #[tokio::test]
    async fn test_update_missing_product_is_noop_success() {
        let db = test_db().await;

        let affected = db
            .ledger()
            .update_product(
                "no-such-id",
                "main",
                &ProductPatch {
                    stock: Some(3),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(affected, 0);
    }

    #[tokio::test]
    async fn test_delete_product() {
        let db = test_db().await;
        let ledger = db.ledger();

        let product = ledger.add_product(new_product("Scie", 4, 2)).await.unwrap();

        assert_eq!(ledger.delete_product(&product.id, "main").await.unwrap(), 1);
        assert_eq!(ledger.delete_product(&product.id, "main").await.unwrap(), 0);
        assert!(ledger.get_by_id(&product.id).await.unwrap().is_none());
    }
}
