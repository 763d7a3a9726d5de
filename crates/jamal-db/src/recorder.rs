//! # Sales Recorder
//!
//! Records point-of-sale transactions and keeps the inventory ledger
//! synchronized.
//!
//! ## One Transaction, Two Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     record_sale(input)                                  │
//! │                                                                         │
//! │  validate ── productName, quantity >= 1, unitPrice >= 0, date          │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  total = explicit override ?? unitPrice × quantity                     │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  BEGIN ─────────────────────────────────────────────────┐              │
//! │  │  resolve product by (name, store)                    │              │
//! │  │    → snapshot category, capture nullable product_id  │              │
//! │  │  INSERT sale row                                     │              │
//! │  │  stock = MAX(0, stock - quantity)  (auto-create      │              │
//! │  │    when the product was never stocked)               │              │
//! │  COMMIT ────────────────────────────────────────────────┘              │
//! │                                                                         │
//! │  Either both writes land or neither does: the sale log and the         │
//! │  stock column cannot drift apart under concurrent sales.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Deleting a sale is the mirror image: remove the row and restore
//! `+quantity` through the same ledger rules, also in one transaction.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::ledger::InventoryLedger;
use crate::repository::sale::{generate_sale_id, SaleRepository};
use jamal_core::validation::{
    validate_price_cents, validate_product_name, validate_quantity, validate_store_id,
};
use jamal_core::{Money, NewSale, Sale, ValidationError, UNCATEGORIZED};

/// The sales recorder service.
#[derive(Debug, Clone)]
pub struct SalesRecorder {
    pool: SqlitePool,
    /// Store id applied when the caller omits one.
    default_store_id: String,
}

impl SalesRecorder {
    /// Creates a new SalesRecorder.
    pub fn new(pool: SqlitePool, default_store_id: String) -> Self {
        SalesRecorder {
            pool,
            default_store_id,
        }
    }

    /// Records a sale and decrements stock, atomically.
    ///
    /// ## Total Price
    /// `total_price_cents` in the input overrides the derived
    /// `unit × quantity` value (callers may pass a discounted total).
    ///
    /// ## Returns
    /// The created sale, including its assigned id and computed total.
    pub async fn record_sale(&self, input: NewSale) -> DbResult<Sale> {
        let product_name = input
            .product_name
            .as_deref()
            .unwrap_or("")
            .trim()
            .to_string();
        validate_product_name(&product_name)?;
        validate_quantity(input.quantity)?;
        validate_price_cents("unitPrice", input.unit_price_cents)?;
        if let Some(total) = input.total_price_cents {
            validate_price_cents("totalPrice", total)?;
        }
        let sale_date = input
            .sale_date
            .ok_or_else(|| ValidationError::required("date"))?;

        let store_id = input
            .store_id
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| self.default_store_id.clone());
        validate_store_id(&store_id)?;

        let total_price_cents = input.total_price_cents.unwrap_or_else(|| {
            Money::from_cents(input.unit_price_cents)
                .multiply_quantity(input.quantity)
                .cents()
        });

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Snapshot the product while we hold the transaction: stable id
        // reference plus frozen category, so history survives deletion.
        let matched: Option<(String, String)> = sqlx::query_as(
            "SELECT id, category FROM products WHERE name = ?1 AND store_id = ?2 LIMIT 1",
        )
        .bind(&product_name)
        .bind(&store_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (product_id, product_category) = match matched {
            Some((id, category)) => (Some(id), Some(category)),
            None => (None, None),
        };

        let category = input
            .category
            .filter(|c| !c.trim().is_empty())
            .or(product_category)
            .unwrap_or_else(|| UNCATEGORIZED.to_string());

        let sale = Sale {
            id: generate_sale_id(),
            product_id,
            product_name: product_name.clone(),
            category,
            quantity: input.quantity,
            unit_price_cents: input.unit_price_cents,
            total_price_cents,
            sale_date,
            store_id: store_id.clone(),
            notes: input.notes,
            created_at: now,
        };

        SaleRepository::insert_on(&mut tx, &sale).await?;
        InventoryLedger::apply_stock_delta(&mut tx, &product_name, &store_id, -input.quantity, now)
            .await?;

        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            product = %sale.product_name,
            quantity = sale.quantity,
            total_cents = sale.total_price_cents,
            store_id = %sale.store_id,
            "Sale recorded"
        );

        Ok(sale)
    }

    /// Deletes a sale and restores its quantity to stock, atomically.
    ///
    /// The restore runs through the ledger's normal rules: if intervening
    /// adjustments already zeroed the stock, the result is simply
    /// `0 + quantity`; if the product was deleted meanwhile, it is
    /// auto-created to receive the returned units.
    ///
    /// ## Errors
    /// `NotFound` when no sale carries this id.
    pub async fn delete_sale(&self, id: &str) -> DbResult<Sale> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let sale = SaleRepository::get_by_id_on(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))?;

        SaleRepository::delete_on(&mut tx, id).await?;
        InventoryLedger::apply_stock_delta(
            &mut tx,
            &sale.product_name,
            &sale.store_id,
            sale.quantity,
            now,
        )
        .await?;

        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            product = %sale.product_name,
            quantity = sale.quantity,
            "Sale deleted, stock restored"
        );

        Ok(sale)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;
    use jamal_core::NewProduct;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn sale_input(name: &str, quantity: i64, unit_price_cents: i64) -> NewSale {
        NewSale {
            product_name: Some(name.to_string()),
            quantity,
            unit_price_cents,
            sale_date: NaiveDate::from_ymd_opt(2024, 9, 1),
            ..Default::default()
        }
    }

    async fn stock_of(db: &Database, name: &str) -> i64 {
        db.ledger()
            .list("main")
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.name == name)
            .map(|p| p.stock)
            .unwrap_or(-1)
    }

    #[tokio::test]
    async fn test_record_sale_round_trip() {
        let db = test_db().await;

        db.ledger()
            .add_product(NewProduct {
                name: Some("Marteau".to_string()),
                price_cents: Some(4000),
                stock: Some(50),
                ..Default::default()
            })
            .await
            .unwrap();

        // 40 DH × 2 on a stock of 50
        let sale = db
            .recorder()
            .record_sale(sale_input("Marteau", 2, 4000))
            .await
            .unwrap();

        assert_eq!(sale.total_price_cents, 8000);
        assert_eq!(sale.store_id, "main");
        assert!(sale.product_id.is_some());
        assert_eq!(stock_of(&db, "Marteau").await, 48);
    }

    #[tokio::test]
    async fn test_explicit_total_override_wins() {
        let db = test_db().await;

        let sale = db
            .recorder()
            .record_sale(NewSale {
                total_price_cents: Some(2500),
                ..sale_input("Clous", 3, 1000)
            })
            .await
            .unwrap();

        // 2500, not the derived 3000
        assert_eq!(sale.total_price_cents, 2500);
    }

    #[tokio::test]
    async fn test_sale_of_unknown_product_auto_creates() {
        let db = test_db().await;

        let sale = db
            .recorder()
            .record_sale(sale_input("NeverSeenItem", 3, 500))
            .await
            .unwrap();

        // No product existed, so there is no stable reference to capture
        assert!(sale.product_id.is_none());
        assert_eq!(sale.category, "Non catégorisé");

        let products = db.ledger().list("main").await.unwrap();
        let created = products.iter().find(|p| p.name == "NeverSeenItem").unwrap();
        assert_eq!(created.stock, 0); // MAX(0, -3)
        assert_eq!(created.min_stock, 5);
    }

    #[tokio::test]
    async fn test_category_snapshot_from_product() {
        let db = test_db().await;

        db.ledger()
            .add_product(NewProduct {
                name: Some("Peinture blanche".to_string()),
                category: Some("Peinture".to_string()),
                stock: Some(10),
                ..Default::default()
            })
            .await
            .unwrap();

        let sale = db
            .recorder()
            .record_sale(sale_input("Peinture blanche", 1, 9000))
            .await
            .unwrap();

        assert_eq!(sale.category, "Peinture");
    }

    #[tokio::test]
    async fn test_snapshot_survives_product_deletion() {
        let db = test_db().await;

        let product = db
            .ledger()
            .add_product(NewProduct {
                name: Some("Cadenas".to_string()),
                category: Some("Quincaillerie".to_string()),
                stock: Some(5),
                ..Default::default()
            })
            .await
            .unwrap();

        let sale = db
            .recorder()
            .record_sale(sale_input("Cadenas", 1, 3500))
            .await
            .unwrap();

        db.ledger().delete_product(&product.id, "main").await.unwrap();

        // History stays readable from the snapshot; the stable reference
        // goes NULL with the product
        let reread = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(reread.product_name, "Cadenas");
        assert_eq!(reread.category, "Quincaillerie");
        assert!(reread.product_id.is_none());
    }

    #[tokio::test]
    async fn test_delete_sale_restores_stock() {
        let db = test_db().await;

        db.ledger()
            .add_product(NewProduct {
                name: Some("Colle".to_string()),
                stock: Some(20),
                ..Default::default()
            })
            .await
            .unwrap();

        let sale = db
            .recorder()
            .record_sale(sale_input("Colle", 4, 1500))
            .await
            .unwrap();
        assert_eq!(stock_of(&db, "Colle").await, 16);

        db.recorder().delete_sale(&sale.id).await.unwrap();
        assert_eq!(stock_of(&db, "Colle").await, 20);
    }

    #[tokio::test]
    async fn test_delete_sale_restore_is_clamp_compatible() {
        let db = test_db().await;

        db.ledger()
            .add_product(NewProduct {
                name: Some("Ruban".to_string()),
                stock: Some(10),
                ..Default::default()
            })
            .await
            .unwrap();

        let sale = db
            .recorder()
            .record_sale(sale_input("Ruban", 4, 800))
            .await
            .unwrap();

        // An intervening adjustment zeroes the stock entirely
        db.ledger().adjust_stock("Ruban", "main", -100).await.unwrap();
        assert_eq!(stock_of(&db, "Ruban").await, 0);

        // Restoration adds back exactly the sold quantity from the floor
        db.recorder().delete_sale(&sale.id).await.unwrap();
        assert_eq!(stock_of(&db, "Ruban").await, 4);
    }

    #[tokio::test]
    async fn test_delete_missing_sale_is_not_found() {
        let db = test_db().await;
        let err = db.recorder().delete_sale("no-such-sale").await;
        assert!(matches!(err, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_validation_rejects_bad_input() {
        let db = test_db().await;
        let recorder = db.recorder();

        // Missing product name
        let err = recorder
            .record_sale(NewSale {
                product_name: None,
                ..sale_input("x", 1, 100)
            })
            .await;
        assert!(matches!(err, Err(DbError::Validation(_))));

        // Zero quantity
        let err = recorder.record_sale(sale_input("Vis", 0, 100)).await;
        assert!(matches!(err, Err(DbError::Validation(_))));

        // Negative unit price
        let err = recorder.record_sale(sale_input("Vis", 1, -100)).await;
        assert!(matches!(err, Err(DbError::Validation(_))));

        // Missing date
        let err = recorder
            .record_sale(NewSale {
                sale_date: None,
                ..sale_input("Vis", 1, 100)
            })
            .await;
        assert!(matches!(err, Err(DbError::Validation(_))));
    }

    #[tokio::test]
    async fn test_default_store_id_applied() {
        let db = test_db().await;

        let sale = db
            .recorder()
            .record_sale(sale_input("Lime", 1, 1200))
            .await
            .unwrap();

        assert_eq!(sale.store_id, "main");
    }
}
