//! # Domain Types
//!
//! Core domain types used throughout the Quincaillerie Jamal backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │     Store       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id ("main")    │       │
//! │  │  name           │   │  product_name   │   │  name           │       │
//! │  │  stock          │   │  quantity       │   │  is_main        │       │
//! │  │  min_stock      │   │  total (cents)  │   │  address/phone  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    Category     │   │  Report rows    │                             │
//! │  │  name (unique)  │   │  daily, stats,  │                             │
//! │  │  description    │   │  comparison, …  │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serde contract
//! The domain types double as wire types: JSON field names are camelCase,
//! with the monetary columns surfacing under their dashboard names
//! (`costPrice`, `sellingPrice`, `unitPrice`, `totalPrice`, all integer
//! centimes).
//!
//! ## Snapshot pattern
//! Sale rows carry a nullable `product_id` plus frozen `product_name` and
//! `category` copies, so history stays readable after a product is deleted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// Product
// =============================================================================

/// A product tracked in a store's inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name; stock adjustments match on (name, store).
    pub name: String,

    /// Free-text category label (not a foreign key: sale snapshots must
    /// outlive category rows).
    pub category: String,

    /// Barcode, globally unique when present.
    pub barcode: Option<String>,

    /// Purchase cost in centimes.
    #[serde(rename = "costPrice")]
    pub cost_cents: i64,

    /// Selling price in centimes.
    #[serde(rename = "sellingPrice")]
    pub price_cents: i64,

    /// Current stock level. Never negative: every write clamps at 0.
    pub stock: i64,

    /// Low-stock threshold: the product is low when `stock <= min_stock`.
    pub min_stock: i64,

    /// Store this row belongs to.
    pub store_id: String,

    pub created_at: DateTime<Utc>,

    /// Refreshed on every successful mutation.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether this product is at or below its low-stock threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// Profit margin per unit (selling price minus cost), in centimes.
    /// Negative for loss-making items.
    #[inline]
    pub fn margin(&self) -> crate::Money {
        crate::Money::from_cents(self.price_cents - self.cost_cents)
    }
}

/// Input for creating a product.
///
/// Everything except the name is optional; defaults follow the shop's
/// conventions (category "Autres", min stock 5, store "main").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: Option<String>,
    pub category: Option<String>,
    pub barcode: Option<String>,
    #[serde(rename = "costPrice")]
    pub cost_cents: Option<i64>,
    #[serde(rename = "sellingPrice")]
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
    pub min_stock: Option<i64>,
    pub store_id: Option<String>,
}

/// Partial update for a product. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub barcode: Option<String>,
    #[serde(rename = "costPrice")]
    pub cost_cents: Option<i64>,
    #[serde(rename = "sellingPrice")]
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
    pub min_stock: Option<i64>,
    pub store_id: Option<String>,
}

impl ProductPatch {
    /// True when no mutable field is set (the update would be a no-op).
    /// `store_id` selects which store's row to patch; it is not a mutable
    /// field itself.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.barcode.is_none()
            && self.cost_cents.is_none()
            && self.price_cents.is_none()
            && self.stock.is_none()
            && self.min_stock.is_none()
    }
}

// =============================================================================
// Store
// =============================================================================

/// A physical store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Caller-assigned identifier (e.g. `"main"`).
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub is_main: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a store. Without an id, one is generated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStore {
    pub id: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub is_main: Option<bool>,
}

/// Partial update for a store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub is_main: Option<bool>,
}

/// Whether `is_main` must be unique across stores.
///
/// The legacy system never enforced uniqueness; rather than guess, the
/// policy is configurable. Under [`MainStorePolicy::EnforceSingle`],
/// creating or promoting a second main store is a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MainStorePolicy {
    /// Any number of stores may carry `is_main` (legacy behavior).
    AllowMultiple,
    /// At most one store may carry `is_main`.
    EnforceSingle,
}

impl Default for MainStorePolicy {
    fn default() -> Self {
        MainStorePolicy::AllowMultiple
    }
}

impl FromStr for MainStorePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allow-multiple" => Ok(MainStorePolicy::AllowMultiple),
            "enforce-single" => Ok(MainStorePolicy::EnforceSingle),
            other => Err(format!(
                "unknown main-store policy '{other}' (expected 'allow-multiple' or 'enforce-single')"
            )),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded point-of-sale transaction.
///
/// `sale_date` is a calendar day, not a timestamp. That is the granularity
/// of all reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    /// Stable product reference, captured at record time. NULL once the
    /// product is deleted.
    pub product_id: Option<String>,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Category at time of sale (frozen).
    pub category: String,
    pub quantity: i64,
    #[serde(rename = "unitPrice")]
    pub unit_price_cents: i64,
    #[serde(rename = "totalPrice")]
    pub total_price_cents: i64,
    #[serde(rename = "date")]
    pub sale_date: NaiveDate,
    pub store_id: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a sale.
///
/// `total_price_cents` overrides the derived `unit × quantity` total when
/// present (discounted totals).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub product_name: Option<String>,
    pub category: Option<String>,
    #[serde(default = "default_sale_quantity")]
    pub quantity: i64,
    #[serde(rename = "unitPrice", default)]
    pub unit_price_cents: i64,
    #[serde(rename = "totalPrice")]
    pub total_price_cents: Option<i64>,
    #[serde(rename = "date")]
    pub sale_date: Option<NaiveDate>,
    pub store_id: Option<String>,
    pub notes: Option<String>,
}

fn default_sale_quantity() -> i64 {
    1
}

// =============================================================================
// Category
// =============================================================================

/// A product category. Purely descriptive; products and sale snapshots
/// reference it by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Partial update for a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

// =============================================================================
// Report Rows
// =============================================================================
// Read-only aggregation results. Shapes follow the dashboard's charts and
// tables; every amount is integer centimes.

/// One day of sales for one store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct DailySalesSummary {
    #[serde(rename = "date")]
    pub sale_date: NaiveDate,
    pub store_id: String,
    /// NULL when the store row was deleted out from under its sales.
    pub store_name: Option<String>,
    pub items_count: i64,
    #[serde(rename = "totalAmount")]
    pub total_cents: i64,
}

/// Sales totals for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct CategorySales {
    pub category: String,
    pub sales_count: i64,
    pub total_quantity: i64,
    #[serde(rename = "totalAmount")]
    pub total_cents: i64,
}

/// One entry of the top-selling-products ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_name: String,
    pub total_quantity: i64,
    #[serde(rename = "totalRevenue")]
    pub total_cents: i64,
    pub sales_count: i64,
}

/// Per-store aggregate for the store comparison view.
///
/// Stores with zero sales still appear, with zeroed metrics and
/// `avg_transaction_cents = 0` (never a division by zero).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct StoreComparison {
    pub id: String,
    pub name: String,
    pub is_main: bool,
    #[serde(rename = "revenue")]
    pub revenue_cents: i64,
    pub transactions: i64,
    #[serde(rename = "totalItemsSold")]
    pub items_sold: i64,
    #[serde(rename = "avgTransaction")]
    pub avg_transaction_cents: i64,
}

/// Global sales totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    pub total_days: i64,
    #[serde(rename = "totalRevenue")]
    pub revenue_cents: i64,
    #[serde(rename = "totalItemsSold")]
    pub items_sold: i64,
    #[serde(rename = "totalTransactions")]
    pub transactions: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_stock_classification() {
        let mut product = sample_product();
        product.stock = 5;
        product.min_stock = 5;
        assert!(product.is_low_stock());

        product.stock = 6;
        assert!(!product.is_low_stock());
    }

    #[test]
    fn test_margin() {
        let mut product = sample_product();
        product.price_cents = 4000;
        product.cost_cents = 2500;
        assert_eq!(product.margin().cents(), 1500);
    }

    #[test]
    fn test_product_wire_names() {
        let json = serde_json::to_value(sample_product()).unwrap();
        assert!(json.get("costPrice").is_some());
        assert!(json.get("sellingPrice").is_some());
        assert!(json.get("minStock").is_some());
        assert!(json.get("storeId").is_some());
        assert!(json.get("cost_cents").is_none());
    }

    #[test]
    fn test_new_sale_defaults() {
        let sale: NewSale = serde_json::from_str(
            r#"{"productName": "Marteau", "unitPrice": 4000, "date": "2024-09-01"}"#,
        )
        .unwrap();
        assert_eq!(sale.quantity, 1);
        assert_eq!(sale.unit_price_cents, 4000);
        assert_eq!(sale.total_price_cents, None);
        assert_eq!(
            sale.sale_date,
            Some(NaiveDate::from_ymd_opt(2024, 9, 1).unwrap())
        );
    }

    #[test]
    fn test_main_store_policy_parse() {
        assert_eq!(
            "allow-multiple".parse::<MainStorePolicy>().unwrap(),
            MainStorePolicy::AllowMultiple
        );
        assert_eq!(
            "enforce-single".parse::<MainStorePolicy>().unwrap(),
            MainStorePolicy::EnforceSingle
        );
        assert!("both".parse::<MainStorePolicy>().is_err());
    }

    #[test]
    fn test_empty_patch() {
        assert!(ProductPatch::default().is_empty());
        let patch = ProductPatch {
            stock: Some(10),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    fn sample_product() -> Product {
        Product {
            id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            name: "Marteau".to_string(),
            category: "Outillage".to_string(),
            barcode: None,
            cost_cents: 2500,
            price_cents: 4000,
            stock: 50,
            min_stock: 5,
            store_id: "main".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
