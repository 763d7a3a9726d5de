//! # jamal-db: Database Layer for the Quincaillerie Jamal backend
//!
//! This crate provides database access for the store management system.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Quincaillerie Jamal Data Flow                      │
//! │                                                                         │
//! │  REST handler (POST /sales)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     jamal-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │   │  Repositories  │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │   │ product, sale, │   │  (embedded)  │   │   │
//! │  │   │               │   │ store, category│   │              │   │   │
//! │  │   │ SqlitePool    │◄──│ setting        │   │ 001_init.sql │   │   │
//! │  │   └───────────────┘   └────────────────┘   └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────────┐  ┌────────────────┐  ┌──────────────┐    │   │
//! │  │   │ InventoryLedger│  │ SalesRecorder  │  │   Reports    │    │   │
//! │  │   │ clamped stock, │  │ sale + stock   │  │  (read-only  │    │   │
//! │  │   │ auto-create,   │  │ delta in ONE   │  │ aggregations)│    │   │
//! │  │   │ low stock      │  │ transaction    │  │              │    │   │
//! │  │   └────────────────┘  └────────────────┘  └──────────────┘    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (WAL mode, foreign keys on)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, sale, store, …)
//! - [`ledger`] - The inventory ledger (stock consistency rules)
//! - [`recorder`] - The sales recorder (transactional sale + stock delta)
//! - [`reports`] - Read-only aggregation queries

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod recorder;
pub mod reports;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use ledger::InventoryLedger;
pub use pool::{Database, DbConfig};
pub use recorder::SalesRecorder;
pub use reports::ReportsRepository;

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::setting::SettingRepository;
pub use repository::store::StoreRepository;
pub use repository::EnsureOutcome;
