//! # Repository Module
//!
//! Database repository implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  REST handler                                                          │
//! │       │                                                                 │
//! │       │  db.products().list("main")                                    │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list(&self, store_id)                                             │
//! │  ├── find_by_barcode(&self, barcode)                                   │
//! │  ├── insert(&self, product)                                            │
//! │  └── update(&self, id, patch)                                          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  The ledger and recorder build the business rules (clamping,           │
//! │  auto-create, transactional sale recording) on top of these.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD and stock primitives
//! - [`sale::SaleRepository`] - Sale row CRUD
//! - [`store::StoreRepository`] - Store CRUD and main-store policy check
//! - [`category::CategoryRepository`] - Category CRUD
//! - [`setting::SettingRepository`] - Key/value settings

pub mod category;
pub mod product;
pub mod sale;
pub mod setting;
pub mod store;

/// Outcome of an idempotent "ensure it exists" write.
///
/// Replaces the legacy insert-or-ignore pattern: seed and default paths
/// report whether they created the row, instead of silently swallowing
/// the conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The row was inserted.
    Created,
    /// A row with this key already existed; nothing was written.
    AlreadyExists,
}

impl EnsureOutcome {
    /// True if the row was created by this call.
    pub fn is_created(&self) -> bool {
        matches!(self, EnsureOutcome::Created)
    }
}
