//! # jamal-core: Pure Business Logic for the Quincaillerie Jamal backend
//!
//! This crate is the **heart** of the store management system. It contains
//! the domain types and business rules as pure code with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Quincaillerie Jamal Architecture                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Dashboard SPA (out of scope)                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ REST (JSON)                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/server (axum)                           │   │
//! │  │    /inventory, /sales, /stores, /categories, /settings         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ jamal-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   money   │  │ validation│                  │   │
//! │  │   │  Product  │  │   Money   │  │   rules   │                  │   │
//! │  │   │   Sale    │  │ centimes  │  │  checks   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    jamal-db (Database Layer)                    │   │
//! │  │       SQLite: repositories, inventory ledger, sales recorder    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Store, Category, reports)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Validation error types
//! - [`validation`] - Business rule validation

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ValidationError, ValidationResult};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Identifier of the store everything defaults to.
///
/// The main store row is created by the initial migration, so this id can
/// always be referenced.
pub const DEFAULT_STORE_ID: &str = "main";

/// Category applied to products created without one.
pub const DEFAULT_CATEGORY: &str = "Autres";

/// Category applied to products the ledger auto-creates when a sale names
/// something that was never stocked.
pub const UNCATEGORIZED: &str = "Non catégorisé";

/// Default low-stock threshold for new products.
pub const DEFAULT_MIN_STOCK: i64 = 5;

/// Maximum quantity accepted on a single sale line.
///
/// Prevents accidental over-entry (e.g. typing 1000 instead of 10).
pub const MAX_SALE_QUANTITY: i64 = 9999;
