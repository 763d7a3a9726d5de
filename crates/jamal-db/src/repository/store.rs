//! # Store Repository
//!
//! Database operations for stores.
//!
//! Stores use caller-assigned string ids (`"main"`, `"depot"`, …); the
//! main store row is seeded by the initial migration so products and sales
//! always have a default to reference.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use jamal_core::{MainStorePolicy, Store, StorePatch};

/// Repository for store database operations.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
}

impl StoreRepository {
    /// Creates a new StoreRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StoreRepository { pool }
    }

    /// Lists all stores, main store(s) first, then by name.
    pub async fn list(&self) -> DbResult<Vec<Store>> {
        let stores = sqlx::query_as::<_, Store>(
            r#"
            SELECT id, name, address, phone, is_main, created_at, updated_at
            FROM stores
            ORDER BY is_main DESC, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stores)
    }

    /// Gets a store by ID.
    pub async fn get(&self, id: &str) -> DbResult<Option<Store>> {
        let store = sqlx::query_as::<_, Store>(
            r#"
            SELECT id, name, address, phone, is_main, created_at, updated_at
            FROM stores
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }

    /// Inserts a new store.
    ///
    /// ## Returns
    /// * `Ok(())` - Inserted
    /// * `Err(DbError::UniqueViolation)` - Store id already taken
    pub async fn insert(&self, store: &Store) -> DbResult<()> {
        debug!(id = %store.id, name = %store.name, "Inserting store");

        sqlx::query(
            r#"
            INSERT INTO stores (id, name, address, phone, is_main, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&store.id)
        .bind(&store.name)
        .bind(&store.address)
        .bind(&store.phone)
        .bind(store.is_main)
        .bind(store.created_at)
        .bind(store.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Partially updates a store. `None` fields are left untouched.
    ///
    /// ## Returns
    /// The number of rows updated (0 when the id didn't exist).
    pub async fn update(&self, id: &str, patch: &StorePatch) -> DbResult<u64> {
        debug!(id = %id, "Updating store");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE stores SET
                name = COALESCE(?2, name),
                address = COALESCE(?3, address),
                phone = COALESCE(?4, phone),
                is_main = COALESCE(?5, is_main),
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.address)
        .bind(&patch.phone)
        .bind(patch.is_main)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes a store.
    ///
    /// Fails with a foreign-key violation while products or sales still
    /// reference the store: referential integrity is enforced exactly
    /// where the schema declares it.
    pub async fn delete(&self, id: &str) -> DbResult<u64> {
        debug!(id = %id, "Deleting store");

        let result = sqlx::query("DELETE FROM stores WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Checks the configured main-store policy before a write that would
    /// mark `candidate_id` as main.
    ///
    /// Under [`MainStorePolicy::AllowMultiple`] this always passes (the
    /// legacy behavior). Under [`MainStorePolicy::EnforceSingle`] it is a
    /// conflict if any *other* store is already main.
    pub async fn assert_main_allowed(
        &self,
        policy: MainStorePolicy,
        candidate_id: &str,
    ) -> DbResult<()> {
        if policy == MainStorePolicy::AllowMultiple {
            return Ok(());
        }

        let existing: Option<String> = sqlx::query_scalar(
            "SELECT id FROM stores WHERE is_main = 1 AND id != ?1 LIMIT 1",
        )
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(other) = existing {
            return Err(DbError::duplicate("isMain", other));
        }

        Ok(())
    }
}

/// Helper to generate a store ID when the caller doesn't assign one.
pub fn generate_store_id() -> String {
    Uuid::new_v4().to_string()
}
