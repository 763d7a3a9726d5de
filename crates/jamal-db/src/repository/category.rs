//! # Category Repository
//!
//! Database operations for product categories.
//!
//! Categories are purely descriptive: products and sale snapshots
//! reference them by name, so deleting a category never touches either.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::EnsureOutcome;
use jamal_core::{Category, CategoryPatch};

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists all categories, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM categories
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Gets a category by its unique name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM categories
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Inserts a new category.
    ///
    /// ## Returns
    /// * `Ok(Category)` - The created row
    /// * `Err(DbError::UniqueViolation)` - Name already exists. User-facing
    ///   writes surface this; they never fall back to insert-or-ignore.
    pub async fn insert(&self, name: &str, description: Option<&str>) -> DbResult<Category> {
        debug!(name = %name, "Inserting category");

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| match DbError::from(err) {
            // Rewrite the raw constraint message into the user-facing
            // conflict: name is the only unique column on categories.
            DbError::UniqueViolation { .. } => DbError::duplicate("name", name),
            other => other,
        })?;

        Ok(category)
    }

    /// Ensures a category exists, reporting whether this call created it.
    ///
    /// The typed outcome replaces the legacy insert-or-ignore on seed
    /// paths: callers can log what was actually written.
    pub async fn ensure(&self, name: &str, description: Option<&str>) -> DbResult<EnsureOutcome> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO categories (id, name, description, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(description)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            Ok(EnsureOutcome::Created)
        } else {
            Ok(EnsureOutcome::AlreadyExists)
        }
    }

    /// Partially updates a category.
    ///
    /// ## Returns
    /// The number of rows updated (0 when the id didn't exist).
    pub async fn update(&self, id: &str, patch: &CategoryPatch) -> DbResult<u64> {
        debug!(id = %id, "Updating category");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE categories SET
                name = COALESCE(?2, name),
                description = COALESCE(?3, description),
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.description)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes a category. Products keep their (now dangling) label.
    pub async fn delete(&self, id: &str) -> DbResult<u64> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
