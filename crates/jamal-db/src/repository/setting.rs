//! # Settings Repository
//!
//! Key/value settings storage.
//!
//! ## Value Encoding
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Settings are stored as strings and surfaced as JSON values:           │
//! │                                                                         │
//! │    stored "true"            → JSON true                                │
//! │    stored "false"           → JSON false                               │
//! │    stored "{\"a\":1}"       → JSON object                              │
//! │    stored "42"              → JSON number                              │
//! │    stored "main"            → JSON string "main"                       │
//! │                                                                         │
//! │  Writing reverses the mapping: JSON strings are stored raw, every      │
//! │  other value is stored as its JSON serialization.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::EnsureOutcome;
use jamal_core::DEFAULT_STORE_ID;

/// The reserved default settings every installation starts with.
pub const DEFAULT_SETTINGS: &[(&str, &str)] = &[
    ("currentStore", DEFAULT_STORE_ID),
    ("defaultStore", DEFAULT_STORE_ID),
    ("enableBarcodeScanning", "true"),
    ("showProfitMargins", "true"),
];

/// Repository for settings storage.
#[derive(Debug, Clone)]
pub struct SettingRepository {
    pool: SqlitePool,
}

impl SettingRepository {
    /// Creates a new SettingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingRepository { pool }
    }

    /// Returns all settings as a JSON object.
    pub async fn all(&self) -> DbResult<Map<String, Value>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT setting_key, setting_value FROM settings")
                .fetch_all(&self.pool)
                .await?;

        let mut settings = Map::new();
        for (key, raw) in rows {
            settings.insert(key, decode_value(&raw));
        }

        Ok(settings)
    }

    /// Gets one setting. `None` when the key is absent.
    pub async fn get(&self, key: &str) -> DbResult<Option<Value>> {
        let raw: Option<String> =
            sqlx::query_scalar("SELECT setting_value FROM settings WHERE setting_key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(raw.map(|r| decode_value(&r)))
    }

    /// Sets a setting, inserting or replacing.
    pub async fn set(&self, key: &str, value: &Value) -> DbResult<()> {
        debug!(key = %key, "Setting value");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO settings (setting_key, setting_value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(setting_key) DO UPDATE SET
                setting_value = excluded.setting_value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(encode_value(value))
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Sets several settings in one call.
    pub async fn set_many(&self, values: &Map<String, Value>) -> DbResult<()> {
        for (key, value) in values {
            self.set(key, value).await?;
        }
        Ok(())
    }

    /// Deletes a setting.
    pub async fn delete(&self, key: &str) -> DbResult<u64> {
        debug!(key = %key, "Deleting setting");

        let result = sqlx::query("DELETE FROM settings WHERE setting_key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Inserts the reserved defaults where absent, never overwriting an
    /// existing value. Returns what each key's outcome was so startup can
    /// log exactly what it wrote.
    pub async fn ensure_defaults(&self) -> DbResult<Vec<(&'static str, EnsureOutcome)>> {
        let now = Utc::now();
        let mut outcomes = Vec::with_capacity(DEFAULT_SETTINGS.len());

        for (key, value) in DEFAULT_SETTINGS {
            let result = sqlx::query(
                r#"
                INSERT INTO settings (setting_key, setting_value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(setting_key) DO NOTHING
                "#,
            )
            .bind(key)
            .bind(value)
            .bind(now)
            .execute(&self.pool)
            .await?;

            let outcome = if result.rows_affected() == 1 {
                EnsureOutcome::Created
            } else {
                EnsureOutcome::AlreadyExists
            };
            outcomes.push((*key, outcome));
        }

        Ok(outcomes)
    }
}

/// Decodes a stored string into its JSON value.
fn decode_value(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        other => serde_json::from_str(other).unwrap_or_else(|_| Value::String(other.to_string())),
    }
}

/// Encodes a JSON value into its stored string.
fn encode_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_value() {
        assert_eq!(decode_value("true"), Value::Bool(true));
        assert_eq!(decode_value("false"), Value::Bool(false));
        assert_eq!(decode_value("42"), json!(42));
        assert_eq!(decode_value(r#"{"stores":["main"]}"#), json!({"stores": ["main"]}));
        assert_eq!(decode_value("main"), Value::String("main".to_string()));
    }

    #[test]
    fn test_encode_value() {
        assert_eq!(encode_value(&Value::Bool(true)), "true");
        assert_eq!(encode_value(&Value::String("main".to_string())), "main");
        assert_eq!(encode_value(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_round_trip() {
        // Write rule then read rule must compose to the identity
        for value in [json!(true), json!("main"), json!(7), json!({"x": [1, 2]})] {
            assert_eq!(decode_value(&encode_value(&value)), value);
        }
    }
}
