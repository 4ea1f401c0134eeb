//! Key-value settings persistence.
//!
//! A single `settings` table keyed by name holds the durable configuration
//! values, most importantly the current gold price. Writes are idempotent
//! upserts; concurrent writers resolve by last-write-wins on the key.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::Row;
use tracing::debug;

use crate::db::DbPool;
use crate::sql;

/// Settings key holding the durable gold price.
pub const GOLD_PRICE_KEY: &str = "goldPrice";

/// A stored settings row.
#[derive(Debug, Clone)]
pub struct SettingEntry {
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Database-backed store for named settings values.
pub struct SettingsStore {
    pool: DbPool,
}

impl SettingsStore {
    /// Create a new store using the given database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a setting with its update timestamp.
    ///
    /// An absent key is `Ok(None)`; only a store failure is an error.
    pub async fn entry(&self, key: &str) -> Result<Option<SettingEntry>> {
        let row = sqlx::query(sql::SELECT_SETTING)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to query setting")?;

        let entry = match row {
            Some(row) => Some(SettingEntry {
                value: row.get("value"),
                updated_at: DateTime::parse_from_rfc3339(row.get("updated_at"))
                    .context("Invalid updated_at timestamp")?
                    .with_timezone(&Utc),
            }),
            None => None,
        };

        Ok(entry)
    }

    /// Get a setting value.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entry(key).await?.map(|e| e.value))
    }

    /// Insert or overwrite a setting (last-write-wins on the key).
    pub async fn upsert(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(sql::UPSERT_SETTING)
            .bind(key)
            .bind(value)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .context("Failed to upsert setting")?;

        debug!(key, "Setting upserted");
        Ok(())
    }

    /// The stored gold price, if set and numeric.
    pub async fn gold_price(&self) -> Result<Option<Decimal>> {
        Ok(self
            .get(GOLD_PRICE_KEY)
            .await?
            .and_then(|v| v.trim().parse().ok()))
    }

    /// Store the gold price.
    pub async fn set_gold_price(&self, price: Decimal) -> Result<()> {
        self.upsert(GOLD_PRICE_KEY, &price.to_string()).await
    }
}
