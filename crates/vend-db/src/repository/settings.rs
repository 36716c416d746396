//! # Settings Repository
//!
//! Key/value store for small instance-local configuration.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for application settings.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Gets a setting value by key.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM app_settings WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    /// Gets a setting value, falling back to a default.
    pub async fn get_or(&self, key: &str, default: &str) -> DbResult<String> {
        Ok(self.get(key).await?.unwrap_or_else(|| default.to_string()))
    }

    /// Sets a setting value (upsert). `created_at` is preserved on update.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, "Setting app setting");

        let now = Utc::now();

        sqlx::query(
            "INSERT INTO app_settings (key, value, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?3) \
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_get_set_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.settings();

        assert!(repo.get("catalog_base_url").await.unwrap().is_none());
        assert_eq!(repo.get_or("unit", "pcs").await.unwrap(), "pcs");

        repo.set("catalog_base_url", "https://catalog.example").await.unwrap();
        assert_eq!(
            repo.get("catalog_base_url").await.unwrap().as_deref(),
            Some("https://catalog.example")
        );

        // Upsert overwrites
        repo.set("catalog_base_url", "https://other.example").await.unwrap();
        assert_eq!(
            repo.get("catalog_base_url").await.unwrap().as_deref(),
            Some("https://other.example")
        );
    }
}
