//! Document repository over the SQLite store.
//!
//! Reads return `None` (not an error) for absent records; writes replace
//! the whole document. All merge logic lives in the synchronizer.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{LinkConfig, Settings};

/// Key of the singleton runtime configuration document.
const CONFIG_KEY: &str = "general";

/// Document repository for settings and runtime configuration.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user's settings document, or `None` if no record exists.
    pub async fn get_settings(&self, user_id: &str) -> Result<Option<Settings>, AppError> {
        let row = sqlx::query("SELECT document FROM settings WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            let document: String = row.get("document");
            serde_json::from_str(&document)
                .map_err(|e| AppError::Database(format!("Corrupt settings document: {}", e)))
        })
        .transpose()
    }

    /// Replace a user's settings document as a whole.
    pub async fn set_settings(&self, user_id: &str, settings: &Settings) -> Result<(), AppError> {
        let document = serde_json::to_string(settings)
            .map_err(|e| AppError::Internal(format!("Failed to encode settings: {}", e)))?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO settings (user_id, document, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET document = excluded.document, updated_at = excluded.updated_at",
        )
        .bind(user_id)
        .bind(&document)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get the runtime configuration document, or `None` if not yet seeded.
    pub async fn get_link_config(&self) -> Result<Option<LinkConfig>, AppError> {
        let row = sqlx::query("SELECT document FROM link_config WHERE id = ?")
            .bind(CONFIG_KEY)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            let document: String = row.get("document");
            serde_json::from_str(&document)
                .map_err(|e| AppError::Database(format!("Corrupt config document: {}", e)))
        })
        .transpose()
    }

    /// Replace the runtime configuration document as a whole.
    pub async fn set_link_config(&self, config: &LinkConfig) -> Result<(), AppError> {
        let document = serde_json::to_string(config)
            .map_err(|e| AppError::Internal(format!("Failed to encode config: {}", e)))?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO link_config (id, document, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET document = excluded.document, updated_at = excluded.updated_at",
        )
        .bind(CONFIG_KEY)
        .bind(&document)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use crate::models::LinkedAccount;
    use tempfile::TempDir;

    async fn test_repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pool = init_database(&temp_dir.path().join("test.sqlite"))
            .await
            .expect("Failed to init DB");
        (Repository::new(pool), temp_dir)
    }

    #[tokio::test]
    async fn test_settings_absent_is_none() {
        let (repo, _tmp) = test_repo().await;
        assert!(repo.get_settings("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_settings_roundtrip_replaces_whole_document() {
        let (repo, _tmp) = test_repo().await;

        let first = Settings {
            linked_accounts: vec![LinkedAccount {
                id: "a".to_string(),
                username: "alpha".to_string(),
                discriminator: "0001".to_string(),
            }],
        };
        repo.set_settings("user-1", &first).await.unwrap();
        assert_eq!(repo.get_settings("user-1").await.unwrap(), Some(first));

        let second = Settings::default();
        repo.set_settings("user-1", &second).await.unwrap();
        assert_eq!(repo.get_settings("user-1").await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_link_config_singleton_roundtrip() {
        let (repo, _tmp) = test_repo().await;
        assert!(repo.get_link_config().await.unwrap().is_none());

        let config = LinkConfig {
            guild_ids: vec!["g1".to_string()],
            admin_ids: vec!["admin".to_string()],
            member_role_id: "role".to_string(),
        };
        repo.set_link_config(&config).await.unwrap();
        assert_eq!(repo.get_link_config().await.unwrap(), Some(config));
    }
}
