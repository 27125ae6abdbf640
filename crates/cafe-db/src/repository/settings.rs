//! # Settings Repository
//!
//! Store-wide settings kept as JSON under a fixed key. Only the theme lives
//! here today.
//!
//! ```text
//! settings
//! ┌──────────┬──────────────────────────────┬──────────────────────┐
//! │ key      │ value (JSON)                 │ updated_at           │
//! ├──────────┼──────────────────────────────┼──────────────────────┤
//! │ theme    │ {"name":"Espresso & Crema",…}│ 2025-03-01T09:00:00Z │
//! └──────────┴──────────────────────────────┴──────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use cafe_core::ThemeConfig;

const THEME_KEY: &str = "theme";

/// Repository for store settings.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// The stored theme, or `None` when none was ever saved.
    pub async fn get_theme(&self) -> DbResult<Option<ThemeConfig>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?1")
            .bind(THEME_KEY)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value.map(|json| serde_json::from_str(&json)).transpose()?)
    }

    /// Stores the theme, replacing any previous one.
    pub async fn save_theme(&self, theme: &ThemeConfig, at: DateTime<Utc>) -> DbResult<()> {
        debug!(name = %theme.name, "Saving theme");

        sqlx::query(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(THEME_KEY)
        .bind(serde_json::to_string(theme)?)
        .bind(at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
