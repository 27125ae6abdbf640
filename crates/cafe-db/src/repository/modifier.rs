//! # Modifier Repository
//!
//! Database operations for modifiers. Option lists and category scopes are
//! stored as JSON text columns.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use cafe_core::{MenuCategory, Modifier, ModifierOption};

/// Row shape of the `modifiers` table.
#[derive(Debug, sqlx::FromRow)]
struct ModifierRecord {
    id: String,
    name: String,
    options: String,
    applies_to: String,
    required: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<ModifierRecord> for Modifier {
    type Error = DbError;

    fn try_from(record: ModifierRecord) -> DbResult<Self> {
        let options: Vec<ModifierOption> = serde_json::from_str(&record.options)?;
        let applies_to: Vec<MenuCategory> = serde_json::from_str(&record.applies_to)?;
        Ok(Modifier {
            id: record.id,
            name: record.name,
            options,
            applies_to,
            required: record.required,
            created_at: record.created_at,
        })
    }
}

/// Repository for modifier database operations.
#[derive(Debug, Clone)]
pub struct ModifierRepository {
    pool: SqlitePool,
}

impl ModifierRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ModifierRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<Modifier>> {
        let records = sqlx::query_as::<_, ModifierRecord>(
            r#"
            SELECT id, name, options, applies_to, required, created_at
            FROM modifiers
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        records.into_iter().map(Modifier::try_from).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Modifier>> {
        let record = sqlx::query_as::<_, ModifierRecord>(
            r#"
            SELECT id, name, options, applies_to, required, created_at
            FROM modifiers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        record.map(Modifier::try_from).transpose()
    }

    pub async fn insert(&self, modifier: &Modifier) -> DbResult<()> {
        debug!(id = %modifier.id, name = %modifier.name, "Inserting modifier");

        sqlx::query(
            r#"
            INSERT INTO modifiers (id, name, options, applies_to, required, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&modifier.id)
        .bind(&modifier.name)
        .bind(serde_json::to_string(&modifier.options)?)
        .bind(serde_json::to_string(&modifier.applies_to)?)
        .bind(modifier.required)
        .bind(modifier.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update(&self, modifier: &Modifier) -> DbResult<()> {
        debug!(id = %modifier.id, "Updating modifier");

        let result = sqlx::query(
            r#"
            UPDATE modifiers SET
                name = ?2,
                options = ?3,
                applies_to = ?4,
                required = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&modifier.id)
        .bind(&modifier.name)
        .bind(serde_json::to_string(&modifier.options)?)
        .bind(serde_json::to_string(&modifier.applies_to)?)
        .bind(modifier.required)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Modifier", &modifier.id));
        }

        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting modifier");

        let result = sqlx::query("DELETE FROM modifiers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Modifier", id));
        }

        Ok(())
    }
}
