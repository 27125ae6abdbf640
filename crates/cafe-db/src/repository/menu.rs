//! # Menu Repository
//!
//! Database operations for menu items.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use cafe_core::{MenuCategory, MenuItem};

/// Repository for menu item database operations.
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    pub fn new(pool: SqlitePool) -> Self {
        MenuRepository { pool }
    }

    /// Lists menu items ordered by category then name.
    ///
    /// ## Arguments
    /// * `category` - Only this category when given
    /// * `available_only` - Skip items marked unavailable
    pub async fn list(&self, category: Option<MenuCategory>, available_only: bool) -> DbResult<Vec<MenuItem>> {
        debug!(?category, available_only, "Listing menu items");

        let items = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT id, name, price_cents, category, description, available, image_url, created_at
            FROM menu_items
            WHERE (?1 IS NULL OR category = ?1)
              AND (?2 = 0 OR available = 1)
            ORDER BY category, name
            "#,
        )
        .bind(category)
        .bind(available_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT id, name, price_cents, category, description, available, image_url, created_at
            FROM menu_items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn insert(&self, item: &MenuItem) -> DbResult<()> {
        debug!(id = %item.id, name = %item.name, "Inserting menu item");

        sqlx::query(
            r#"
            INSERT INTO menu_items (
                id, name, price_cents, category, description, available, image_url, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(item.price_cents)
        .bind(item.category)
        .bind(&item.description)
        .bind(item.available)
        .bind(&item.image_url)
        .bind(item.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Writes every mutable column of an existing item.
    pub async fn update(&self, item: &MenuItem) -> DbResult<()> {
        debug!(id = %item.id, "Updating menu item");

        let result = sqlx::query(
            r#"
            UPDATE menu_items SET
                name = ?2,
                price_cents = ?3,
                category = ?4,
                description = ?5,
                available = ?6,
                image_url = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(item.price_cents)
        .bind(item.category)
        .bind(&item.description)
        .bind(item.available)
        .bind(&item.image_url)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Menu item", &item.id));
        }

        Ok(())
    }

    /// Deletes a menu item. Its inventory record goes with it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting menu item");

        let result = sqlx::query("DELETE FROM menu_items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Menu item", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::new_id;
    use crate::repository::test_support::{at, database};

    fn item(name: &str, category: MenuCategory, available: bool) -> MenuItem {
        MenuItem {
            id: new_id(),
            name: name.to_string(),
            price_cents: 250,
            category,
            description: None,
            available,
            image_url: None,
            created_at: at(1, 8),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = database().await;
        let espresso = item("Espresso", MenuCategory::Coffee, true);
        db.menu().insert(&espresso).await.unwrap();

        let loaded = db.menu().get_by_id(&espresso.id).await.unwrap().unwrap();
        assert_eq!(loaded, espresso);
        assert!(db.menu().get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters() {
        let db = database().await;
        let repo = db.menu();
        repo.insert(&item("Espresso", MenuCategory::Coffee, true)).await.unwrap();
        repo.insert(&item("Flat White", MenuCategory::Coffee, false)).await.unwrap();
        repo.insert(&item("Green Tea", MenuCategory::Tea, true)).await.unwrap();

        assert_eq!(repo.list(None, false).await.unwrap().len(), 3);
        assert_eq!(repo.list(None, true).await.unwrap().len(), 2);

        let coffee = repo.list(Some(MenuCategory::Coffee), false).await.unwrap();
        let names: Vec<&str> = coffee.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Espresso", "Flat White"]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = database().await;
        let repo = db.menu();
        let mut latte = item("Latte", MenuCategory::Coffee, true);
        repo.insert(&latte).await.unwrap();

        latte.price_cents = 375;
        latte.available = false;
        repo.update(&latte).await.unwrap();
        assert_eq!(repo.get_by_id(&latte.id).await.unwrap().unwrap().price_cents, 375);

        repo.delete(&latte.id).await.unwrap();
        assert!(matches!(repo.delete(&latte.id).await, Err(DbError::NotFound { .. })));
    }
}
