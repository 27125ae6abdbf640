//! Menu service implementation.
//!
//! Catalog items customers order from. Prices are integer cents, categories
//! come from the closed [`MenuCategory`] set.

use std::sync::Arc;

use tracing::info;

use crate::auth::Actor;
use crate::dto::{CreateMenuItemRequest, UpdateMenuItemRequest};
use crate::error::{ApiError, ApiResult};
use crate::policy::Operation;
use crate::services::{checked_id, MAX_TEXT_LEN};
use crate::AppState;
use cafe_core::validation::{normalize_optional, validate_name, validate_price_cents};
use cafe_core::{MenuCategory, MenuItem};
use cafe_db::new_id;

/// Longest accepted image URL.
const MAX_URL_LEN: usize = 2048;

/// Menu service.
pub struct MenuService {
    state: Arc<AppState>,
}

impl MenuService {
    pub fn new(state: Arc<AppState>) -> Self {
        MenuService { state }
    }

    /// Lists menu items by category then name.
    pub async fn list(
        &self,
        actor: Option<&Actor>,
        category: Option<MenuCategory>,
        available_only: bool,
    ) -> ApiResult<Vec<MenuItem>> {
        self.state.authorize(actor, Operation::ListMenu)?;
        Ok(self.state.db.menu().list(category, available_only).await?)
    }

    /// The fixed category set, in display order.
    pub fn categories(&self, actor: Option<&Actor>) -> ApiResult<Vec<MenuCategory>> {
        self.state.authorize(actor, Operation::ListCategories)?;
        Ok(MenuCategory::ALL.to_vec())
    }

    pub async fn get(&self, actor: Option<&Actor>, id: &str) -> ApiResult<MenuItem> {
        self.state.authorize(actor, Operation::GetMenuItem)?;
        self.find(id).await
    }

    pub async fn create(&self, actor: Option<&Actor>, req: CreateMenuItemRequest) -> ApiResult<MenuItem> {
        self.state.authorize(actor, Operation::CreateMenuItem)?;

        validate_price_cents("price_cents", req.price_cents)?;
        let item = MenuItem {
            id: new_id(),
            name: validate_name("name", &req.name)?,
            price_cents: req.price_cents,
            category: req.category,
            description: normalize_optional("description", req.description, MAX_TEXT_LEN)?,
            available: req.available,
            image_url: normalize_optional("image_url", req.image_url, MAX_URL_LEN)?,
            created_at: self.state.clock.now(),
        };

        self.state.db.menu().insert(&item).await?;
        info!(id = %item.id, name = %item.name, category = %item.category, "Menu item created");

        Ok(item)
    }

    /// Applies the provided fields; absent fields keep their value.
    pub async fn update(
        &self,
        actor: Option<&Actor>,
        id: &str,
        req: UpdateMenuItemRequest,
    ) -> ApiResult<MenuItem> {
        self.state.authorize(actor, Operation::UpdateMenuItem)?;
        let mut item = self.find(id).await?;

        if let Some(name) = req.name {
            item.name = validate_name("name", &name)?;
        }
        if let Some(price_cents) = req.price_cents {
            validate_price_cents("price_cents", price_cents)?;
            item.price_cents = price_cents;
        }
        if let Some(category) = req.category {
            item.category = category;
        }
        if req.description.is_some() {
            item.description = normalize_optional("description", req.description, MAX_TEXT_LEN)?;
        }
        if let Some(available) = req.available {
            item.available = available;
        }
        if req.image_url.is_some() {
            item.image_url = normalize_optional("image_url", req.image_url, MAX_URL_LEN)?;
        }

        self.state.db.menu().update(&item).await?;
        info!(id = %item.id, "Menu item updated");

        Ok(item)
    }

    /// Deletes the item together with its inventory record.
    pub async fn delete(&self, actor: Option<&Actor>, id: &str) -> ApiResult<()> {
        self.state.authorize(actor, Operation::DeleteMenuItem)?;
        self.state.db.menu().delete(checked_id(id)?).await?;
        info!(id = %id, "Menu item deleted");
        Ok(())
    }

    async fn find(&self, id: &str) -> ApiResult<MenuItem> {
        self.state
            .db
            .menu()
            .get_by_id(checked_id(id)?)
            .await?
            .ok_or_else(|| ApiError::not_found("Menu item", id))
    }
}
