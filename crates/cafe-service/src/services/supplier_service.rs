//! Supplier service implementation.

use std::sync::Arc;

use tracing::info;

use crate::auth::Actor;
use crate::dto::{CreateSupplierRequest, UpdateSupplierRequest};
use crate::error::{ApiError, ApiResult};
use crate::policy::Operation;
use crate::services::{checked_id, MAX_TEXT_LEN};
use crate::AppState;
use cafe_core::validation::{normalize_optional, validate_email, validate_name, MAX_NAME_LEN};
use cafe_core::Supplier;
use cafe_db::new_id;

/// Longest accepted phone number.
const MAX_PHONE_LEN: usize = 40;

fn normalize_email(email: Option<String>) -> ApiResult<Option<String>> {
    match normalize_optional("email", email, MAX_NAME_LEN)? {
        Some(email) => Ok(Some(validate_email(&email)?)),
        None => Ok(None),
    }
}

/// Supplier service.
pub struct SupplierService {
    state: Arc<AppState>,
}

impl SupplierService {
    pub fn new(state: Arc<AppState>) -> Self {
        SupplierService { state }
    }

    /// Lists suppliers by name.
    pub async fn list(&self, actor: Option<&Actor>) -> ApiResult<Vec<Supplier>> {
        self.state.authorize(actor, Operation::ListSuppliers)?;
        Ok(self.state.db.suppliers().list().await?)
    }

    pub async fn get(&self, actor: Option<&Actor>, id: &str) -> ApiResult<Supplier> {
        self.state.authorize(actor, Operation::GetSupplier)?;
        self.find(id).await
    }

    pub async fn create(&self, actor: Option<&Actor>, req: CreateSupplierRequest) -> ApiResult<Supplier> {
        self.state.authorize(actor, Operation::CreateSupplier)?;

        let supplier = Supplier {
            id: new_id(),
            name: validate_name("name", &req.name)?,
            contact_name: normalize_optional("contact_name", req.contact_name, MAX_NAME_LEN)?,
            email: normalize_email(req.email)?,
            phone: normalize_optional("phone", req.phone, MAX_PHONE_LEN)?,
            address: normalize_optional("address", req.address, MAX_TEXT_LEN)?,
            notes: normalize_optional("notes", req.notes, MAX_TEXT_LEN)?,
            created_at: self.state.clock.now(),
        };

        self.state.db.suppliers().insert(&supplier).await?;
        info!(id = %supplier.id, name = %supplier.name, "Supplier created");

        Ok(supplier)
    }

    /// Applies the provided fields; absent fields keep their value.
    pub async fn update(
        &self,
        actor: Option<&Actor>,
        id: &str,
        req: UpdateSupplierRequest,
    ) -> ApiResult<Supplier> {
        self.state.authorize(actor, Operation::UpdateSupplier)?;
        let mut supplier = self.find(id).await?;

        if let Some(name) = req.name {
            supplier.name = validate_name("name", &name)?;
        }
        if req.contact_name.is_some() {
            supplier.contact_name = normalize_optional("contact_name", req.contact_name, MAX_NAME_LEN)?;
        }
        if req.email.is_some() {
            supplier.email = normalize_email(req.email)?;
        }
        if req.phone.is_some() {
            supplier.phone = normalize_optional("phone", req.phone, MAX_PHONE_LEN)?;
        }
        if req.address.is_some() {
            supplier.address = normalize_optional("address", req.address, MAX_TEXT_LEN)?;
        }
        if req.notes.is_some() {
            supplier.notes = normalize_optional("notes", req.notes, MAX_TEXT_LEN)?;
        }

        self.state.db.suppliers().update(&supplier).await?;
        info!(id = %supplier.id, "Supplier updated");

        Ok(supplier)
    }

    /// Deletes a supplier. Inventory records pointing at it are detached.
    pub async fn delete(&self, actor: Option<&Actor>, id: &str) -> ApiResult<()> {
        self.state.authorize(actor, Operation::DeleteSupplier)?;
        self.state.db.suppliers().delete(checked_id(id)?).await?;
        info!(id = %id, "Supplier deleted");
        Ok(())
    }

    async fn find(&self, id: &str) -> ApiResult<Supplier> {
        self.state
            .db
            .suppliers()
            .get_by_id(checked_id(id)?)
            .await?
            .ok_or_else(|| ApiError::not_found("Supplier", id))
    }
}
