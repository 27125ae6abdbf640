//! Modifier service implementation.
//!
//! A modifier is one customisation axis ("Size", "Milk") with named options
//! carrying signed price adjustments. The bill keeps its own copy of the
//! chosen options, so editing a modifier never changes past bills.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use crate::auth::Actor;
use crate::dto::{CreateModifierRequest, UpdateModifierRequest};
use crate::error::{ApiError, ApiResult};
use crate::policy::Operation;
use crate::services::checked_id;
use crate::AppState;
use cafe_core::validation::validate_name;
use cafe_core::{Modifier, ModifierOption, ValidationError};
use cafe_db::new_id;

/// Modifier service.
pub struct ModifierService {
    state: Arc<AppState>,
}

/// Names every option and rejects empty or repeated option lists.
fn validate_options(options: Vec<ModifierOption>) -> ApiResult<Vec<ModifierOption>> {
    if options.is_empty() {
        return Err(ValidationError::Required {
            field: "options".to_string(),
        }
        .into());
    }

    let mut seen = HashSet::new();
    options
        .into_iter()
        .map(|option| {
            let name = validate_name("options.name", &option.name)?;
            if !seen.insert(name.to_lowercase()) {
                return Err(ApiError::validation(format!("Duplicate option '{}'", name)));
            }
            Ok(ModifierOption {
                name,
                price_adjustment_cents: option.price_adjustment_cents,
            })
        })
        .collect()
}

impl ModifierService {
    pub fn new(state: Arc<AppState>) -> Self {
        ModifierService { state }
    }

    pub async fn list(&self, actor: Option<&Actor>) -> ApiResult<Vec<Modifier>> {
        self.state.authorize(actor, Operation::ListModifiers)?;
        Ok(self.state.db.modifiers().list().await?)
    }

    pub async fn get(&self, actor: Option<&Actor>, id: &str) -> ApiResult<Modifier> {
        self.state.authorize(actor, Operation::GetModifier)?;
        self.find(id).await
    }

    pub async fn create(&self, actor: Option<&Actor>, req: CreateModifierRequest) -> ApiResult<Modifier> {
        self.state.authorize(actor, Operation::CreateModifier)?;

        let modifier = Modifier {
            id: new_id(),
            name: validate_name("name", &req.name)?,
            options: validate_options(req.options)?,
            applies_to: req.applies_to,
            required: req.required,
            created_at: self.state.clock.now(),
        };

        self.state.db.modifiers().insert(&modifier).await?;
        info!(id = %modifier.id, name = %modifier.name, options = modifier.options.len(), "Modifier created");

        Ok(modifier)
    }

    pub async fn update(
        &self,
        actor: Option<&Actor>,
        id: &str,
        req: UpdateModifierRequest,
    ) -> ApiResult<Modifier> {
        self.state.authorize(actor, Operation::UpdateModifier)?;
        let mut modifier = self.find(id).await?;

        if let Some(name) = req.name {
            modifier.name = validate_name("name", &name)?;
        }
        if let Some(options) = req.options {
            modifier.options = validate_options(options)?;
        }
        if let Some(applies_to) = req.applies_to {
            modifier.applies_to = applies_to;
        }
        if let Some(required) = req.required {
            modifier.required = required;
        }

        self.state.db.modifiers().update(&modifier).await?;
        info!(id = %modifier.id, "Modifier updated");

        Ok(modifier)
    }

    pub async fn delete(&self, actor: Option<&Actor>, id: &str) -> ApiResult<()> {
        self.state.authorize(actor, Operation::DeleteModifier)?;
        self.state.db.modifiers().delete(checked_id(id)?).await?;
        info!(id = %id, "Modifier deleted");
        Ok(())
    }

    async fn find(&self, id: &str) -> ApiResult<Modifier> {
        self.state
            .db
            .modifiers()
            .get_by_id(checked_id(id)?)
            .await?
            .ok_or_else(|| ApiError::not_found("Modifier", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(name: &str, cents: i64) -> ModifierOption {
        ModifierOption {
            name: name.to_string(),
            price_adjustment_cents: cents,
        }
    }

    #[test]
    fn test_options_trimmed_and_signed() {
        let options = validate_options(vec![option(" Small ", -30), option("Large", 50)]).unwrap();
        assert_eq!(options[0], option("Small", -30));
        assert_eq!(options[1].price_adjustment_cents, 50);
    }

    #[test]
    fn test_options_rejected() {
        assert!(validate_options(vec![]).is_err());
        assert!(validate_options(vec![option("Oat", 40), option("oat", 40)]).is_err());
        assert!(validate_options(vec![option("  ", 0)]).is_err());
    }
}
