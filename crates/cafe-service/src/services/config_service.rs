//! Config service implementation.
//!
//! Store-wide settings. Today that is the back-office theme: read by
//! anyone, replaced or reset by a manager.

use std::sync::Arc;

use tracing::info;

use crate::auth::Actor;
use crate::error::ApiResult;
use crate::policy::Operation;
use crate::AppState;
use cafe_core::validation::validate_theme;
use cafe_core::ThemeConfig;

/// Config service.
pub struct ConfigService {
    state: Arc<AppState>,
}

impl ConfigService {
    pub fn new(state: Arc<AppState>) -> Self {
        ConfigService { state }
    }

    /// The saved theme, or the default scheme if none was ever saved.
    pub async fn get_theme(&self, actor: Option<&Actor>) -> ApiResult<ThemeConfig> {
        self.state.authorize(actor, Operation::GetTheme)?;
        Ok(self.state.db.settings().get_theme().await?.unwrap_or_default())
    }

    /// Replaces the whole theme. Colours are stored upper-cased.
    pub async fn update_theme(&self, actor: Option<&Actor>, theme: ThemeConfig) -> ApiResult<ThemeConfig> {
        self.state.authorize(actor, Operation::UpdateTheme)?;

        let theme = validate_theme(&theme)?;
        self.state.db.settings().save_theme(&theme, self.state.clock.now()).await?;
        info!(name = %theme.name, primary = %theme.primary_color, "Theme updated");

        Ok(theme)
    }

    /// Restores and persists the default scheme.
    pub async fn reset_theme(&self, actor: Option<&Actor>) -> ApiResult<ThemeConfig> {
        self.state.authorize(actor, Operation::ResetTheme)?;

        let theme = ThemeConfig::espresso_crema();
        self.state.db.settings().save_theme(&theme, self.state.clock.now()).await?;
        info!(name = %theme.name, "Theme reset to default");

        Ok(theme)
    }
}
