mod common;

use cafe_core::ThemeConfig;
use cafe_service::ErrorCode;
use common::setup;

fn ocean_blue() -> ThemeConfig {
    ThemeConfig {
        name: "Ocean Blue".to_string(),
        primary_color: "#1e3a5f".to_string(),
        accent_color: "#0EA5E9".to_string(),
        background_color: "#F0F9FF".to_string(),
        card_color: "#FFFFFF".to_string(),
        text_color: "#1E3A5F".to_string(),
        muted_color: "#64748B".to_string(),
        border_color: "#E2E8F0".to_string(),
        success_color: "#3F6212".to_string(),
        error_color: "#991B1B".to_string(),
    }
}

#[tokio::test]
async fn fresh_store_serves_default_theme() {
    let app = setup().await;

    let theme = app.settings().get_theme(None).await.unwrap();
    assert_eq!(theme, ThemeConfig::espresso_crema());
    assert_eq!(theme.name, "Espresso & Crema");
    assert_eq!(theme.primary_color, "#2C1A1D");
}

#[tokio::test]
async fn update_persists_and_reset_restores() {
    let app = setup().await;
    let settings = app.settings();

    let saved = settings.update_theme(Some(&app.manager), ocean_blue()).await.unwrap();
    assert_eq!(saved.primary_color, "#1E3A5F");

    let read_back = settings.get_theme(None).await.unwrap();
    assert_eq!(read_back, saved);
    assert_eq!(read_back.name, "Ocean Blue");

    let reset = settings.reset_theme(Some(&app.manager)).await.unwrap();
    assert_eq!(reset.name, "Espresso & Crema");
    assert_eq!(settings.get_theme(None).await.unwrap(), ThemeConfig::espresso_crema());
}

#[tokio::test]
async fn theme_changes_need_a_manager() {
    let app = setup().await;
    let settings = app.settings();

    let err = settings.update_theme(None, ocean_blue()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);

    let err = settings.update_theme(Some(&app.staff), ocean_blue()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Forbidden);

    let err = settings.reset_theme(Some(&app.staff)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Forbidden);

    assert!(settings.update_theme(Some(&app.admin), ocean_blue()).await.is_ok());
}

#[tokio::test]
async fn malformed_colour_leaves_theme_untouched() {
    let app = setup().await;
    let settings = app.settings();

    let mut theme = ocean_blue();
    theme.accent_color = "sky blue".to_string();
    let err = settings.update_theme(Some(&app.manager), theme).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert!(err.message.contains("accent_color"));

    assert_eq!(settings.get_theme(None).await.unwrap(), ThemeConfig::espresso_crema());
}
