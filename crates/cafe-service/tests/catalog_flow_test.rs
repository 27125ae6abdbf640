mod common;

use cafe_core::{MenuCategory, ModifierOption};
use cafe_service::dto::{
    CreateModifierRequest, CreateSupplierRequest, UpdateMenuItemRequest, UpdateModifierRequest, UpdateSupplierRequest,
};
use cafe_service::ErrorCode;
use common::setup;

fn option(name: &str, cents: i64) -> ModifierOption {
    ModifierOption {
        name: name.to_string(),
        price_adjustment_cents: cents,
    }
}

#[tokio::test]
async fn menu_partial_update_keeps_other_fields() {
    let app = setup().await;
    let latte = app.menu_item("Latte", 450, MenuCategory::Coffee).await;

    let updated = app
        .menu()
        .update(
            Some(&app.staff),
            &latte.id,
            UpdateMenuItemRequest {
                price_cents: Some(475),
                available: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Latte");
    assert_eq!(updated.category, MenuCategory::Coffee);
    assert_eq!(updated.price_cents, 475);
    assert!(!updated.available);

    assert_eq!(app.menu().get(None, &latte.id).await.unwrap(), updated);
}

#[tokio::test]
async fn menu_filters_and_categories() {
    let app = setup().await;
    let latte = app.menu_item("Latte", 450, MenuCategory::Coffee).await;
    app.menu_item("Scone", 250, MenuCategory::Pastries).await;
    app.menu()
        .update(
            Some(&app.staff),
            &latte.id,
            UpdateMenuItemRequest {
                available: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(app.menu().list(None, None, false).await.unwrap().len(), 2);
    assert_eq!(app.menu().list(None, None, true).await.unwrap().len(), 1);
    assert_eq!(
        app.menu().list(None, Some(MenuCategory::Coffee), false).await.unwrap()[0].id,
        latte.id
    );

    let categories = app.menu().categories(None).unwrap();
    assert_eq!(categories.len(), 23);
    assert_eq!(categories[0], MenuCategory::Coffee);
}

#[tokio::test]
async fn menu_writes_need_staff_and_valid_input() {
    let app = setup().await;
    let latte = app.menu_item("Latte", 450, MenuCategory::Coffee).await;

    let err = app.menu().delete(None, &latte.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);

    let err = app
        .menu()
        .update(
            Some(&app.staff),
            &latte.id,
            UpdateMenuItemRequest {
                price_cents: Some(-1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    app.menu().delete(Some(&app.staff), &latte.id).await.unwrap();
    let err = app.menu().get(None, &latte.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn modifier_lifecycle() {
    let app = setup().await;
    let modifiers = app.modifiers();

    let size = modifiers
        .create(
            Some(&app.staff),
            CreateModifierRequest {
                name: "Size".to_string(),
                options: vec![option("Small", -30), option("Regular", 0), option("Large", 50)],
                applies_to: vec![MenuCategory::Coffee, MenuCategory::Tea],
                required: true,
            },
        )
        .await
        .unwrap();
    assert!(size.applies_to_category(MenuCategory::Tea));
    assert!(!size.applies_to_category(MenuCategory::Soups));

    let updated = modifiers
        .update(
            Some(&app.staff),
            &size.id,
            UpdateModifierRequest {
                options: Some(vec![option("Regular", 0), option("Large", 60)]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Size");
    assert_eq!(updated.option("Large").map(|o| o.price_adjustment_cents), Some(60));

    assert_eq!(modifiers.get(None, &size.id).await.unwrap(), updated);
    assert_eq!(modifiers.list(None).await.unwrap().len(), 1);

    modifiers.delete(Some(&app.staff), &size.id).await.unwrap();
    assert!(modifiers.list(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn modifier_without_options_rejected() {
    let app = setup().await;
    let err = app
        .modifiers()
        .create(
            Some(&app.staff),
            CreateModifierRequest {
                name: "Milk".to_string(),
                options: vec![],
                applies_to: vec![],
                required: false,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn supplier_lifecycle() {
    let app = setup().await;
    let suppliers = app.suppliers();

    let created = suppliers
        .create(
            Some(&app.staff),
            CreateSupplierRequest {
                name: "Padaria Central".to_string(),
                contact_name: Some("João".to_string()),
                email: Some("Encomendas@Padaria.PT".to_string()),
                phone: Some("+351 210 000 000".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(created.email.as_deref(), Some("encomendas@padaria.pt"));

    let updated = suppliers
        .update(
            Some(&app.staff),
            &created.id,
            UpdateSupplierRequest {
                phone: Some("999-999-9999".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Padaria Central");
    assert_eq!(updated.phone.as_deref(), Some("999-999-9999"));
    assert_eq!(updated.contact_name.as_deref(), Some("João"));

    let err = suppliers
        .create(
            Some(&app.staff),
            CreateSupplierRequest {
                name: "Bad mail".to_string(),
                email: Some("not-an-email".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    suppliers.delete(Some(&app.staff), &created.id).await.unwrap();
    assert!(suppliers.list(None).await.unwrap().is_empty());
}
