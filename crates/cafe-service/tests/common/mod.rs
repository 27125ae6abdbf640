//! Shared harness for the service integration tests.
//!
//! Every test gets its own in-memory database, a clock pinned to
//! 2025-03-01 09:00 UTC and three accounts (staff, manager, admin).

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, TimeZone, Utc};
use tracing_subscriber::EnvFilter;

use cafe_core::{LineItem, MenuCategory, MenuItem, Role, SelectedModifier, User};
use cafe_db::{new_id, Database, DbConfig};
use cafe_service::auth::hash_password;
use cafe_service::dto::{CreateBillRequest, CreateMenuItemRequest};
use cafe_service::services::{
    BillService, ConfigService, InventoryService, MenuService, ModifierService, ReportService, SupplierService,
    UserService,
};
use cafe_service::{Actor, AppState, FixedClock, ServiceConfig};

pub const PASSWORD: &str = "correct-horse";

pub struct TestApp {
    pub state: Arc<AppState>,
    pub clock: Arc<FixedClock>,
    pub staff: Actor,
    pub manager: Actor,
    pub admin: Actor,
}

/// Routes `tracing` output through the test writer. `RUST_LOG=debug` shows it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
}

/// Test configuration: built-in policy, default 24h tokens, 23% tax.
pub fn test_config(extra: &[(&str, &str)]) -> ServiceConfig {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("CAFE_JWT_SECRET".to_string(), "integration-test-secret".to_string()),
        ("CAFE_DEFAULT_TAX_PERCENT".to_string(), "23".to_string()),
    ]);
    for (key, value) in extra {
        vars.insert(key.to_string(), value.to_string());
    }
    ServiceConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

pub async fn setup() -> TestApp {
    setup_with(test_config(&[])).await
}

pub async fn setup_with(config: ServiceConfig) -> TestApp {
    init_tracing();

    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let clock = Arc::new(FixedClock::new(at(1, 9)));
    let state = AppState::new(db, config, clock.clone());

    let staff = seed_user(&state, "sam@cafe.pt", "Sam", Role::Staff).await;
    let manager = seed_user(&state, "mia@cafe.pt", "Mia", Role::Manager).await;
    let admin = seed_user(&state, "ada@cafe.pt", "Ada", Role::Admin).await;

    TestApp {
        state,
        clock,
        staff,
        manager,
        admin,
    }
}

/// One argon2 hash shared by every seeded account.
fn password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(PASSWORD).unwrap()).clone()
}

async fn seed_user(state: &Arc<AppState>, email: &str, name: &str, role: Role) -> Actor {
    let user = User {
        id: new_id(),
        email: email.to_string(),
        name: name.to_string(),
        role,
        password_hash: password_hash(),
        is_active: true,
        created_at: at(1, 8),
    };
    state.db.users().insert(&user).await.unwrap();
    Actor::from(&user)
}

impl TestApp {
    pub fn menu(&self) -> MenuService {
        MenuService::new(self.state.clone())
    }

    pub fn modifiers(&self) -> ModifierService {
        ModifierService::new(self.state.clone())
    }

    pub fn suppliers(&self) -> SupplierService {
        SupplierService::new(self.state.clone())
    }

    pub fn inventory(&self) -> InventoryService {
        InventoryService::new(self.state.clone())
    }

    pub fn bills(&self) -> BillService {
        BillService::new(self.state.clone())
    }

    pub fn reports(&self) -> ReportService {
        ReportService::new(self.state.clone())
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.state.clone())
    }

    pub fn settings(&self) -> ConfigService {
        ConfigService::new(self.state.clone())
    }

    pub async fn menu_item(&self, name: &str, price_cents: i64, category: MenuCategory) -> MenuItem {
        self.menu()
            .create(
                Some(&self.staff),
                CreateMenuItemRequest {
                    name: name.to_string(),
                    price_cents,
                    category,
                    description: None,
                    available: true,
                    image_url: None,
                },
            )
            .await
            .unwrap()
    }
}

pub fn line(name: &str, unit_price_cents: i64, quantity: i64) -> LineItem {
    LineItem {
        menu_item_id: new_id(),
        name: name.to_string(),
        unit_price_cents,
        quantity,
        modifiers: vec![],
    }
}

pub fn with_modifier(mut item: LineItem, option_name: &str, price_adjustment_cents: i64) -> LineItem {
    item.modifiers.push(SelectedModifier {
        modifier_name: "Extras".to_string(),
        option_name: option_name.to_string(),
        price_adjustment_cents,
    });
    item
}

pub fn bill_request(items: Vec<LineItem>, discount_percent: f64, tax_percent: f64) -> CreateBillRequest {
    CreateBillRequest {
        items,
        discount_percent,
        tax_percent: Some(tax_percent),
        customer_name: None,
        table_number: None,
        nif: None,
        currency: None,
    }
}
