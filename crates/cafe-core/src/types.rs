//! # Domain Types
//!
//! Core domain types used throughout the café back office.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    MenuItem     │   │      Bill       │   │    Modifier     │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │        │
//! │  │  name           │   │  bill_number    │   │  options[]      │        │
//! │  │  price_cents    │   │  items[] (snap) │   │  applies_to[]   │        │
//! │  │  category       │   │  total_cents    │   │  required       │        │
//! │  └────────┬────────┘   └─────────────────┘   └─────────────────┘        │
//! │           │ 1:1                                                         │
//! │  ┌────────▼────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │  InventoryItem  │──►│StockTransaction │   │    Supplier     │        │
//! │  │  current_stock  │1:N│  previous/new   │   │  contact info   │        │
//! │  │  min/max levels │   │  append-only    │   └─────────────────┘        │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │      User       │   │      Role       │  staff < manager < admin     │
//! │  │  password_hash  │   │  rank()         │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A bill copies each line's name, unit price and selected modifier deltas at
//! the moment it is created. Editing or deleting the menu item afterwards never
//! changes a stored bill.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{Money, Percent};

// =============================================================================
// Menu Category
// =============================================================================

/// The closed set of menu sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum MenuCategory {
    Coffee,
    Tea,
    Pastries,
    Snacks,
    Beverages,
    Breakfast,
    Lunch,
    Desserts,
    Sandwiches,
    Smoothies,
    Starters,
    Mains,
    Steaks,
    Seafood,
    Vegetarian,
    Salads,
    Sides,
    Soups,
    Beers,
    Wines,
    Pizza,
    Pasta,
    Burgers,
}

impl MenuCategory {
    /// Every category, in menu display order.
    pub const ALL: [MenuCategory; 23] = [
        MenuCategory::Coffee,
        MenuCategory::Tea,
        MenuCategory::Pastries,
        MenuCategory::Snacks,
        MenuCategory::Beverages,
        MenuCategory::Breakfast,
        MenuCategory::Lunch,
        MenuCategory::Desserts,
        MenuCategory::Sandwiches,
        MenuCategory::Smoothies,
        MenuCategory::Starters,
        MenuCategory::Mains,
        MenuCategory::Steaks,
        MenuCategory::Seafood,
        MenuCategory::Vegetarian,
        MenuCategory::Salads,
        MenuCategory::Sides,
        MenuCategory::Soups,
        MenuCategory::Beers,
        MenuCategory::Wines,
        MenuCategory::Pizza,
        MenuCategory::Pasta,
        MenuCategory::Burgers,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            MenuCategory::Coffee => "Coffee",
            MenuCategory::Tea => "Tea",
            MenuCategory::Pastries => "Pastries",
            MenuCategory::Snacks => "Snacks",
            MenuCategory::Beverages => "Beverages",
            MenuCategory::Breakfast => "Breakfast",
            MenuCategory::Lunch => "Lunch",
            MenuCategory::Desserts => "Desserts",
            MenuCategory::Sandwiches => "Sandwiches",
            MenuCategory::Smoothies => "Smoothies",
            MenuCategory::Starters => "Starters",
            MenuCategory::Mains => "Mains",
            MenuCategory::Steaks => "Steaks",
            MenuCategory::Seafood => "Seafood",
            MenuCategory::Vegetarian => "Vegetarian",
            MenuCategory::Salads => "Salads",
            MenuCategory::Sides => "Sides",
            MenuCategory::Soups => "Soups",
            MenuCategory::Beers => "Beers",
            MenuCategory::Wines => "Wines",
            MenuCategory::Pizza => "Pizza",
            MenuCategory::Pasta => "Pasta",
            MenuCategory::Burgers => "Burgers",
        }
    }
}

impl fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MenuCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "category".to_string(),
                allowed: MenuCategory::ALL.iter().map(|c| c.to_string()).collect(),
            })
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// A sellable entry on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct MenuItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the menu and on bills.
    pub name: String,

    /// Price in cents.
    pub price_cents: i64,

    pub category: MenuCategory,

    pub description: Option<String>,

    /// Whether the item can currently be ordered.
    pub available: bool,

    /// Path or URL of an uploaded picture.
    pub image_url: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl MenuItem {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Modifiers
// =============================================================================

/// One choice within a modifier (e.g. "Oat" under "Milk").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ModifierOption {
    pub name: String,
    /// Signed price delta in cents (0 for no change, negative for a reduction).
    pub price_adjustment_cents: i64,
}

/// A named customization axis such as Size or Milk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Modifier {
    pub id: String,
    pub name: String,
    pub options: Vec<ModifierOption>,
    /// Categories this modifier is offered on. Empty means every category.
    pub applies_to: Vec<MenuCategory>,
    /// Whether an option must be picked when ordering.
    pub required: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Modifier {
    /// Checks whether the modifier is offered for a category.
    pub fn applies_to_category(&self, category: MenuCategory) -> bool {
        self.applies_to.is_empty() || self.applies_to.contains(&category)
    }

    pub fn option(&self, name: &str) -> Option<&ModifierOption> {
        self.options.iter().find(|o| o.name == name)
    }
}

/// A modifier choice frozen onto a bill line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SelectedModifier {
    pub modifier_name: String,
    pub option_name: String,
    pub price_adjustment_cents: i64,
}

impl SelectedModifier {
    #[inline]
    pub fn price_adjustment(&self) -> Money {
        Money::from_cents(self.price_adjustment_cents)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One menu entry on a bill, with quantity and chosen modifiers.
/// Snapshots the name and price so later menu edits never rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub menu_item_id: String,
    /// Name at time of sale (frozen).
    pub name: String,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    pub quantity: i64,
    #[serde(default)]
    pub modifiers: Vec<SelectedModifier>,
}

impl LineItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Unit price plus every modifier delta. May be negative.
    pub fn effective_price(&self) -> Money {
        self.unit_price()
            + self
                .modifiers
                .iter()
                .map(SelectedModifier::price_adjustment)
                .sum::<Money>()
    }

    /// Effective price times quantity.
    pub fn line_total(&self) -> Money {
        self.effective_price().multiply_quantity(self.quantity)
    }

    /// [`LineItem::line_total`] without saturation: `None` once any step
    /// leaves the i64 range.
    pub fn checked_line_total(&self) -> Option<Money> {
        self.modifiers
            .iter()
            .try_fold(self.unit_price(), |acc, m| acc.checked_add(m.price_adjustment()))?
            .checked_multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Bill
// =============================================================================

/// A finalized customer order. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Bill {
    pub id: String,
    /// Sequential human-facing number, starting at 1001.
    pub bill_number: i64,
    pub items: Vec<LineItem>,
    pub subtotal_cents: i64,
    /// Discount in basis points (1000 = 10%).
    pub discount_bps: u32,
    pub discount_cents: i64,
    /// Tax in basis points (2300 = 23%).
    pub tax_bps: u32,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub customer_name: Option<String>,
    pub table_number: Option<String>,
    /// Customer tax identification number.
    pub nif: Option<String>,
    /// Free-text currency code, e.g. "EUR".
    pub currency: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Bill {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn discount_rate(&self) -> Percent {
        Percent::from_bps(self.discount_bps)
    }

    #[inline]
    pub fn tax_rate(&self) -> Percent {
        Percent::from_bps(self.tax_bps)
    }

    /// Subtotal minus discount, the base the tax was charged on.
    #[inline]
    pub fn taxable_amount(&self) -> Money {
        Money::from_cents(self.subtotal_cents - self.discount_cents)
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// The three kinds of stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Stock received; adds to the level.
    Restock,
    /// Stock thrown away; subtracts, never below zero.
    Waste,
    /// Stock counted; sets the level outright.
    Adjustment,
}

impl TransactionType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Restock => "restock",
            TransactionType::Waste => "waste",
            TransactionType::Adjustment => "adjustment",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stock tracking for one menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryItem {
    pub id: String,
    /// The tracked menu item. At most one record per menu item.
    pub menu_item_id: String,
    /// Denormalised from the menu item at creation.
    pub menu_item_name: String,
    /// Units on hand. Never negative.
    pub current_stock: i64,
    pub min_stock_level: i64,
    pub max_stock_level: i64,
    /// Cost per unit in cents.
    pub cost_price_cents: i64,
    pub supplier_id: Option<String>,
    pub supplier_name: Option<String>,
    /// Counting unit, e.g. "units", "kg".
    pub unit: String,
    #[ts(as = "Option<String>")]
    pub last_restocked: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    /// At or below the reorder threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.min_stock_level
    }
}

/// An immutable ledger entry describing one stock movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockTransaction {
    pub id: String,
    pub inventory_id: String,
    pub menu_item_name: String,
    pub transaction_type: TransactionType,
    /// The requested quantity (amount moved, or the absolute level for adjustments).
    pub quantity: i64,
    pub previous_stock: i64,
    pub new_stock: i64,
    /// Cost per unit in cents at the time of the movement.
    pub cost_per_unit_cents: i64,
    /// quantity × cost per unit; only set for restocks.
    pub total_cost_cents: Option<i64>,
    pub notes: Option<String>,
    /// Display name of the user who recorded the movement.
    pub created_by: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Supplier
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Theme
// =============================================================================

/// Back-office colour scheme, one per store.
///
/// Colours are CSS hex strings (`#RGB` or `#RRGGBB`). Unknown keys sent by
/// a client (an `id`, say) are ignored on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ThemeConfig {
    pub name: String,
    pub primary_color: String,
    pub accent_color: String,
    pub background_color: String,
    pub card_color: String,
    pub text_color: String,
    pub muted_color: String,
    pub border_color: String,
    pub success_color: String,
    pub error_color: String,
}

impl ThemeConfig {
    /// The scheme a store starts with and returns to on reset.
    pub fn espresso_crema() -> Self {
        ThemeConfig {
            name: "Espresso & Crema".to_string(),
            primary_color: "#2C1A1D".to_string(),
            accent_color: "#C8A27A".to_string(),
            background_color: "#FAF6F1".to_string(),
            card_color: "#FFFFFF".to_string(),
            text_color: "#2C1A1D".to_string(),
            muted_color: "#8B7B74".to_string(),
            border_color: "#E8DED4".to_string(),
            success_color: "#3F6212".to_string(),
            error_color: "#991B1B".to_string(),
        }
    }

    /// `(field, value)` for every colour, in declaration order.
    pub fn colors(&self) -> [(&'static str, &str); 9] {
        [
            ("primary_color", &self.primary_color),
            ("accent_color", &self.accent_color),
            ("background_color", &self.background_color),
            ("card_color", &self.card_color),
            ("text_color", &self.text_color),
            ("muted_color", &self.muted_color),
            ("border_color", &self.border_color),
            ("success_color", &self.success_color),
            ("error_color", &self.error_color),
        ]
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeConfig::espresso_crema()
    }
}

// =============================================================================
// Users & Roles
// =============================================================================

/// Staff role. Ordered by privilege: `Staff < Manager < Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Staff,
    Manager,
    Admin,
}

impl Role {
    /// Privilege rank used by access checks.
    pub const fn rank(&self) -> u8 {
        match self {
            Role::Staff => 0,
            Role::Manager => 1,
            Role::Admin => 2,
        }
    }

    /// Whether this role meets or exceeds `min`.
    #[inline]
    pub const fn at_least(&self, min: Role) -> bool {
        self.rank() >= min.rank()
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Staff
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staff" => Ok(Role::Staff),
            "manager" => Ok(Role::Manager),
            "admin" => Ok(Role::Admin),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["staff".into(), "manager".into(), "admin".into()],
            }),
        }
    }
}

/// A stored account, including the password hash.
///
/// Never serialized to clients; use [`UserProfile`] for that.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    /// Lower-cased, unique.
    pub email: String,
    pub name: String,
    pub role: Role,
    /// PHC-format password hash.
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// The public projection of a [`User`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        UserProfile {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
