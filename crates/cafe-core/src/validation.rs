//! # Validation Module
//!
//! Input validation utilities for the café back office.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Wire (serde)                                                  │
//! │  ├── Type validation (deserialization)                                  │
//! │  └── Unknown enum values rejected                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Service (cafe-service)                                        │
//! │  └── THIS MODULE: Business rule validation                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  ├── UNIQUE constraints (bill number, email, menu item per record)      │
//! │  └── Foreign key constraints                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cafe_core::validation::{validate_discount_percent, validate_quantity};
//!
//! let discount = validate_discount_percent(10.0).unwrap();
//! assert_eq!(discount.bps(), 1000);
//!
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Percent;
use crate::types::{LineItem, ThemeConfig};
use crate::{MAX_BILL_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted display name.
pub const MAX_NAME_LEN: usize = 200;

/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use cafe_core::validation::validate_name;
///
/// assert_eq!(validate_name("name", "  Latte ").unwrap(), "Latte");
/// assert!(validate_name("name", "").is_err());
/// ```
pub fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Trims an optional free-text field; blank becomes `None`.
pub fn normalize_optional(field: &str, value: Option<String>, max: usize) -> ValidationResult<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(Some(value.to_string()))
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns all/default results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates an email address and returns it lower-cased.
///
/// Only the shape is checked: one `@` with something on both sides and a dot
/// in the domain.
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim().to_lowercase();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if !valid || email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain.tld".to_string(),
        });
    }

    Ok(email)
}

pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    if password.len() > 128 {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: 128,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use cafe_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents("price", 350).is_ok());
/// assert!(validate_price_cents("price", 0).is_ok());
/// assert!(validate_price_cents("price", -100).is_err());
/// ```
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a stock movement quantity. Zero is allowed (an adjustment to
/// zero, or a no-op restock); negatives are not.
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates reorder thresholds: both non-negative, max not below min.
pub fn validate_stock_levels(min: i64, max: i64) -> ValidationResult<()> {
    if min < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "min_stock_level".to_string(),
        });
    }

    if max < min {
        return Err(ValidationError::OutOfRange {
            field: "max_stock_level".to_string(),
            min,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a discount given as a decimal percent and converts it.
///
/// ## Rules
/// - Finite
/// - Between 0 and 100 inclusive
pub fn validate_discount_percent(pct: f64) -> ValidationResult<Percent> {
    if !pct.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "discount_percent".to_string(),
            reason: "must be a number".to_string(),
        });
    }

    if !(0.0..=100.0).contains(&pct) {
        return Err(ValidationError::OutOfRange {
            field: "discount_percent".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(Percent::from_percentage(pct))
}

/// Validates a tax rate given as a decimal percent and converts it.
///
/// ## Rules
/// - Finite and non-negative
/// - No upper bound beyond what basis points can hold (150% is accepted)
pub fn validate_tax_percent(pct: f64) -> ValidationResult<Percent> {
    if !pct.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "tax_percent".to_string(),
            reason: "must be a number".to_string(),
        });
    }

    if pct < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "tax_percent".to_string(),
        });
    }

    if (pct * 100.0).round() > u32::MAX as f64 {
        return Err(ValidationError::OutOfRange {
            field: "tax_percent".to_string(),
            min: 0,
            max: (u32::MAX / 100) as i64,
        });
    }

    Ok(Percent::from_percentage(pct))
}

/// Resolves an optional page size against a default and a ceiling.
pub fn validate_limit(limit: Option<u32>, default: u32, max: u32) -> ValidationResult<u32> {
    match limit {
        None => Ok(default),
        Some(0) => Err(ValidationError::MustBePositive {
            field: "limit".to_string(),
        }),
        Some(n) if n > max => Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max: max as i64,
        }),
        Some(n) => Ok(n),
    }
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the lines of a bill before totals are computed.
///
/// ## Rules
/// - At least one line, at most MAX_BILL_ITEMS (100)
/// - Every line named, with a non-negative unit price and a valid quantity
/// - Every selected modifier names both modifier and option
pub fn validate_line_items(items: &[LineItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if items.len() > MAX_BILL_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_BILL_ITEMS as i64,
        });
    }

    for item in items {
        validate_name("items.name", &item.name)?;
        validate_price_cents("items.unit_price_cents", item.unit_price_cents)?;
        validate_quantity(item.quantity)?;
        for modifier in &item.modifiers {
            validate_name("items.modifiers.modifier_name", &modifier.modifier_name)?;
            validate_name("items.modifiers.option_name", &modifier.option_name)?;
        }
    }

    Ok(())
}

// =============================================================================
// Theme Validators
// =============================================================================

/// Validates a CSS hex colour (`#RGB` or `#RRGGBB`) and returns it upper-cased.
///
/// ## Example
/// ```rust
/// use cafe_core::validation::validate_hex_color;
///
/// assert_eq!(validate_hex_color("primary_color", " #2c1a1d ").unwrap(), "#2C1A1D");
/// assert!(validate_hex_color("primary_color", "brown").is_err());
/// ```
pub fn validate_hex_color(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();
    let digits = value.strip_prefix('#').unwrap_or_default();

    if !matches!(digits.len(), 3 | 6) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a hex colour like #2C1A1D".to_string(),
        });
    }

    Ok(value.to_ascii_uppercase())
}

/// Validates every field of a theme and returns the normalized copy.
pub fn validate_theme(theme: &ThemeConfig) -> ValidationResult<ThemeConfig> {
    Ok(ThemeConfig {
        name: validate_name("name", &theme.name)?,
        primary_color: validate_hex_color("primary_color", &theme.primary_color)?,
        accent_color: validate_hex_color("accent_color", &theme.accent_color)?,
        background_color: validate_hex_color("background_color", &theme.background_color)?,
        card_color: validate_hex_color("card_color", &theme.card_color)?,
        text_color: validate_hex_color("text_color", &theme.text_color)?,
        muted_color: validate_hex_color("muted_color", &theme.muted_color)?,
        border_color: validate_hex_color("border_color", &theme.border_color)?,
        success_color: validate_hex_color("success_color", &theme.success_color)?,
        error_color: validate_hex_color("error_color", &theme.error_color)?,
    })
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use cafe_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SelectedModifier;

    fn line(name: &str, price: i64, qty: i64) -> LineItem {
        LineItem {
            menu_item_id: "m-1".to_string(),
            name: name.to_string(),
            unit_price_cents: price,
            quantity: qty,
            modifiers: vec![],
        }
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("name", " Espresso ").unwrap(), "Espresso");
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"A".repeat(201)).is_err());
        assert!(validate_name("name", &"A".repeat(200)).is_ok());
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional("nif", None, 20).unwrap(), None);
        assert_eq!(normalize_optional("nif", Some("  ".into()), 20).unwrap(), None);
        assert_eq!(
            normalize_optional("nif", Some(" 123 ".into()), 20).unwrap(),
            Some("123".to_string())
        );
        assert!(normalize_optional("nif", Some("1".repeat(21)), 20).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email("Ana@Cafe.PT").unwrap(), "ana@cafe.pt");
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@cafe.pt").is_err());
        assert!(validate_email("ana@cafe").is_err());
        assert!(validate_email("ana@@cafe.pt").is_err());
        assert!(validate_email("an a@cafe.pt").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("12345").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_stock_quantity() {
        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(25).is_ok());
        assert!(validate_stock_quantity(-5).is_err());
    }

    #[test]
    fn test_validate_stock_levels() {
        assert!(validate_stock_levels(5, 100).is_ok());
        assert!(validate_stock_levels(5, 5).is_ok());
        assert!(validate_stock_levels(-1, 100).is_err());
        assert!(validate_stock_levels(50, 10).is_err());
    }

    #[test]
    fn test_validate_discount_percent() {
        assert_eq!(validate_discount_percent(0.0).unwrap().bps(), 0);
        assert_eq!(validate_discount_percent(12.5).unwrap().bps(), 1250);
        assert_eq!(validate_discount_percent(100.0).unwrap().bps(), 10000);
        assert!(validate_discount_percent(-1.0).is_err());
        assert!(validate_discount_percent(100.5).is_err());
        assert!(validate_discount_percent(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_tax_percent_has_no_upper_bound() {
        assert_eq!(validate_tax_percent(23.0).unwrap().bps(), 2300);
        assert_eq!(validate_tax_percent(150.0).unwrap().bps(), 15000);
        assert!(validate_tax_percent(-0.5).is_err());
        assert!(validate_tax_percent(f64::INFINITY).is_err());
        assert!(validate_tax_percent(1e12).is_err());
    }

    #[test]
    fn test_validate_limit() {
        assert_eq!(validate_limit(None, 100, 500).unwrap(), 100);
        assert_eq!(validate_limit(Some(20), 100, 500).unwrap(), 20);
        assert!(validate_limit(Some(0), 100, 500).is_err());
        assert!(validate_limit(Some(501), 100, 500).is_err());
    }

    #[test]
    fn test_validate_line_items() {
        assert!(validate_line_items(&[line("Latte", 350, 1)]).is_ok());
        assert!(validate_line_items(&[]).is_err());
        assert!(validate_line_items(&[line("", 350, 1)]).is_err());
        assert!(validate_line_items(&[line("Latte", -1, 1)]).is_err());
        assert!(validate_line_items(&[line("Latte", 350, 0)]).is_err());

        let mut with_blank_modifier = line("Latte", 350, 1);
        with_blank_modifier.modifiers.push(SelectedModifier {
            modifier_name: "Milk".to_string(),
            option_name: " ".to_string(),
            price_adjustment_cents: 50,
        });
        assert!(validate_line_items(&[with_blank_modifier]).is_err());

        let too_many: Vec<LineItem> = (0..=MAX_BILL_ITEMS).map(|_| line("Tea", 200, 1)).collect();
        assert!(validate_line_items(&too_many).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }

    #[test]
    fn test_validate_hex_color() {
        assert_eq!(validate_hex_color("c", "#fff").unwrap(), "#FFF");
        assert_eq!(validate_hex_color("c", "#0ea5e9").unwrap(), "#0EA5E9");
        assert!(validate_hex_color("c", "0EA5E9").is_err());
        assert!(validate_hex_color("c", "#0EA5E").is_err());
        assert!(validate_hex_color("c", "#GGGGGG").is_err());
        assert!(validate_hex_color("c", "").is_err());
    }

    #[test]
    fn test_validate_theme_names_the_bad_field() {
        let mut theme = ThemeConfig::default();
        assert_eq!(validate_theme(&theme).unwrap(), theme);

        theme.border_color = "grey".to_string();
        assert_eq!(validate_theme(&theme).unwrap_err().field(), "border_color");

        let mut theme = ThemeConfig::default();
        theme.name = " ".to_string();
        assert_eq!(validate_theme(&theme).unwrap_err().field(), "name");
    }
}
