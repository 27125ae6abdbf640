//! # Bill Calculator
//!
//! Turns a list of line items plus a discount and a tax rate into bill totals.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  for each line:                                                         │
//! │     effective = unit_price + Σ modifier.price_adjustment                │
//! │     line_total = effective × quantity                                   │
//! │                         │                                               │
//! │                         ▼                                               │
//! │  subtotal        = Σ line_total                                         │
//! │  discount_amount = round(subtotal × discount%)      ◄── half away       │
//! │  taxable_amount  = subtotal − discount_amount           from zero       │
//! │  tax_amount      = round(taxable_amount × tax%)     ◄── half away       │
//! │  total           = taxable_amount + tax_amount          from zero       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculator is permissive: it neither clamps percentages nor rejects
//! negative effective prices. Range checks belong to
//! [`crate::validation`], applied before a bill reaches this function.
//! The one thing it does refuse is an amount that leaves the i64 cent range
//! at any step; that is [`CoreError::AmountOverflow`], never a wrapped value.
//!
//! ## Example
//! ```rust
//! use cafe_core::billing::compute_bill;
//! use cafe_core::money::Percent;
//! use cafe_core::types::LineItem;
//!
//! let items = vec![LineItem {
//!     menu_item_id: "m-1".into(),
//!     name: "Espresso".into(),
//!     unit_price_cents: 250,
//!     quantity: 2,
//!     modifiers: vec![],
//! }];
//!
//! let totals = compute_bill(&items, Percent::zero(), Percent::from_bps(2300), 1001).unwrap();
//! assert_eq!(totals.subtotal.cents(), 500);
//! assert_eq!(totals.tax_amount.cents(), 115);
//! assert_eq!(totals.total.cents(), 615);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Percent};
use crate::types::LineItem;

/// Everything the calculator derives for one bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillTotals {
    pub subtotal: Money,
    pub discount_amount: Money,
    pub taxable_amount: Money,
    pub tax_amount: Money,
    pub total: Money,
    /// Carried through from the store's allocation.
    pub bill_number: i64,
}

/// Computes bill totals from line items, a discount and a tax rate.
///
/// # Errors
/// [`CoreError::AmountOverflow`] naming the first step whose amount does not
/// fit in i64 cents.
pub fn compute_bill(items: &[LineItem], discount: Percent, tax: Percent, bill_number: i64) -> CoreResult<BillTotals> {
    let subtotal = items.iter().try_fold(Money::zero(), |acc, item| {
        item.checked_line_total()
            .and_then(|line| acc.checked_add(line))
            .ok_or(CoreError::AmountOverflow { stage: "subtotal" })
    })?;
    let discount_amount = subtotal
        .checked_percentage(discount)
        .ok_or(CoreError::AmountOverflow { stage: "discount" })?;
    let taxable_amount = subtotal
        .checked_sub(discount_amount)
        .ok_or(CoreError::AmountOverflow { stage: "taxable amount" })?;
    let tax_amount = taxable_amount
        .checked_percentage(tax)
        .ok_or(CoreError::AmountOverflow { stage: "tax" })?;
    let total = taxable_amount
        .checked_add(tax_amount)
        .ok_or(CoreError::AmountOverflow { stage: "total" })?;

    Ok(BillTotals {
        subtotal,
        discount_amount,
        taxable_amount,
        tax_amount,
        total,
        bill_number,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SelectedModifier;
    use proptest::prelude::*;

    fn line(name: &str, price: i64, qty: i64, deltas: &[i64]) -> LineItem {
        LineItem {
            menu_item_id: format!("menu-{name}"),
            name: name.to_string(),
            unit_price_cents: price,
            quantity: qty,
            modifiers: deltas
                .iter()
                .enumerate()
                .map(|(i, d)| SelectedModifier {
                    modifier_name: format!("mod-{i}"),
                    option_name: "opt".to_string(),
                    price_adjustment_cents: *d,
                })
                .collect(),
        }
    }

    #[test]
    fn test_discount_then_tax() {
        let items = vec![line("Espresso", 250, 2, &[]), line("Croissant", 300, 1, &[])];
        let totals = compute_bill(&items, Percent::from_bps(1000), Percent::from_bps(2300), 1001).unwrap();

        assert_eq!(totals.subtotal.cents(), 800);
        assert_eq!(totals.discount_amount.cents(), 80);
        assert_eq!(totals.taxable_amount.cents(), 720);
        assert_eq!(totals.tax_amount.cents(), 166);
        assert_eq!(totals.total.cents(), 886);
        assert_eq!(totals.bill_number, 1001);
    }

    #[test]
    fn test_modifiers_raise_effective_price() {
        let items = vec![line("Latte", 350, 1, &[50, 150])];
        let totals = compute_bill(&items, Percent::zero(), Percent::from_bps(2300), 1002).unwrap();

        assert_eq!(totals.subtotal.cents(), 550);
        assert_eq!(totals.discount_amount.cents(), 0);
        assert_eq!(totals.tax_amount.cents(), 127);
        assert_eq!(totals.total.cents(), 677);
    }

    #[test]
    fn test_empty_items_total_zero() {
        let totals = compute_bill(&[], Percent::from_bps(1000), Percent::from_bps(2300), 1001).unwrap();
        assert!(totals.total.is_zero());
    }

    #[test]
    fn test_full_discount_zeroes_tax() {
        let items = vec![line("Tea", 200, 3, &[])];
        let totals = compute_bill(&items, Percent::from_bps(10000), Percent::from_bps(2300), 1001).unwrap();
        assert_eq!(totals.discount_amount.cents(), 600);
        assert_eq!(totals.taxable_amount.cents(), 0);
        assert_eq!(totals.total.cents(), 0);
    }

    #[test]
    fn test_tax_above_one_hundred_percent_is_literal() {
        let items = vec![line("Wine", 1000, 1, &[])];
        let totals = compute_bill(&items, Percent::zero(), Percent::from_bps(15000), 1001).unwrap();
        assert_eq!(totals.tax_amount.cents(), 1500);
        assert_eq!(totals.total.cents(), 2500);
    }

    #[test]
    fn test_negative_effective_price_not_rejected() {
        let items = vec![line("Water", 100, 2, &[-150])];
        let totals = compute_bill(&items, Percent::zero(), Percent::from_bps(2300), 1001).unwrap();
        assert_eq!(totals.subtotal.cents(), -100);
        assert_eq!(totals.tax_amount.cents(), -23);
        assert_eq!(totals.total.cents(), -123);
    }

    #[test]
    fn test_line_overflow_is_an_error() {
        let items = vec![line("Gold", i64::MAX / 2, 3, &[])];
        let err = compute_bill(&items, Percent::zero(), Percent::from_bps(2300), 1001).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { stage: "subtotal" }));
    }

    #[test]
    fn test_modifier_overflow_is_an_error() {
        let items = vec![line("Gold", i64::MAX, 1, &[1])];
        let err = compute_bill(&items, Percent::zero(), Percent::zero(), 1001).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { stage: "subtotal" }));
    }

    #[test]
    fn test_subtotal_overflow_across_lines_is_an_error() {
        let items = vec![line("A", i64::MAX - 10, 1, &[]), line("B", 11, 1, &[])];
        let err = compute_bill(&items, Percent::zero(), Percent::zero(), 1001).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { stage: "subtotal" }));
    }

    #[test]
    fn test_huge_tax_is_an_error_not_a_negative_total() {
        // 10^13 cents × 999 fits; taxing it at 400000% does not
        let items = vec![line("Yacht", 10_000_000_000_000, 999, &[])];
        let err = compute_bill(&items, Percent::zero(), Percent::from_bps(4_000_000_000), 1001).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { stage: "tax" }));
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        // tax itself fits, taxable + tax does not
        let items = vec![line("Big", i64::MAX / 2 + 1, 1, &[])];
        let err = compute_bill(&items, Percent::zero(), Percent::from_bps(10_000), 1001).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { stage: "total" }));
    }

    proptest! {
        #[test]
        fn prop_totals_are_consistent(
            prices in prop::collection::vec((0i64..100_000, 1i64..100), 1..20),
            discount_bps in 0u32..=10_000,
            tax_bps in 0u32..=50_000,
        ) {
            let items: Vec<LineItem> = prices
                .iter()
                .map(|(p, q)| line("x", *p, *q, &[]))
                .collect();
            let totals = compute_bill(&items, Percent::from_bps(discount_bps), Percent::from_bps(tax_bps), 1001).unwrap();

            prop_assert_eq!(totals.taxable_amount, totals.subtotal - totals.discount_amount);
            prop_assert_eq!(totals.total, totals.taxable_amount + totals.tax_amount);
            prop_assert!(totals.discount_amount <= totals.subtotal);
            prop_assert!(!totals.total.is_negative());
        }
    }
}
