//! # Money Module
//!
//! Provides the `Money` and `Percent` types for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    2.50 × 0.23 = 0.5749999999999999  ❌ rounds to 0.57, not 0.58        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Basis Points                             │
//! │    250 cents × 2300 bps = 575000 → 57.5 cents → 58 cents                │
//! │    Every intermediate value is exact until the single rounding step    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Rule
//! Every percentage product (discount, tax) is rounded to the cent
//! **half away from zero**: 126.5 cents → 127, -126.5 cents → -127.
//!
//! ## Usage
//! ```rust
//! use cafe_core::money::{Money, Percent};
//!
//! let subtotal = Money::from_cents(550);        // 5.50
//! let tax = subtotal.percentage(Percent::from_bps(2300)); // 23%
//! assert_eq!(tax.cents(), 127);                  // 1.265 → 1.27
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

/// Basis points in one whole (100%).
const BPS_PER_WHOLE: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **Saturating operators**: `+`, `-`, `*` and `Sum` clamp at the i64 bounds
///   instead of panicking; bill pricing uses the `checked_*` forms and
///   rejects anything that would clamp
/// - **i64 (signed)**: modifier adjustments can be negative, and nothing stops
///   a line from going below zero when a modifier undercuts the base price
/// - **Currency-free**: bills carry their currency code as free text, the
///   amount itself is just minor units
///
/// ## Where Money is Used
/// ```text
/// LineItem.unit_price ──► + modifier deltas ──► effective price × qty
///                                                     │
///                                                     ▼
///                         subtotal ──► discount ──► taxable ──► tax ──► total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use cafe_core::money::Money;
    ///
    /// let price = Money::from_cents(350); // 3.50
    /// assert_eq!(price.cents(), 350);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Applies a percentage to this amount, rounding to the cent half away
    /// from zero.
    ///
    /// ## Implementation
    /// Integer math in i128: `|amount × bps|` plus half a unit (5000), divided
    /// by 10000, then the sign is restored. A result past the i64 range
    /// saturates; use [`Money::checked_percentage`] where that must be an error.
    ///
    /// ## Example
    /// ```rust
    /// use cafe_core::money::{Money, Percent};
    ///
    /// let taxable = Money::from_cents(720);            // 7.20
    /// let tax = taxable.percentage(Percent::from_bps(2300));
    /// assert_eq!(tax.cents(), 166);                      // 1.656 → 1.66
    /// ```
    pub fn percentage(&self, rate: Percent) -> Money {
        let signed = self.percentage_wide(rate);
        Money(i64::try_from(signed).unwrap_or(if signed < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Like [`Money::percentage`], but `None` when the rounded result does not
    /// fit in i64.
    ///
    /// ## Example
    /// ```rust
    /// use cafe_core::money::{Money, Percent};
    ///
    /// let huge = Money::from_cents(i64::MAX / 2);
    /// assert!(huge.checked_percentage(Percent::from_bps(30_000)).is_none());
    /// assert_eq!(Money::from_cents(550).checked_percentage(Percent::from_bps(2300)), Some(Money::from_cents(127)));
    /// ```
    pub fn checked_percentage(&self, rate: Percent) -> Option<Money> {
        i64::try_from(self.percentage_wide(rate)).ok().map(Money)
    }

    /// i64 × u32 always fits in i128, so only the narrowing can fail.
    fn percentage_wide(&self, rate: Percent) -> i128 {
        let product = i128::from(self.0) * i128::from(rate.bps());
        let rounded = (product.abs() + BPS_PER_WHOLE / 2) / BPS_PER_WHOLE;
        if product < 0 {
            -rounded
        } else {
            rounded
        }
    }

    /// Multiplies money by a quantity, saturating at the i64 bounds.
    ///
    /// ## Example
    /// ```rust
    /// use cafe_core::money::Money;
    ///
    /// let effective = Money::from_cents(250);
    /// assert_eq!(effective.multiply_quantity(2).cents(), 500);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_sub(&self, other: Money) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Divides the amount evenly across `count` parts, rounding half away
    /// from zero. Dividing across zero parts yields zero.
    ///
    /// ## Example
    /// ```rust
    /// use cafe_core::money::Money;
    ///
    /// let revenue = Money::from_cents(1000);
    /// assert_eq!(revenue.average_over(3).cents(), 333);
    /// assert_eq!(revenue.average_over(0).cents(), 0);
    /// ```
    pub fn average_over(&self, count: u64) -> Money {
        if count == 0 {
            return Money::zero();
        }
        let count = i128::from(count);
        let value = i128::from(self.0);
        let rounded = (value.abs() * 2 + count) / (count * 2);
        let signed = if value < 0 { -rounded } else { rounded };
        Money(i64::try_from(signed).unwrap_or(if signed < 0 { i64::MIN } else { i64::MAX }))
    }
}

/// Plain decimal rendering ("8.86", "-0.50"); the currency code is shown
/// separately by whoever prints the bill.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Percent
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 23% is 2300 bps and 8.5% is 850 bps.
/// Discount and tax percentages arrive as decimal numbers on the wire and are
/// converted once, at the validation boundary.
///
/// No upper bound lives in this type: a 150% tax is 15000 bps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percent(u32);

impl Percent {
    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percent(bps)
    }

    /// Creates a percentage from a decimal percent value, rounded to the
    /// nearest basis point (12.345 becomes 12.35%).
    ///
    /// Negative and non-finite inputs saturate to 0; callers validate first
    /// (see [`crate::validation::validate_discount_percent`]).
    pub fn from_percentage(pct: f64) -> Self {
        Percent((pct * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a decimal percent (for display only).
    #[inline]
    pub fn as_percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
