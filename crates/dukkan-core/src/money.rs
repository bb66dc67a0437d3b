//! # Money Module
//!
//! Monetary values and discount rates.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In floating point:                                                 │
//! │    0.1 + 0.2 = 0.30000000000000004                                  │
//! │                                                                     │
//! │  OUR SOLUTION: integer minor units (cents)                          │
//! │    10.00 is 1000; a 10% discount on 999 is 899, and the lost        │
//! │    fraction of a cent is rounded explicitly, once, per line         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every monetary value in the system flows through [`Money`]: product
//! prices, cart totals, recorded sale lines, report aggregates. Only the
//! presentation layer converts to a display string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate arithmetic may dip negative
/// - **Single-field tuple struct**: zero-cost abstraction over i64
/// - **`sqlx(transparent)`**: persists as a plain INTEGER column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use dukkan_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99
    /// assert_eq!(price.cents(), 1099);
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

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is strictly positive.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a quantity (line total = unit price × quantity).
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Applies a percentage discount and returns the discounted amount,
    /// rounded half-up on the discount portion.
    ///
    /// ## Example
    /// ```rust
    /// use dukkan_core::money::{DiscountRate, Money};
    ///
    /// let price = Money::from_cents(1000); // 10.00
    /// let ten_pct = DiscountRate::from_bps(1000);
    /// assert_eq!(price.apply_discount(ten_pct).cents(), 900); // 9.00
    /// ```
    pub fn apply_discount(&self, rate: DiscountRate) -> Money {
        if rate.is_zero() {
            return *self;
        }
        // i128 intermediate prevents overflow on large amounts.
        let discount = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money(self.0 - discount as i64)
    }
}

/// Display implementation for debugging/logging; presentation layers do
/// their own localized formatting.
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
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// A discount rate in basis points (bps).
///
/// 1 basis point = 0.01%, so 1000 bps = 10%. Basis points keep discount
/// math in integers; percent inputs from an operator convert once at the
/// boundary via [`DiscountRate::from_percent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRate(u32);

/// Full discount (100%) in basis points; the upper bound for validation.
pub const MAX_DISCOUNT_BPS: u32 = 10_000;

impl DiscountRate {
    /// Creates a rate from basis points. Values above 100% are rejected.
    pub fn from_bps(bps: u32) -> Self {
        debug_assert!(bps <= MAX_DISCOUNT_BPS);
        DiscountRate(bps.min(MAX_DISCOUNT_BPS))
    }

    /// Creates a rate from a percentage as entered by an operator.
    ///
    /// Returns `ValidationError::OutOfRange` outside `0.0..=100.0`.
    pub fn from_percent(pct: f64) -> Result<Self, ValidationError> {
        if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
            return Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 0,
                max: 100,
            });
        }
        Ok(DiscountRate((pct * 100.0).round() as u32))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00");
    }

    #[test]
    fn arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!(a.multiply_quantity(4).cents(), 4000);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn discount_exact() {
        let price = Money::from_cents(1000);
        assert_eq!(price.apply_discount(DiscountRate::from_bps(1000)).cents(), 900);
        assert_eq!(price.apply_discount(DiscountRate::from_bps(2500)).cents(), 750);
        assert_eq!(price.apply_discount(DiscountRate::zero()).cents(), 1000);
    }

    #[test]
    fn discount_rounds_half_up() {
        // 9.99 at 10% → discount 99.9 cents rounds to 100 → 8.99
        let price = Money::from_cents(999);
        assert_eq!(price.apply_discount(DiscountRate::from_bps(1000)).cents(), 899);

        // 0.05 at 50% → discount 2.5 cents rounds to 3 → 0.02
        let tiny = Money::from_cents(5);
        assert_eq!(tiny.apply_discount(DiscountRate::from_bps(5000)).cents(), 2);
    }

    #[test]
    fn full_discount_is_free() {
        let price = Money::from_cents(1234);
        assert_eq!(price.apply_discount(DiscountRate::from_bps(10_000)).cents(), 0);
    }

    #[test]
    fn discount_rate_from_percent() {
        assert_eq!(DiscountRate::from_percent(10.0).unwrap().bps(), 1000);
        assert_eq!(DiscountRate::from_percent(8.25).unwrap().bps(), 825);
        assert_eq!(DiscountRate::from_percent(0.0).unwrap().bps(), 0);
        assert!(DiscountRate::from_percent(-1.0).is_err());
        assert!(DiscountRate::from_percent(100.5).is_err());
        assert!(DiscountRate::from_percent(f64::NAN).is_err());
    }

    #[test]
    fn zero_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
        assert!(DiscountRate::zero().is_zero());
    }
}
