//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centimes                                         │
//! │    Every amount in the system is an i64 number of centimes.            │
//! │    40 DH = 4000. The database, calculations, and API all use           │
//! │    centimes; only display code converts to dirhams.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centimes (the smallest currency unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: allows negative values for margins on loss-making
///   items
/// - **Single field tuple struct**: zero-cost abstraction over i64
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centimes.
    ///
    /// ## Example
    /// ```rust
    /// use jamal_core::money::Money;
    ///
    /// let price = Money::from_cents(4000); // 40,00 DH
    /// assert_eq!(price.cents(), 4000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in centimes.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dirham portion.
    #[inline]
    pub const fn dirhams(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centime portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
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

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity to get a line total.
    ///
    /// ## Example
    /// ```rust
    /// use jamal_core::money::Money;
    ///
    /// let unit = Money::from_cents(4000); // 40,00 DH
    /// assert_eq!(unit.multiply_quantity(2).cents(), 8000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display in the shop's format: `"40,00 DH"`, comma as decimal separator.
///
/// Used by the CSV export; the dashboard applies its own locale formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{},{:02} DH",
            sign,
            self.dirhams().abs(),
            self.cents_part()
        )
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

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(4050);
        assert_eq!(money.cents(), 4050);
        assert_eq!(money.dirhams(), 40);
        assert_eq!(money.cents_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(4000)), "40,00 DH");
        assert_eq!(format!("{}", Money::from_cents(125)), "1,25 DH");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5,50 DH");
        assert_eq!(format!("{}", Money::from_cents(0)), "0,00 DH");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(250);

        assert_eq!((a + b).cents(), 1250);
        assert_eq!((a - b).cents(), 750);
    }

    #[test]
    fn test_multiply_quantity() {
        // 40 DH × 2 = 80 DH, the canonical sale round trip
        let unit = Money::from_cents(4000);
        assert_eq!(unit.multiply_quantity(2).cents(), 8000);
    }

    #[test]
    fn test_margin_can_be_negative() {
        let price = Money::from_cents(500);
        let cost = Money::from_cents(800);
        let margin = price - cost;
        assert!(margin.is_negative());
        assert_eq!(margin.cents(), -300);
    }
}
