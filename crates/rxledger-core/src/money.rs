//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In many retail systems:                                                │
//! │    Rs 10.00 / 3 = Rs 3.33 (×3 = Rs 9.99)  → Lost 1 paisa!              │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paisa                                            │
//! │    1000 paisa / 3 = 333 paisa (×3 = 999 paisa)                         │
//! │    We KNOW we lost 1 paisa, and handle it explicitly                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rxledger_core::money::Money;
//!
//! // Create from paisa (preferred)
//! let price = Money::from_paisa(1099); // Rs 10.99
//!
//! // Arithmetic operations
//! let doubled = price * 2;            // Rs 21.98
//! let total = price + Money::from_paisa(500); // Rs 15.99
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (paisa for PKR).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and supplier deltas
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  InvoiceLine.buy_price ──► LineComputation.base ──► InvoiceTotals.net  │
/// │                                                                         │
/// │  TradeLine.unit_price ──► ReturnSelection ──► refund ──► balance adj.  │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paisa (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use rxledger_core::money::Money;
    ///
    /// let price = Money::from_paisa(1099); // Represents Rs 10.99
    /// assert_eq!(price.paisa(), 1099);
    /// ```
    ///
    /// ## Why Paisa?
    /// Using the smallest unit eliminates all floating-point concerns.
    /// Storage, calculations, and the API all use paisa.
    /// Only the UI converts to rupees for display.
    #[inline]
    pub const fn from_paisa(paisa: i64) -> Self {
        Money(paisa)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// ## Example
    /// ```rust
    /// use rxledger_core::money::Money;
    ///
    /// let price = Money::from_rupees(100); // Rs 100.00
    /// assert_eq!(price.paisa(), 10000);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paisa (smallest currency unit).
    #[inline]
    pub const fn paisa(&self) -> i64 {
        self.0
    }

    /// Returns the rupee portion.
    ///
    /// ## Example
    /// ```rust
    /// use rxledger_core::money::Money;
    ///
    /// let price = Money::from_paisa(1099);
    /// assert_eq!(price.rupees(), 10);
    /// ```
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paisa portion (always 0-99).
    #[inline]
    pub const fn paisa_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Subtracts `other`, flooring the result at zero.
    ///
    /// This is the clamp used throughout the calculator and the credit-balance
    /// adjustment: a discount larger than the base yields a taxable amount of
    /// zero, and a refund larger than a customer's running balance yields a
    /// balance of zero, never a negative value.
    ///
    /// ## Example
    /// ```rust
    /// use rxledger_core::money::Money;
    ///
    /// let balance = Money::from_rupees(100);
    /// let refund = Money::from_rupees(150);
    /// assert_eq!(balance.sub_floor_zero(refund), Money::zero());
    /// ```
    #[inline]
    pub const fn sub_floor_zero(&self, other: Money) -> Money {
        let diff = self.0 - other.0;
        if diff < 0 {
            Money(0)
        } else {
            Money(diff)
        }
    }

    /// Applies a percentage rate, rounding half away from zero.
    ///
    /// ## Implementation
    /// We use integer math: `(amount * bps + 5000) / 10000`
    /// The +5000 provides rounding (5000/10000 = 0.5), and the intermediate
    /// product is widened to i128 to prevent overflow on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use rxledger_core::money::Money;
    /// use rxledger_core::types::Rate;
    ///
    /// let taxable = Money::from_rupees(180);
    /// let rate = Rate::from_bps(500); // 5%
    ///
    /// // Rs 180.00 × 5% = Rs 9.00
    /// assert_eq!(taxable.apply_rate(rate), Money::from_rupees(9));
    /// ```
    pub fn apply_rate(&self, rate: Rate) -> Money {
        // rate.bps() is basis points: 500 = 5.00%
        let paisa = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_paisa(paisa as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use rxledger_core::money::Money;
    ///
    /// let unit_price = Money::from_rupees(50);
    /// let refund = unit_price.multiply_quantity(3);
    /// assert_eq!(refund, Money::from_rupees(150));
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Divides evenly by a count, returning zero when the count is zero.
    ///
    /// Used for the per-unit diagnostics (`buy_price_per_pack / units_per_pack`).
    /// A pack size of zero is bad catalog data; the calculator must never
    /// raise on it, so the quotient is coerced to zero instead.
    #[inline]
    pub const fn div_or_zero(&self, count: i64) -> Money {
        if count == 0 {
            Money(0)
        } else {
            Money(self.0 / count)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. Use frontend formatting for actual UI
/// display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rs {}.{:02}", sign, self.rupees().abs(), self.paisa_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

/// Sum of an iterator of Money values.
///
/// Lets the calculator write `lines.iter().map(...).sum()` for the invoice
/// aggregates.
impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
