//! Type-safe price representation using decimal arithmetic.
//!
//! Every surface that shows a price (catalog cards, product pages, the cart
//! and checkout totals) goes through [`discounted_price`], so the numbers
//! never disagree between pages.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places shown and stored for prices.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Apply a fractional discount to a price.
///
/// Computes `round(price - discount * price, 2)`. The discount is expected to
/// be a fraction in `[0, 1]`; it is not validated.
///
/// ```
/// use ecomgo_core::discounted_price;
/// use rust_decimal::Decimal;
///
/// let price = Decimal::new(1999, 2); // 19.99
/// let discount = Decimal::new(25, 2); // 0.25
/// assert_eq!(discounted_price(price, discount), Decimal::new(1499, 2));
/// ```
#[must_use]
pub fn discounted_price(price: Decimal, discount: Decimal) -> Decimal {
    round_price(price - discount * price)
}

/// Round to cents, halves away from zero.
fn round_price(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(PRICE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// A price in dollars, rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price, rounding the amount to cents.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self(round_price(amount))
    }

    /// Create the discounted price for a raw amount and discount fraction.
    #[must_use]
    pub fn discounted(amount: Decimal, discount: Decimal) -> Self {
        Self(discounted_price(amount, discount))
    }

    /// The amount in dollars.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
