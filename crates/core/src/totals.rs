//! Header totals.
//!
//! A header total is the exact decimal sum of its line amounts. The sum is
//! order-independent and never touches floating point.

use rust_decimal::Decimal;

/// A line item carrying a money amount.
pub trait LineAmount {
    /// The line's amount.
    fn amount(&self) -> Decimal;
}

impl LineAmount for Decimal {
    fn amount(&self) -> Decimal {
        *self
    }
}

/// Sums the amounts of `items`. An empty slice sums to zero.
#[must_use]
pub fn calculate_total<T: LineAmount>(items: &[T]) -> Decimal {
    items.iter().map(LineAmount::amount).sum()
}
