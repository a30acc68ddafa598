//! Pricing

use rust_decimal::Decimal;
use rusty_money::{Money, iso};
use thiserror::Error;

/// Currency used when a caller does not choose one.
pub const DEFAULT_CURRENCY: &iso::Currency = iso::USD;

/// Errors that can occur while pricing cart lines.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A unit price was negative.
    #[error("unit price cannot be negative: {0}")]
    NegativePrice(Decimal),

    /// Line or subtotal arithmetic overflowed.
    #[error("subtotal overflowed")]
    Overflow,

    /// Currency code not recognised.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// A product line with a resolved unit price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedLine {
    unit_price: Decimal,
    quantity: u32,
}

impl PricedLine {
    /// Creates a new priced line.
    pub fn new(unit_price: Decimal, quantity: u32) -> Self {
        Self {
            unit_price,
            quantity,
        }
    }

    /// Returns the unit price of the line
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Returns the quantity on the line
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price multiplied by quantity.
    ///
    /// # Errors
    ///
    /// - [`PricingError::NegativePrice`]: the unit price is below zero.
    /// - [`PricingError::Overflow`]: the multiplication overflowed.
    pub fn line_total(&self) -> Result<Decimal, PricingError> {
        if self.unit_price < Decimal::ZERO {
            return Err(PricingError::NegativePrice(self.unit_price));
        }

        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or(PricingError::Overflow)
    }
}

/// Calculates the subtotal of a list of priced lines.
///
/// An empty list has a subtotal of zero.
///
/// # Errors
///
/// - [`PricingError::NegativePrice`]: a line has a negative unit price.
/// - [`PricingError::Overflow`]: arithmetic overflowed.
pub fn subtotal(lines: &[PricedLine]) -> Result<Decimal, PricingError> {
    lines.iter().try_fold(Decimal::ZERO, |acc, line| {
        acc.checked_add(line.line_total()?)
            .ok_or(PricingError::Overflow)
    })
}

/// Formats an amount in the given currency, e.g. `$50.00`.
pub fn format_amount(amount: Decimal, currency: &iso::Currency) -> String {
    Money::from_decimal(amount, currency).to_string()
}

/// Looks up an ISO currency by its alpha code.
///
/// # Errors
///
/// Returns [`PricingError::UnknownCurrency`] when the code is not an ISO currency.
pub fn find_currency(code: &str) -> Result<&'static iso::Currency, PricingError> {
    iso::find(code).ok_or_else(|| PricingError::UnknownCurrency(code.to_string()))
}
