//! Quote
//!
//! A checkout quote prices cart lines, applies at most one coupon and settles the total. The
//! coupon engine never caps a discount; the quote does, so a total never drops below zero.

use std::io;

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    coupons::{CouponCode, compute_discount},
    pricing::{PricedLine, PricingError, format_amount, subtotal},
};

/// Errors that can occur when building or rendering a quote.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Error pricing the quote lines.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("failed to write quote")]
    Io(#[source] io::Error),
}

/// A named line on a quote.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteLine {
    /// Product name shown to the shopper
    pub name: String,

    /// Unit price and quantity
    pub priced: PricedLine,
}

/// Priced checkout summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    lines: Vec<QuoteLine>,
    subtotal: Decimal,
    coupon: Option<String>,
    discount: Decimal,
    total: Decimal,
    currency: &'static Currency,
}

impl Quote {
    /// Build a quote for `lines`, applying `coupon` as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::Pricing`] when a line cannot be priced.
    pub fn build(
        lines: Vec<QuoteLine>,
        coupon: Option<&CouponCode>,
        now: Timestamp,
        currency: &'static Currency,
    ) -> Result<Self, QuoteError> {
        let priced: Vec<PricedLine> = lines.iter().map(|line| line.priced).collect();
        let subtotal = subtotal(&priced)?;

        let discount = coupon
            .map(|coupon| compute_discount(coupon, subtotal, now))
            .unwrap_or_default()
            .min(subtotal);

        Ok(Self {
            lines,
            subtotal,
            coupon: coupon.map(|coupon| coupon.code.clone()),
            discount,
            total: subtotal - discount,
            currency,
        })
    }

    /// Sum of all line totals
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// Discount applied, never more than the subtotal
    pub fn discount(&self) -> Decimal {
        self.discount
    }

    /// Amount payable
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Code of the coupon offered to the quote, if any
    pub fn coupon(&self) -> Option<&str> {
        self.coupon.as_deref()
    }

    /// Quote lines
    pub fn lines(&self) -> &[QuoteLine] {
        &self.lines
    }

    /// Renders the quote as a table followed by its totals.
    ///
    /// # Errors
    ///
    /// Returns an error if a line cannot be priced or the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), QuoteError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Qty", "Unit Price", "Line Total"]);

        for line in &self.lines {
            builder.push_record([
                line.name.clone(),
                line.priced.quantity().to_string(),
                format_amount(line.priced.unit_price(), self.currency),
                format_amount(line.priced.line_total()?, self.currency),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(1..4), Alignment::right());

        writeln!(out, "{table}").map_err(QuoteError::Io)?;
        writeln!(out, " Subtotal: {}", format_amount(self.subtotal, self.currency))
            .map_err(QuoteError::Io)?;

        if let Some(code) = &self.coupon {
            writeln!(
                out,
                " Discount ({code}): -{}",
                format_amount(self.discount, self.currency)
            )
            .map_err(QuoteError::Io)?;
        }

        writeln!(out, " Total: {}", format_amount(self.total, self.currency))
            .map_err(QuoteError::Io)?;

        Ok(())
    }
}
