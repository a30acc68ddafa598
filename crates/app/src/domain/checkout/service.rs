//! Checkout service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use cartwright::{
    pricing::{PricedLine, subtotal},
    quote::{Quote, QuoteError, QuoteLine},
};
use jiff::Timestamp;
use mockall::automock;
use rusty_money::iso::Currency;
use tracing::{Span, info};

use crate::domain::{
    catalog::CatalogService,
    checkout::{
        errors::CheckoutError,
        models::{CheckoutLine, CheckoutQuote},
    },
    coupons::CouponsService,
};

#[derive(Clone)]
pub struct CatalogCheckoutService {
    catalog: Arc<dyn CatalogService>,
    coupons: Arc<dyn CouponsService>,
    currency: &'static Currency,
}

impl fmt::Debug for CatalogCheckoutService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogCheckoutService")
            .field("currency", &self.currency.iso_alpha_code)
            .finish_non_exhaustive()
    }
}

impl CatalogCheckoutService {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        coupons: Arc<dyn CouponsService>,
        currency: &'static Currency,
    ) -> Self {
        Self {
            catalog,
            coupons,
            currency,
        }
    }

    async fn price_lines(
        &self,
        lines: Vec<CheckoutLine>,
    ) -> Result<Vec<QuoteLine>, CheckoutError> {
        let mut priced = Vec::with_capacity(lines.len());

        for line in lines {
            if line.quantity == 0 {
                return Err(CheckoutError::InvalidQuantity);
            }

            let product = self.catalog.get_product(&line.product).await?;

            priced.push(QuoteLine {
                name: product.name,
                priced: PricedLine::new(product.price, line.quantity),
            });
        }

        Ok(priced)
    }
}

#[async_trait]
impl CheckoutService for CatalogCheckoutService {
    #[tracing::instrument(
        name = "checkout.service.quote",
        skip(self, lines),
        fields(line_count = lines.len(), total = tracing::field::Empty),
        err
    )]
    async fn quote(
        &self,
        lines: Vec<CheckoutLine>,
        code: Option<String>,
        now: Timestamp,
    ) -> Result<CheckoutQuote, CheckoutError> {
        let lines = self.price_lines(lines).await?;

        let evaluation = match code.as_deref() {
            Some(code) => {
                let priced: Vec<PricedLine> = lines.iter().map(|line| line.priced).collect();
                let subtotal = subtotal(&priced).map_err(QuoteError::from)?;

                Some(self.coupons.evaluate(code, subtotal, now).await?)
            }
            None => None,
        };

        let coupon = evaluation
            .as_ref()
            .and_then(|evaluation| evaluation.applicable());

        let quote = Quote::build(lines, coupon, now, self.currency)?;

        Span::current().record("total", tracing::field::display(quote.total()));

        if let Some(coupon) = coupon {
            info!(code = %coupon.code, discount = %quote.discount(), "applied coupon");
        }

        Ok(CheckoutQuote {
            verdict: evaluation.map(|evaluation| evaluation.verdict),
            quote,
        })
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Price `lines` and apply `code` when it is valid for their subtotal at `now`.
    ///
    /// The discount never exceeds the subtotal, so the total is never negative.
    async fn quote(
        &self,
        lines: Vec<CheckoutLine>,
        code: Option<String>,
        now: Timestamp,
    ) -> Result<CheckoutQuote, CheckoutError>;
}
