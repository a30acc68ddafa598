use std::io;

use cartwright_app::{context::AppContext, domain::checkout::models::CheckoutLine};
use clap::Args;
use jiff::Timestamp;

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    /// Product to quote as `ID` or `ID:QTY`; repeat for more lines
    #[arg(long = "product", required = true, value_parser = parse_line)]
    products: Vec<CheckoutLine>,

    /// Coupon code to apply
    #[arg(long)]
    code: Option<String>,

    /// Quote at this instant (RFC 3339); defaults to now
    #[arg(long)]
    at: Option<Timestamp>,
}

fn parse_line(value: &str) -> Result<CheckoutLine, String> {
    let (product, quantity) = match value.split_once(':') {
        Some((product, quantity)) => (
            product,
            quantity
                .parse::<u32>()
                .map_err(|error| format!("invalid quantity `{quantity}`: {error}"))?,
        ),
        None => (value, 1),
    };

    if product.trim().is_empty() {
        return Err("product id cannot be empty".to_string());
    }

    Ok(CheckoutLine::new(product.trim(), quantity))
}

pub(crate) async fn run(ctx: &AppContext, args: QuoteArgs) -> Result<(), String> {
    let quoted = ctx
        .checkout
        .quote(
            args.products,
            args.code,
            args.at.unwrap_or_else(Timestamp::now),
        )
        .await
        .map_err(|error| format!("failed to quote: {error}"))?;

    quoted
        .quote
        .write_to(io::stdout().lock())
        .map_err(|error| format!("failed to write quote: {error}"))?;

    if let Some(verdict) = quoted.verdict.filter(|verdict| !verdict.is_valid()) {
        println!(" Coupon not applied: {}", verdict.describe(ctx.currency));
    }

    Ok(())
}
