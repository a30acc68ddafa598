use cartwright::pricing::format_amount;
use cartwright_app::context::AppContext;
use clap::Args;
use jiff::Timestamp;
use rust_decimal::Decimal;

#[derive(Debug, Args)]
pub(crate) struct CheckCouponArgs {
    /// Code the shopper typed
    #[arg(long)]
    code: String,

    /// Purchase subtotal to check the minimum purchase against
    #[arg(long)]
    subtotal: Decimal,

    /// Evaluate at this instant (RFC 3339); defaults to now
    #[arg(long)]
    at: Option<Timestamp>,
}

pub(crate) async fn run(ctx: &AppContext, args: CheckCouponArgs) -> Result<(), String> {
    if args.subtotal.is_sign_negative() {
        return Err("subtotal cannot be negative".to_string());
    }

    let evaluation = ctx
        .coupons
        .evaluate(
            &args.code,
            args.subtotal,
            args.at.unwrap_or_else(Timestamp::now),
        )
        .await
        .map_err(|error| format!("failed to check coupon: {error}"))?;

    println!("code: {}", args.code);
    println!("verdict: {}", evaluation.verdict.describe(ctx.currency));
    println!(
        "discount: {}",
        format_amount(evaluation.discount, ctx.currency)
    );

    Ok(())
}
