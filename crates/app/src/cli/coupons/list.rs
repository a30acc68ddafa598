use cartwright::coupons::{CouponSummary, is_valid};
use cartwright_app::context::AppContext;
use clap::Args;
use jiff::Timestamp;

#[derive(Debug, Args)]
pub(crate) struct ListCouponsArgs {
    /// Only list coupons that are valid at this instant (RFC 3339)
    #[arg(long)]
    valid_at: Option<Timestamp>,
}

pub(crate) async fn run(ctx: &AppContext, args: ListCouponsArgs) -> Result<(), String> {
    let coupons = ctx
        .coupons
        .list_coupons()
        .await
        .map_err(|error| format!("failed to list coupons: {error}"))?;

    for coupon in coupons
        .iter()
        .filter(|coupon| args.valid_at.is_none_or(|at| is_valid(coupon, at)))
    {
        let status = if coupon.is_active { "" } else { " [inactive]" };

        println!("{}{status}", CouponSummary::new(coupon, ctx.currency));
    }

    Ok(())
}
