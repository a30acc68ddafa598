//! Integration tests for quoting carts against the default fixture set.
//!
//! Catalogue (USD):
//!
//! - mug: $12.50
//! - tea: $5.00
//! - kettle: $45.00
//! - tote: $18.00
//!
//! Coupons:
//!
//! - TEN: 10% off, minimum purchase $50.00
//! - FIVER: $5.00 off
//! - SPRING: 15% off, expired at the end of April 2026
//! - RETIRED: 20% off, switched off

use jiff::Timestamp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use testresult::TestResult;

use cartwright::{
    coupons::CouponSummary,
    fixtures::{Fixture, FixtureError},
    pricing::PricedLine,
    quote::{Quote, QuoteLine},
};

fn lines(fixture: &Fixture, cart: &[(&str, u32)]) -> Result<Vec<QuoteLine>, FixtureError> {
    cart.iter()
        .map(|(id, quantity)| {
            let product = fixture.product(id)?;

            Ok(QuoteLine {
                name: product.name.clone(),
                priced: PricedLine::new(product.price, *quantity),
            })
        })
        .collect()
}

fn october() -> Result<Timestamp, jiff::Error> {
    "2026-10-19T12:00:00Z".parse()
}

#[test]
fn minimum_purchase_coupon_applies_once_the_floor_is_reached() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let ten = fixture.coupon_by_code("TEN");

    // $12.50 * 2 + $5.00 * 3 = $40.00, below the $50.00 floor
    let small = Quote::build(
        lines(&fixture, &[("mug", 2), ("tea", 3)])?,
        ten,
        october()?,
        fixture.currency()?,
    )?;

    assert_eq!(small.subtotal(), dec!(40));
    assert_eq!(small.discount(), Decimal::ZERO);
    assert_eq!(small.total(), dec!(40));

    // $45.00 + $12.50 * 2 = $70.00, 10% off
    let large = Quote::build(
        lines(&fixture, &[("kettle", 1), ("mug", 2)])?,
        ten,
        october()?,
        fixture.currency()?,
    )?;

    assert_eq!(large.subtotal(), dec!(70));
    assert_eq!(large.discount(), dec!(7));
    assert_eq!(large.total(), dec!(63));

    Ok(())
}

#[test]
fn expired_and_inactive_coupons_grant_nothing() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let cart = lines(&fixture, &[("kettle", 2)])?;

    for code in ["SPRING", "RETIRED"] {
        let quote = Quote::build(
            cart.clone(),
            fixture.coupon_by_code(code),
            october()?,
            fixture.currency()?,
        )?;

        assert_eq!(quote.discount(), Decimal::ZERO, "discount for {code}");
        assert_eq!(quote.total(), dec!(90), "total for {code}");
    }

    Ok(())
}

#[test]
fn flat_coupon_never_takes_total_below_zero() -> TestResult {
    let fixture = Fixture::from_set("default")?;

    let quote = Quote::build(
        lines(&fixture, &[("tea", 0)])?,
        fixture.coupon_by_code("FIVER"),
        october()?,
        fixture.currency()?,
    )?;

    assert_eq!(quote.subtotal(), Decimal::ZERO);
    assert_eq!(quote.total(), Decimal::ZERO);

    Ok(())
}

#[test]
fn coupon_summaries_are_listed_by_code() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let currency = fixture.currency()?;

    let summaries: Vec<String> = fixture
        .coupons()
        .into_iter()
        .map(|coupon| CouponSummary::new(coupon, currency).to_string())
        .collect();

    assert_eq!(summaries.len(), 4);
    assert!(
        summaries.first().is_some_and(|s| s.starts_with("FIVER: $5.00 off")),
        "got {summaries:?}"
    );
    assert!(
        summaries
            .iter()
            .any(|s| s == "SPRING: 15% off - Expires 2026-04-30"),
        "got {summaries:?}"
    );
    assert!(
        summaries
            .iter()
            .any(|s| s == "TEN: 10% off (min. purchase $50.00)"),
        "got {summaries:?}"
    );

    Ok(())
}
