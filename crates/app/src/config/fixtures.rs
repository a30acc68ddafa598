//! Fixtures Config

use std::path::PathBuf;

use cartwright::{
    fixtures::{Fixture, FixtureError},
    pricing::{DEFAULT_CURRENCY, PricingError, find_currency},
};
use clap::Args;
use rusty_money::iso::Currency;

/// Fixture data settings.
#[derive(Debug, Args)]
pub struct FixturesConfig {
    /// Directory holding `products/` and `coupons/` fixture files
    #[arg(
        long,
        env = "CARTWRIGHT_FIXTURES_DIR",
        default_value = "./fixtures",
        global = true
    )]
    pub fixtures_dir: PathBuf,

    /// Fixture set name, loaded from `<dir>/products/<set>.yml` and `<dir>/coupons/<set>.yml`
    #[arg(
        long,
        env = "CARTWRIGHT_FIXTURE_SET",
        default_value = "default",
        global = true
    )]
    pub fixture_set: String,

    /// Display currency; defaults to the product fixture's currency
    #[arg(long, env = "CARTWRIGHT_CURRENCY", global = true)]
    pub currency: Option<String>,
}

impl FixturesConfig {
    /// Load the configured fixture set.
    ///
    /// # Errors
    ///
    /// Returns an error if a fixture file is missing or malformed.
    pub fn load(&self) -> Result<Fixture, FixtureError> {
        let mut fixture = Fixture::with_base_path(self.fixtures_dir.clone());

        fixture
            .load_products(&self.fixture_set)?
            .load_coupons(&self.fixture_set)?;

        Ok(fixture)
    }

    /// The configured currency, falling back to the fixture's and then to USD.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured code is not an ISO currency.
    pub fn resolve_currency(
        &self,
        fixture: &Fixture,
    ) -> Result<&'static Currency, PricingError> {
        match &self.currency {
            Some(code) => find_currency(code),
            None => Ok(fixture.currency().unwrap_or(DEFAULT_CURRENCY)),
        }
    }
}
