use cartwright_app::{config::AppConfig, context::AppContext, observability};
use clap::{Parser, Subcommand};

mod coupons;
mod products;
mod quote;

#[derive(Debug, Parser)]
#[command(name = "cartwright-app", about = "Cartwright CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Coupons(coupons::CouponsCommand),
    Products(products::ProductsCommand),
    Quote(quote::QuoteArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init_subscriber(&self.config.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let fixture = self
            .config
            .fixtures
            .load()
            .map_err(|error| format!("failed to load fixtures: {error}"))?;

        let currency = self
            .config
            .fixtures
            .resolve_currency(&fixture)
            .map_err(|error| format!("invalid currency: {error}"))?;

        let ctx = AppContext::from_fixture(&fixture, currency)
            .await
            .map_err(|error| format!("failed to initialise store: {error}"))?;

        match self.command {
            Commands::Coupons(command) => coupons::run(&ctx, command).await,
            Commands::Products(command) => products::run(&ctx, command).await,
            Commands::Quote(args) => quote::run(&ctx, args).await,
        }
    }
}
