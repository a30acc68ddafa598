use cartwright_app::context::AppContext;
use clap::{Args, Subcommand};

mod list;

#[derive(Debug, Args)]
pub(crate) struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    List,
}

pub(crate) async fn run(ctx: &AppContext, command: ProductsCommand) -> Result<(), String> {
    match command.command {
        ProductsSubcommand::List => list::run(ctx).await,
    }
}
