use cartwright_app::context::AppContext;
use clap::{Args, Subcommand};

mod check;
mod list;

#[derive(Debug, Args)]
pub(crate) struct CouponsCommand {
    #[command(subcommand)]
    command: CouponsSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponsSubcommand {
    List(list::ListCouponsArgs),
    Check(check::CheckCouponArgs),
}

pub(crate) async fn run(ctx: &AppContext, command: CouponsCommand) -> Result<(), String> {
    match command.command {
        CouponsSubcommand::List(args) => list::run(ctx, args).await,
        CouponsSubcommand::Check(args) => check::run(ctx, args).await,
    }
}
