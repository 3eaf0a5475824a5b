use crate::estimate::{run_estimate, run_price_matrix, EstimateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use homebuild::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "homebuild-api",
    about = "Serve the construction catalog and estimate building costs from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Price a building against the configured catalog
    Estimate(EstimateArgs),
    /// Inspect the reference catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Print the resolved unit price matrix
    Prices,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Estimate(args) => run_estimate(args),
        Command::Catalog {
            command: CatalogCommand::Prices,
        } => run_price_matrix(),
    }
}
