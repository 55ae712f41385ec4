use crate::report::{run_score, run_supplier_analysis, ScoreArgs, SupplierAnalysisArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use freight_risk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Freight Risk",
    about = "Score freight suppliers, routes and shipments for risk, or serve the scoring API",
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
    /// Work with the supplier catalog
    Suppliers {
        #[command(subcommand)]
        command: SuppliersCommand,
    },
    /// Score a single candidate from the command line
    Score(ScoreArgs),
}

#[derive(Subcommand, Debug)]
enum SuppliersCommand {
    /// Score every catalog supplier and print the ranking
    Analyze(SupplierAnalysisArgs),
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
        Command::Suppliers {
            command: SuppliersCommand::Analyze(args),
        } => run_supplier_analysis(args),
        Command::Score(args) => run_score(args),
    }
}
