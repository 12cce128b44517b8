use crate::diag::{run_crm_fields, run_crm_smoke, run_list_smoke, CrmSmokeArgs, ListSmokeArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lead_funnel::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Freedom Funnel Service",
    about = "Run the lead intake and qualification service from the command line",
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
    /// Diagnostics against the configured downstream integrations
    Diag {
        #[command(subcommand)]
        command: DiagCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DiagCommand {
    /// List the CRM list's custom fields and dropdown option ordinals
    CrmFields,
    /// Create a throwaway CRM task to verify credentials and field mapping
    CrmSmoke(CrmSmokeArgs),
    /// Subscribe a test address to verify mailing-list credentials
    ListSmoke(ListSmokeArgs),
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
        Command::Diag {
            command: DiagCommand::CrmFields,
        } => run_crm_fields().await,
        Command::Diag {
            command: DiagCommand::CrmSmoke(args),
        } => run_crm_smoke(args).await,
        Command::Diag {
            command: DiagCommand::ListSmoke(args),
        } => run_list_smoke(args).await,
    }
}
