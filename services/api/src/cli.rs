use crate::form_tools::{run_check, run_evaluate, FormCheckArgs, FormEvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use recruit_portal::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Recruitment Portal",
    about = "Serve the recruitment portal API or inspect custom application forms",
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
    /// Validate and dry-run custom field forms from JSON files
    Form {
        #[command(subcommand)]
        command: FormCommand,
    },
}

#[derive(Subcommand, Debug)]
enum FormCommand {
    /// Check a form definition for reference and rule errors
    Check(FormCheckArgs),
    /// Evaluate answers against a form and print the per-field outcome
    Evaluate(FormEvaluateArgs),
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
        Command::Form {
            command: FormCommand::Check(args),
        } => run_check(args),
        Command::Form {
            command: FormCommand::Evaluate(args),
        } => run_evaluate(args),
    }
}
