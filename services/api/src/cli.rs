use clap::{Args, Parser, Subcommand};
use registrar::error::AppError;

use crate::demo::{run_demo, run_eligibility_report, DemoArgs, ReportArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Registrar Eligibility Service",
    about = "Run the course eligibility service or generate reports from the command line",
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
    /// Work with eligibility reports without starting the server
    Eligibility {
        #[command(subcommand)]
        command: EligibilityCommand,
    },
    /// Run an end-to-end CLI demo covering grading, eligibility, and enrollment
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum EligibilityCommand {
    /// Evaluate the demo catalog against a completed-course set
    Report(ReportArgs),
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
        Command::Eligibility {
            command: EligibilityCommand::Report(args),
        } => run_eligibility_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
