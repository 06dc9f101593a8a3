use crate::demo::{run_demo, run_evaluate, run_project, DemoArgs, EvaluateArgs, ProjectArgs};
use crate::server;
use cgpa_engine::config::AppConfig;
use cgpa_engine::error::AppError;
use cgpa_engine::telemetry::{self, LogSink};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "CGPA Calculator",
    about = "Compute course grades, SGPA/CGPA, and target-grade projections",
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
    /// Grade a term described in a JSON request file
    Evaluate(EvaluateArgs),
    /// Work out the scores a pending course still needs for a target grade
    Project(ProjectArgs),
    /// Grade a sample four-course term with the default EC weights
    Demo(DemoArgs),
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
        Command::Evaluate(args) => run_evaluate(&offline_config()?, args),
        Command::Project(args) => run_project(&offline_config()?, args),
        Command::Demo(args) => run_demo(&offline_config()?, args),
    }
}

/// Configuration for one-shot commands; logs go to stderr so stdout stays a report.
fn offline_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogSink::Stderr)?;
    Ok(config)
}
