mod commands;
mod input;
mod opts;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::plan::PlanArgs;
use commands::run::RunArgs;
use opts::EngineOpts;

#[derive(Parser, Debug)]
#[command(name = "golog", version, about = "Golog program interpreter")]
struct Cli {
    #[command(flatten)]
    opts: EngineOpts,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a program online, performing its actions
    Run(RunArgs),

    /// Search offline for an action sequence that completes a program
    Plan(PlanArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();
    let opts = &cli.opts;

    match cli.command {
        Command::Run(args) => commands::run::cmd_run(opts, &args).await,
        Command::Plan(args) => commands::plan::cmd_plan(opts, &args),
    }
}

/// Logs go to stderr so stdout carries only JSON results.
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}
