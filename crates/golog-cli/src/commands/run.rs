//! `golog run` command.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use serde_json::json;
use tracing::info;

use crate::input::{load_program, load_state};
use crate::opts::EngineOpts;
use crate::output::print_json;

use super::create_engine;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Program as JSON
    pub program: PathBuf,

    /// Initial state as a JSON object
    #[arg(long)]
    pub state: Option<PathBuf>,
}

pub async fn cmd_run(opts: &EngineOpts, args: &RunArgs) -> Result<()> {
    let program = load_program(&args.program)?;
    let state = load_state(args.state.as_deref())?;
    let engine = create_engine(opts);
    info!(program = %args.program.display(), "running");

    match engine.run(program, state).await {
        Ok(report) => print_json(opts, &report),
        Err(failure) => {
            print_json(
                opts,
                &json!({
                    "error": {
                        "kind": failure.kind(),
                        "message": failure.error.to_string(),
                    },
                    "state": failure.state,
                    "history": failure.history,
                    "program": failure.program,
                }),
            )?;
            bail!("run failed ({}): {}", failure.kind(), failure.error);
        }
    }
}
