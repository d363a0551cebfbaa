//! `golog plan` command.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use tracing::info;

use crate::input::{load_program, load_state};
use crate::opts::EngineOpts;
use crate::output::print_json;

use super::create_engine;

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Program as JSON
    pub program: PathBuf,

    /// Initial state as a JSON object
    #[arg(long)]
    pub state: Option<PathBuf>,
}

pub fn cmd_plan(opts: &EngineOpts, args: &PlanArgs) -> Result<()> {
    let program = load_program(&args.program)?;
    let state = load_state(args.state.as_deref())?;
    let engine = create_engine(opts);
    info!(program = %args.program.display(), "planning");

    match engine.plan(&program, &state)? {
        Some(outcome) => print_json(opts, &outcome.records()),
        None => bail!("no plan completes the program"),
    }
}
