use anyhow::Result;
use serde::Serialize;

use crate::opts::EngineOpts;

pub fn print_json(opts: &EngineOpts, value: &impl Serialize) -> Result<()> {
    if opts.pretty {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", serde_json::to_string(value)?);
    }
    Ok(())
}
