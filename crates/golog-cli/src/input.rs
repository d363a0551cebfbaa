use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use golog_exec::State;
use golog_types::Program;

pub fn load_program(path: &Path) -> Result<Program> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read program {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse program {}", path.display()))
}

/// Initial state from a JSON object, or the empty state.
pub fn load_state(path: Option<&Path>) -> Result<State> {
    let Some(path) = path else {
        return Ok(State::new());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("read state {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse state {}", path.display()))
}
