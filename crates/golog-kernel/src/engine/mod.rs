mod context;
mod driver;

use std::sync::Arc;

use golog_actions::{ActionRecord, ActionRegistry, BoundAction};
use golog_exec::State;
use golog_types::{Program, validate_program};
use serde::Serialize;
use tracing::{info, warn};

pub use context::RunContext;

use crate::config::EngineConfig;
use crate::error::{EngineError, RunFailure};
use crate::planner;

/// Completed online run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub state: State,
    pub history: Vec<ActionRecord>,
}

/// First completing plan found offline.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub trace: Vec<BoundAction>,
    /// State reached by folding the trace's effects; nothing was executed.
    pub state: State,
}

impl PlanOutcome {
    pub fn records(&self) -> Vec<ActionRecord> {
        self.trace.iter().map(|bound| bound.record.clone()).collect()
    }
}

pub struct Engine {
    registry: ActionRegistry,
    config: EngineConfig,
}

impl Engine {
    pub fn new(registry: ActionRegistry, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Executes `program` online from `state`.
    pub async fn run(&self, program: Program, state: State) -> Result<RunReport, RunFailure> {
        if let Err(err) = validate_program(&program) {
            return Err(RunFailure {
                error: err.into(),
                program,
                state,
                history: Vec::new(),
            });
        }
        let ctx = Arc::new(RunContext::new(self.registry.clone(), self.config.clone()));
        info!(program = program.kind(), "run started");
        match driver::drive(program, state, ctx.clone()).await {
            Ok(state) => {
                let history = ctx.history.snapshot();
                info!(actions = history.len(), "run finished");
                Ok(RunReport { state, history })
            }
            Err(failure) => {
                warn!(kind = %failure.kind(), error = %failure.error, "run failed");
                Err(failure)
            }
        }
    }

    /// Searches offline for an action sequence that completes `program`.
    pub fn plan(&self, program: &Program, state: &State) -> Result<Option<PlanOutcome>, EngineError> {
        validate_program(program)?;
        planner::plan(program, state, &self.registry, self.config.plan_depth_limit)
    }
}
