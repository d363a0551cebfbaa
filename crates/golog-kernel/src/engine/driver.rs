use std::sync::Arc;

use golog_exec::State;
use golog_types::Program;

use super::RunContext;
use crate::error::{EngineError, RunFailure};
use crate::finality::is_final;
use crate::transition::step_online;

/// Steps `program` online until it is final or a transition fails.
pub(crate) async fn drive(
    mut program: Program,
    mut state: State,
    ctx: Arc<RunContext>,
) -> Result<State, RunFailure> {
    loop {
        match is_final(&program, &state) {
            Ok(true) => return Ok(state),
            Ok(false) => {}
            Err(error) => return Err(failure(error, program, state, &ctx)),
        }
        match step_online(program.clone(), state.clone(), ctx.clone()).await {
            Ok(successor) => {
                state = successor.state;
                match successor.continuation {
                    Some(next) => program = next,
                    None => return Ok(state),
                }
            }
            Err(error) => return Err(failure(error, program, state, &ctx)),
        }
    }
}

fn failure(error: EngineError, program: Program, state: State, ctx: &RunContext) -> RunFailure {
    RunFailure {
        error,
        program,
        state,
        history: ctx.history.snapshot(),
    }
}
