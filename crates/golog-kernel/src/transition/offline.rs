use golog_actions::ActionRegistry;
use golog_exec::{State, eval_bool};
use golog_types::{ControlKind, Program};

use super::{Successor, bind_result, evaluate_args, first_pending, resequence};
use crate::error::EngineError;

/// Every successor of one transition, without executing anything.
///
/// Calls contribute their instantiated action to `plan_step` and fold its
/// effect into the successor state. `bind` stores `null` since no result is
/// known until the action runs.
pub fn step_offline(
    program: &Program,
    state: &State,
    registry: &ActionRegistry,
) -> Result<Vec<Successor>, EngineError> {
    match program {
        Program::Block(block) => {
            let Some(idx) = first_pending(&block.statements, state)? else {
                return Ok(vec![Successor::finished(state.clone())]);
            };
            let rest = &block.statements[idx + 1..];
            let successors = step_offline(&block.statements[idx], state, registry)?;
            Ok(successors
                .into_iter()
                .map(|mut successor| {
                    successor.continuation = resequence(successor.continuation, rest.to_vec());
                    successor
                })
                .collect())
        }
        Program::If(branch) => {
            if eval_bool(&branch.test, state)? {
                step_offline(&branch.consequent, state, registry)
            } else if let Some(alternate) = &branch.alternate {
                step_offline(alternate, state, registry)
            } else {
                Ok(vec![Successor::finished(state.clone())])
            }
        }
        Program::Test(test) => {
            if eval_bool(&test.expr, state)? {
                Ok(vec![Successor::finished(state.clone())])
            } else {
                Ok(Vec::new())
            }
        }
        Program::Call(call) => {
            let args = evaluate_args(&call.args, state)?;
            let bound = registry.instantiate(&call.name, args)?;
            if !bound.action.is_possible(state) {
                return Ok(Vec::new());
            }
            let next = bound.action.effect(state);
            Ok(vec![Successor {
                continuation: None,
                state: next,
                result: None,
                plan_step: vec![bound],
                updates: Vec::new(),
            }])
        }
        Program::Bind(bind) => Ok(step_offline(&bind.init, state, registry)?
            .into_iter()
            .map(|successor| bind_result(bind.var.clone(), successor))
            .collect()),
        Program::Control(control) => match control.kind {
            ControlKind::Or => {
                let mut successors = Vec::new();
                for branch in &control.branches {
                    successors.extend(step_offline(branch, state, registry)?);
                }
                Ok(successors)
            }
            ControlKind::Plan => match control.branches.as_slice() {
                [body] => step_offline(body, state, registry),
                branches => Err(EngineError::Unsupported(format!(
                    "plan with {} branches",
                    branches.len()
                ))),
            },
            ControlKind::Conc | ControlKind::Either => Err(EngineError::Unsupported(format!(
                "{} cannot be planned over",
                control.kind
            ))),
        },
        Program::Done => Ok(vec![Successor::finished(state.clone())]),
        Program::Blocked => Err(EngineError::Unsupported(
            "blocked slot outside of a scheduler".into(),
        )),
    }
}
