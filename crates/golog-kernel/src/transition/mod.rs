//! The single-step transition relation, offline and online.

mod offline;
mod online;

use futures::future::BoxFuture;
use golog_actions::{ActionArgs, BoundAction};
use golog_exec::{State, Value, eval_expr};
use golog_types::{ArgExprs, Program};

use crate::error::EngineError;

pub use offline::step_offline;
pub use online::step_online;

/// One change an online transition made to the state, in the order it was made.
#[derive(Debug, Clone)]
pub enum StateUpdate {
    /// A completed action; its effect is re-derived from whatever state it is
    /// replayed against.
    Effect(BoundAction),
    /// A `bind` storing an action result.
    Bind { var: String, value: Value },
}

impl StateUpdate {
    pub fn apply(&self, state: &mut State) {
        match self {
            StateUpdate::Effect(bound) => *state = bound.action.effect(state),
            StateUpdate::Bind { var, value } => {
                state.bind_var(var.clone(), value.clone());
            }
        }
    }
}

/// Resolves once an online transition has completed.
pub type StepFuture = BoxFuture<'static, Result<Successor, EngineError>>;

/// One outcome of a transition.
#[derive(Debug, Clone)]
pub struct Successor {
    /// What is left to execute; `None` when nothing remains.
    pub continuation: Option<Program>,
    pub state: State,
    /// Result reported by a completed action, consumed by an enclosing `bind`.
    pub result: Option<Value>,
    /// Actions this transition contributes to a plan trace (offline only).
    pub plan_step: Vec<BoundAction>,
    /// Changes behind `state`, replayable onto a state shared with concurrent
    /// branches.
    pub updates: Vec<StateUpdate>,
}

impl Successor {
    /// A transition that finished without leaving anything to execute.
    pub fn finished(state: State) -> Self {
        Self {
            continuation: None,
            state,
            result: None,
            plan_step: Vec::new(),
            updates: Vec::new(),
        }
    }

    /// The program the successor continues with, `Done` when nothing remains.
    pub fn remaining(&self) -> Program {
        self.continuation.clone().unwrap_or(Program::Done)
    }
}

pub(crate) fn evaluate_args(args: &ArgExprs, state: &State) -> Result<ActionArgs, EngineError> {
    let evaluated = args
        .iter()
        .map(|(key, expr)| eval_expr(expr, state).map(|value| (key.clone(), value)))
        .collect::<Result<ActionArgs, _>>()?;
    Ok(evaluated)
}

/// Puts a stepped statement's continuation back in front of the rest of its block.
pub(crate) fn resequence(head: Option<Program>, mut rest: Vec<Program>) -> Option<Program> {
    if let Some(head) = head {
        rest.insert(0, head);
    }
    if rest.is_empty() {
        None
    } else {
        Some(Program::block(rest))
    }
}

/// Re-wraps an unfinished initializer, or binds the finished one's result.
pub(crate) fn bind_result(var: String, mut successor: Successor) -> Successor {
    match successor.continuation.take() {
        Some(init) => successor.continuation = Some(Program::bind(var, init)),
        None => {
            let value = successor.result.take().unwrap_or_default();
            successor.state.bind_var(var.clone(), value.clone());
            successor.updates.push(StateUpdate::Bind { var, value });
        }
    }
    successor
}

/// Index of the first statement that still needs a transition.
pub(crate) fn first_pending(statements: &[Program], state: &State) -> Result<Option<usize>, EngineError> {
    for (idx, statement) in statements.iter().enumerate() {
        if !crate::finality::is_final(statement, state)? {
            return Ok(Some(idx));
        }
    }
    Ok(None)
}
