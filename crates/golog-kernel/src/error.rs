use std::fmt;

use golog_actions::{ActionError, ActionRecord};
use golog_exec::{EvalError, State};
use golog_types::{Program, ValidationError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("assertion failed: {expr}")]
    AssertionFailed { expr: String },
    #[error("no transition possible: {reason}")]
    NoTransition { reason: String },
    #[error("action {action} failed: {message}")]
    ActionFailed { action: ActionRecord, message: String },
    #[error("no plan found")]
    PlanNotFound,
    #[error("unsupported construct: {0}")]
    Unsupported(String),
    #[error("branch was abandoned by its enclosing either")]
    Abandoned,
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("expression error: {0}")]
    Eval(#[from] EvalError),
    #[error("invalid program: {0}")]
    Invalid(#[from] ValidationError),
}

impl EngineError {
    pub fn kind(&self) -> FailureKind {
        match self {
            EngineError::AssertionFailed { .. } => FailureKind::Assertion,
            EngineError::NoTransition { .. } => FailureKind::NoTransition,
            EngineError::ActionFailed { .. } => FailureKind::ActionExecution,
            EngineError::PlanNotFound => FailureKind::PlanNotFound,
            EngineError::Unsupported(_) => FailureKind::Unsupported,
            EngineError::Abandoned
            | EngineError::Action(_)
            | EngineError::Eval(_)
            | EngineError::Invalid(_) => FailureKind::Fatal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Assertion,
    NoTransition,
    ActionExecution,
    PlanNotFound,
    Unsupported,
    Fatal,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Assertion => "assertion",
            FailureKind::NoTransition => "no_transition",
            FailureKind::ActionExecution => "action_execution",
            FailureKind::PlanNotFound => "plan_not_found",
            FailureKind::Unsupported => "unsupported",
            FailureKind::Fatal => "fatal",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A run that stopped before its program became final.
#[derive(Debug, Error)]
#[error("run failed: {error}")]
pub struct RunFailure {
    #[source]
    pub error: EngineError,
    /// The program that was left to execute.
    pub program: Program,
    pub state: State,
    pub history: Vec<ActionRecord>,
}

impl RunFailure {
    pub fn kind(&self) -> FailureKind {
        self.error.kind()
    }
}
