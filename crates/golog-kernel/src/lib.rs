//! Transition semantics, online driver, planner and concurrency scheduler.
//!
//! A program is advanced one transition at a time. Online transitions perform
//! actions and resolve when they complete; offline transitions only fold
//! effects and are what the planner searches over.

pub mod config;
mod engine;
pub mod error;
mod finality;
mod planner;
mod scheduler;
mod transition;

pub use config::EngineConfig;
pub use engine::{Engine, PlanOutcome, RunContext, RunReport};
pub use error::{EngineError, FailureKind, RunFailure};
pub use finality::is_final;
pub use planner::plan;
pub use transition::{StepFuture, Successor, step_offline, step_online};
