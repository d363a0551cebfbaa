//! Action capability contract shared by the engine and domain libraries.
//!
//! Domains register constructors by name in an [`ActionRegistry`]; the engine
//! instantiates them with evaluated arguments and drives them through the
//! [`Action`] trait. Online runs append to an [`ExecutionHistory`].

mod action;
pub mod builtins;
mod history;
mod registry;

pub use action::{Action, ActionArgs, ActionRecord, BoundAction};
pub use builtins::{BuiltinConfig, register_builtins};
pub use history::ExecutionHistory;
pub use registry::{ActionConstructor, ActionError, ActionRegistry, optional_arg, required_arg};
