use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use golog_exec::{State, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Arguments of an action instance, already evaluated against the state.
pub type ActionArgs = IndexMap<String, Value>;

/// A domain action: precondition, pure effect and asynchronous execution.
///
/// `is_possible` and `effect` are consulted by both online runs and the
/// planner. `execute` is only invoked online.
#[async_trait]
pub trait Action: Send + Sync {
    fn is_possible(&self, _state: &State) -> bool {
        true
    }

    /// Successor state. Implementations overwrite only the keys they declare.
    fn effect(&self, state: &State) -> State {
        state.clone()
    }

    /// Performs the action, resolving once it has completed. `Some(value)` is
    /// bound by an enclosing `bind`.
    async fn execute(&self) -> anyhow::Result<Option<Value>>;

    /// Whether invocations appear in the execution history.
    fn recorded(&self) -> bool {
        true
    }
}

/// The `{name, args}` identity of an action instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub name: String,
    #[serde(default)]
    pub args: ActionArgs,
}

impl ActionRecord {
    pub fn new(name: impl Into<String>, args: ActionArgs) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

impl fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (idx, (key, value)) in self.args.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str(")")
    }
}

/// An instantiated action together with the record it was built from.
#[derive(Clone)]
pub struct BoundAction {
    pub record: ActionRecord,
    pub action: Arc<dyn Action>,
}

impl fmt::Debug for BoundAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundAction")
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}
