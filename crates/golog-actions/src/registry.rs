use std::collections::HashMap;
use std::sync::Arc;

use golog_exec::Value;
use thiserror::Error;

use crate::action::{Action, ActionArgs, ActionRecord, BoundAction};

pub type ActionConstructor =
    Arc<dyn Fn(&ActionArgs) -> Result<Arc<dyn Action>, ActionError> + Send + Sync>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("unknown action '{0}'")]
    Unknown(String),
    #[error("invalid arguments for '{action}': {reason}")]
    InvalidArgs { action: String, reason: String },
}

impl ActionError {
    pub fn invalid_args(action: &str, reason: impl Into<String>) -> Self {
        ActionError::InvalidArgs {
            action: action.to_string(),
            reason: reason.into(),
        }
    }
}

/// Name-to-constructor table supplied to the engine. Cheap to clone.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    constructors: HashMap<String, ActionConstructor>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `constructor` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&ActionArgs) -> Result<Arc<dyn Action>, ActionError> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Arc::new(constructor));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    pub fn instantiate(&self, name: &str, args: ActionArgs) -> Result<BoundAction, ActionError> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| ActionError::Unknown(name.to_string()))?;
        let action = constructor(&args)?;
        Ok(BoundAction {
            record: ActionRecord::new(name, args),
            action,
        })
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("ActionRegistry").field("actions", &names).finish()
    }
}

pub fn required_arg<'a>(action: &str, args: &'a ActionArgs, key: &str) -> Result<&'a Value, ActionError> {
    args.get(key)
        .ok_or_else(|| ActionError::invalid_args(action, format!("missing argument '{key}'")))
}

pub fn optional_arg<'a>(args: &'a ActionArgs, key: &str) -> Option<&'a Value> {
    args.get(key).filter(|value| !value.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl Action for Noop {
        async fn execute(&self) -> anyhow::Result<Option<Value>> {
            Ok(None)
        }
    }

    fn registry() -> ActionRegistry {
        let mut registry = ActionRegistry::new();
        registry.register("Noop", |args: &ActionArgs| {
            required_arg("Noop", args, "id")?;
            Ok(Arc::new(Noop) as Arc<dyn Action>)
        });
        registry
    }

    #[test]
    fn unknown_action_fails_fast() {
        let err = registry().instantiate("Launch", ActionArgs::new()).unwrap_err();
        assert_eq!(err, ActionError::Unknown("Launch".into()));
    }

    #[test]
    fn constructor_can_reject_args() {
        let err = registry().instantiate("Noop", ActionArgs::new()).unwrap_err();
        assert!(matches!(err, ActionError::InvalidArgs { ref action, .. } if action == "Noop"));
    }

    #[test]
    fn instantiate_keeps_record() {
        let mut args = ActionArgs::new();
        args.insert("id".into(), Value::Int(7));
        let bound = registry().instantiate("Noop", args.clone()).unwrap();
        assert_eq!(bound.record, ActionRecord::new("Noop", args));
        assert_eq!(bound.record.to_string(), "Noop(id: 7)");
    }
}
