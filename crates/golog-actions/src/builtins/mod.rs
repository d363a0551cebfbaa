//! Generic actions available to every program.

mod fail;
mod generic;
mod identity;
mod sleep;

use std::sync::Arc;
use std::time::Duration;

pub use fail::FailAction;
pub use generic::GenericAction;
pub use identity::IdentityAction;
pub use sleep::SleepAction;

use crate::action::{Action, ActionArgs};
use crate::registry::{ActionRegistry, optional_arg, required_arg};

#[derive(Debug, Clone)]
pub struct BuiltinConfig {
    /// Simulated completion time of `Action` and `Fail`.
    pub action_latency: Duration,
}

impl Default for BuiltinConfig {
    fn default() -> Self {
        Self {
            action_latency: Duration::from_millis(100),
        }
    }
}

/// Installs `Action` (alias `A`), `Sleep`, `Identity` and `Fail`.
pub fn register_builtins(registry: &mut ActionRegistry, config: &BuiltinConfig) {
    let latency = config.action_latency;
    let generic = move |_args: &ActionArgs| -> Result<Arc<dyn Action>, crate::ActionError> {
        Ok(Arc::new(GenericAction::new(latency)))
    };
    registry.register("Action", generic);
    registry.register("A", generic);
    registry.register("Sleep", |args: &ActionArgs| {
        let time = required_arg("Sleep", args, "time")?;
        let millis = time.as_u64().ok_or_else(|| {
            crate::ActionError::invalid_args("Sleep", format!("time must be a non-negative integer, got {time}"))
        })?;
        Ok(Arc::new(SleepAction::new(Duration::from_millis(millis))) as Arc<dyn Action>)
    });
    registry.register("Identity", |args: &ActionArgs| {
        let value = optional_arg(args, "value").cloned().unwrap_or_default();
        Ok(Arc::new(IdentityAction::new(value)) as Arc<dyn Action>)
    });
    registry.register("Fail", move |args: &ActionArgs| {
        let message = match optional_arg(args, "message") {
            Some(value) => value
                .as_text()
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
            None => "action failed".to_string(),
        };
        Ok(Arc::new(FailAction::new(message, latency)) as Arc<dyn Action>)
    });
}
