use async_trait::async_trait;
use golog_exec::Value;

use crate::action::Action;

/// Completes immediately with its argument as the result.
#[derive(Debug, Clone)]
pub struct IdentityAction {
    value: Value,
}

impl IdentityAction {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

#[async_trait]
impl Action for IdentityAction {
    async fn execute(&self) -> anyhow::Result<Option<Value>> {
        Ok(Some(self.value.clone()))
    }

    fn recorded(&self) -> bool {
        false
    }
}
