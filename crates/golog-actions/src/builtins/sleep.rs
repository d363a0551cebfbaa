use std::time::Duration;

use async_trait::async_trait;
use golog_exec::Value;
use tracing::debug;

use crate::action::Action;

/// Timing primitive; completes with `true` after `duration`.
#[derive(Debug, Clone)]
pub struct SleepAction {
    duration: Duration,
}

impl SleepAction {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

#[async_trait]
impl Action for SleepAction {
    async fn execute(&self) -> anyhow::Result<Option<Value>> {
        debug!(millis = self.duration.as_millis() as u64, "sleep");
        tokio::time::sleep(self.duration).await;
        Ok(Some(Value::Bool(true)))
    }

    fn recorded(&self) -> bool {
        false
    }
}
