use std::time::Duration;

use async_trait::async_trait;
use golog_exec::Value;

use crate::action::Action;

/// Always possible, changes nothing, completes after a fixed latency.
#[derive(Debug, Clone)]
pub struct GenericAction {
    latency: Duration,
}

impl GenericAction {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl Action for GenericAction {
    async fn execute(&self) -> anyhow::Result<Option<Value>> {
        tokio::time::sleep(self.latency).await;
        Ok(None)
    }
}
