use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use golog_exec::Value;

use crate::action::Action;

#[derive(Debug, Clone)]
pub struct FailAction {
    message: String,
    latency: Duration,
}

impl FailAction {
    pub fn new(message: impl Into<String>, latency: Duration) -> Self {
        Self {
            message: message.into(),
            latency,
        }
    }
}

#[async_trait]
impl Action for FailAction {
    async fn execute(&self) -> anyhow::Result<Option<Value>> {
        tokio::time::sleep(self.latency).await;
        Err(anyhow!("{}", self.message))
    }
}
