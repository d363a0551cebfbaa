//! Global options shared by every command.

use std::time::Duration;

use clap::Args;
use golog_actions::BuiltinConfig;
use golog_kernel::EngineConfig;

#[derive(Args, Debug, Clone)]
pub struct EngineOpts {
    /// Cap on planner search depth (default: unbounded, env: GOLOG_PLAN_DEPTH_LIMIT)
    #[arg(long, global = true)]
    pub plan_depth_limit: Option<usize>,

    /// Completion time of simulated actions in milliseconds
    #[arg(long, global = true)]
    pub latency_ms: Option<u64>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}

impl EngineOpts {
    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::from_env();
        if let Some(limit) = self.plan_depth_limit {
            config.plan_depth_limit = Some(limit);
        }
        config
    }

    pub fn builtin_config(&self) -> BuiltinConfig {
        let mut config = BuiltinConfig::default();
        if let Some(ms) = self.latency_ms {
            config.action_latency = Duration::from_millis(ms);
        }
        config
    }
}
