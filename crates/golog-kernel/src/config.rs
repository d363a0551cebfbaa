use tracing::warn;

pub const PLAN_DEPTH_LIMIT_ENV: &str = "GOLOG_PLAN_DEPTH_LIMIT";

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Maximum number of transitions the planner explores along one branch.
    /// `None` searches without bound.
    pub plan_depth_limit: Option<usize>,
}

impl EngineConfig {
    /// Defaults overridden by `GOLOG_PLAN_DEPTH_LIMIT` when it parses.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(PLAN_DEPTH_LIMIT_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(limit) => config.plan_depth_limit = Some(limit),
                Err(err) => warn!(value = %raw, error = %err, "ignoring {PLAN_DEPTH_LIMIT_ENV}"),
            }
        }
        config
    }
}
