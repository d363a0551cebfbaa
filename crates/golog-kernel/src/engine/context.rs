use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use golog_actions::{ActionRegistry, ExecutionHistory};

use crate::config::EngineConfig;

/// Everything one run threads through its transitions. Created per run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub(crate) registry: ActionRegistry,
    pub(crate) config: EngineConfig,
    pub(crate) history: ExecutionHistory,
    abandoned: Vec<Arc<AtomicBool>>,
}

impl RunContext {
    pub fn new(registry: ActionRegistry, config: EngineConfig) -> Self {
        Self {
            registry,
            config,
            history: ExecutionHistory::new(),
            abandoned: Vec::new(),
        }
    }

    /// Context for the branches of one concurrent construct, plus the flag
    /// that marks them abandoned.
    pub(crate) fn scoped(&self) -> (Arc<RunContext>, Arc<AtomicBool>) {
        let flag = Arc::new(AtomicBool::new(false));
        let mut scoped = self.clone();
        scoped.abandoned.push(flag.clone());
        (Arc::new(scoped), flag)
    }

    /// True once any enclosing `either` has been decided against this branch.
    pub(crate) fn is_abandoned(&self) -> bool {
        self.abandoned.iter().any(|flag| flag.load(Ordering::Acquire))
    }
}
