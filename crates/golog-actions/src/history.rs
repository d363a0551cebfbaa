use std::sync::{Arc, Mutex, MutexGuard};

use crate::action::ActionRecord;

/// Append-only log of executed actions, shared by every thread of one run.
#[derive(Debug, Clone, Default)]
pub struct ExecutionHistory {
    entries: Arc<Mutex<Vec<ActionRecord>>>,
}

impl ExecutionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: ActionRecord) {
        self.lock().push(entry);
    }

    pub fn snapshot(&self) -> Vec<ActionRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ActionRecord>> {
        // Entries are only ever pushed, so a poisoned guard still holds a valid log.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
