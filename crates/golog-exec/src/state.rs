use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// World state: domain facts plus the `vars` bindings introduced by `bind`.
///
/// Transitions never mutate a state they were handed; they derive a new one that
/// keeps every key the action did not declare.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct State {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub vars: IndexMap<String, Value>,
    #[serde(flatten)]
    pub facts: IndexMap<String, Value>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_facts(facts: impl IntoIterator<Item = (impl Into<String>, Value)>) -> Self {
        Self {
            vars: IndexMap::new(),
            facts: facts.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn fact(&self, key: &str) -> Option<&Value> {
        self.facts.get(key)
    }

    pub fn var(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Copy of this state with the given facts overwritten.
    pub fn overwrite(&self, facts: impl IntoIterator<Item = (impl Into<String>, Value)>) -> Self {
        let mut next = self.clone();
        for (key, value) in facts {
            next.facts.insert(key.into(), value);
        }
        next
    }

    pub fn with_fact(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overwrite([(key.into(), value.into())])
    }

    pub fn bind_var(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.vars.insert(name.into(), value)
    }
}
