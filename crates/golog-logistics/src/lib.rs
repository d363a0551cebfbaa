//! Delivery-truck demonstration domain: a small road network and `GoTo`.

mod roads;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use golog_actions::{Action, ActionArgs, ActionError, ActionRegistry, BuiltinConfig, required_arg};
use golog_exec::{State, Value};

pub use roads::{RoadMap, default_roads};

/// Fact holding the truck's current location.
pub const LOCATION: &str = "location";

/// Drives to `destination` along a direct road.
pub struct GoTo {
    destination: Value,
    roads: Arc<RoadMap>,
    latency: Duration,
}

impl GoTo {
    pub fn new(destination: Value, roads: Arc<RoadMap>, latency: Duration) -> Self {
        Self {
            destination,
            roads,
            latency,
        }
    }
}

#[async_trait]
impl Action for GoTo {
    fn is_possible(&self, state: &State) -> bool {
        let (Some(from), Some(to)) = (
            state.fact(LOCATION).and_then(Value::as_text),
            self.destination.as_text(),
        ) else {
            return false;
        };
        from != to && self.roads.distance(from, to).is_some()
    }

    fn effect(&self, state: &State) -> State {
        state.overwrite([(LOCATION, self.destination.clone())])
    }

    async fn execute(&self) -> anyhow::Result<Option<Value>> {
        tokio::time::sleep(self.latency).await;
        Ok(None)
    }
}

/// Installs `GoTo` over the default road network.
pub fn register(registry: &mut ActionRegistry, config: &BuiltinConfig) {
    register_with_roads(registry, config, default_roads());
}

pub fn register_with_roads(registry: &mut ActionRegistry, config: &BuiltinConfig, roads: RoadMap) {
    let roads = Arc::new(roads);
    let latency = config.action_latency;
    registry.register("GoTo", move |args: &ActionArgs| {
        let destination = required_arg("GoTo", args, LOCATION)?;
        if destination.as_text().is_none() {
            return Err(ActionError::invalid_args(
                "GoTo",
                format!("location must be text, got {destination}"),
            ));
        }
        Ok(Arc::new(GoTo::new(destination.clone(), roads.clone(), latency)) as Arc<dyn Action>)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ActionRegistry {
        let mut registry = ActionRegistry::new();
        register(&mut registry, &BuiltinConfig::default());
        registry
    }

    fn goto(location: &str) -> golog_actions::BoundAction {
        let mut args = ActionArgs::new();
        args.insert(LOCATION.into(), Value::from(location));
        registry().instantiate("GoTo", args).unwrap()
    }

    fn at(location: &str) -> State {
        State::from_facts([(LOCATION, Value::from(location))])
    }

    #[test]
    fn possible_only_along_a_road() {
        assert!(goto("l2").action.is_possible(&at("l1")));
        assert!(goto("l1").action.is_possible(&at("l3")));
        assert!(!goto("l4").action.is_possible(&at("l1")));
    }

    #[test]
    fn staying_put_is_not_a_move() {
        assert!(!goto("l1").action.is_possible(&at("l1")));
    }

    #[test]
    fn unknown_origin_blocks_travel() {
        assert!(!goto("l2").action.is_possible(&State::new()));
    }

    #[test]
    fn effect_overwrites_location_only() {
        let state = at("l1").with_fact("cargo", "boxes");
        let next = goto("l2").action.effect(&state);
        assert_eq!(next.fact(LOCATION), Some(&Value::from("l2")));
        assert_eq!(next.fact("cargo"), Some(&Value::from("boxes")));
    }

    #[test]
    fn destination_must_be_text() {
        let mut args = ActionArgs::new();
        args.insert(LOCATION.into(), Value::Int(2));
        assert!(matches!(
            registry().instantiate("GoTo", args),
            Err(ActionError::InvalidArgs { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn execute_completes_without_result() {
        assert_eq!(goto("l2").action.execute().await.unwrap(), None);
    }
}
