use std::collections::BTreeMap;

/// Symmetric road network with distances.
#[derive(Debug, Clone, Default)]
pub struct RoadMap {
    roads: BTreeMap<String, BTreeMap<String, u32>>,
}

impl RoadMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a road usable in both directions. An existing distance in the
    /// reverse direction is kept.
    pub fn connect(&mut self, a: &str, b: &str, distance: u32) -> &mut Self {
        self.roads
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string(), distance);
        self.roads
            .entry(b.to_string())
            .or_default()
            .entry(a.to_string())
            .or_insert(distance);
        self
    }

    pub fn distance(&self, from: &str, to: &str) -> Option<u32> {
        self.roads.get(from).and_then(|dests| dests.get(to)).copied()
    }
}

pub fn default_roads() -> RoadMap {
    let mut roads = RoadMap::new();
    roads
        .connect("l1", "l2", 1)
        .connect("l1", "l3", 2)
        .connect("l2", "l3", 2)
        .connect("l2", "l4", 2);
    roads
}
