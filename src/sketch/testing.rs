//! In-memory map surface and event capture for engine tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::events::{ShapeEvent, ShapeEventKind};
use super::geometry::haversine_distance;
use super::options::ShapeConfig;
use super::surface::{
    GroupId, Layer, LayerId, MapEventKind, MapInteraction, MapSurface, MarkerLayer, MarkerRole,
};
use super::types::Position;

#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_id: u64,
    pub layers: BTreeMap<LayerId, (GroupId, Layer)>,
    pub listening: BTreeSet<MapEventKind>,
    pub disabled: BTreeSet<MapInteraction>,
    pub clock: Duration,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, by: Duration) {
        self.clock += by;
    }

    pub fn markers(&self, role: MarkerRole) -> Vec<(LayerId, MarkerLayer)> {
        self.layers
            .iter()
            .filter_map(|(id, (_, layer))| match layer {
                Layer::Marker(marker) if marker.role == role => Some((*id, marker.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn marker_count(&self, role: MarkerRole) -> usize {
        self.markers(role).len()
    }

    pub fn count(&self, matches: impl Fn(&Layer) -> bool) -> usize {
        self.layers.values().filter(|(_, layer)| matches(layer)).count()
    }

    pub fn decorations(&self) -> usize {
        self.count(|layer| matches!(layer, Layer::Decoration { .. }))
    }

    pub fn previews(&self) -> Vec<Vec<Position>> {
        self.layers
            .values()
            .filter_map(|(_, layer)| match layer {
                Layer::Polyline { positions, style } if style.dash.is_some() => {
                    Some(positions.clone())
                }
                _ => None,
            })
            .collect()
    }
}

impl MapSurface for RecordingSurface {
    fn create_group(&mut self) -> GroupId {
        self.next_id += 1;
        GroupId(self.next_id)
    }

    fn add_layer(&mut self, group: GroupId, layer: Layer) -> LayerId {
        self.next_id += 1;
        let id = LayerId(self.next_id);
        self.layers.insert(id, (group, layer));
        id
    }

    fn update_layer(&mut self, id: LayerId, layer: Layer) {
        if let Some(entry) = self.layers.get_mut(&id) {
            entry.1 = layer;
        }
    }

    fn remove_layer(&mut self, id: LayerId) {
        self.layers.remove(&id);
    }

    fn has_layer(&self, id: LayerId) -> bool {
        self.layers.contains_key(&id)
    }

    fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id).map(|(_, layer)| layer)
    }

    fn listen(&mut self, kind: MapEventKind) {
        self.listening.insert(kind);
    }

    fn unlisten(&mut self, kind: MapEventKind) {
        self.listening.remove(&kind);
    }

    fn distance(&self, from: Position, to: Position) -> f64 {
        haversine_distance(from, to)
    }

    fn set_interaction(&mut self, interaction: MapInteraction, enabled: bool) {
        if enabled {
            self.disabled.remove(&interaction);
        } else {
            self.disabled.insert(interaction);
        }
    }

    fn now(&self) -> Duration {
        self.clock
    }
}

/// Collects every event fired on the channels it is registered for.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<ShapeEvent>>>,
}

impl EventLog {
    /// Config listening on every channel.
    pub fn config(&self) -> ShapeConfig {
        let mut config = ShapeConfig::default();
        for kind in ShapeEventKind::ALL {
            let events = self.events.clone();
            config.events.on(
                kind,
                Arc::new(move |event: &ShapeEvent| events.lock().unwrap().push(event.clone())),
            );
        }
        config
    }

    pub fn events(&self) -> Vec<ShapeEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<ShapeEventKind> {
        self.events().iter().map(ShapeEvent::kind).collect()
    }

    pub fn last(&self, kind: ShapeEventKind) -> Option<ShapeEvent> {
        self.events().into_iter().rev().find(|e| e.kind() == kind)
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}
