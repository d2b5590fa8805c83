//! Map surface backed by a planar projection and rendered with gizmos.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use bevy::prelude::*;

use crate::constants::{EARTH_RADIUS_METERS, PIXELS_PER_DEGREE};
use crate::sketch::geometry::haversine_distance;
use crate::sketch::{
    GroupId, Layer, LayerId, MapEventKind, MapInteraction, MapSurface, MarkerLayer, Position,
};

/// World position of a coordinate (x = longitude, y = latitude).
pub fn to_world(position: Position) -> Vec2 {
    Vec2::new(
        position.lng as f32 * PIXELS_PER_DEGREE,
        position.lat as f32 * PIXELS_PER_DEGREE,
    )
}

pub fn to_position(world: Vec2) -> Position {
    Position::new(
        (world.y / PIXELS_PER_DEGREE) as f64,
        (world.x / PIXELS_PER_DEGREE) as f64,
    )
}

/// World length of a north-south distance in meters.
pub fn meters_to_world(meters: f64) -> f32 {
    let degrees = (meters / EARTH_RADIUS_METERS).to_degrees();
    degrees as f32 * PIXELS_PER_DEGREE
}

#[derive(Resource, Default)]
pub struct GizmoSurface {
    next_id: u64,
    layers: BTreeMap<LayerId, (GroupId, Layer)>,
    listening: BTreeSet<MapEventKind>,
    disabled: BTreeSet<MapInteraction>,
    clock: Duration,
}

impl GizmoSurface {
    pub fn set_clock(&mut self, now: Duration) {
        self.clock = now;
    }

    /// Layers in creation order.
    pub fn layers(&self) -> impl Iterator<Item = (LayerId, &Layer)> {
        self.layers.iter().map(|(id, (_, layer))| (*id, layer))
    }

    pub fn markers(&self) -> impl Iterator<Item = (LayerId, &MarkerLayer)> {
        self.layers().filter_map(|(id, layer)| layer.as_marker().map(|m| (id, m)))
    }

    pub fn is_listening(&self, kind: MapEventKind) -> bool {
        self.listening.contains(&kind)
    }

    pub fn is_enabled(&self, interaction: MapInteraction) -> bool {
        !self.disabled.contains(&interaction)
    }

    /// Topmost draggable marker within `tolerance` world units of `world`.
    pub fn draggable_marker_at(&self, world: Vec2, tolerance: f32) -> Option<LayerId> {
        self.markers()
            .filter(|(_, marker)| marker.draggable)
            .filter(|(_, marker)| to_world(marker.position).distance(world) <= tolerance)
            .map(|(id, _)| id)
            .last()
    }
}

impl MapSurface for GizmoSurface {
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

/// Feeds the frame clock to the surface so deferred re-arming sees real time.
pub fn tick_surface_clock(time: Res<Time>, mut surface: ResMut<GizmoSurface>) {
    surface.set_clock(time.elapsed());
}
