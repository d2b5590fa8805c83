//! Resources shared by the host systems.

use std::sync::{Arc, Mutex};

use bevy::prelude::*;

use crate::config::{AppConfig, SketchConfigData};
use crate::constants::{DRAG_ICON_SIZE, MIDPOINT_ICON_SIZE, VERTEX_ICON_SIZE};
use crate::sketch::{
    EventRegistry, GroupId, Icon, IconShape, MapSurface, ShapeConfig, ShapeEvent, ShapeEventKind,
    ShapeFactory,
};

use super::surface::GizmoSurface;

/// The factory and the layer group every sketch is drawn into.
#[derive(Resource, Default)]
pub struct ActiveSketch {
    pub factory: ShapeFactory,
    group: Option<GroupId>,
}

impl ActiveSketch {
    pub fn group(&mut self, surface: &mut dyn MapSurface) -> GroupId {
        *self.group.get_or_insert_with(|| surface.create_group())
    }
}

/// Shape events waiting to be picked up by ECS systems.
#[derive(Resource, Clone, Default)]
pub struct ShapeEventQueue {
    events: Arc<Mutex<Vec<ShapeEvent>>>,
}

impl ShapeEventQueue {
    /// Listeners on every channel that push into this queue.
    pub fn registry(&self) -> EventRegistry {
        let mut registry = EventRegistry::default();
        for kind in ShapeEventKind::ALL {
            let events = self.events.clone();
            registry.on(
                kind,
                Arc::new(move |event: &ShapeEvent| {
                    if let Ok(mut events) = events.lock() {
                        events.push(event.clone());
                    }
                }),
            );
        }
        registry
    }

    pub fn drain(&self) -> Vec<ShapeEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

/// Engine configuration for the persisted preferences, with the host's marker icons.
pub fn engine_config(data: &SketchConfigData, queue: &ShapeEventQueue) -> ShapeConfig {
    ShapeConfig {
        vertex_icon: Some(Icon::new(IconShape::Square, VERTEX_ICON_SIZE)),
        midpoint_icon: Some(Icon::new(IconShape::Circle, MIDPOINT_ICON_SIZE)),
        polygon_drag_icon: Some(Icon::new(IconShape::Diamond, DRAG_ICON_SIZE)),
        ..data.shape_config(queue.registry())
    }
}

/// Pushes preference changes to the factory and its current shape.
pub fn sync_shape_config(
    config: Res<AppConfig>,
    queue: Res<ShapeEventQueue>,
    mut active: ResMut<ActiveSketch>,
    mut surface: ResMut<GizmoSurface>,
) {
    let shape_config = engine_config(&config.data, &queue);
    active.factory.set_shape_config(&mut *surface, shape_config);
}
