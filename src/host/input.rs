//! Translates mouse input into surface events for the active shape.

use std::time::Duration;

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::sketch::{LayerId, MapSurface, Position, SurfaceEvent};

use super::params::{CameraParams, is_cursor_over_ui};
use super::state::ActiveSketch;
use super::surface::{GizmoSurface, to_position};

/// Clicks closer together than this count as a double click
const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(300);

/// Marker grab radius in screen pixels
const MARKER_GRAB_RADIUS: f32 = 12.0;

/// Double click on the map, consumed by editing and zoom.
#[derive(Message, Debug, Clone, Copy)]
pub struct MapDoubleClick {
    pub position: Position,
}

#[derive(Resource, Default)]
pub struct PointerState {
    /// Marker currently being dragged
    dragging: Option<LayerId>,
    last_position: Option<Position>,
    last_click: Option<Duration>,
}

impl PointerState {
    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    /// Records a click and reports whether it completes a double click.
    fn register_click(&mut self, now: Duration) -> bool {
        match self.last_click.take() {
            Some(previous) if now.saturating_sub(previous) <= DOUBLE_CLICK_WINDOW => true,
            _ => {
                self.last_click = Some(now);
                false
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn translate_pointer_input(
    mouse_button: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    camera: CameraParams,
    mut contexts: EguiContexts,
    mut pointer: ResMut<PointerState>,
    mut active: ResMut<ActiveSketch>,
    mut surface: ResMut<GizmoSurface>,
    mut double_clicks: MessageWriter<MapDoubleClick>,
) {
    let surface = &mut *surface;

    // Finish a drag even if the cursor left the map
    if mouse_button.just_released(MouseButton::Left)
        && let Some(layer) = pointer.dragging.take()
    {
        let position = pointer.last_position.unwrap_or_default();
        active
            .factory
            .dispatch(surface, SurfaceEvent::DragEnd { layer, position });
        return;
    }

    if !pointer.is_dragging() && is_cursor_over_ui(&mut contexts) {
        return;
    }

    let Some(world_pos) = camera.cursor_world_pos() else {
        return;
    };
    let position = to_position(world_pos);
    let moved = pointer.last_position != Some(position);
    pointer.last_position = Some(position);

    if mouse_button.just_pressed(MouseButton::Left) {
        let tolerance = MARKER_GRAB_RADIUS * camera.zoom_scale();
        if let Some(layer) = surface.draggable_marker_at(world_pos, tolerance) {
            pointer.dragging = Some(layer);
            active
                .factory
                .dispatch(surface, SurfaceEvent::DragStart { layer, position });
            return;
        }

        active.factory.dispatch(surface, SurfaceEvent::Click(position));
        if pointer.register_click(time.elapsed()) {
            double_clicks.write(MapDoubleClick { position });
        }
        return;
    }

    if mouse_button.just_pressed(MouseButton::Right) {
        active
            .factory
            .dispatch(surface, SurfaceEvent::ContextMenu(position));
        return;
    }

    if !moved {
        return;
    }

    let event = match pointer.dragging {
        Some(layer) if surface.has_layer(layer) => SurfaceEvent::Drag { layer, position },
        Some(_) => {
            pointer.dragging = None;
            return;
        }
        None => SurfaceEvent::MouseMove(position),
    };
    active.factory.dispatch(surface, event);
}
