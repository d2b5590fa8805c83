//! Marker that translates a whole polygon.

use std::time::Duration;

use crate::constants::CENTER_DRAG_REARM_DELAY;
use crate::sketch::geometry::{bounds_center, delta};
use crate::sketch::surface::{
    GroupId, Layer, LayerId, MapInteraction, MapSurface, MarkerLayer, MarkerRole,
};
use crate::sketch::types::{Icon, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rearm {
    /// Nothing scheduled
    Idle,
    /// Still inside the delay window
    Pending,
    /// Delay elapsed, listeners can be attached again
    Due,
}

#[derive(Debug, Default)]
pub(crate) struct CenterDrag {
    marker: Option<LayerId>,
    /// Marker position the next drag delta is measured from
    reference: Position,
    dragging: bool,
    rearm_at: Option<Duration>,
    icon: Option<Icon>,
}

impl CenterDrag {
    pub fn marker(&self) -> Option<LayerId> {
        self.marker
    }

    pub fn owns(&self, layer: LayerId) -> bool {
        self.marker == Some(layer)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn reference(&self) -> Position {
        self.reference
    }

    fn layer(&self) -> Layer {
        Layer::Marker(
            MarkerLayer::new(self.reference, MarkerRole::PolygonDrag)
                .draggable(true)
                .with_icon(self.icon.clone()),
        )
    }

    pub fn set_icon(&mut self, surface: &mut dyn MapSurface, icon: Option<Icon>) {
        self.icon = icon;
        if let Some(id) = self.marker {
            surface.update_layer(id, self.layer());
        }
    }

    /// Shows the marker at the bounds center of `positions` when enabled and the polygon
    /// has at least three vertices, removes it otherwise. Left alone mid-drag.
    pub fn refresh(
        &mut self,
        surface: &mut dyn MapSurface,
        group: GroupId,
        positions: &[Position],
        enabled: bool,
    ) {
        if self.dragging {
            return;
        }
        let center = if enabled && positions.len() >= 3 {
            bounds_center(positions)
        } else {
            None
        };
        match (center, self.marker) {
            (Some(center), Some(id)) => {
                self.reference = center;
                surface.move_marker(id, center);
            }
            (Some(center), None) => {
                self.reference = center;
                self.marker = Some(surface.add_layer(group, self.layer()));
            }
            (None, Some(_)) => self.remove(surface),
            (None, None) => {}
        }
    }

    pub fn remove(&mut self, surface: &mut dyn MapSurface) {
        if let Some(id) = self.marker.take() {
            surface.remove_layer(id);
        }
        if self.dragging {
            self.dragging = false;
            surface.set_interaction(MapInteraction::PanDrag, true);
        }
        self.rearm_at = None;
    }

    pub fn begin(&mut self, surface: &mut dyn MapSurface) {
        self.dragging = true;
        surface.set_interaction(MapInteraction::PanDrag, false);
    }

    /// Moves the marker and returns the delta since the previous position.
    pub fn drag_to(&mut self, surface: &mut dyn MapSurface, position: Position) -> Position {
        let moved = delta(self.reference, position);
        self.reference = position;
        if let Some(id) = self.marker {
            surface.move_marker(id, position);
        }
        moved
    }

    pub fn end(&mut self, surface: &mut dyn MapSurface) {
        self.dragging = false;
        surface.set_interaction(MapInteraction::PanDrag, true);
    }

    pub fn schedule_rearm(&mut self, now: Duration) {
        self.rearm_at = Some(now + CENTER_DRAG_REARM_DELAY);
    }

    pub fn poll_rearm(&mut self, now: Duration) -> Rearm {
        match self.rearm_at {
            None => Rearm::Idle,
            Some(deadline) if now < deadline => Rearm::Pending,
            Some(_) => {
                self.rearm_at = None;
                Rearm::Due
            }
        }
    }
}
