//! Center and radius markers for circles.

use crate::sketch::geometry::delta;
use crate::sketch::surface::{
    GroupId, Layer, LayerId, MapInteraction, MapSurface, MarkerLayer, MarkerRole, SurfaceEvent,
};
use crate::sketch::types::{Icon, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircleHandle {
    Center,
    Outer,
}

impl CircleHandle {
    pub fn index(&self) -> usize {
        match self {
            CircleHandle::Center => 0,
            CircleHandle::Outer => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircleNotice {
    DragStart(CircleHandle),
    /// Center moved; the outer marker followed by the stored offset
    CenterMoved,
    /// Outer marker moved; the radius changed
    OuterMoved,
    DragEnd(CircleHandle),
}

/// Exactly two control points: the center and a point on the rim.
#[derive(Debug, Default)]
pub struct CircularVertices {
    positions: Vec<Position>,
    center: Option<LayerId>,
    outer: Option<LayerId>,
    /// Outer point relative to the center
    offset: Position,
    center_icon: Option<Icon>,
    outer_icon: Option<Icon>,
    drag: Option<CircleHandle>,
}

impl CircularVertices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn center_marker(&self) -> Option<LayerId> {
        self.center
    }

    pub fn outer_marker(&self) -> Option<LayerId> {
        self.outer
    }

    pub fn owns(&self, layer: LayerId) -> bool {
        self.center == Some(layer) || self.outer == Some(layer)
    }

    fn marker(&self, handle: CircleHandle) -> Layer {
        let (role, icon) = match handle {
            CircleHandle::Center => (MarkerRole::CircleCenter, self.center_icon.clone()),
            CircleHandle::Outer => (MarkerRole::CircleOuter, self.outer_icon.clone()),
        };
        Layer::Marker(
            MarkerLayer::new(self.positions[handle.index()], role)
                .draggable(true)
                .with_icon(icon),
        )
    }

    fn remember_offset(&mut self) {
        if let [center, outer] = self.positions[..] {
            self.offset = delta(center, outer);
        }
    }

    /// Places the next control point from a click; ignored once both exist.
    pub fn place(&mut self, surface: &mut dyn MapSurface, group: GroupId, position: Position) {
        match self.positions.len() {
            0 => {
                self.positions.push(position);
                self.center = Some(surface.add_layer(group, self.marker(CircleHandle::Center)));
            }
            1 => {
                self.positions.push(position);
                self.outer = Some(surface.add_layer(group, self.marker(CircleHandle::Outer)));
                self.remember_offset();
            }
            _ => {}
        }
    }

    /// Draws both markers for an existing circle.
    pub fn load(
        &mut self,
        surface: &mut dyn MapSurface,
        group: GroupId,
        center: Position,
        outer: Position,
    ) {
        self.clear(surface);
        self.place(surface, group, center);
        self.place(surface, group, outer);
    }

    pub fn set_icons(
        &mut self,
        surface: &mut dyn MapSurface,
        center: Option<Icon>,
        outer: Option<Icon>,
    ) {
        self.center_icon = center;
        self.outer_icon = outer;
        if let Some(id) = self.center {
            surface.update_layer(id, self.marker(CircleHandle::Center));
        }
        if let Some(id) = self.outer {
            surface.update_layer(id, self.marker(CircleHandle::Outer));
        }
    }

    pub fn clear(&mut self, surface: &mut dyn MapSurface) {
        for id in [self.center.take(), self.outer.take()].into_iter().flatten() {
            surface.remove_layer(id);
        }
        self.positions.clear();
        self.offset = Position::default();
        if self.drag.take().is_some() {
            surface.set_interaction(MapInteraction::PanDrag, true);
        }
    }

    pub fn handle_drag(
        &mut self,
        surface: &mut dyn MapSurface,
        event: SurfaceEvent,
    ) -> Option<CircleNotice> {
        match event {
            SurfaceEvent::DragStart { layer, .. } => {
                let handle = self.handle_for(layer)?;
                self.drag = Some(handle);
                surface.set_interaction(MapInteraction::PanDrag, false);
                Some(CircleNotice::DragStart(handle))
            }
            SurfaceEvent::Drag { layer, position } => {
                let handle = self.handle_for(layer)?;
                if self.drag != Some(handle) {
                    return None;
                }
                match handle {
                    CircleHandle::Center => {
                        self.positions[0] = position;
                        surface.move_marker(layer, position);
                        if let (Some(outer), Some(slot)) = (self.outer, self.positions.get_mut(1)) {
                            *slot = position.offset(self.offset.lat, self.offset.lng);
                            surface.move_marker(outer, *slot);
                        }
                        Some(CircleNotice::CenterMoved)
                    }
                    CircleHandle::Outer => {
                        self.positions[1] = position;
                        surface.move_marker(layer, position);
                        self.remember_offset();
                        Some(CircleNotice::OuterMoved)
                    }
                }
            }
            SurfaceEvent::DragEnd { layer, .. } => {
                let handle = self.handle_for(layer)?;
                if self.drag.take() != Some(handle) {
                    return None;
                }
                surface.set_interaction(MapInteraction::PanDrag, true);
                Some(CircleNotice::DragEnd(handle))
            }
            _ => None,
        }
    }

    fn handle_for(&self, layer: LayerId) -> Option<CircleHandle> {
        if self.center == Some(layer) {
            Some(CircleHandle::Center)
        } else if self.outer == Some(layer) {
            Some(CircleHandle::Outer)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketch::testing::RecordingSurface;

    fn drag(
        vertices: &mut CircularVertices,
        surface: &mut RecordingSurface,
        layer: LayerId,
        to: Position,
    ) -> Vec<CircleNotice> {
        [
            SurfaceEvent::DragStart {
                layer,
                position: to,
            },
            SurfaceEvent::Drag {
                layer,
                position: to,
            },
            SurfaceEvent::DragEnd {
                layer,
                position: to,
            },
        ]
        .into_iter()
        .filter_map(|event| vertices.handle_drag(surface, event))
        .collect()
    }

    #[test]
    fn test_place_stops_after_two_points() {
        let mut surface = RecordingSurface::new();
        let group = surface.create_group();
        let mut vertices = CircularVertices::new();

        vertices.place(&mut surface, group, Position::new(0.0, 0.0));
        vertices.place(&mut surface, group, Position::new(0.0, 1.0));
        vertices.place(&mut surface, group, Position::new(5.0, 5.0));

        assert_eq!(vertices.len(), 2);
        assert_eq!(surface.marker_count(MarkerRole::CircleCenter), 1);
        assert_eq!(surface.marker_count(MarkerRole::CircleOuter), 1);
    }

    #[test]
    fn test_center_drag_carries_outer_point() {
        let mut surface = RecordingSurface::new();
        let group = surface.create_group();
        let mut vertices = CircularVertices::new();
        vertices.load(
            &mut surface,
            group,
            Position::new(0.0, 0.0),
            Position::new(0.0, 0.5),
        );
        let center = vertices.center_marker().unwrap();

        let notices = drag(&mut vertices, &mut surface, center, Position::new(1.0, 1.0));

        assert_eq!(
            notices,
            vec![
                CircleNotice::DragStart(CircleHandle::Center),
                CircleNotice::CenterMoved,
                CircleNotice::DragEnd(CircleHandle::Center),
            ]
        );
        assert_eq!(
            vertices.positions(),
            &[Position::new(1.0, 1.0), Position::new(1.0, 1.5)]
        );
        assert!(surface.disabled.is_empty());
    }

    #[test]
    fn test_outer_drag_updates_offset() {
        let mut surface = RecordingSurface::new();
        let group = surface.create_group();
        let mut vertices = CircularVertices::new();
        vertices.load(
            &mut surface,
            group,
            Position::new(0.0, 0.0),
            Position::new(0.0, 0.5),
        );
        let outer = vertices.outer_marker().unwrap();
        let center = vertices.center_marker().unwrap();

        drag(&mut vertices, &mut surface, outer, Position::new(0.0, 2.0));
        drag(&mut vertices, &mut surface, center, Position::new(1.0, 0.0));

        assert_eq!(
            vertices.positions(),
            &[Position::new(1.0, 0.0), Position::new(1.0, 2.0)]
        );
    }

    #[test]
    fn test_clear() {
        let mut surface = RecordingSurface::new();
        let group = surface.create_group();
        let mut vertices = CircularVertices::new();
        vertices.place(&mut surface, group, Position::new(0.0, 0.0));
        vertices.clear(&mut surface);
        assert!(vertices.is_empty());
        assert!(surface.layers.is_empty());
    }
}
