//! Vertex and midpoint markers for polygons and polylines.

use bevy::log::debug;

use crate::constants::MIDPOINT_INSERT_THRESHOLD_METERS;
use crate::sketch::geometry::{format_distance, midpoint};
use crate::sketch::surface::{
    GroupId, Layer, LayerId, MapInteraction, MapSurface, MarkerLayer, MarkerRole, SurfaceEvent,
};
use crate::sketch::types::{Icon, Position};

use super::VertexNotice;

#[derive(Debug, Clone, Copy, PartialEq)]
enum VertexDrag {
    Vertex {
        layer: LayerId,
        index: usize,
    },
    Midpoint {
        layer: LayerId,
        index: usize,
        origin: Position,
        inserted: bool,
    },
}

/// Keeps an ordered vertex list and its rendered markers in lockstep.
///
/// Midpoint `j` sits between vertex `j` and vertex `j + 1`. Closed rings with at least
/// three vertices get one more midpoint between the last and the first vertex.
#[derive(Debug, Default)]
pub struct LineVertices {
    closed: bool,
    positions: Vec<Position>,
    vertices: Vec<LayerId>,
    midpoints: Vec<LayerId>,
    display_distances: bool,
    display_numbers: bool,
    vertex_icon: Option<Icon>,
    midpoint_icon: Option<Icon>,
    drag: Option<VertexDrag>,
}

impl LineVertices {
    pub fn new(closed: bool) -> Self {
        Self {
            closed,
            ..Default::default()
        }
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

    pub fn vertex_markers(&self) -> &[LayerId] {
        &self.vertices
    }

    pub fn midpoint_markers(&self) -> &[LayerId] {
        &self.midpoints
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn display_distances(&self) -> bool {
        self.display_distances
    }

    pub fn owns(&self, layer: LayerId) -> bool {
        self.vertices.contains(&layer) || self.midpoints.contains(&layer)
    }

    fn segment_count(&self) -> usize {
        let n = self.positions.len();
        if self.closed && n >= 3 {
            n
        } else {
            n.saturating_sub(1)
        }
    }

    fn segment(&self, index: usize) -> (Position, Position) {
        let n = self.positions.len();
        (self.positions[index], self.positions[(index + 1) % n])
    }

    fn vertex_layer(&self, index: usize) -> Layer {
        let label = self.display_numbers.then(|| (index + 1).to_string());
        Layer::Marker(
            MarkerLayer::new(self.positions[index], MarkerRole::Vertex)
                .draggable(true)
                .with_icon(self.vertex_icon.clone())
                .with_label(label),
        )
    }

    fn midpoint_layer(&self, surface: &dyn MapSurface, index: usize) -> Layer {
        let (from, to) = self.segment(index);
        let tooltip = self
            .display_distances
            .then(|| format_distance(surface.distance(from, to)));
        Layer::Marker(
            MarkerLayer::new(midpoint(from, to), MarkerRole::Midpoint)
                .draggable(true)
                .with_icon(self.midpoint_icon.clone())
                .with_tooltip(tooltip),
        )
    }

    fn draw_vertices(&mut self, surface: &mut dyn MapSurface, group: GroupId) {
        for id in self.vertices.drain(..) {
            surface.remove_layer(id);
        }
        for index in 0..self.positions.len() {
            let id = surface.add_layer(group, self.vertex_layer(index));
            self.vertices.push(id);
        }
    }

    /// Brings the midpoint markers in line with the current vertices, reusing markers in order.
    fn sync_midpoints(&mut self, surface: &mut dyn MapSurface, group: GroupId) {
        let expected = self.segment_count();
        while self.midpoints.len() > expected {
            self.remove_last_midpoint(surface);
        }
        for index in 0..expected {
            let layer = self.midpoint_layer(surface, index);
            match self.midpoints.get(index) {
                Some(id) => surface.update_layer(*id, layer),
                None => {
                    let id = surface.add_layer(group, layer);
                    self.midpoints.push(id);
                }
            }
        }
    }

    fn remove_last_midpoint(&mut self, surface: &mut dyn MapSurface) {
        if let Some(id) = self.midpoints.pop() {
            surface.remove_layer(id);
        }
    }

    /// Updates the one or two midpoints touching `index`.
    fn refresh_adjacent(&mut self, surface: &mut dyn MapSurface, index: usize) {
        let segments = self.segment_count();
        let n = self.positions.len();
        let mut touched = vec![index];
        if index > 0 {
            touched.push(index - 1);
        } else if segments == n && n > 0 {
            touched.push(n - 1);
        }
        for j in touched {
            if j < segments
                && let Some(id) = self.midpoints.get(j).copied()
            {
                let layer = self.midpoint_layer(surface, j);
                surface.update_layer(id, layer);
            }
        }
    }

    /// Removes every marker and draws the full vertex and midpoint set again.
    pub fn redraw(&mut self, surface: &mut dyn MapSurface, group: GroupId) {
        for id in self.midpoints.drain(..) {
            surface.remove_layer(id);
        }
        self.draw_vertices(surface, group);
        self.sync_midpoints(surface, group);
    }

    /// Re-renders existing markers in place (labels, tooltips, icons).
    pub fn refresh_markers(&mut self, surface: &mut dyn MapSurface) {
        for index in 0..self.vertices.len().min(self.positions.len()) {
            let layer = self.vertex_layer(index);
            surface.update_layer(self.vertices[index], layer);
        }
        for index in 0..self.midpoints.len().min(self.segment_count()) {
            let layer = self.midpoint_layer(surface, index);
            surface.update_layer(self.midpoints[index], layer);
        }
    }

    pub fn set_positions(
        &mut self,
        surface: &mut dyn MapSurface,
        group: GroupId,
        positions: Vec<Position>,
    ) {
        self.positions = positions;
        self.redraw(surface, group);
    }

    /// Appends a vertex and its marker; the midpoint set follows.
    pub fn push(&mut self, surface: &mut dyn MapSurface, group: GroupId, position: Position) {
        self.positions.push(position);
        let id = surface.add_layer(group, self.vertex_layer(self.positions.len() - 1));
        self.vertices.push(id);
        self.sync_midpoints(surface, group);
    }

    /// Removes the last vertex, its marker and the midpoint(s) touching it.
    pub fn pop(&mut self, surface: &mut dyn MapSurface, group: GroupId) -> Option<Position> {
        let removed = self.positions.pop()?;
        if let Some(id) = self.vertices.pop() {
            surface.remove_layer(id);
        }

        let n = self.positions.len();
        // Wrap-around midpoint of the old ring
        if self.closed && n + 1 >= 3 {
            self.remove_last_midpoint(surface);
        }
        if self.midpoints.len() > n.saturating_sub(1) {
            self.remove_last_midpoint(surface);
        }
        if self.closed && n >= 3 {
            let layer = self.midpoint_layer(surface, n - 1);
            let id = surface.add_layer(group, layer);
            self.midpoints.push(id);
        }

        Some(removed)
    }

    pub fn set_position(&mut self, surface: &mut dyn MapSurface, index: usize, position: Position) {
        let Some(slot) = self.positions.get_mut(index) else {
            return;
        };
        *slot = position;
        if let Some(id) = self.vertices.get(index).copied() {
            surface.move_marker(id, position);
        }
        self.refresh_adjacent(surface, index);
    }

    /// Splits segment `index` by inserting a vertex at `index + 1`.
    pub fn insert_after(
        &mut self,
        surface: &mut dyn MapSurface,
        group: GroupId,
        index: usize,
        position: Position,
    ) {
        let at = (index + 1).min(self.positions.len());
        self.positions.insert(at, position);
        self.draw_vertices(surface, group);
        self.sync_midpoints(surface, group);
    }

    pub fn clear(&mut self, surface: &mut dyn MapSurface) {
        for id in self.vertices.drain(..).chain(self.midpoints.drain(..)) {
            surface.remove_layer(id);
        }
        self.positions.clear();
        if self.drag.take().is_some() {
            surface.set_interaction(MapInteraction::PanDrag, true);
        }
    }

    pub fn set_display_distances(&mut self, surface: &mut dyn MapSurface, display: bool) {
        self.display_distances = display;
        self.refresh_markers(surface);
    }

    pub fn set_display_numbers(&mut self, surface: &mut dyn MapSurface, display: bool) {
        self.display_numbers = display;
        self.refresh_markers(surface);
    }

    pub fn set_icons(
        &mut self,
        surface: &mut dyn MapSurface,
        vertex: Option<Icon>,
        midpoint: Option<Icon>,
    ) {
        self.vertex_icon = vertex;
        self.midpoint_icon = midpoint;
        self.refresh_markers(surface);
    }

    /// Applies a marker drag event; returns what changed so the owning shape can redraw.
    pub fn handle_drag(
        &mut self,
        surface: &mut dyn MapSurface,
        group: GroupId,
        event: SurfaceEvent,
    ) -> Option<VertexNotice> {
        match event {
            SurfaceEvent::DragStart { layer, .. } => self.begin_drag(surface, layer),
            SurfaceEvent::Drag { layer, position } => match self.drag {
                Some(VertexDrag::Vertex { layer: l, index }) if l == layer => {
                    self.set_position(surface, index, position);
                    Some(VertexNotice::VertexDragged { index })
                }
                Some(VertexDrag::Midpoint {
                    layer: l,
                    index,
                    origin,
                    inserted,
                }) if l == layer => {
                    if inserted {
                        self.set_position(surface, index + 1, position);
                        return Some(VertexNotice::MidpointDragged {
                            index,
                            inserted: false,
                        });
                    }
                    if surface.distance(origin, position) <= MIDPOINT_INSERT_THRESHOLD_METERS {
                        return None;
                    }
                    self.insert_after(surface, group, index, position);
                    self.drag = Some(VertexDrag::Midpoint {
                        layer,
                        index,
                        origin,
                        inserted: true,
                    });
                    debug!("Split segment {} with a new vertex", index);
                    Some(VertexNotice::MidpointDragged {
                        index,
                        inserted: true,
                    })
                }
                _ => None,
            },
            SurfaceEvent::DragEnd { layer, .. } => match self.drag {
                Some(VertexDrag::Vertex { layer: l, index }) if l == layer => {
                    self.drag = None;
                    surface.set_interaction(MapInteraction::PanDrag, true);
                    Some(VertexNotice::VertexDragEnd { index })
                }
                Some(VertexDrag::Midpoint { layer: l, index, .. }) if l == layer => {
                    self.drag = None;
                    surface.set_interaction(MapInteraction::PanDrag, true);
                    self.redraw(surface, group);
                    Some(VertexNotice::MidpointDragEnd { index })
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn begin_drag(&mut self, surface: &mut dyn MapSurface, layer: LayerId) -> Option<VertexNotice> {
        if let Some(index) = self.vertices.iter().position(|id| *id == layer) {
            self.drag = Some(VertexDrag::Vertex { layer, index });
            surface.set_interaction(MapInteraction::PanDrag, false);
            return Some(VertexNotice::VertexDragStart { index });
        }

        let index = self.midpoints.iter().position(|id| *id == layer)?;
        let (from, to) = self.segment(index);
        self.drag = Some(VertexDrag::Midpoint {
            layer,
            index,
            origin: midpoint(from, to),
            inserted: false,
        });
        surface.set_interaction(MapInteraction::PanDrag, false);
        Some(VertexNotice::MidpointDragStart { index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketch::testing::RecordingSurface;

    fn ring(surface: &mut RecordingSurface, closed: bool, n: usize) -> (LineVertices, GroupId) {
        let group = surface.create_group();
        let mut vertices = LineVertices::new(closed);
        for i in 0..n {
            vertices.push(surface, group, Position::new(i as f64, (i * i) as f64));
        }
        (vertices, group)
    }

    fn marker_position(surface: &RecordingSurface, id: LayerId) -> Position {
        surface.layer(id).and_then(Layer::as_marker).unwrap().position
    }

    #[test]
    fn test_open_line_midpoint_count() {
        let mut surface = RecordingSurface::new();
        let (vertices, _) = ring(&mut surface, false, 4);
        assert_eq!(vertices.vertex_markers().len(), 4);
        assert_eq!(vertices.midpoint_markers().len(), 3);
        assert_eq!(surface.marker_count(MarkerRole::Midpoint), 3);
    }

    #[test]
    fn test_polygon_wrap_midpoint_needs_three_vertices() {
        let mut surface = RecordingSurface::new();
        let (mut vertices, group) = ring(&mut surface, true, 2);
        assert_eq!(vertices.midpoint_markers().len(), 1);

        vertices.push(&mut surface, group, Position::new(5.0, 0.0));
        assert_eq!(vertices.midpoint_markers().len(), 3);

        let wrap = vertices.midpoint_markers()[2];
        let expected = midpoint(Position::new(5.0, 0.0), Position::new(0.0, 0.0));
        assert_eq!(marker_position(&surface, wrap), expected);
    }

    #[test]
    fn test_pop_removes_vertex_and_adjacent_midpoints() {
        let mut surface = RecordingSurface::new();
        let (mut vertices, group) = ring(&mut surface, false, 3);

        let removed = vertices.pop(&mut surface, group);
        assert_eq!(removed, Some(Position::new(2.0, 4.0)));
        assert_eq!(vertices.len(), 2);
        assert_eq!(surface.marker_count(MarkerRole::Vertex), 2);
        assert_eq!(surface.marker_count(MarkerRole::Midpoint), 1);
    }

    #[test]
    fn test_pop_regenerates_polygon_wrap_midpoint() {
        let mut surface = RecordingSurface::new();
        let (mut vertices, group) = ring(&mut surface, true, 4);
        assert_eq!(surface.marker_count(MarkerRole::Midpoint), 4);

        vertices.pop(&mut surface, group);
        assert_eq!(surface.marker_count(MarkerRole::Midpoint), 3);
        let wrap = *vertices.midpoint_markers().last().unwrap();
        let expected = midpoint(Position::new(2.0, 4.0), Position::new(0.0, 0.0));
        assert_eq!(marker_position(&surface, wrap), expected);

        vertices.pop(&mut surface, group);
        assert_eq!(surface.marker_count(MarkerRole::Midpoint), 1);
        vertices.pop(&mut surface, group);
        vertices.pop(&mut surface, group);
        assert!(vertices.is_empty());
        assert_eq!(surface.layers.len(), 0);
        assert_eq!(vertices.pop(&mut surface, group), None);
    }

    #[test]
    fn test_vertex_drag_moves_neighbouring_midpoints() {
        let mut surface = RecordingSurface::new();
        let (mut vertices, group) = ring(&mut surface, true, 3);
        let vertex = vertices.vertex_markers()[0];
        let target = Position::new(-2.0, -2.0);

        let start = vertices.handle_drag(
            &mut surface,
            group,
            SurfaceEvent::DragStart {
                layer: vertex,
                position: Position::new(0.0, 0.0),
            },
        );
        assert_eq!(start, Some(VertexNotice::VertexDragStart { index: 0 }));
        assert!(surface.disabled.contains(&MapInteraction::PanDrag));

        vertices.handle_drag(
            &mut surface,
            group,
            SurfaceEvent::Drag {
                layer: vertex,
                position: target,
            },
        );
        assert_eq!(vertices.positions()[0], target);
        let first = vertices.midpoint_markers()[0];
        let wrap = vertices.midpoint_markers()[2];
        assert_eq!(
            marker_position(&surface, first),
            midpoint(target, Position::new(1.0, 1.0))
        );
        assert_eq!(
            marker_position(&surface, wrap),
            midpoint(Position::new(2.0, 4.0), target)
        );

        let end = vertices.handle_drag(
            &mut surface,
            group,
            SurfaceEvent::DragEnd {
                layer: vertex,
                position: target,
            },
        );
        assert_eq!(end, Some(VertexNotice::VertexDragEnd { index: 0 }));
        assert!(surface.disabled.is_empty());
    }

    #[test]
    fn test_midpoint_drag_inserts_once() {
        let mut surface = RecordingSurface::new();
        let (mut vertices, group) = ring(&mut surface, false, 3);
        let handle = vertices.midpoint_markers()[0];
        let first = Position::new(0.7, 3.0);
        let second = Position::new(0.8, 3.5);

        vertices.handle_drag(
            &mut surface,
            group,
            SurfaceEvent::DragStart {
                layer: handle,
                position: Position::new(0.5, 0.5),
            },
        );
        let notice = vertices.handle_drag(
            &mut surface,
            group,
            SurfaceEvent::Drag {
                layer: handle,
                position: first,
            },
        );
        assert_eq!(
            notice,
            Some(VertexNotice::MidpointDragged {
                index: 0,
                inserted: true
            })
        );
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices.positions()[1], first);

        vertices.handle_drag(
            &mut surface,
            group,
            SurfaceEvent::Drag {
                layer: handle,
                position: second,
            },
        );
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices.positions()[1], second);

        vertices.handle_drag(
            &mut surface,
            group,
            SurfaceEvent::DragEnd {
                layer: handle,
                position: second,
            },
        );
        assert_eq!(surface.marker_count(MarkerRole::Vertex), 4);
        assert_eq!(surface.marker_count(MarkerRole::Midpoint), 3);
    }

    #[test]
    fn test_midpoint_drag_without_movement_does_not_insert() {
        let mut surface = RecordingSurface::new();
        let (mut vertices, group) = ring(&mut surface, false, 2);
        let handle = vertices.midpoint_markers()[0];
        let origin = midpoint(Position::new(0.0, 0.0), Position::new(1.0, 1.0));

        vertices.handle_drag(
            &mut surface,
            group,
            SurfaceEvent::DragStart {
                layer: handle,
                position: origin,
            },
        );
        let notice = vertices.handle_drag(
            &mut surface,
            group,
            SurfaceEvent::Drag {
                layer: handle,
                position: origin,
            },
        );
        assert_eq!(notice, None);
        assert_eq!(vertices.len(), 2);
    }

    #[test]
    fn test_distance_and_number_labels() {
        let mut surface = RecordingSurface::new();
        let (mut vertices, _) = ring(&mut surface, false, 2);

        vertices.set_display_numbers(&mut surface, true);
        vertices.set_display_distances(&mut surface, true);

        let labels: Vec<_> = surface
            .markers(MarkerRole::Vertex)
            .into_iter()
            .map(|(_, m)| m.label)
            .collect();
        assert_eq!(labels, vec![Some("1".to_string()), Some("2".to_string())]);

        let (_, midpoint) = surface.markers(MarkerRole::Midpoint).remove(0);
        let tooltip = midpoint.tooltip.unwrap();
        assert!(tooltip.ends_with(" m"), "{tooltip}");
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut surface = RecordingSurface::new();
        let (mut vertices, _) = ring(&mut surface, true, 5);
        vertices.clear(&mut surface);
        assert!(vertices.is_empty());
        assert!(surface.layers.is_empty());
    }
}
