//! Polygons, polylines and arrow polylines.

use bevy::log::debug;

use crate::sketch::events::{ShapeEvent, ShapeEventKind};
use crate::sketch::geometry::translate;
use crate::sketch::surface::{Layer, LayerId, MapEventKind, MapSurface, SurfaceEvent};
use crate::sketch::types::{DashPattern, DrawMode, Icon, Position, ShapeType, Sketch};
use crate::sketch::vertices::{LineVertices, VertexNotice};

use super::center_drag::{CenterDrag, Rearm};
use super::decoration::ArrowDecoration;
use super::{Next, ShapeCore};

#[derive(Debug)]
pub(crate) struct LineShape {
    vertices: LineVertices,
    /// Dashed segment from the last vertex to the cursor
    preview: Option<LayerId>,
    /// Polygons only
    center_drag: Option<CenterDrag>,
    /// Arrow polylines only
    decoration: Option<ArrowDecoration>,
    /// Arrows only show vertex markers while editing
    markers_while_drawing: bool,
}

impl LineShape {
    pub fn new(shape_type: ShapeType) -> Self {
        let polygon = shape_type == ShapeType::Polygon;
        let arrow = shape_type == ShapeType::ArrowPolyline;
        Self {
            vertices: LineVertices::new(polygon),
            preview: None,
            center_drag: polygon.then(CenterDrag::default),
            decoration: arrow.then(ArrowDecoration::default),
            markers_while_drawing: !arrow,
        }
    }

    pub fn owns(&self, layer: LayerId) -> bool {
        self.vertices.owns(layer)
            || self.preview == Some(layer)
            || self.center_drag.as_ref().is_some_and(|c| c.owns(layer))
            || self.decoration.as_ref().and_then(|d| d.layer()) == Some(layer)
    }

    pub fn display_distances(&self) -> bool {
        self.vertices.display_distances()
    }

    fn shows_markers(&self, core: &ShapeCore) -> bool {
        core.mode == DrawMode::Edit || self.markers_while_drawing
    }

    fn layer(&self, core: &ShapeCore) -> Layer {
        let positions = core.positions.clone();
        let style = core.style.clone();
        if core.shape_type == ShapeType::Polygon {
            Layer::Polygon { positions, style }
        } else {
            Layer::Polyline { positions, style }
        }
    }

    pub fn sketch(&self, core: &ShapeCore) -> Option<Sketch> {
        let layer = core.layer?;
        Some(Sketch {
            shape_type: core.shape_type,
            positions: core.positions.clone(),
            radius: None,
            label: None,
            style: core.style.clone(),
            layer: Some(layer),
            decoration: self.decoration.as_ref().and_then(|d| d.layer()),
        })
    }

    /// Pushes the current positions to the rendered geometry and everything derived from it.
    pub fn render(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface) {
        match core.live_layer(surface) {
            Some(id) => surface.update_layer(id, self.layer(core)),
            None if !core.positions.is_empty() => {
                core.layer = Some(surface.add_layer(core.group, self.layer(core)));
            }
            None => {}
        }
        if let Some(decoration) = &mut self.decoration {
            decoration.sync(surface, core.group, &core.positions, core.style.color);
        }
        self.refresh_center_drag(core, surface);
    }

    pub fn refresh_center_drag(&mut self, core: &ShapeCore, surface: &mut dyn MapSurface) {
        if let Some(center) = &mut self.center_drag {
            let enabled = core.mode.is_live() && core.is_draggable && core.layer.is_some();
            center.refresh(surface, core.group, &core.positions, enabled);
        }
    }

    fn listen_for_drawing(core: &mut ShapeCore, surface: &mut dyn MapSurface) {
        core.listen(surface, MapEventKind::Click);
        core.listen(surface, MapEventKind::ContextMenu);
        if !core.is_touch_device {
            core.listen(surface, MapEventKind::MouseMove);
        }
    }

    pub fn start(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface) {
        self.vertices.clear(surface);
        self.remove_preview(surface);
        Self::listen_for_drawing(core, surface);
    }

    fn update_preview(&mut self, core: &ShapeCore, surface: &mut dyn MapSurface) {
        let segment = match (core.positions.last(), core.cursor) {
            (Some(last), Some(cursor)) if !core.is_touch_device && *last != cursor => {
                vec![*last, cursor]
            }
            _ => {
                self.remove_preview(surface);
                return;
            }
        };
        let mut style = core.style.clone();
        style.dash = Some(DashPattern::PREVIEW);
        let layer = Layer::Polyline {
            positions: segment,
            style,
        };
        match self.preview.filter(|id| surface.has_layer(*id)) {
            Some(id) => surface.update_layer(id, layer),
            None => self.preview = Some(surface.add_layer(core.group, layer)),
        }
    }

    fn remove_preview(&mut self, surface: &mut dyn MapSurface) {
        if let Some(id) = self.preview.take() {
            surface.remove_layer(id);
        }
    }

    pub fn on_map_event(
        &mut self,
        core: &mut ShapeCore,
        surface: &mut dyn MapSurface,
        event: SurfaceEvent,
    ) -> Next {
        match event {
            SurfaceEvent::Click(position) => {
                core.positions.push(position);
                if self.shows_markers(core) {
                    self.vertices.push(surface, core.group, position);
                }
                core.cursor = Some(position);
                self.render(core, surface);
                self.update_preview(core, surface);
                core.emit_with(ShapeEventKind::AddPoint, || ShapeEvent::AddPoint {
                    position,
                    positions: core.positions.clone(),
                });
                Next::Continue
            }
            SurfaceEvent::MouseMove(position) => {
                core.cursor = Some(position);
                self.update_preview(core, surface);
                Next::Continue
            }
            SurfaceEvent::ContextMenu(_) => self.pop_last(core, surface),
            _ => Next::Continue,
        }
    }

    /// Drops the last vertex with its markers. Asks to stop once nothing is left.
    pub fn pop_last(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface) -> Next {
        if core.positions.pop().is_none() {
            return Next::Stop;
        }
        if self.shows_markers(core) {
            self.vertices.pop(surface, core.group);
        }
        self.render(core, surface);
        self.update_preview(core, surface);
        core.emit_with(ShapeEventKind::DeletePoint, || ShapeEvent::DeletePoint {
            positions: core.positions.clone(),
        });

        if core.positions.is_empty() {
            debug!("Last vertex removed, stopping");
            Next::Stop
        } else {
            Next::Continue
        }
    }

    /// Re-attaches drawing listeners once the post center-drag delay has passed.
    pub fn poll_rearm(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface) {
        let Some(center) = &mut self.center_drag else {
            return;
        };
        if center.poll_rearm(surface.now()) == Rearm::Due && core.mode == DrawMode::Draw {
            Self::listen_for_drawing(core, surface);
        }
    }

    pub fn on_drag(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface, event: SurfaceEvent) {
        let layer = match event {
            SurfaceEvent::DragStart { layer, .. }
            | SurfaceEvent::Drag { layer, .. }
            | SurfaceEvent::DragEnd { layer, .. } => layer,
            _ => return,
        };

        if self.center_drag.as_ref().is_some_and(|c| c.owns(layer)) {
            self.on_center_drag(core, surface, event);
            return;
        }

        let Some(notice) = self.vertices.handle_drag(surface, core.group, event) else {
            return;
        };
        core.positions = self.vertices.positions().to_vec();
        if !matches!(
            notice,
            VertexNotice::VertexDragStart { .. } | VertexNotice::MidpointDragStart { .. }
        ) {
            self.render(core, surface);
        }

        let positions = || core.positions.clone();
        let event = match notice {
            VertexNotice::VertexDragStart { index } => ShapeEvent::DragVertexStart { index },
            VertexNotice::VertexDragged { index } => ShapeEvent::DragVertex {
                index,
                positions: positions(),
            },
            VertexNotice::VertexDragEnd { index } => ShapeEvent::DragEndVertex {
                index,
                positions: positions(),
            },
            VertexNotice::MidpointDragStart { index } => {
                ShapeEvent::DragMidpointVertexStart { index }
            }
            VertexNotice::MidpointDragged { index, inserted } => ShapeEvent::DragMidpointVertex {
                index,
                inserted,
                positions: positions(),
            },
            VertexNotice::MidpointDragEnd { index } => ShapeEvent::DragEndMidpointVertex {
                index,
                positions: positions(),
            },
        };
        core.emit(event);
    }

    fn on_center_drag(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface, event: SurfaceEvent) {
        let Some(center) = &mut self.center_drag else {
            return;
        };
        match event {
            SurfaceEvent::DragStart { .. } => {
                center.begin(surface);
                let position = center.reference();
                self.vertices.clear(surface);
                core.unlisten_all(surface);
                self.remove_preview(surface);
                core.emit(ShapeEvent::DragCenterStart { position });
            }
            SurfaceEvent::Drag { position, .. } if center.is_dragging() => {
                let delta = center.drag_to(surface, position);
                translate(&mut core.positions, delta);
                self.render(core, surface);
                core.emit_with(ShapeEventKind::DragCenter, || ShapeEvent::DragCenter {
                    delta,
                    positions: core.positions.clone(),
                });
            }
            SurfaceEvent::DragEnd { .. } if center.is_dragging() => {
                center.end(surface);
                let released_at = center.reference();
                if self.shows_markers(core) {
                    self.vertices
                        .set_positions(surface, core.group, core.positions.clone());
                }
                self.refresh_center_drag(core, surface);
                core.emit_with(ShapeEventKind::DragCenterEnd, || ShapeEvent::DragCenterEnd {
                    positions: core.positions.clone(),
                });

                if core.mode != DrawMode::Draw {
                    return;
                }
                if !core.is_touch_device {
                    core.cursor = Some(released_at);
                    self.update_preview(core, surface);
                }
                if let Some(center) = &mut self.center_drag {
                    center.schedule_rearm(surface.now());
                }
            }
            _ => {}
        }
    }

    pub fn load(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface, sketch: &Sketch) {
        core.positions = sketch.positions.clone();
        core.pre_edit = sketch.positions.clone();
        if let (Some(decoration), Some(previous)) = (&mut self.decoration, sketch.decoration) {
            decoration.remove(surface);
            surface.remove_layer(previous);
        }
        self.remove_preview(surface);
        self.vertices
            .set_positions(surface, core.group, core.positions.clone());
        self.render(core, surface);
    }

    pub fn restore(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface) {
        self.vertices
            .set_positions(surface, core.group, core.positions.clone());
        self.render(core, surface);
    }

    pub fn set_positions(
        &mut self,
        core: &mut ShapeCore,
        surface: &mut dyn MapSurface,
        positions: Vec<Position>,
    ) {
        core.positions = positions;
        if self.shows_markers(core) && core.mode.is_live() {
            self.vertices
                .set_positions(surface, core.group, core.positions.clone());
        }
        self.render(core, surface);
    }

    /// Clears every transient layer. Returns the committed sketch, or `None` after
    /// removing an empty geometry.
    pub fn finish(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface) -> Option<Sketch> {
        self.remove_preview(surface);
        self.vertices.clear(surface);
        if let Some(center) = &mut self.center_drag {
            center.remove(surface);
        }

        match core.live_layer(surface) {
            Some(id) if !core.positions.is_empty() => {
                surface.update_layer(id, self.layer(core));
                let sketch = self.sketch(core);
                // The arrowhead now belongs to the committed sketch
                if let Some(decoration) = &mut self.decoration {
                    decoration.take();
                }
                sketch
            }
            _ => {
                if let Some(id) = core.layer.take() {
                    surface.remove_layer(id);
                }
                self.discard(surface);
                None
            }
        }
    }

    /// Removes layers that only make sense alongside the geometry.
    pub fn discard(&mut self, surface: &mut dyn MapSurface) {
        if let Some(decoration) = &mut self.decoration {
            decoration.remove(surface);
        }
    }

    pub fn release(&mut self, surface: &mut dyn MapSurface) {
        self.remove_preview(surface);
        self.vertices.clear(surface);
        if let Some(center) = &mut self.center_drag {
            center.remove(surface);
        }
    }

    pub fn set_icons(&mut self, surface: &mut dyn MapSurface, vertex: Option<Icon>, midpoint: Option<Icon>) {
        self.vertices.set_icons(surface, vertex, midpoint);
    }

    pub fn set_drag_icon(&mut self, surface: &mut dyn MapSurface, icon: Option<Icon>) {
        if let Some(center) = &mut self.center_drag {
            center.set_icon(surface, icon);
        }
    }

    pub fn set_display_distances(&mut self, surface: &mut dyn MapSurface, display: bool) {
        self.vertices.set_display_distances(surface, display);
    }

    pub fn set_display_numbers(&mut self, surface: &mut dyn MapSurface, display: bool) {
        self.vertices.set_display_numbers(surface, display);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::constants::CENTER_DRAG_REARM_DELAY;
    use crate::sketch::factory::ShapeFactory;
    use crate::sketch::options::ShapeConfig;
    use crate::sketch::shape::DrawShape;
    use crate::sketch::surface::{GroupId, MapInteraction, MarkerRole};
    use crate::sketch::testing::{EventLog, RecordingSurface};
    use crate::sketch::types::ShapeStyle;

    fn drawing(
        shape_type: ShapeType,
        points: &[(f64, f64)],
    ) -> (ShapeFactory, RecordingSurface, GroupId, EventLog) {
        let log = EventLog::default();
        let mut surface = RecordingSurface::new();
        let group = surface.create_group();
        let mut factory = ShapeFactory::new(log.config());
        let shape = factory
            .acquire(shape_type, &mut surface, group, ShapeStyle::default())
            .unwrap();
        shape.start_drawing(&mut surface);
        for p in points {
            shape.handle_event(&mut surface, SurfaceEvent::Click((*p).into()));
        }
        (factory, surface, group, log)
    }

    fn shape(factory: &mut ShapeFactory) -> &mut DrawShape {
        factory.active_mut().unwrap()
    }

    fn drag(shape: &mut DrawShape, surface: &mut RecordingSurface, layer: LayerId, path: &[Position]) {
        let first = path[0];
        shape.handle_event(surface, SurfaceEvent::DragStart { layer, position: first });
        for position in path {
            shape.handle_event(surface, SurfaceEvent::Drag { layer, position: *position });
        }
        let last = path[path.len() - 1];
        shape.handle_event(surface, SurfaceEvent::DragEnd { layer, position: last });
    }

    #[test]
    fn test_preview_follows_cursor() {
        let (mut factory, mut surface, _, _) = drawing(ShapeType::Polyline, &[(0.0, 0.0)]);
        let shape = shape(&mut factory);

        shape.handle_event(&mut surface, SurfaceEvent::MouseMove(Position::new(1.0, 1.0)));
        shape.handle_event(&mut surface, SurfaceEvent::MouseMove(Position::new(2.0, 2.0)));

        assert_eq!(
            surface.previews(),
            vec![vec![Position::new(0.0, 0.0), Position::new(2.0, 2.0)]]
        );
    }

    #[test]
    fn test_touch_mode_has_no_preview() {
        let mut surface = RecordingSurface::new();
        let group = surface.create_group();
        let mut factory = ShapeFactory::new(ShapeConfig {
            is_touch_device: true,
            ..Default::default()
        });
        let shape = factory
            .acquire(ShapeType::Polyline, &mut surface, group, ShapeStyle::default())
            .unwrap();
        shape.start_drawing(&mut surface);

        assert!(!shape.is_listening(MapEventKind::MouseMove));
        shape.handle_event(&mut surface, SurfaceEvent::Click(Position::new(0.0, 0.0)));
        shape.handle_event(&mut surface, SurfaceEvent::MouseMove(Position::new(1.0, 1.0)));
        assert!(surface.previews().is_empty());
    }

    #[test]
    fn test_undo_removes_last_vertex() {
        let (mut factory, mut surface, _, log) =
            drawing(ShapeType::Polygon, &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        let shape = shape(&mut factory);
        assert_eq!(surface.marker_count(MarkerRole::Midpoint), 4);

        shape.handle_event(&mut surface, SurfaceEvent::ContextMenu(Position::new(5.0, 5.0)));

        assert_eq!(shape.positions().len(), 3);
        assert_eq!(surface.marker_count(MarkerRole::Vertex), 3);
        assert_eq!(surface.marker_count(MarkerRole::Midpoint), 3);
        assert_eq!(
            log.last(ShapeEventKind::DeletePoint),
            Some(ShapeEvent::DeletePoint {
                positions: vec![
                    Position::new(0.0, 0.0),
                    Position::new(0.0, 1.0),
                    Position::new(1.0, 1.0)
                ]
            })
        );

        shape.undo(&mut surface);
        assert_eq!(shape.positions().len(), 2);
        // Below three vertices the center-drag marker goes away
        assert_eq!(surface.marker_count(MarkerRole::PolygonDrag), 0);
    }

    #[test]
    fn test_undo_last_vertex_stops_drawing() {
        let (mut factory, mut surface, _, log) = drawing(ShapeType::Polyline, &[(0.0, 0.0)]);
        let shape = shape(&mut factory);

        shape.undo(&mut surface);

        assert_eq!(shape.draw_mode(), DrawMode::Stop);
        assert_eq!(
            log.last(ShapeEventKind::Finish),
            Some(ShapeEvent::Finish(None))
        );
        assert!(surface.layers.is_empty());
        assert!(surface.listening.is_empty());
    }

    #[test]
    fn test_vertex_drag_updates_geometry() {
        let (mut factory, mut surface, _, log) =
            drawing(ShapeType::Polyline, &[(0.0, 0.0), (1.0, 1.0)]);
        let shape = shape(&mut factory);
        let vertex = surface.markers(MarkerRole::Vertex)[1].0;

        drag(shape, &mut surface, vertex, &[Position::new(3.0, 3.0)]);

        assert_eq!(shape.positions()[1], Position::new(3.0, 3.0));
        let sketch = shape.current_shape().unwrap();
        assert_eq!(
            surface.layer(sketch.layer.unwrap()).unwrap().positions()[1],
            Position::new(3.0, 3.0)
        );
        assert!(log.kinds().contains(&ShapeEventKind::DragVertex));
        assert!(log.kinds().contains(&ShapeEventKind::DragEndVertex));
    }

    #[test]
    fn test_midpoint_drag_adds_one_vertex_at_dragged_position() {
        let (mut factory, mut surface, group, _) = drawing(ShapeType::Polygon, &[]);
        let positions = vec![
            Position::new(0.0, 0.0),
            Position::new(0.0, 2.0),
            Position::new(2.0, 2.0),
        ];
        let sketch = {
            let shape = shape(&mut factory);
            shape.stop_drawing(&mut surface);
            let mut sketch = Sketch::polygon(positions.clone());
            sketch.layer = Some(surface.add_layer(
                group,
                Layer::Polygon {
                    positions: positions.clone(),
                    style: ShapeStyle::default(),
                },
            ));
            sketch
        };
        let shape = factory
            .acquire(ShapeType::Polygon, &mut surface, group, ShapeStyle::default())
            .unwrap();
        shape.edit_shape(&mut surface, &sketch);
        let midpoint = surface.markers(MarkerRole::Midpoint)[1].0;
        let target = Position::new(1.5, 2.5);

        drag(shape, &mut surface, midpoint, &[Position::new(1.2, 2.2), target]);

        assert_eq!(shape.positions().len(), 4);
        assert_eq!(shape.positions()[2], target);
        assert_eq!(surface.marker_count(MarkerRole::Midpoint), 4);
    }

    #[test]
    fn test_center_drag_translates_polygon_and_delays_rearm() {
        let (mut factory, mut surface, _, log) =
            drawing(ShapeType::Polygon, &[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0)]);
        let shape = shape(&mut factory);
        let marker = surface.markers(MarkerRole::PolygonDrag)[0].0;

        shape.handle_event(
            &mut surface,
            SurfaceEvent::DragStart {
                layer: marker,
                position: Position::new(1.0, 1.0),
            },
        );
        assert!(surface.listening.is_empty());
        assert!(surface.disabled.contains(&MapInteraction::PanDrag));
        shape.handle_event(
            &mut surface,
            SurfaceEvent::Drag {
                layer: marker,
                position: Position::new(2.0, 1.0),
            },
        );
        shape.handle_event(
            &mut surface,
            SurfaceEvent::DragEnd {
                layer: marker,
                position: Position::new(2.0, 1.0),
            },
        );

        assert_eq!(
            shape.positions(),
            &[
                Position::new(1.0, 0.0),
                Position::new(1.0, 2.0),
                Position::new(3.0, 2.0)
            ]
        );
        assert!(log.kinds().contains(&ShapeEventKind::DragCenterEnd));

        // The click produced by releasing the marker is swallowed
        shape.handle_event(&mut surface, SurfaceEvent::Click(Position::new(2.0, 1.0)));
        assert_eq!(shape.positions().len(), 3);

        surface.advance(CENTER_DRAG_REARM_DELAY + Duration::from_millis(1));
        shape.handle_event(&mut surface, SurfaceEvent::Click(Position::new(5.0, 5.0)));
        assert_eq!(shape.positions().len(), 4);
        assert!(surface.listening.contains(&MapEventKind::Click));
    }

    #[test]
    fn test_not_draggable_polygon_has_no_center_marker() {
        let (mut factory, mut surface, _, _) = drawing(ShapeType::Polygon, &[]);
        let shape = shape(&mut factory);
        shape.set_is_draggable(&mut surface, false);
        for p in [(0.0, 0.0), (0.0, 2.0), (2.0, 2.0)] {
            shape.handle_event(&mut surface, SurfaceEvent::Click(p.into()));
        }
        assert_eq!(surface.marker_count(MarkerRole::PolygonDrag), 0);
    }

    #[test]
    fn test_arrow_draws_without_markers_and_keeps_decoration() {
        let (mut factory, mut surface, _, log) =
            drawing(ShapeType::ArrowPolyline, &[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        let shape = shape(&mut factory);
        assert_eq!(surface.marker_count(MarkerRole::Vertex), 0);
        assert_eq!(surface.decorations(), 1);

        assert!(shape.confirm(&mut surface));
        let Some(ShapeEvent::Finish(Some(sketch))) = log.last(ShapeEventKind::Finish) else {
            panic!("expected a committed arrow");
        };
        let decoration = sketch.decoration.unwrap();
        assert!(surface.has_layer(decoration));
        assert_eq!(surface.decorations(), 1);
    }

    #[test]
    fn test_arrow_edit_shows_markers_and_delete_removes_decoration() {
        let (mut factory, mut surface, group, log) =
            drawing(ShapeType::ArrowPolyline, &[(0.0, 0.0), (1.0, 1.0)]);
        shape(&mut factory).confirm(&mut surface);
        let Some(ShapeEvent::Finish(Some(sketch))) = log.last(ShapeEventKind::Finish) else {
            panic!("expected a committed arrow");
        };

        let shape = factory
            .acquire(ShapeType::ArrowPolyline, &mut surface, group, ShapeStyle::default())
            .unwrap();
        shape.edit_shape(&mut surface, &sketch);
        assert_eq!(surface.marker_count(MarkerRole::Vertex), 2);
        assert_eq!(surface.decorations(), 1);
        assert!(!surface.has_layer(sketch.decoration.unwrap()));

        shape.delete_shape(&mut surface);
        assert_eq!(surface.decorations(), 0);
        assert!(surface.layers.is_empty());
    }

    #[test]
    fn test_distance_labels_toggle() {
        let (mut factory, mut surface, _, _) =
            drawing(ShapeType::Polyline, &[(0.0, 0.0), (0.0, 1.0)]);
        let shape = shape(&mut factory);

        shape.set_display_line_distances(&mut surface, true);
        assert!(shape.display_line_distances());
        let tooltip = surface.markers(MarkerRole::Midpoint)[0].1.tooltip.clone();
        assert_eq!(tooltip.as_deref(), Some("111194.93 m"));

        shape.set_display_line_distances(&mut surface, false);
        assert!(surface.markers(MarkerRole::Midpoint)[0].1.tooltip.is_none());
    }

    #[test]
    fn test_set_positions_redraws_everything() {
        let (mut factory, mut surface, _, _) = drawing(ShapeType::Polyline, &[(0.0, 0.0)]);
        let shape = shape(&mut factory);
        let replacement = vec![
            Position::new(1.0, 1.0),
            Position::new(2.0, 2.0),
            Position::new(3.0, 3.0),
        ];

        shape.set_positions(&mut surface, replacement.clone());

        assert_eq!(shape.positions(), replacement.as_slice());
        assert_eq!(surface.marker_count(MarkerRole::Vertex), 3);
        assert_eq!(surface.marker_count(MarkerRole::Midpoint), 2);
    }
}
