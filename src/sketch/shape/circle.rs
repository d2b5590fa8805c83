//! Circles defined by a center and a point on the rim.

use crate::sketch::events::{ShapeEvent, ShapeEventKind};
use crate::sketch::geometry::radius_point;
use crate::sketch::surface::{Layer, LayerId, MapEventKind, MapSurface, SurfaceEvent};
use crate::sketch::types::{DrawMode, Icon, ShapeType, Sketch};
use crate::sketch::vertices::{CircleNotice, CircularVertices};

use super::{Next, ShapeCore};

#[derive(Debug, Default)]
pub(crate) struct CircleShape {
    vertices: CircularVertices,
    /// Meters
    radius: f64,
    pre_edit_radius: f64,
}

impl CircleShape {
    pub fn owns(&self, layer: LayerId) -> bool {
        self.vertices.owns(layer)
    }

    pub fn sketch(&self, core: &ShapeCore) -> Option<Sketch> {
        let layer = core.layer?;
        let center = *core.positions.first()?;
        Some(Sketch {
            shape_type: ShapeType::Circle,
            positions: vec![center],
            radius: Some(self.radius),
            label: None,
            style: core.style.clone(),
            layer: Some(layer),
            decoration: None,
        })
    }

    pub fn render(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface) {
        let Some(center) = core.positions.first().copied() else {
            return;
        };
        let layer = Layer::Circle {
            center,
            radius: self.radius,
            style: core.style.clone(),
        };
        match core.live_layer(surface) {
            Some(id) => surface.update_layer(id, layer),
            None => core.layer = Some(surface.add_layer(core.group, layer)),
        }
    }

    pub fn start(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface) {
        self.vertices.clear(surface);
        self.radius = 0.0;
        core.listen(surface, MapEventKind::Click);
        if !core.is_touch_device {
            core.listen(surface, MapEventKind::MouseMove);
        }
    }

    pub fn on_map_event(
        &mut self,
        core: &mut ShapeCore,
        surface: &mut dyn MapSurface,
        event: SurfaceEvent,
    ) -> Next {
        match event {
            SurfaceEvent::Click(position) if core.positions.len() < 2 => {
                core.positions.push(position);
                self.vertices.place(surface, core.group, position);
                core.emit_with(ShapeEventKind::AddPoint, || ShapeEvent::AddPoint {
                    position,
                    positions: core.positions.clone(),
                });

                if let [center, rim] = core.positions[..] {
                    self.radius = surface.distance(center, rim);
                    core.unlisten(surface, MapEventKind::Click);
                    core.unlisten(surface, MapEventKind::MouseMove);
                }
                self.render(core, surface);
            }
            SurfaceEvent::MouseMove(position) => {
                core.cursor = Some(position);
                if let [center] = core.positions[..] {
                    self.radius = surface.distance(center, position);
                    self.render(core, surface);
                }
            }
            _ => {}
        }
        Next::Continue
    }

    pub fn on_drag(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface, event: SurfaceEvent) {
        let Some(notice) = self.vertices.handle_drag(surface, event) else {
            return;
        };
        core.positions = self.vertices.positions().to_vec();

        let event = match notice {
            CircleNotice::DragStart(handle) => ShapeEvent::DragVertexStart {
                index: handle.index(),
            },
            CircleNotice::CenterMoved => {
                self.render(core, surface);
                ShapeEvent::DragVertex {
                    index: 0,
                    positions: core.positions.clone(),
                }
            }
            CircleNotice::OuterMoved => {
                if let [center, rim] = core.positions[..] {
                    self.radius = surface.distance(center, rim);
                }
                self.render(core, surface);
                ShapeEvent::DragVertex {
                    index: 1,
                    positions: core.positions.clone(),
                }
            }
            CircleNotice::DragEnd(handle) => ShapeEvent::DragEndVertex {
                index: handle.index(),
                positions: core.positions.clone(),
            },
        };
        core.emit(event);

        if core.mode == DrawMode::Edit
            && matches!(notice, CircleNotice::CenterMoved | CircleNotice::OuterMoved)
            && let Some(sketch) = self.sketch(core)
        {
            core.emit(ShapeEvent::Edit(sketch));
        }
    }

    /// Back-derives the rim point from the stored center and radius.
    pub fn load(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface, sketch: &Sketch) {
        let center = sketch.center().unwrap_or_default();
        self.radius = sketch.radius.unwrap_or_default();
        self.pre_edit_radius = self.radius;

        let rim = radius_point(center, self.radius);
        core.positions = vec![center, rim];
        core.pre_edit = core.positions.clone();
        self.vertices.load(surface, core.group, center, rim);
        self.render(core, surface);
    }

    pub fn restore(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface) {
        self.radius = self.pre_edit_radius;
        if let [center, rim] = core.positions[..] {
            self.vertices.load(surface, core.group, center, rim);
        }
        self.render(core, surface);
    }

    pub fn finish(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface) -> Option<Sketch> {
        self.vertices.clear(surface);
        match core.live_layer(surface) {
            Some(_) if !core.positions.is_empty() => {
                self.render(core, surface);
                self.sketch(core)
            }
            _ => {
                if let Some(id) = core.layer.take() {
                    surface.remove_layer(id);
                }
                None
            }
        }
    }

    pub fn release(&mut self, surface: &mut dyn MapSurface) {
        self.vertices.clear(surface);
    }

    /// The center handle takes the midpoint icon, the rim handle the vertex icon.
    pub fn set_icons(&mut self, surface: &mut dyn MapSurface, vertex: Option<Icon>, midpoint: Option<Icon>) {
        self.vertices.set_icons(surface, midpoint, vertex);
    }
}
