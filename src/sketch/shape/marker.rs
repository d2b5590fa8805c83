//! Single-position markers, optionally carrying an editable text label.

use crate::sketch::events::{ShapeEvent, ShapeEventKind};
use crate::sketch::surface::{
    Layer, MapEventKind, MapInteraction, MapSurface, MarkerLayer, MarkerRole, SurfaceEvent,
};
use crate::sketch::types::{DrawMode, Icon, Position, ShapeType, Sketch};

use super::{Next, ShapeCore};

#[derive(Debug, Default)]
pub(crate) struct MarkerShape {
    is_text_marker: bool,
    label: Option<String>,
    pre_edit_label: Option<String>,
    dragging: bool,
}

impl MarkerShape {
    pub fn is_text_marker(&self) -> bool {
        self.is_text_marker
    }

    pub fn set_is_text_marker(&mut self, is_text_marker: bool) {
        self.is_text_marker = is_text_marker;
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn sketch(&self, core: &ShapeCore) -> Option<Sketch> {
        let layer = core.layer?;
        let position = *core.positions.first()?;
        Some(Sketch {
            shape_type: ShapeType::Marker,
            positions: vec![position],
            radius: None,
            label: self.label.clone(),
            style: core.style.clone(),
            layer: Some(layer),
            decoration: None,
        })
    }

    pub fn render(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface) {
        let Some(position) = core.positions.first().copied() else {
            return;
        };
        let draggable = match core.mode {
            DrawMode::Edit => true,
            DrawMode::Draw => core.is_draggable,
            DrawMode::Start | DrawMode::Stop => false,
        };
        let mut marker = MarkerLayer::new(position, MarkerRole::Shape)
            .draggable(draggable)
            .with_icon(core.style.icon.clone())
            .with_label(self.label.clone());
        marker.editable_text = self.is_text_marker && core.mode.is_live();

        match core.live_layer(surface) {
            Some(id) => surface.update_layer(id, Layer::Marker(marker)),
            None => core.layer = Some(surface.add_layer(core.group, Layer::Marker(marker))),
        }
    }

    pub fn start(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface) {
        self.dragging = false;
        self.label = if self.is_text_marker {
            Some(core.style.text.clone().unwrap_or_default())
        } else {
            None
        };
        core.listen(surface, MapEventKind::Click);
    }

    pub fn on_map_event(
        &mut self,
        core: &mut ShapeCore,
        surface: &mut dyn MapSurface,
        event: SurfaceEvent,
    ) -> Next {
        if let SurfaceEvent::Click(position) = event
            && core.positions.is_empty()
        {
            core.positions.push(position);
            core.unlisten(surface, MapEventKind::Click);
            self.render(core, surface);
            core.emit_with(ShapeEventKind::AddPoint, || ShapeEvent::AddPoint {
                position,
                positions: core.positions.clone(),
            });
        }
        Next::Continue
    }

    pub fn on_drag(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface, event: SurfaceEvent) {
        let Some(own) = core.layer else {
            return;
        };
        match event {
            SurfaceEvent::DragStart { layer, .. } if layer == own => {
                self.dragging = true;
                surface.set_interaction(MapInteraction::PanDrag, false);
            }
            SurfaceEvent::Drag { layer, position } if layer == own && self.dragging => {
                self.move_to(core, surface, position);
            }
            SurfaceEvent::DragEnd { layer, position } if layer == own && self.dragging => {
                self.dragging = false;
                surface.set_interaction(MapInteraction::PanDrag, true);
                self.move_to(core, surface, position);
            }
            _ => {}
        }
    }

    fn move_to(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface, position: Position) {
        if core.positions.first() == Some(&position) {
            return;
        }
        core.positions = vec![position];
        self.render(core, surface);
        self.notify_edit(core);
    }

    fn notify_edit(&self, core: &ShapeCore) {
        if core.mode == DrawMode::Edit
            && let Some(sketch) = self.sketch(core)
        {
            core.emit(ShapeEvent::Edit(sketch));
        }
    }

    pub fn load(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface, sketch: &Sketch) {
        core.positions = sketch.center().into_iter().collect();
        core.pre_edit = core.positions.clone();
        self.label = sketch.label.clone();
        self.pre_edit_label = self.label.clone();
        self.is_text_marker = self.label.is_some();
        self.render(core, surface);
    }

    pub fn restore(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface) {
        self.label = self.pre_edit_label.clone();
        self.render(core, surface);
    }

    pub fn finish(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface) -> Option<Sketch> {
        self.dragging = false;
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

    /// Replaces the label. The marker stays where it is.
    pub fn set_text(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface, text: String) {
        if self.label.as_deref() == Some(text.as_str()) {
            return;
        }
        self.label = Some(text);
        if core.layer.is_some() {
            self.render(core, surface);
            self.notify_edit(core);
        }
    }

    pub fn set_icon(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface, icon: Icon) {
        core.style.icon = Some(icon);
        if core.layer.is_some() {
            self.render(core, surface);
        }
    }

    pub fn set_position(&mut self, core: &mut ShapeCore, surface: &mut dyn MapSurface, position: Position) {
        if core.layer.is_some() {
            self.move_to(core, surface, position);
        }
    }
}
