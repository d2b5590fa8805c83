//! Shape lifecycle: START -> DRAW -> STOP, EDIT -> STOP, with cancel and delete.
//!
//! [`DrawShape`] owns the state every shape shares ([`ShapeCore`]) and delegates the
//! geometry-specific parts to a [`ShapeKind`]. Line shapes compose optional capabilities
//! (center drag for polygons, an arrowhead for arrow polylines) instead of subclassing.

mod center_drag;
mod circle;
mod decoration;
mod line;
mod marker;

use std::collections::BTreeSet;
use std::sync::Arc;

use bevy::log::{debug, warn};

use super::error::ShapeError;
use super::events::{EventRegistry, ShapeEvent, ShapeEventKind};
use super::factory::ConstructionToken;
use super::options::ShapeConfig;
use super::surface::{GroupId, LayerId, MapEventKind, MapInteraction, MapSurface, SurfaceEvent};
use super::types::{DrawMode, Icon, Position, ShapeStyle, ShapeType, Sketch};

use circle::CircleShape;
use line::LineShape;
use marker::MarkerShape;

/// What the shape asks of its lifecycle after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Next {
    Continue,
    Stop,
}

/// State shared by every shape kind.
#[derive(Debug)]
pub(crate) struct ShapeCore {
    pub shape_type: ShapeType,
    pub mode: DrawMode,
    pub positions: Vec<Position>,
    pub pre_edit: Vec<Position>,
    pub style: ShapeStyle,
    pub group: GroupId,
    /// Rendered geometry
    pub layer: Option<LayerId>,
    pub cursor: Option<Position>,
    pub is_touch_device: bool,
    pub is_draggable: bool,
    pub vertex_icon: Option<Icon>,
    pub midpoint_icon: Option<Icon>,
    pub events: EventRegistry,
    listening: BTreeSet<MapEventKind>,
    vacated: bool,
}

impl ShapeCore {
    fn new(shape_type: ShapeType, group: GroupId, style: ShapeStyle) -> Self {
        Self {
            shape_type,
            mode: DrawMode::Start,
            positions: Vec::new(),
            pre_edit: Vec::new(),
            style,
            group,
            layer: None,
            cursor: None,
            is_touch_device: false,
            is_draggable: false,
            vertex_icon: None,
            midpoint_icon: None,
            events: EventRegistry::default(),
            listening: BTreeSet::new(),
            vacated: false,
        }
    }

    pub fn listen(&mut self, surface: &mut dyn MapSurface, kind: MapEventKind) {
        if self.listening.insert(kind) {
            surface.listen(kind);
        }
    }

    pub fn unlisten(&mut self, surface: &mut dyn MapSurface, kind: MapEventKind) {
        if self.listening.remove(&kind) {
            surface.unlisten(kind);
        }
    }

    pub fn unlisten_all(&mut self, surface: &mut dyn MapSurface) {
        for kind in std::mem::take(&mut self.listening) {
            surface.unlisten(kind);
        }
    }

    pub fn is_listening(&self, kind: MapEventKind) -> bool {
        self.listening.contains(&kind)
    }

    pub fn emit(&self, event: ShapeEvent) {
        self.events.emit(&event);
    }

    pub fn emit_with(&self, kind: ShapeEventKind, build: impl FnOnce() -> ShapeEvent) {
        self.events.emit_with(kind, build);
    }

    /// Layer if it is still present on the surface.
    pub fn live_layer(&self, surface: &dyn MapSurface) -> Option<LayerId> {
        self.layer.filter(|id| surface.has_layer(*id))
    }
}

#[derive(Debug)]
pub(crate) enum ShapeKind {
    Line(LineShape),
    Circle(CircleShape),
    Marker(MarkerShape),
}

/// A single drawable/editable shape. Obtained from [`ShapeFactory::acquire`].
///
/// [`ShapeFactory::acquire`]: super::factory::ShapeFactory::acquire
#[derive(Debug)]
pub struct DrawShape {
    core: ShapeCore,
    kind: ShapeKind,
}

impl DrawShape {
    pub fn shape_type(&self) -> ShapeType {
        self.core.shape_type
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.core.mode
    }

    /// Working position list (`[center, rim]` for circles).
    pub fn positions(&self) -> &[Position] {
        &self.core.positions
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.core.style
    }

    pub fn group(&self) -> GroupId {
        self.core.group
    }

    pub fn is_touch_device(&self) -> bool {
        self.core.is_touch_device
    }

    pub fn is_draggable(&self) -> bool {
        self.core.is_draggable
    }

    /// True once the shape stopped and gave up the active slot.
    pub fn is_vacated(&self) -> bool {
        self.core.vacated
    }

    pub fn is_listening(&self, kind: MapEventKind) -> bool {
        self.core.is_listening(kind)
    }

    pub fn on(&mut self, kind: ShapeEventKind, listener: impl Fn(&ShapeEvent) + Send + Sync + 'static) {
        self.core.events.on(kind, Arc::new(listener));
    }

    pub fn off(&mut self, kind: ShapeEventKind) {
        self.core.events.off(kind);
    }

    /// The shape as it currently stands, or `None` if nothing is rendered.
    pub fn current_shape(&self) -> Option<Sketch> {
        match &self.kind {
            ShapeKind::Line(line) => line.sketch(&self.core),
            ShapeKind::Circle(circle) => circle.sketch(&self.core),
            ShapeKind::Marker(marker) => marker.sketch(&self.core),
        }
    }

    /// Minimum vertex count reached for this shape type.
    pub fn can_confirm(&self) -> bool {
        self.core.positions.len() >= self.core.shape_type.min_vertices()
    }

    pub fn start_drawing(&mut self, surface: &mut dyn MapSurface) {
        if self.core.mode.is_live() {
            debug!(
                "{} is already {:?}, ignoring start",
                self.core.shape_type.display_name(),
                self.core.mode
            );
            return;
        }

        self.core.vacated = false;
        self.core.mode = DrawMode::Draw;
        self.core.positions.clear();
        self.core.pre_edit.clear();
        self.core.cursor = None;
        self.core.layer = None;

        match &mut self.kind {
            ShapeKind::Line(line) => line.start(&mut self.core, surface),
            ShapeKind::Circle(circle) => circle.start(&mut self.core, surface),
            ShapeKind::Marker(marker) => marker.start(&mut self.core, surface),
        }

        debug!("Started drawing {}", self.core.shape_type.display_name());
        self.core.emit(ShapeEvent::DrawStart);
    }

    /// Commits the current positions, detaches handlers and vacates the active slot.
    pub fn stop_drawing(&mut self, surface: &mut dyn MapSurface) {
        if !self.core.mode.is_live() {
            debug!(
                "{} is not drawing or editing, ignoring stop",
                self.core.shape_type.display_name()
            );
            return;
        }

        let was_editing = self.core.mode == DrawMode::Edit;
        self.core.mode = DrawMode::Stop;
        self.core.unlisten_all(surface);
        if was_editing {
            self.core.style = self.core.style.committed();
        }

        let committed = match &mut self.kind {
            ShapeKind::Line(line) => line.finish(&mut self.core, surface),
            ShapeKind::Circle(circle) => circle.finish(&mut self.core, surface),
            ShapeKind::Marker(marker) => marker.finish(&mut self.core, surface),
        };
        surface.set_interaction(MapInteraction::PanDrag, true);

        debug!(
            "Stopped {} ({})",
            self.core.shape_type.display_name(),
            if committed.is_some() { "committed" } else { "empty" }
        );
        self.core.emit(ShapeEvent::Finish(committed));

        self.core.positions.clear();
        self.core.pre_edit.clear();
        self.core.layer = None;
        self.core.cursor = None;
        self.core.vacated = true;
    }

    /// Stops the shape if it has enough vertices. Returns false and changes nothing otherwise.
    pub fn confirm(&mut self, surface: &mut dyn MapSurface) -> bool {
        if !self.core.mode.is_live() {
            return false;
        }
        if !self.can_confirm() {
            debug!(
                "Rejected confirm: {} needs {} positions, has {}",
                self.core.shape_type.display_name(),
                self.core.shape_type.min_vertices(),
                self.core.positions.len()
            );
            return false;
        }
        self.stop_drawing(surface);
        true
    }

    /// Loads a committed shape for editing.
    pub fn edit_shape(&mut self, surface: &mut dyn MapSurface, sketch: &Sketch) {
        if sketch.shape_type != self.core.shape_type {
            warn!(
                "Cannot edit a {} with the {} tool",
                sketch.shape_type.display_name(),
                self.core.shape_type.display_name()
            );
            return;
        }

        match self.core.mode {
            DrawMode::Edit => self.cancel_edit(surface),
            DrawMode::Draw => self.stop_drawing(surface),
            DrawMode::Start | DrawMode::Stop => {}
        }

        self.core.vacated = false;
        self.core.mode = DrawMode::Edit;
        self.core.unlisten_all(surface);
        self.core.cursor = None;
        self.core.style = sketch.style.editing();
        self.core.layer = sketch.layer.filter(|id| surface.has_layer(*id));

        match &mut self.kind {
            ShapeKind::Line(line) => line.load(&mut self.core, surface, sketch),
            ShapeKind::Circle(circle) => circle.load(&mut self.core, surface, sketch),
            ShapeKind::Marker(marker) => marker.load(&mut self.core, surface, sketch),
        }

        debug!("Editing {}", self.core.shape_type.display_name());
        if let Some(current) = self.current_shape() {
            self.core.emit(ShapeEvent::EditStart(current));
        }
    }

    /// Restores the pre-edit snapshot and stops. No-op outside EDIT.
    pub fn cancel_edit(&mut self, surface: &mut dyn MapSurface) {
        if self.core.mode != DrawMode::Edit || self.core.layer.is_none() {
            debug!(
                "No {} edit to cancel",
                self.core.shape_type.display_name()
            );
            return;
        }

        self.core.positions = self.core.pre_edit.clone();
        match &mut self.kind {
            ShapeKind::Line(line) => line.restore(&mut self.core, surface),
            ShapeKind::Circle(circle) => circle.restore(&mut self.core, surface),
            ShapeKind::Marker(marker) => marker.restore(&mut self.core, surface),
        }

        debug!("Cancelled {} edit", self.core.shape_type.display_name());
        let restored = self.current_shape().map(|mut sketch| {
            sketch.style = sketch.style.committed();
            sketch
        });
        self.core.emit(ShapeEvent::CancelEdit(restored));
        self.stop_drawing(surface);
    }

    /// Removes the rendered shape, then stops. No-op when nothing was drawn.
    pub fn delete_shape(&mut self, surface: &mut dyn MapSurface) {
        let Some(layer) = self.core.layer else {
            debug!(
                "No {} to delete",
                self.core.shape_type.display_name()
            );
            return;
        };

        let deleted = self.current_shape();
        surface.remove_layer(layer);
        self.core.layer = None;
        if let ShapeKind::Line(line) = &mut self.kind {
            line.discard(surface);
        }
        self.core.positions.clear();

        debug!("Deleted {}", self.core.shape_type.display_name());
        self.core.emit(ShapeEvent::DeleteShape(deleted));
        self.stop_drawing(surface);
    }

    /// Same as a context click: drops the last vertex of a line being drawn.
    pub fn undo(&mut self, surface: &mut dyn MapSurface) {
        if self.core.mode != DrawMode::Draw || !self.core.is_listening(MapEventKind::ContextMenu) {
            return;
        }
        let ShapeKind::Line(line) = &mut self.kind else {
            return;
        };
        if line.pop_last(&mut self.core, surface) == Next::Stop {
            self.stop_drawing(surface);
        }
    }

    /// Routes a surface event. Map events only reach the shape while it listens to them.
    pub fn handle_event(&mut self, surface: &mut dyn MapSurface, event: SurfaceEvent) {
        if !self.core.mode.is_live() {
            return;
        }

        let next = match event.map_kind() {
            Some(kind) => {
                if let ShapeKind::Line(line) = &mut self.kind {
                    line.poll_rearm(&mut self.core, surface);
                }
                if !self.core.is_listening(kind) {
                    return;
                }
                match &mut self.kind {
                    ShapeKind::Line(line) => line.on_map_event(&mut self.core, surface, event),
                    ShapeKind::Circle(circle) => {
                        circle.on_map_event(&mut self.core, surface, event)
                    }
                    ShapeKind::Marker(marker) => {
                        marker.on_map_event(&mut self.core, surface, event)
                    }
                }
            }
            None => {
                match &mut self.kind {
                    ShapeKind::Line(line) => line.on_drag(&mut self.core, surface, event),
                    ShapeKind::Circle(circle) => circle.on_drag(&mut self.core, surface, event),
                    ShapeKind::Marker(marker) => marker.on_drag(&mut self.core, surface, event),
                }
                Next::Continue
            }
        };

        if next == Next::Stop {
            self.stop_drawing(surface);
        }
    }

    /// Whether `layer` is one of this shape's own layers or markers.
    pub fn owns_layer(&self, layer: LayerId) -> bool {
        if self.core.layer == Some(layer) {
            return true;
        }
        match &self.kind {
            ShapeKind::Line(line) => line.owns(layer),
            ShapeKind::Circle(circle) => circle.owns(layer),
            ShapeKind::Marker(_) => false,
        }
    }

    /// Replaces the style and redraws. Only applies while a shape is rendered.
    pub fn set_shape_options(&mut self, surface: &mut dyn MapSurface, style: ShapeStyle) {
        if self.core.layer.is_none() {
            return;
        }
        self.core.style = if self.core.mode == DrawMode::Edit {
            style.editing()
        } else {
            style
        };
        self.render(surface);
    }

    fn render(&mut self, surface: &mut dyn MapSurface) {
        match &mut self.kind {
            ShapeKind::Line(line) => line.render(&mut self.core, surface),
            ShapeKind::Circle(circle) => circle.render(&mut self.core, surface),
            ShapeKind::Marker(marker) => marker.render(&mut self.core, surface),
        }
    }

    pub fn set_is_touch_device(&mut self, is_touch_device: bool) {
        self.core.is_touch_device = is_touch_device;
    }

    pub fn set_is_draggable(&mut self, surface: &mut dyn MapSurface, is_draggable: bool) {
        self.core.is_draggable = is_draggable;
        match &mut self.kind {
            ShapeKind::Line(line) => line.refresh_center_drag(&self.core, surface),
            ShapeKind::Marker(marker) => marker.render(&mut self.core, surface),
            ShapeKind::Circle(_) => {}
        }
    }

    pub fn set_vertex_icon(&mut self, surface: &mut dyn MapSurface, icon: Option<Icon>) {
        self.core.vertex_icon = icon;
        self.refresh_icons(surface);
    }

    pub fn set_midpoint_icon(&mut self, surface: &mut dyn MapSurface, icon: Option<Icon>) {
        self.core.midpoint_icon = icon;
        self.refresh_icons(surface);
    }

    fn refresh_icons(&mut self, surface: &mut dyn MapSurface) {
        let (vertex, midpoint) = (self.core.vertex_icon.clone(), self.core.midpoint_icon.clone());
        match &mut self.kind {
            ShapeKind::Line(line) => line.set_icons(surface, vertex, midpoint),
            ShapeKind::Circle(circle) => circle.set_icons(surface, vertex, midpoint),
            ShapeKind::Marker(_) => {}
        }
    }

    /// Polygon only.
    pub fn set_polygon_drag_icon(&mut self, surface: &mut dyn MapSurface, icon: Option<Icon>) {
        if let ShapeKind::Line(line) = &mut self.kind {
            line.set_drag_icon(surface, icon);
        }
    }

    /// Line shapes only.
    pub fn set_display_line_distances(&mut self, surface: &mut dyn MapSurface, display: bool) {
        if let ShapeKind::Line(line) = &mut self.kind {
            line.set_display_distances(surface, display);
        }
    }

    pub fn display_line_distances(&self) -> bool {
        match &self.kind {
            ShapeKind::Line(line) => line.display_distances(),
            _ => false,
        }
    }

    /// Line shapes only.
    pub fn set_display_vertex_numbers(&mut self, surface: &mut dyn MapSurface, display: bool) {
        if let ShapeKind::Line(line) = &mut self.kind {
            line.set_display_numbers(surface, display);
        }
    }

    /// Replaces the working vertex list of a line shape and redraws everything.
    pub fn set_positions(&mut self, surface: &mut dyn MapSurface, positions: Vec<Position>) {
        if let ShapeKind::Line(line) = &mut self.kind {
            line.set_positions(&mut self.core, surface, positions);
        }
    }

    /// Marker only: render as an editable text label.
    pub fn set_is_text_marker(&mut self, is_text_marker: bool) {
        if let ShapeKind::Marker(marker) = &mut self.kind {
            marker.set_is_text_marker(is_text_marker);
        }
    }

    pub fn is_text_marker(&self) -> bool {
        matches!(&self.kind, ShapeKind::Marker(marker) if marker.is_text_marker())
    }

    pub fn marker_text(&self) -> Option<&str> {
        match &self.kind {
            ShapeKind::Marker(marker) => marker.label(),
            _ => None,
        }
    }

    /// Marker only: updates the label without moving the marker.
    pub fn set_marker_text(&mut self, surface: &mut dyn MapSurface, text: impl Into<String>) {
        if let ShapeKind::Marker(marker) = &mut self.kind {
            marker.set_text(&mut self.core, surface, text.into());
        }
    }

    pub fn set_marker_icon(&mut self, surface: &mut dyn MapSurface, icon: Icon) {
        if let ShapeKind::Marker(marker) = &mut self.kind {
            marker.set_icon(&mut self.core, surface, icon);
        }
    }

    pub fn set_marker_position(&mut self, surface: &mut dyn MapSurface, position: Position) {
        if let ShapeKind::Marker(marker) = &mut self.kind {
            marker.set_position(&mut self.core, surface, position);
        }
    }

    /// Applies shared configuration; listeners from the config replace same-kind listeners.
    pub(crate) fn apply_config(&mut self, surface: &mut dyn MapSurface, config: &ShapeConfig) {
        self.set_is_touch_device(config.is_touch_device);
        self.set_is_draggable(surface, config.is_draggable);
        self.core.vertex_icon = config.vertex_icon.clone();
        self.core.midpoint_icon = config.midpoint_icon.clone();
        self.refresh_icons(surface);
        self.set_display_vertex_numbers(surface, config.display_vertex_numbers);
        self.set_display_line_distances(surface, config.display_line_distances);
        self.set_polygon_drag_icon(surface, config.polygon_drag_icon.clone());
        for (kind, listener) in config.events.iter() {
            self.core.events.on(kind, listener.clone());
        }
    }

    /// Points a closed shape at a new group and style and takes the active slot again.
    pub(crate) fn reuse(&mut self, group: GroupId, style: ShapeStyle) {
        self.core.group = group;
        self.core.style = style;
        self.core.mode = DrawMode::Start;
        self.core.vacated = false;
    }

    /// Detaches every transient layer and handler. The committed geometry stays.
    pub(crate) fn release(&mut self, surface: &mut dyn MapSurface) {
        if self.core.mode.is_live() {
            self.stop_drawing(surface);
        }
        self.core.unlisten_all(surface);
        match &mut self.kind {
            ShapeKind::Line(line) => line.release(surface),
            ShapeKind::Circle(circle) => circle.release(surface),
            ShapeKind::Marker(_) => {}
        }
        self.core.vacated = true;
    }
}

/// Builds shapes. Only the factory holds the token that makes [`ShapeBuilder::build`] succeed.
pub struct ShapeBuilder {
    shape_type: ShapeType,
    group: GroupId,
    style: ShapeStyle,
    token: Option<ConstructionToken>,
}

impl ShapeBuilder {
    pub fn new(shape_type: ShapeType, group: GroupId, style: ShapeStyle) -> Self {
        Self {
            shape_type,
            group,
            style,
            token: None,
        }
    }

    pub fn mediated(
        token: ConstructionToken,
        shape_type: ShapeType,
        group: GroupId,
        style: ShapeStyle,
    ) -> Self {
        Self {
            token: Some(token),
            ..Self::new(shape_type, group, style)
        }
    }

    pub fn build(self) -> Result<DrawShape, ShapeError> {
        if self.token.is_none() {
            return Err(ShapeError::IllegalConstruction(self.shape_type));
        }

        let kind = match self.shape_type {
            ShapeType::Circle => ShapeKind::Circle(CircleShape::default()),
            ShapeType::Marker => ShapeKind::Marker(MarkerShape::default()),
            shape_type if shape_type.is_line() => ShapeKind::Line(LineShape::new(shape_type)),
            shape_type => return Err(ShapeError::UnknownShapeType(shape_type)),
        };

        Ok(DrawShape {
            core: ShapeCore::new(self.shape_type, self.group, self.style),
            kind,
        })
    }
}
