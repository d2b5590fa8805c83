//! Interface to the host map surface.
//!
//! The engine never owns the map. Every operation that renders or listens receives a
//! `&mut dyn MapSurface`; the surface stores layers, tracks which map-level events the
//! active shape listens to, computes distances and gates map interactions.

use std::time::Duration;

use bevy::prelude::Color;

use super::types::{Icon, Position, ShapeStyle};

/// Handle to a layer owned by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

/// Handle to a group of layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u64);

/// Map-level pointer events a shape can listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MapEventKind {
    Click,
    MouseMove,
    ContextMenu,
}

/// Map interactions that vertex drags temporarily disable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MapInteraction {
    DoubleClickZoom,
    PanDrag,
}

/// What a marker stands for, so the host can pick a default look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerRole {
    Vertex,
    Midpoint,
    CircleCenter,
    CircleOuter,
    PolygonDrag,
    Shape,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerLayer {
    pub position: Position,
    pub role: MarkerRole,
    pub icon: Option<Icon>,
    pub draggable: bool,
    /// Text drawn on the marker (vertex numbers, text marker labels)
    pub label: Option<String>,
    /// Text drawn next to the marker (segment distances)
    pub tooltip: Option<String>,
    /// Label is an editable text field bound to the marker
    pub editable_text: bool,
}

impl MarkerLayer {
    pub fn new(position: Position, role: MarkerRole) -> Self {
        Self {
            position,
            role,
            icon: None,
            draggable: false,
            label: None,
            tooltip: None,
            editable_text: false,
        }
    }

    pub fn draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn with_icon(mut self, icon: Option<Icon>) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn with_tooltip(mut self, tooltip: Option<String>) -> Self {
        self.tooltip = tooltip;
        self
    }
}

/// Render payload of a single layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Polygon {
        positions: Vec<Position>,
        style: ShapeStyle,
    },
    Polyline {
        positions: Vec<Position>,
        style: ShapeStyle,
    },
    Circle {
        center: Position,
        radius: f64,
        style: ShapeStyle,
    },
    Marker(MarkerLayer),
    /// Arrowhead drawn at the end of a path
    Decoration {
        path: Vec<Position>,
        color: Color,
        pixel_size: f32,
    },
}

impl Layer {
    pub fn as_marker(&self) -> Option<&MarkerLayer> {
        match self {
            Layer::Marker(marker) => Some(marker),
            _ => None,
        }
    }

    pub fn positions(&self) -> Vec<Position> {
        match self {
            Layer::Polygon { positions, .. } | Layer::Polyline { positions, .. } => {
                positions.clone()
            }
            Layer::Circle { center, .. } => vec![*center],
            Layer::Marker(marker) => vec![marker.position],
            Layer::Decoration { path, .. } => path.clone(),
        }
    }
}

/// Input dispatched by the host to the active shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    Click(Position),
    MouseMove(Position),
    ContextMenu(Position),
    DragStart { layer: LayerId, position: Position },
    Drag { layer: LayerId, position: Position },
    DragEnd { layer: LayerId, position: Position },
}

impl SurfaceEvent {
    /// Map-level kind, or `None` for marker drag events.
    pub fn map_kind(&self) -> Option<MapEventKind> {
        match self {
            SurfaceEvent::Click(_) => Some(MapEventKind::Click),
            SurfaceEvent::MouseMove(_) => Some(MapEventKind::MouseMove),
            SurfaceEvent::ContextMenu(_) => Some(MapEventKind::ContextMenu),
            _ => None,
        }
    }
}

pub trait MapSurface {
    fn create_group(&mut self) -> GroupId;

    fn add_layer(&mut self, group: GroupId, layer: Layer) -> LayerId;

    fn update_layer(&mut self, id: LayerId, layer: Layer);

    fn remove_layer(&mut self, id: LayerId);

    fn has_layer(&self, id: LayerId) -> bool;

    fn layer(&self, id: LayerId) -> Option<&Layer>;

    fn listen(&mut self, kind: MapEventKind);

    fn unlisten(&mut self, kind: MapEventKind);

    /// Distance in meters between two coordinates.
    fn distance(&self, from: Position, to: Position) -> f64;

    fn set_interaction(&mut self, interaction: MapInteraction, enabled: bool);

    /// Monotonic time since the surface started.
    fn now(&self) -> Duration;

    fn move_marker(&mut self, id: LayerId, position: Position) {
        if let Some(Layer::Marker(mut marker)) = self.layer(id).cloned() {
            marker.position = position;
            self.update_layer(id, Layer::Marker(marker));
        }
    }
}
