//! Shared configuration the factory applies to whichever shape is active.

use std::sync::Arc;

use super::events::{EventRegistry, ShapeEvent, ShapeEventKind};
use super::types::Icon;

#[derive(Debug, Clone)]
pub struct ShapeConfig {
    /// Distance tooltips on midpoints (line shapes only)
    pub display_line_distances: bool,
    /// 1-based numbers on vertex markers (line shapes only)
    pub display_vertex_numbers: bool,
    /// Explicit taps for every point, no cursor previews
    pub is_touch_device: bool,
    /// Markers and polygons can be dragged as a whole
    pub is_draggable: bool,
    pub vertex_icon: Option<Icon>,
    pub midpoint_icon: Option<Icon>,
    pub polygon_drag_icon: Option<Icon>,
    pub events: EventRegistry,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            display_line_distances: false,
            display_vertex_numbers: false,
            is_touch_device: false,
            is_draggable: true,
            vertex_icon: None,
            midpoint_icon: None,
            polygon_drag_icon: None,
            events: EventRegistry::default(),
        }
    }
}

impl ShapeConfig {
    pub fn with_event(
        mut self,
        kind: ShapeEventKind,
        listener: impl Fn(&ShapeEvent) + Send + Sync + 'static,
    ) -> Self {
        self.events.on(kind, Arc::new(listener));
        self
    }
}
