//! Typed shape event channels.
//!
//! Every shape owns an [`EventRegistry`] with a fixed set of channels. Each channel holds
//! zero or one listener; registering again replaces the previous one.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::types::{Position, Sketch};

/// Listener invoked synchronously when its channel fires.
pub type Listener = Arc<dyn Fn(&ShapeEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeEventKind {
    DrawStart,
    EditStart,
    Finish,
    AddPoint,
    DeletePoint,
    DragVertexStart,
    DragVertex,
    DragEndVertex,
    DragMidpointVertexStart,
    DragMidpointVertex,
    DragEndMidpointVertex,
    CancelEdit,
    Edit,
    DeleteShape,
    DragCenterStart,
    DragCenter,
    DragCenterEnd,
}

impl ShapeEventKind {
    pub const ALL: [ShapeEventKind; 17] = [
        ShapeEventKind::DrawStart,
        ShapeEventKind::EditStart,
        ShapeEventKind::Finish,
        ShapeEventKind::AddPoint,
        ShapeEventKind::DeletePoint,
        ShapeEventKind::DragVertexStart,
        ShapeEventKind::DragVertex,
        ShapeEventKind::DragEndVertex,
        ShapeEventKind::DragMidpointVertexStart,
        ShapeEventKind::DragMidpointVertex,
        ShapeEventKind::DragEndMidpointVertex,
        ShapeEventKind::CancelEdit,
        ShapeEventKind::Edit,
        ShapeEventKind::DeleteShape,
        ShapeEventKind::DragCenterStart,
        ShapeEventKind::DragCenter,
        ShapeEventKind::DragCenterEnd,
    ];

    /// Channel name as used by toolbar integrations (`"onDrawStart"`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            ShapeEventKind::DrawStart => "onDrawStart",
            ShapeEventKind::EditStart => "onEditStart",
            ShapeEventKind::Finish => "onFinish",
            ShapeEventKind::AddPoint => "onAddPoint",
            ShapeEventKind::DeletePoint => "onDeletePoint",
            ShapeEventKind::DragVertexStart => "onDragVertexStart",
            ShapeEventKind::DragVertex => "onDragVertex",
            ShapeEventKind::DragEndVertex => "onDragEndVertex",
            ShapeEventKind::DragMidpointVertexStart => "onDragMidpointVertexStart",
            ShapeEventKind::DragMidpointVertex => "onDragMidpointVertex",
            ShapeEventKind::DragEndMidpointVertex => "onDragEndMidpointVertex",
            ShapeEventKind::CancelEdit => "onCancelEdit",
            ShapeEventKind::Edit => "onEdit",
            ShapeEventKind::DeleteShape => "onDeleteShape",
            ShapeEventKind::DragCenterStart => "onDragCenterStart",
            ShapeEventKind::DragCenter => "onDragCenter",
            ShapeEventKind::DragCenterEnd => "onDragCenterEnd",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ShapeEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload delivered to listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeEvent {
    DrawStart,
    /// The shape loaded for editing, with the editing style applied
    EditStart(Sketch),
    /// The committed shape, or `None` when nothing was drawn
    Finish(Option<Sketch>),
    AddPoint {
        position: Position,
        positions: Vec<Position>,
    },
    DeletePoint {
        positions: Vec<Position>,
    },
    DragVertexStart {
        index: usize,
    },
    DragVertex {
        index: usize,
        positions: Vec<Position>,
    },
    DragEndVertex {
        index: usize,
        positions: Vec<Position>,
    },
    DragMidpointVertexStart {
        index: usize,
    },
    /// `inserted` is true for the movement that split the segment
    DragMidpointVertex {
        index: usize,
        inserted: bool,
        positions: Vec<Position>,
    },
    DragEndMidpointVertex {
        index: usize,
        positions: Vec<Position>,
    },
    /// The restored pre-edit shape
    CancelEdit(Option<Sketch>),
    /// Marker moved or retitled while editing
    Edit(Sketch),
    DeleteShape(Option<Sketch>),
    DragCenterStart {
        position: Position,
    },
    DragCenter {
        delta: Position,
        positions: Vec<Position>,
    },
    DragCenterEnd {
        positions: Vec<Position>,
    },
}

impl ShapeEvent {
    pub fn kind(&self) -> ShapeEventKind {
        match self {
            ShapeEvent::DrawStart => ShapeEventKind::DrawStart,
            ShapeEvent::EditStart(_) => ShapeEventKind::EditStart,
            ShapeEvent::Finish(_) => ShapeEventKind::Finish,
            ShapeEvent::AddPoint { .. } => ShapeEventKind::AddPoint,
            ShapeEvent::DeletePoint { .. } => ShapeEventKind::DeletePoint,
            ShapeEvent::DragVertexStart { .. } => ShapeEventKind::DragVertexStart,
            ShapeEvent::DragVertex { .. } => ShapeEventKind::DragVertex,
            ShapeEvent::DragEndVertex { .. } => ShapeEventKind::DragEndVertex,
            ShapeEvent::DragMidpointVertexStart { .. } => ShapeEventKind::DragMidpointVertexStart,
            ShapeEvent::DragMidpointVertex { .. } => ShapeEventKind::DragMidpointVertex,
            ShapeEvent::DragEndMidpointVertex { .. } => ShapeEventKind::DragEndMidpointVertex,
            ShapeEvent::CancelEdit(_) => ShapeEventKind::CancelEdit,
            ShapeEvent::Edit(_) => ShapeEventKind::Edit,
            ShapeEvent::DeleteShape(_) => ShapeEventKind::DeleteShape,
            ShapeEvent::DragCenterStart { .. } => ShapeEventKind::DragCenterStart,
            ShapeEvent::DragCenter { .. } => ShapeEventKind::DragCenter,
            ShapeEvent::DragCenterEnd { .. } => ShapeEventKind::DragCenterEnd,
        }
    }
}

#[derive(Clone, Default)]
pub struct EventRegistry {
    listeners: HashMap<ShapeEventKind, Listener>,
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.listeners.keys().collect();
        kinds.sort();
        f.debug_struct("EventRegistry")
            .field("listeners", &kinds)
            .finish()
    }
}

impl EventRegistry {
    pub fn on(&mut self, kind: ShapeEventKind, listener: Listener) {
        self.listeners.insert(kind, listener);
    }

    pub fn off(&mut self, kind: ShapeEventKind) {
        self.listeners.remove(&kind);
    }

    pub fn has(&self, kind: ShapeEventKind) -> bool {
        self.listeners.contains_key(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeEventKind, &Listener)> {
        self.listeners.iter().map(|(kind, listener)| (*kind, listener))
    }

    pub fn emit(&self, event: &ShapeEvent) {
        if let Some(listener) = self.listeners.get(&event.kind()) {
            listener(event);
        }
    }

    /// Builds the payload only when someone is listening.
    pub fn emit_with(&self, kind: ShapeEventKind, build: impl FnOnce() -> ShapeEvent) {
        if let Some(listener) = self.listeners.get(&kind) {
            listener(&build());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_names_roundtrip() {
        for kind in ShapeEventKind::ALL {
            assert_eq!(ShapeEventKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ShapeEventKind::from_name("onSomething"), None);
    }

    #[test]
    fn test_on_replaces_previous_listener() {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let mut registry = EventRegistry::default();

        let first = hits.clone();
        registry.on(
            ShapeEventKind::DrawStart,
            Arc::new(move |_| first.lock().unwrap().push("first")),
        );
        let second = hits.clone();
        registry.on(
            ShapeEventKind::DrawStart,
            Arc::new(move |_| second.lock().unwrap().push("second")),
        );

        registry.emit(&ShapeEvent::DrawStart);
        assert_eq!(*hits.lock().unwrap(), vec!["second"]);
    }

    #[test]
    fn test_off_silences_channel() {
        let hits = Arc::new(Mutex::new(0));
        let mut registry = EventRegistry::default();
        let counter = hits.clone();
        registry.on(
            ShapeEventKind::Finish,
            Arc::new(move |_| *counter.lock().unwrap() += 1),
        );

        registry.emit(&ShapeEvent::Finish(None));
        registry.off(ShapeEventKind::Finish);
        registry.emit(&ShapeEvent::Finish(None));

        assert_eq!(*hits.lock().unwrap(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_emit_with_skips_payload_without_listener() {
        let registry = EventRegistry::default();
        registry.emit_with(ShapeEventKind::DragVertex, || {
            panic!("payload built without a listener")
        });
    }
}
