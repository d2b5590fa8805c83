//! Interactive shape drawing and editing on a map surface.
//!
//! A [`ShapeFactory`] hands out one [`DrawShape`] at a time. The shape runs the
//! START/DRAW/EDIT/STOP lifecycle, keeps its control-point markers in sync through the
//! vertex engine, and reports progress through typed [`ShapeEvent`] channels. Rendering and
//! input are delegated to a host implementing [`MapSurface`].

pub mod error;
pub mod events;
pub mod factory;
pub mod geometry;
pub mod options;
pub mod shape;
pub mod surface;
pub mod types;
pub mod vertices;

#[cfg(test)]
pub mod testing;

pub use error::ShapeError;
pub use events::{EventRegistry, Listener, ShapeEvent, ShapeEventKind};
pub use factory::ShapeFactory;
pub use options::ShapeConfig;
pub use shape::{DrawShape, ShapeBuilder};
pub use surface::{
    GroupId, Layer, LayerId, MapEventKind, MapInteraction, MapSurface, MarkerLayer, MarkerRole,
    SurfaceEvent,
};
pub use types::{DashPattern, DrawMode, Icon, IconShape, Position, ShapeStyle, ShapeType, Sketch};
