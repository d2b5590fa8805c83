//! Control-point markers for shapes in draw and edit mode.

mod circular;
mod line;

pub use circular::{CircleHandle, CircleNotice, CircularVertices};
pub use line::LineVertices;

/// What a vertex drag changed, reported back to the owning shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexNotice {
    VertexDragStart { index: usize },
    VertexDragged { index: usize },
    VertexDragEnd { index: usize },
    MidpointDragStart { index: usize },
    /// `inserted` is set on the movement that split the segment
    MidpointDragged { index: usize, inserted: bool },
    MidpointDragEnd { index: usize },
}
