use thiserror::Error;

use super::types::ShapeType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// A shape was built without going through `ShapeFactory::acquire`.
    #[error("{} shapes can only be constructed through the shape factory", .0.display_name())]
    IllegalConstruction(ShapeType),

    #[error("no shape constructor is registered for {}", .0.display_name())]
    UnknownShapeType(ShapeType),
}
