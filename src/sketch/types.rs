//! Value types shared by every part of the sketch engine.

use bevy::prelude::Color;
use serde::{Deserialize, Serialize};

use super::surface::LayerId;

/// The geometry families the engine knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeType {
    Polygon,
    Polyline,
    Circle,
    Marker,
    ArrowPolyline,
    Icon,
}

impl ShapeType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ShapeType::Polygon => "Polygon",
            ShapeType::Polyline => "Polyline",
            ShapeType::Circle => "Circle",
            ShapeType::Marker => "Marker",
            ShapeType::ArrowPolyline => "Arrow Polyline",
            ShapeType::Icon => "Icon",
        }
    }

    /// Minimum number of positions a shape needs before it can be confirmed.
    pub fn min_vertices(&self) -> usize {
        match self {
            ShapeType::Polygon => 3,
            ShapeType::Polyline | ShapeType::ArrowPolyline => 2,
            ShapeType::Circle | ShapeType::Marker | ShapeType::Icon => 1,
        }
    }

    /// Shapes built from an ordered vertex list with midpoints between neighbours.
    pub fn is_line(&self) -> bool {
        matches!(
            self,
            ShapeType::Polygon | ShapeType::Polyline | ShapeType::ArrowPolyline
        )
    }

    pub fn all() -> &'static [ShapeType] {
        &[
            ShapeType::Polygon,
            ShapeType::Polyline,
            ShapeType::Circle,
            ShapeType::Marker,
            ShapeType::ArrowPolyline,
            ShapeType::Icon,
        ]
    }
}

/// Lifecycle state of a single shape instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    #[default]
    Start,
    Draw,
    Edit,
    Stop,
}

impl DrawMode {
    /// Draw and Edit are the states in which a shape owns user input.
    pub fn is_live(&self) -> bool {
        matches!(self, DrawMode::Draw | DrawMode::Edit)
    }
}

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn offset(self, d_lat: f64, d_lng: f64) -> Self {
        Self {
            lat: self.lat + d_lat,
            lng: self.lng + d_lng,
        }
    }
}

impl From<(f64, f64)> for Position {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// Stroke dash pattern in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashPattern {
    pub dash: f32,
    pub gap: f32,
}

impl DashPattern {
    /// Outline used while a shape is being edited ("12,12").
    pub const EDITING: DashPattern = DashPattern {
        dash: 12.0,
        gap: 12.0,
    };

    /// Preview segment from the last vertex to the cursor.
    pub const PREVIEW: DashPattern = DashPattern {
        dash: 6.0,
        gap: 8.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IconShape {
    #[default]
    Circle,
    Square,
    Diamond,
}

/// Visual descriptor for a marker. Loading real image assets is up to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icon {
    pub shape: IconShape,
    pub size: f32,
}

impl Icon {
    pub fn new(shape: IconShape, size: f32) -> Self {
        Self { shape, size }
    }
}

/// Stroke and fill options for a rendered shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    pub color: Color,
    pub weight: f32,
    pub opacity: f32,
    pub fill_opacity: f32,
    pub dash: Option<DashPattern>,
    /// Initial label for text markers
    pub text: Option<String>,
    /// Marker icon (markers only)
    pub icon: Option<Icon>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color: Color::srgb(0.2, 0.533, 1.0),
            weight: 3.0,
            opacity: 1.0,
            fill_opacity: 0.2,
            dash: None,
            text: None,
            icon: None,
        }
    }
}

impl ShapeStyle {
    /// Dashed outline with a slightly stronger fill, applied while editing.
    pub fn editing(&self) -> Self {
        Self {
            dash: Some(DashPattern::EDITING),
            fill_opacity: 0.3,
            ..self.clone()
        }
    }

    /// Solid outline with the default fill, applied when an edit session ends.
    pub fn committed(&self) -> Self {
        Self {
            dash: None,
            fill_opacity: 0.2,
            ..self.clone()
        }
    }
}

/// A committed shape as handed to listeners and accepted back by `edit_shape`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sketch {
    pub shape_type: ShapeType,
    /// Line vertices, `[center]` for circles, `[position]` for markers
    pub positions: Vec<Position>,
    /// Circle radius in meters
    pub radius: Option<f64>,
    /// Text marker label
    pub label: Option<String>,
    pub style: ShapeStyle,
    /// Rendered geometry on the map surface
    pub layer: Option<LayerId>,
    /// Arrowhead decoration for arrow polylines
    pub decoration: Option<LayerId>,
}

impl Sketch {
    pub fn polygon(positions: Vec<Position>) -> Self {
        Self::lines(ShapeType::Polygon, positions)
    }

    pub fn polyline(positions: Vec<Position>) -> Self {
        Self::lines(ShapeType::Polyline, positions)
    }

    pub fn arrow_polyline(positions: Vec<Position>) -> Self {
        Self::lines(ShapeType::ArrowPolyline, positions)
    }

    pub fn circle(center: Position, radius: f64) -> Self {
        Self {
            shape_type: ShapeType::Circle,
            positions: vec![center],
            radius: Some(radius),
            label: None,
            style: ShapeStyle::default(),
            layer: None,
            decoration: None,
        }
    }

    pub fn marker(position: Position) -> Self {
        Self {
            shape_type: ShapeType::Marker,
            positions: vec![position],
            radius: None,
            label: None,
            style: ShapeStyle::default(),
            layer: None,
            decoration: None,
        }
    }

    fn lines(shape_type: ShapeType, positions: Vec<Position>) -> Self {
        Self {
            shape_type,
            positions,
            radius: None,
            label: None,
            style: ShapeStyle::default(),
            layer: None,
            decoration: None,
        }
    }

    pub fn center(&self) -> Option<Position> {
        self.positions.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_vertices() {
        assert_eq!(ShapeType::Polygon.min_vertices(), 3);
        assert_eq!(ShapeType::Polyline.min_vertices(), 2);
        assert_eq!(ShapeType::ArrowPolyline.min_vertices(), 2);
        assert_eq!(ShapeType::Circle.min_vertices(), 1);
        assert_eq!(ShapeType::Marker.min_vertices(), 1);
    }

    #[test]
    fn test_is_line() {
        assert!(ShapeType::Polygon.is_line());
        assert!(ShapeType::ArrowPolyline.is_line());
        assert!(!ShapeType::Circle.is_line());
        assert!(!ShapeType::Marker.is_line());
    }

    #[test]
    fn test_draw_mode_default_is_start() {
        assert_eq!(DrawMode::default(), DrawMode::Start);
        assert!(!DrawMode::Start.is_live());
        assert!(DrawMode::Draw.is_live());
        assert!(DrawMode::Edit.is_live());
        assert!(!DrawMode::Stop.is_live());
    }

    #[test]
    fn test_editing_style_roundtrip() {
        let style = ShapeStyle::default();
        let editing = style.editing();
        assert_eq!(editing.dash, Some(DashPattern::EDITING));
        assert_eq!(editing.fill_opacity, 0.3);

        let committed = editing.committed();
        assert_eq!(committed.dash, None);
        assert_eq!(committed.fill_opacity, 0.2);
        assert_eq!(committed.color, style.color);
    }

    #[test]
    fn test_position_offset() {
        let p = Position::new(1.0, 2.0).offset(0.5, -1.0);
        assert_eq!(p, Position::new(1.5, 1.0));
    }
}
