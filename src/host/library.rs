//! Committed sketches and editing them again.

use bevy::prelude::*;

use crate::config::AppConfig;
use crate::sketch::{DrawMode, LayerId, Position, ShapeEvent, ShapeType, Sketch};

use super::input::MapDoubleClick;
use super::params::CameraParams;
use super::state::{ActiveSketch, ShapeEventQueue};
use super::surface::{GizmoSurface, meters_to_world, to_world};

/// Hit area around lines and markers in screen pixels
const HIT_RADIUS: f32 = 8.0;

#[derive(Resource, Default)]
pub struct SketchLibrary {
    sketches: Vec<Sketch>,
}

impl SketchLibrary {
    pub fn sketches(&self) -> &[Sketch] {
        &self.sketches
    }

    pub fn len(&self) -> usize {
        self.sketches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sketches.is_empty()
    }

    /// Applies a shape event. Finished sketches replace the entry with the same layer.
    pub fn record(&mut self, event: &ShapeEvent) {
        match event {
            ShapeEvent::Finish(Some(sketch)) => {
                let Some(layer) = sketch.layer else {
                    return;
                };
                match self.position_of(layer) {
                    Some(index) => self.sketches[index] = sketch.clone(),
                    None => self.sketches.push(sketch.clone()),
                }
            }
            ShapeEvent::DeleteShape(Some(sketch)) => {
                if let Some(index) = sketch.layer.and_then(|layer| self.position_of(layer)) {
                    self.sketches.remove(index);
                }
            }
            _ => {}
        }
    }

    fn position_of(&self, layer: LayerId) -> Option<usize> {
        self.sketches.iter().position(|s| s.layer == Some(layer))
    }

    /// Topmost sketch under `world`. `tolerance` is in world units.
    pub fn sketch_at(&self, world: Vec2, tolerance: f32) -> Option<&Sketch> {
        self.sketches
            .iter()
            .rev()
            .find(|sketch| sketch_contains(sketch, world, tolerance))
    }
}

fn point_near_segment(point: Vec2, seg_start: Vec2, seg_end: Vec2, threshold: f32) -> bool {
    let line_vec = seg_end - seg_start;
    let line_len_sq = line_vec.length_squared();

    if line_len_sq < 0.0001 {
        return point.distance(seg_start) <= threshold;
    }

    let t = ((point - seg_start).dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    let projection = seg_start + line_vec * t;

    point.distance(projection) <= threshold
}

/// Even-odd rule
fn point_in_polygon(point: Vec2, vertices: &[Vec2]) -> bool {
    let mut inside = false;
    let mut j = vertices.len().wrapping_sub(1);
    for (i, a) in vertices.iter().enumerate() {
        let b = vertices[j];
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn sketch_contains(sketch: &Sketch, world: Vec2, tolerance: f32) -> bool {
    let points: Vec<Vec2> = sketch.positions.iter().copied().map(to_world).collect();
    match sketch.shape_type {
        ShapeType::Polygon => {
            point_in_polygon(world, &points)
                || points
                    .iter()
                    .zip(points.iter().cycle().skip(1))
                    .any(|(a, b)| point_near_segment(world, *a, *b, tolerance))
        }
        ShapeType::Polyline | ShapeType::ArrowPolyline => points
            .windows(2)
            .any(|pair| point_near_segment(world, pair[0], pair[1], tolerance)),
        ShapeType::Circle => {
            let radius = meters_to_world(sketch.radius.unwrap_or_default());
            points
                .first()
                .is_some_and(|center| center.distance(world) <= radius + tolerance)
        }
        ShapeType::Marker | ShapeType::Icon => points
            .first()
            .is_some_and(|position| position.distance(world) <= tolerance * 2.0),
    }
}

/// Moves queued shape events into the library.
pub fn collect_shape_events(queue: Res<ShapeEventQueue>, mut library: ResMut<SketchLibrary>) {
    for event in queue.drain() {
        debug!("Shape event {}", event.kind());
        library.record(&event);
    }
}

/// Double click on a committed sketch opens it for editing.
pub fn edit_on_double_click(
    mut double_clicks: MessageReader<MapDoubleClick>,
    library: Res<SketchLibrary>,
    camera: CameraParams,
    config: Res<AppConfig>,
    mut active: ResMut<ActiveSketch>,
    mut surface: ResMut<GizmoSurface>,
) {
    let Some(click) = double_clicks.read().last().copied() else {
        return;
    };
    if active
        .factory
        .active()
        .is_some_and(|shape| shape.draw_mode() == DrawMode::Draw)
    {
        return;
    }

    let tolerance = HIT_RADIUS * camera.zoom_scale();
    let Some(sketch) = library.sketch_at(to_world(click.position), tolerance).cloned() else {
        return;
    };

    let surface = &mut *surface;
    let group = active.group(surface);
    match active
        .factory
        .acquire(sketch.shape_type, surface, group, config.data.shape_style())
    {
        Ok(shape) => shape.edit_shape(surface, &sketch),
        Err(e) => warn!("Cannot edit {}: {}", sketch.shape_type.display_name(), e),
    }
}

/// Committed sketch count, for status display.
pub fn describe(library: &SketchLibrary, position: Option<Position>) -> String {
    match position {
        Some(p) => format!(
            "{} sketches | {:.5}, {:.5}",
            library.len(),
            p.lat,
            p.lng
        ),
        None => format!("{} sketches", library.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn committed(mut sketch: Sketch, layer: u64) -> Sketch {
        sketch.layer = Some(LayerId(layer));
        sketch
    }

    #[test]
    fn test_finish_inserts_then_replaces() {
        let mut library = SketchLibrary::default();
        let first = committed(Sketch::marker(Position::new(1.0, 1.0)), 7);
        library.record(&ShapeEvent::Finish(Some(first)));
        assert_eq!(library.len(), 1);

        let moved = committed(Sketch::marker(Position::new(2.0, 2.0)), 7);
        library.record(&ShapeEvent::Finish(Some(moved.clone())));
        assert_eq!(library.sketches(), &[moved]);

        library.record(&ShapeEvent::Finish(None));
        library.record(&ShapeEvent::Finish(Some(Sketch::marker(Position::default()))));
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_delete_removes_by_layer() {
        let mut library = SketchLibrary::default();
        let line = committed(
            Sketch::polyline(vec![Position::new(0.0, 0.0), Position::new(1.0, 1.0)]),
            3,
        );
        library.record(&ShapeEvent::Finish(Some(line.clone())));
        library.record(&ShapeEvent::DeleteShape(Some(line)));
        assert!(library.is_empty());
    }

    #[test]
    fn test_hit_testing_per_shape_type() {
        let mut library = SketchLibrary::default();
        let square = committed(
            Sketch::polygon(vec![
                Position::new(0.0, 0.0),
                Position::new(0.0, 1.0),
                Position::new(1.0, 1.0),
                Position::new(1.0, 0.0),
            ]),
            1,
        );
        let circle = committed(Sketch::circle(Position::new(5.0, 5.0), 1000.0), 2);
        let line = committed(
            Sketch::polyline(vec![Position::new(-2.0, -2.0), Position::new(-2.0, 2.0)]),
            3,
        );
        for sketch in [&square, &circle, &line] {
            library.record(&ShapeEvent::Finish(Some(sketch.clone())));
        }

        let inside_square = to_world(Position::new(0.5, 0.5));
        assert_eq!(library.sketch_at(inside_square, 1.0), Some(&square));

        let near_circle = to_world(Position::new(5.0, 5.005));
        assert_eq!(library.sketch_at(near_circle, 1.0), Some(&circle));

        let on_line = to_world(Position::new(-2.0, 0.0));
        assert_eq!(library.sketch_at(on_line, 1.0), Some(&line));

        assert_eq!(library.sketch_at(to_world(Position::new(20.0, 20.0)), 1.0), None);
    }

    #[test]
    fn test_describe() {
        let library = SketchLibrary::default();
        assert_eq!(describe(&library, None), "0 sketches");
        assert_eq!(
            describe(&library, Some(Position::new(1.5, 2.25))),
            "0 sketches | 1.50000, 2.25000"
        );
    }
}
