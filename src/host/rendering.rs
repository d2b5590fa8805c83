//! Gizmo rendering of surface layers, egui rendering of marker labels.

use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};
use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::constants::{DRAG_ICON_SIZE, MIDPOINT_ICON_SIZE, VERTEX_ICON_SIZE};
use crate::sketch::{DashPattern, Icon, IconShape, Layer, MarkerLayer, MarkerRole, Position, ShapeStyle};

use super::params::CameraParams;
use super::surface::{GizmoSurface, meters_to_world, to_world};
use super::text_marker::TextMarkerEditor;

/// Segments used to approximate a circle outline
const CIRCLE_RESOLUTION: usize = 64;

/// Custom gizmo group for sketch layers
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct SketchGizmoGroup;

pub fn configure_sketch_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<SketchGizmoGroup>();
    config.line.width = 2.0;
}

pub fn render_sketch_layers(
    mut gizmos: Gizmos<SketchGizmoGroup>,
    surface: Res<GizmoSurface>,
    camera: CameraParams,
) {
    // World units per screen pixel
    let px = camera.zoom_scale();

    for (_, layer) in surface.layers() {
        match layer {
            Layer::Polygon { positions, style } => {
                let points: Vec<Vec2> = positions.iter().copied().map(to_world).collect();
                stroke(&mut gizmos, &points, true, style, px);
            }
            Layer::Polyline { positions, style } => {
                let points: Vec<Vec2> = positions.iter().copied().map(to_world).collect();
                stroke(&mut gizmos, &points, false, style, px);
            }
            Layer::Circle {
                center,
                radius,
                style,
            } => {
                let points = circle_points(to_world(*center), meters_to_world(*radius));
                stroke(&mut gizmos, &points, true, style, px);
            }
            Layer::Marker(marker) => draw_marker(&mut gizmos, marker, px),
            Layer::Decoration {
                path,
                color,
                pixel_size,
            } => draw_arrowhead(&mut gizmos, path, *color, pixel_size * px),
        }
    }
}

fn circle_points(center: Vec2, radius: f32) -> Vec<Vec2> {
    (0..CIRCLE_RESOLUTION)
        .map(|i| {
            let angle = i as f32 / CIRCLE_RESOLUTION as f32 * std::f32::consts::TAU;
            center + Vec2::from_angle(angle) * radius
        })
        .collect()
}

fn stroke(
    gizmos: &mut Gizmos<SketchGizmoGroup>,
    points: &[Vec2],
    closed: bool,
    style: &ShapeStyle,
    px: f32,
) {
    let color = style.color.with_alpha(style.opacity);
    let closing = match (closed, points.first(), points.last()) {
        (true, Some(first), Some(last)) if points.len() > 2 => Some((*last, *first)),
        _ => None,
    };
    let segments = points
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .chain(closing);

    match style.dash {
        None => {
            for (a, b) in segments {
                gizmos.line_2d(a, b, color);
            }
        }
        Some(pattern) => dashed(gizmos, segments, pattern, px, color),
    }
}

/// Dash phase carries over from one segment to the next.
fn dashed(
    gizmos: &mut Gizmos<SketchGizmoGroup>,
    segments: impl Iterator<Item = (Vec2, Vec2)>,
    pattern: DashPattern,
    px: f32,
    color: Color,
) {
    let on = pattern.dash * px;
    let period = (pattern.dash + pattern.gap) * px;
    if period <= f32::EPSILON {
        return;
    }

    let mut offset = 0.0;
    for (a, b) in segments {
        let len = a.distance(b);
        if len <= f32::EPSILON {
            continue;
        }
        let dir = (b - a) / len;
        let mut t = 0.0;
        while t < len {
            let (drawing, remaining) = if offset < on {
                (true, on - offset)
            } else {
                (false, period - offset)
            };
            let step = remaining.min(len - t);
            if drawing {
                gizmos.line_2d(a + dir * t, a + dir * (t + step), color);
            }
            t += step;
            offset = (offset + step) % period;
        }
    }
}

fn marker_look(marker: &MarkerLayer) -> (Icon, Color) {
    let (fallback, color) = match marker.role {
        MarkerRole::Vertex => (
            Icon::new(IconShape::Square, VERTEX_ICON_SIZE),
            Color::WHITE,
        ),
        MarkerRole::Midpoint => (
            Icon::new(IconShape::Circle, MIDPOINT_ICON_SIZE),
            Color::srgba(1.0, 1.0, 1.0, 0.6),
        ),
        MarkerRole::CircleCenter | MarkerRole::CircleOuter => (
            Icon::new(IconShape::Circle, VERTEX_ICON_SIZE),
            Color::WHITE,
        ),
        MarkerRole::PolygonDrag => (
            Icon::new(IconShape::Diamond, DRAG_ICON_SIZE),
            Color::srgb(1.0, 0.6, 0.1),
        ),
        MarkerRole::Shape => (
            Icon::new(IconShape::Circle, VERTEX_ICON_SIZE),
            Color::srgb(0.9, 0.2, 0.3),
        ),
    };
    (marker.icon.clone().unwrap_or(fallback), color)
}

fn draw_marker(gizmos: &mut Gizmos<SketchGizmoGroup>, marker: &MarkerLayer, px: f32) {
    let (icon, color) = marker_look(marker);
    let center = to_world(marker.position);
    let half = icon.size * px * 0.5;

    match icon.shape {
        IconShape::Circle => {
            gizmos.circle_2d(center, half, color);
        }
        IconShape::Square => {
            gizmos.rect_2d(center, Vec2::splat(half * 2.0), color);
        }
        IconShape::Diamond => {
            let corners = [
                center + Vec2::new(0.0, half),
                center + Vec2::new(half, 0.0),
                center + Vec2::new(0.0, -half),
                center + Vec2::new(-half, 0.0),
            ];
            for i in 0..corners.len() {
                gizmos.line_2d(corners[i], corners[(i + 1) % corners.len()], color);
            }
        }
    }

    if marker.role == MarkerRole::Shape && marker.label.is_none() {
        // Pin tip
        gizmos.line_2d(center - Vec2::new(0.0, half), center - Vec2::new(0.0, half * 2.0), color);
    }
}

/// Two wings at the last vertex, pointing back along the final segment.
fn draw_arrowhead(gizmos: &mut Gizmos<SketchGizmoGroup>, path: &[Position], color: Color, size: f32) {
    let points: Vec<Vec2> = path.iter().copied().map(to_world).collect();
    let Some(tip) = points.last().copied() else {
        return;
    };
    let Some(back) = points
        .iter()
        .rev()
        .skip(1)
        .map(|p| (tip - *p).normalize_or_zero())
        .find(|dir| *dir != Vec2::ZERO)
    else {
        return;
    };

    let spread = std::f32::consts::FRAC_PI_6;
    for angle in [spread, -spread] {
        let wing = Vec2::from_angle(angle).rotate(-back) * size;
        gizmos.line_2d(tip, tip + wing, color);
    }
}

fn to_egui_color(color: Color) -> egui::Color32 {
    let srgba = color.to_srgba();
    egui::Color32::from_rgba_unmultiplied(
        (srgba.red * 255.0) as u8,
        (srgba.green * 255.0) as u8,
        (srgba.blue * 255.0) as u8,
        255,
    )
}

/// Vertex numbers, segment distances and text marker labels.
pub fn render_marker_labels(
    mut contexts: EguiContexts,
    surface: Res<GizmoSurface>,
    camera: CameraParams,
    editor: Res<TextMarkerEditor>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    for (id, marker) in surface.markers() {
        if marker.label.is_none() && marker.tooltip.is_none() {
            continue;
        }
        let Some(screen_pos) = camera.world_to_screen(to_world(marker.position)) else {
            continue;
        };

        if let Some(label) = &marker.label
            && editor.editing() != Some(id)
        {
            let (align, color) = if marker.role == MarkerRole::Shape {
                (egui::Align2::LEFT_CENTER, to_egui_color(marker_look(marker).1))
            } else {
                (egui::Align2::CENTER_CENTER, egui::Color32::BLACK)
            };
            egui::Area::new(egui::Id::new(("sketch_label", id.0)))
                .fixed_pos(egui::pos2(screen_pos.x, screen_pos.y))
                .pivot(align)
                .interactable(false)
                .show(ctx, |ui| {
                    ui.label(egui::RichText::new(label).color(color).strong());
                });
        }

        if let Some(tooltip) = &marker.tooltip {
            egui::Area::new(egui::Id::new(("sketch_tooltip", id.0)))
                .fixed_pos(egui::pos2(screen_pos.x + 12.0, screen_pos.y - 12.0))
                .pivot(egui::Align2::LEFT_BOTTOM)
                .interactable(false)
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(egui::RichText::new(tooltip).small());
                    });
                });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_points_lie_on_radius() {
        let center = Vec2::new(10.0, -5.0);
        let points = circle_points(center, 40.0);
        assert_eq!(points.len(), CIRCLE_RESOLUTION);
        for point in points {
            assert!((point.distance(center) - 40.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_marker_icon_overrides_role_default() {
        let plain = MarkerLayer::new(Position::default(), MarkerRole::Midpoint);
        assert_eq!(marker_look(&plain).0.size, MIDPOINT_ICON_SIZE);

        let custom = plain.with_icon(Some(Icon::new(IconShape::Diamond, 40.0)));
        assert_eq!(marker_look(&custom).0, Icon::new(IconShape::Diamond, 40.0));
    }
}
