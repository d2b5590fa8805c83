use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use crate::sketch::MapInteraction;

use super::input::MapDoubleClick;
use super::surface::{GizmoSurface, to_world};

#[derive(Component)]
pub struct SketchCamera;

#[derive(Component)]
pub struct CameraZoom {
    pub scale: f32,
}

impl Default for CameraZoom {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        SketchCamera,
        CameraZoom::default(),
        Transform::from_translation(Vec3::new(0.0, 0.0, 1000.0)),
    ));
}

/// Middle-drag pan. Suspended while a marker drag holds the map still.
pub fn camera_pan(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    surface: Res<GizmoSurface>,
    mut camera_query: Query<(&mut Transform, &CameraZoom), With<SketchCamera>>,
) {
    if !mouse_button.pressed(MouseButton::Middle) || !surface.is_enabled(MapInteraction::PanDrag) {
        mouse_motion.clear();
        return;
    }

    let Ok((mut transform, zoom)) = camera_query.single_mut() else {
        return;
    };

    for event in mouse_motion.read() {
        let delta = event.delta * zoom.scale;
        transform.translation.x -= delta.x;
        transform.translation.y += delta.y;
    }
}

pub fn camera_zoom(
    mut scroll_events: MessageReader<MouseWheel>,
    mut camera_query: Query<&mut CameraZoom, With<SketchCamera>>,
) {
    let Ok(mut zoom) = camera_query.single_mut() else {
        return;
    };

    for event in scroll_events.read() {
        let scroll_amount = match event.unit {
            MouseScrollUnit::Line => event.y * 0.1,
            MouseScrollUnit::Pixel => event.y * 0.001,
        };

        zoom.scale = (zoom.scale - scroll_amount).clamp(0.1, 10.0);
    }
}

/// Zooms in on a double click unless a shape tool switched it off.
pub fn double_click_zoom(
    mut double_clicks: MessageReader<MapDoubleClick>,
    surface: Res<GizmoSurface>,
    mut camera_query: Query<(&mut Transform, &mut CameraZoom), With<SketchCamera>>,
) {
    let Some(click) = double_clicks.read().last() else {
        return;
    };
    if !surface.is_enabled(MapInteraction::DoubleClickZoom) {
        return;
    }
    let Ok((mut transform, mut zoom)) = camera_query.single_mut() else {
        return;
    };

    let target = to_world(click.position);
    transform.translation.x = target.x;
    transform.translation.y = target.y;
    zoom.scale = (zoom.scale * 0.5).clamp(0.1, 10.0);
}

pub fn apply_camera_zoom(
    mut camera_query: Query<(&CameraZoom, &mut Projection), (With<SketchCamera>, Changed<CameraZoom>)>,
) {
    for (zoom, mut projection) in camera_query.iter_mut() {
        if let Projection::Orthographic(ref mut ortho) = *projection {
            ortho.scale = zoom.scale;
        }
    }
}
