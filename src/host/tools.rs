use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow, SystemCursorIcon};
use bevy_egui::EguiContexts;

use crate::config::{AppConfig, SketchOption, ToggleOptionRequest};
use crate::sketch::{DrawMode, ShapeType};

use super::state::ActiveSketch;
use super::surface::GizmoSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchTool {
    Polygon,
    Polyline,
    Arrow,
    Circle,
    Marker,
    TextMarker,
}

impl SketchTool {
    pub fn display_name(&self) -> &'static str {
        match self {
            SketchTool::Polygon => "Polygon (P)",
            SketchTool::Polyline => "Polyline (L)",
            SketchTool::Arrow => "Arrow (A)",
            SketchTool::Circle => "Circle (C)",
            SketchTool::Marker => "Marker (M)",
            SketchTool::TextMarker => "Text (T)",
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        match self {
            SketchTool::Polygon => ShapeType::Polygon,
            SketchTool::Polyline => ShapeType::Polyline,
            SketchTool::Arrow => ShapeType::ArrowPolyline,
            SketchTool::Circle => ShapeType::Circle,
            SketchTool::Marker | SketchTool::TextMarker => ShapeType::Marker,
        }
    }

    pub fn all() -> &'static [SketchTool] {
        &[
            SketchTool::Polygon,
            SketchTool::Polyline,
            SketchTool::Arrow,
            SketchTool::Circle,
            SketchTool::Marker,
            SketchTool::TextMarker,
        ]
    }

    fn from_key(keyboard: &ButtonInput<KeyCode>) -> Option<SketchTool> {
        if keyboard.just_pressed(KeyCode::KeyP) {
            Some(SketchTool::Polygon)
        } else if keyboard.just_pressed(KeyCode::KeyL) {
            Some(SketchTool::Polyline)
        } else if keyboard.just_pressed(KeyCode::KeyA) {
            Some(SketchTool::Arrow)
        } else if keyboard.just_pressed(KeyCode::KeyC) {
            Some(SketchTool::Circle)
        } else if keyboard.just_pressed(KeyCode::KeyM) {
            Some(SketchTool::Marker)
        } else if keyboard.just_pressed(KeyCode::KeyT) {
            Some(SketchTool::TextMarker)
        } else {
            None
        }
    }
}

/// Acquires a shape for `tool` and starts drawing it.
pub fn begin_tool(
    tool: SketchTool,
    active: &mut ActiveSketch,
    surface: &mut GizmoSurface,
    config: &AppConfig,
) {
    let group = active.group(surface);
    match active
        .factory
        .acquire(tool.shape_type(), surface, group, config.data.shape_style())
    {
        Ok(shape) => {
            shape.set_is_text_marker(tool == SketchTool::TextMarker);
            shape.start_drawing(surface);
        }
        Err(e) => warn!("Could not start {}: {}", tool.display_name(), e),
    }
}

/// Keyboard control of the active shape.
pub fn handle_sketch_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut active: ResMut<ActiveSketch>,
    mut surface: ResMut<GizmoSurface>,
    config: Res<AppConfig>,
    mut toggles: MessageWriter<ToggleOptionRequest>,
    mut contexts: EguiContexts,
) {
    // Don't react while typing in a text field
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    let surface = &mut *surface;

    if ctrl {
        if keyboard.just_pressed(KeyCode::KeyZ)
            && let Some(shape) = active.factory.active_mut()
        {
            shape.undo(surface);
        }
        return;
    }

    if let Some(tool) = SketchTool::from_key(&keyboard) {
        begin_tool(tool, &mut active, surface, &config);
        return;
    }

    let option = if keyboard.just_pressed(KeyCode::KeyN) {
        Some(SketchOption::VertexNumbers)
    } else if keyboard.just_pressed(KeyCode::KeyD) {
        Some(SketchOption::LineDistances)
    } else if keyboard.just_pressed(KeyCode::KeyG) {
        Some(SketchOption::TouchDevice)
    } else {
        None
    };
    if let Some(option) = option {
        toggles.write(ToggleOptionRequest { option });
        return;
    }

    let Some(shape) = active.factory.active_mut() else {
        return;
    };

    if keyboard.just_pressed(KeyCode::Enter) && !shape.confirm(surface) {
        info!(
            "{} needs at least {} points",
            shape.shape_type().display_name(),
            shape.shape_type().min_vertices()
        );
    } else if keyboard.just_pressed(KeyCode::Escape) {
        match shape.draw_mode() {
            DrawMode::Edit => shape.cancel_edit(surface),
            DrawMode::Draw => shape.stop_drawing(surface),
            DrawMode::Start | DrawMode::Stop => {}
        }
    } else if keyboard.just_pressed(KeyCode::Delete) || keyboard.just_pressed(KeyCode::Backspace) {
        shape.delete_shape(surface);
    }
}

pub fn update_cursor_icon(
    active: Res<ActiveSketch>,
    mut window_query: Query<(Entity, &Window), With<PrimaryWindow>>,
    mut commands: Commands,
    mut contexts: EguiContexts,
) {
    let Ok((entity, _window)) = window_query.single_mut() else {
        return;
    };

    // Use default cursor over UI, tool cursor in map space
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.is_pointer_over_area()
    {
        commands
            .entity(entity)
            .insert(CursorIcon::System(SystemCursorIcon::Default));
        return;
    }

    let icon = match active.factory.active().map(|shape| shape.draw_mode()) {
        Some(DrawMode::Draw) => SystemCursorIcon::Crosshair,
        Some(DrawMode::Edit) => SystemCursorIcon::Move,
        _ => SystemCursorIcon::Default,
    };
    commands.entity(entity).insert(CursorIcon::System(icon));
}
