//! Bevy host for the sketch engine: a gizmo-drawn planar map, mouse input,
//! keyboard shortcuts and an egui toolbar.

mod camera;
mod input;
mod library;
pub mod params;
mod rendering;
pub mod state;
pub mod surface;
mod text_marker;
pub mod tools;
mod toolbar;

pub use camera::SketchCamera;
pub use input::MapDoubleClick;
pub use library::SketchLibrary;
pub use state::{ActiveSketch, ShapeEventQueue};
pub use surface::GizmoSurface;
pub use tools::SketchTool;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::config::{AppConfig, ConfigLoaded};

pub struct SketchPlugin;

impl Plugin for SketchPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GizmoSurface>()
            .init_resource::<ActiveSketch>()
            .init_resource::<ShapeEventQueue>()
            .init_resource::<SketchLibrary>()
            .init_resource::<input::PointerState>()
            .init_resource::<text_marker::TextMarkerEditor>()
            .add_message::<MapDoubleClick>()
            .init_gizmo_group::<rendering::SketchGizmoGroup>()
            .add_systems(
                Startup,
                (camera::spawn_camera, rendering::configure_sketch_gizmos).after(ConfigLoaded),
            )
            .add_systems(
                Update,
                (
                    surface::tick_surface_clock,
                    state::sync_shape_config.run_if(resource_changed::<AppConfig>),
                    tools::handle_sketch_shortcuts,
                    input::translate_pointer_input,
                    library::edit_on_double_click,
                    camera::double_click_zoom,
                    library::collect_shape_events,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    camera::camera_pan,
                    camera::camera_zoom,
                    camera::apply_camera_zoom,
                    tools::update_cursor_icon,
                    rendering::render_sketch_layers,
                ),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    toolbar::toolbar_ui,
                    toolbar::config_reset_notification_ui,
                    text_marker::text_marker_input_ui,
                    rendering::render_marker_labels,
                )
                    .chain(),
            );
    }
}
