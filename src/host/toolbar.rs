use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::config::{AppConfig, ConfigResetNotification, SketchOption, ToggleOptionRequest};
use crate::sketch::DrawMode;

use super::library::{SketchLibrary, describe};
use super::params::CameraParams;
use super::state::ActiveSketch;
use super::surface::{GizmoSurface, to_position};
use super::tools::{SketchTool, begin_tool};

/// Main toolbar: shape tools, preference toggles and status
#[allow(clippy::too_many_arguments)]
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    mut active: ResMut<ActiveSketch>,
    mut surface: ResMut<GizmoSurface>,
    config: Res<AppConfig>,
    library: Res<SketchLibrary>,
    camera: CameraParams,
    mut toggles: MessageWriter<ToggleOptionRequest>,
) -> Result {
    let current = active.factory.active().map(|shape| {
        (
            shape.shape_type(),
            shape.is_text_marker(),
            shape.draw_mode(),
            shape.positions().len(),
        )
    });
    let mut chosen = None;

    egui::TopBottomPanel::top("sketch_toolbar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                for tool in SketchTool::all() {
                    let selected = current.is_some_and(|(shape_type, text, mode, _)| {
                        mode == DrawMode::Draw
                            && shape_type == tool.shape_type()
                            && text == (*tool == SketchTool::TextMarker)
                    });
                    let button = egui::Button::new(
                        egui::RichText::new(tool.display_name()).size(14.0).strong(),
                    )
                    .min_size(egui::vec2(0.0, 28.0))
                    .selected(selected);

                    if ui.add(button).clicked() {
                        chosen = Some(*tool);
                    }
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                let data = &config.data;
                for (option, enabled) in [
                    (SketchOption::VertexNumbers, data.display_vertex_numbers),
                    (SketchOption::LineDistances, data.display_line_distances),
                    (SketchOption::TouchDevice, data.is_touch_device),
                    (SketchOption::Draggable, data.is_draggable),
                ] {
                    let mut checked = enabled;
                    if ui.checkbox(&mut checked, option.display_name()).changed() {
                        toggles.write(ToggleOptionRequest { option });
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let cursor = camera.cursor_world_pos().map(to_position);
                    ui.label(egui::RichText::new(describe(&library, cursor)).weak());
                    if let Some((shape_type, _, mode, points)) = current {
                        ui.separator();
                        ui.label(format!(
                            "{} {:?} ({} points)",
                            shape_type.display_name(),
                            mode,
                            points
                        ));
                    }
                });
            });
        });

    if let Some(tool) = chosen {
        begin_tool(tool, &mut active, &mut surface, &config);
    }
    Ok(())
}

/// Shown once when a corrupt or unreadable config was replaced by defaults
pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
) -> Result {
    if !notification.show {
        return Ok(());
    }

    egui::Window::new("Settings Reset")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("Your settings could not be loaded and were reset to defaults.");
            if let Some(ref reason) = notification.reason {
                ui.add_space(5.0);
                ui.label(egui::RichText::new(reason).weak());
            }
            ui.add_space(10.0);
            if ui.button("OK").clicked() {
                notification.show = false;
            }
        });

    Ok(())
}
