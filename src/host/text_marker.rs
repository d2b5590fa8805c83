//! Inline label editor for text markers.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::sketch::{LayerId, Position};

use super::params::CameraParams;
use super::state::ActiveSketch;
use super::surface::{GizmoSurface, to_world};

#[derive(Resource, Default)]
pub struct TextMarkerEditor {
    /// Marker the text field is bound to
    layer: Option<LayerId>,
    buffer: String,
    focus_pending: bool,
}

impl TextMarkerEditor {
    pub fn editing(&self) -> Option<LayerId> {
        self.layer
    }

    /// Binds the editor to `layer`, loading `label` when the binding changes.
    fn bind(&mut self, layer: LayerId, label: &str) {
        if self.layer != Some(layer) {
            self.layer = Some(layer);
            self.buffer = label.to_string();
            self.focus_pending = true;
        }
    }

    fn unbind(&mut self) {
        self.layer = None;
        self.buffer.clear();
        self.focus_pending = false;
    }
}

/// The live text marker's layer, position and label.
fn live_text_marker(active: &ActiveSketch) -> Option<(LayerId, Position, String)> {
    let shape = active
        .factory
        .active()
        .filter(|shape| shape.is_text_marker() && shape.draw_mode().is_live())?;
    let sketch = shape.current_shape()?;
    Some((
        sketch.layer?,
        sketch.center()?,
        sketch.label.unwrap_or_default(),
    ))
}

/// Text field anchored next to the live text marker. Edits update the label in place.
pub fn text_marker_input_ui(
    mut contexts: EguiContexts,
    mut editor: ResMut<TextMarkerEditor>,
    mut active: ResMut<ActiveSketch>,
    mut surface: ResMut<GizmoSurface>,
    camera: CameraParams,
) -> Result {
    let Some((layer, position, label)) = live_text_marker(&active) else {
        if editor.layer.is_some() {
            editor.unbind();
        }
        return Ok(());
    };
    editor.bind(layer, &label);

    let Some(screen_pos) = camera.world_to_screen(to_world(position)) else {
        return Ok(());
    };

    let mut changed = false;
    let mut confirm = false;
    let editor = &mut *editor;

    egui::Area::new(egui::Id::new("text_marker_input"))
        .fixed_pos(egui::pos2(screen_pos.x + 14.0, screen_pos.y))
        .pivot(egui::Align2::LEFT_CENTER)
        .show(contexts.ctx_mut()?, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut editor.buffer)
                        .hint_text("Label...")
                        .desired_width(160.0)
                        .font(egui::TextStyle::Body),
                );

                if editor.focus_pending {
                    response.request_focus();
                    editor.focus_pending = false;
                }
                changed = response.changed();

                // Confirm on Enter
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    confirm = true;
                }
            });
        });

    let surface = &mut *surface;
    if let Some(shape) = active.factory.active_mut() {
        if changed {
            shape.set_marker_text(surface, editor.buffer.clone());
        }
        if confirm {
            shape.confirm(surface);
        }
    }

    Ok(())
}
