//! Single active shape slot.
//!
//! The factory is the only way to obtain a [`DrawShape`]. Acquiring a shape closes whatever
//! currently occupies the slot, so at most one shape is ever drawing or editing.

use bevy::log::{debug, info};

use super::error::ShapeError;
use super::options::ShapeConfig;
use super::shape::{DrawShape, ShapeBuilder};
use super::surface::{GroupId, MapInteraction, MapSurface, SurfaceEvent};
use super::types::{DrawMode, ShapeStyle, ShapeType};

/// Proof that construction is mediated by the factory. Cannot be created elsewhere.
pub struct ConstructionToken {
    _private: (),
}

impl ConstructionToken {
    fn new() -> Self {
        Self { _private: () }
    }
}

#[derive(Debug, Default)]
struct ActiveShapeSlot {
    occupant: Option<DrawShape>,
}

impl ActiveShapeSlot {
    /// Cancels an edit or stops a draw, leaving the occupant vacated.
    fn close(&mut self, surface: &mut dyn MapSurface) {
        let Some(shape) = self.occupant.as_mut() else {
            return;
        };
        match shape.draw_mode() {
            DrawMode::Edit => {
                debug!("Cancelling {} edit", shape.shape_type().display_name());
                shape.cancel_edit(surface);
                // cancel_edit is a no-op when the edited layer is gone
                shape.stop_drawing(surface);
            }
            DrawMode::Draw => {
                debug!("Stopping {} draw", shape.shape_type().display_name());
                shape.stop_drawing(surface);
            }
            DrawMode::Start | DrawMode::Stop => {}
        }
    }
}

#[derive(Debug, Default)]
pub struct ShapeFactory {
    config: ShapeConfig,
    slot: ActiveShapeSlot,
}

impl ShapeFactory {
    pub fn new(config: ShapeConfig) -> Self {
        Self {
            config,
            slot: ActiveShapeSlot::default(),
        }
    }

    pub fn config(&self) -> &ShapeConfig {
        &self.config
    }

    /// Replaces the shared configuration and reapplies it to the current occupant.
    pub fn set_shape_config(&mut self, surface: &mut dyn MapSurface, config: ShapeConfig) {
        self.config = config;
        if let Some(shape) = self.slot.occupant.as_mut() {
            shape.apply_config(surface, &self.config);
        }
    }

    /// Closes the current occupant and hands out a shape of `shape_type`.
    pub fn acquire(
        &mut self,
        shape_type: ShapeType,
        surface: &mut dyn MapSurface,
        group: GroupId,
        style: ShapeStyle,
    ) -> Result<&mut DrawShape, ShapeError> {
        let reusable = self
            .slot
            .occupant
            .as_ref()
            .is_some_and(|shape| shape.shape_type() == shape_type && !shape.is_vacated());

        self.slot.close(surface);

        if reusable && let Some(shape) = self.slot.occupant.as_mut() {
            shape.reuse(group, style);
        } else {
            let token = ConstructionToken::new();
            let shape = ShapeBuilder::mediated(token, shape_type, group, style).build()?;
            if let Some(mut previous) = self.slot.occupant.replace(shape) {
                previous.release(surface);
            }
            surface.set_interaction(MapInteraction::DoubleClickZoom, false);
            info!("Activated {} tool", shape_type.display_name());
        }

        match self.slot.occupant.as_mut() {
            Some(shape) => {
                shape.apply_config(surface, &self.config);
                Ok(shape)
            }
            None => Err(ShapeError::UnknownShapeType(shape_type)),
        }
    }

    /// The occupant while it still holds the slot.
    pub fn active(&self) -> Option<&DrawShape> {
        self.slot.occupant.as_ref().filter(|shape| !shape.is_vacated())
    }

    pub fn active_mut(&mut self) -> Option<&mut DrawShape> {
        self.slot.occupant.as_mut().filter(|shape| !shape.is_vacated())
    }

    /// The last acquired shape, vacated or not.
    pub fn occupant(&self) -> Option<&DrawShape> {
        self.slot.occupant.as_ref()
    }

    /// Closes the active shape, if any.
    pub fn close(&mut self, surface: &mut dyn MapSurface) {
        self.slot.close(surface);
    }

    /// Forwards a surface event to the active shape.
    pub fn dispatch(&mut self, surface: &mut dyn MapSurface, event: SurfaceEvent) {
        if let Some(shape) = self.active_mut() {
            shape.handle_event(surface, event);
        }
    }
}
