//! Arrowhead kept in sync with an arrow polyline.

use bevy::prelude::Color;

use crate::constants::ARROW_HEAD_PIXEL_SIZE;
use crate::sketch::surface::{GroupId, Layer, LayerId, MapSurface};
use crate::sketch::types::Position;

#[derive(Debug, Default)]
pub(crate) struct ArrowDecoration {
    layer: Option<LayerId>,
}

impl ArrowDecoration {
    pub fn layer(&self) -> Option<LayerId> {
        self.layer
    }

    /// Replaces the arrowhead with one anchored to `path`.
    pub fn sync(
        &mut self,
        surface: &mut dyn MapSurface,
        group: GroupId,
        path: &[Position],
        color: Color,
    ) {
        self.remove(surface);
        if path.len() < 2 {
            return;
        }
        let id = surface.add_layer(
            group,
            Layer::Decoration {
                path: path.to_vec(),
                color,
                pixel_size: ARROW_HEAD_PIXEL_SIZE,
            },
        );
        self.layer = Some(id);
    }

    pub fn remove(&mut self, surface: &mut dyn MapSurface) {
        if let Some(id) = self.layer.take() {
            surface.remove_layer(id);
        }
    }

    /// Hands the current arrowhead over to a committed sketch.
    pub fn take(&mut self) -> Option<LayerId> {
        self.layer.take()
    }
}
