use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    assets::color::Color,
    foundation::{
        core::{Canvas, Size},
        error::{ThumbError, ThumbResult},
    },
    scene::model::{
        BackgroundSpec, Layer, LayerId, LayerKind, OverlayLayer, OverlayShape, TextLayer,
        TextShadow,
    },
};

/// Current document format version.
pub const WORKSPACE_VERSION: u32 = 1;

fn default_version() -> u32 {
    WORKSPACE_VERSION
}

fn canonical() -> Canvas {
    Canvas::CANONICAL
}

/// Root aggregate: background plus the ordered layer stack (index 0 = bottom).
///
/// Layers are only added, removed and reordered through methods here, which keep ids unique.
/// The engine reads a workspace as an immutable snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default = "canonical")]
    canvas_size: Canvas,
    #[serde(default)]
    background: BackgroundSpec,
    #[serde(default)]
    layers: Vec<Layer>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Empty canonical workspace over the default dark background.
    pub fn new() -> Self {
        Self {
            version: WORKSPACE_VERSION,
            canvas_size: Canvas::CANONICAL,
            background: BackgroundSpec::default(),
            layers: Vec::new(),
        }
    }

    /// Workspace seeded with the default headline, subheadline and banner.
    pub fn starter() -> Self {
        let mut ws = Self::new();
        ws.background = BackgroundSpec::Solid {
            color: Color::rgb(0x20, 0x20, 0x20),
        };

        let mut banner = OverlayLayer::new(
            OverlayShape::Banner,
            Size::new(1152.0, 216.0),
            Color::rgb(0xff, 0x38, 0x38),
        );
        banner.corner_radius = 40.0;
        banner.banner_tails = true;

        let headline = TextLayer {
            stroke_width_px: 6.0,
            stroke_color: Color::WHITE,
            shadow: Some(TextShadow {
                offset_x: 6.0,
                offset_y: 6.0,
                blur_radius: 12.0,
                color: Color::BLACK.with_alpha_factor(0.6),
            }),
            max_width_px: Some(1152.0),
            ..TextLayer::new("Boost Your Views\nIn 5 Minutes!", "Montserrat", 170.0)
        };

        let subheadline = TextLayer {
            color: Color::rgb(0xff, 0xcf, 0x00),
            stroke_width_px: 4.0,
            stroke_color: Color::rgb(0x11, 0x11, 0x11),
            shadow: Some(TextShadow {
                offset_x: 4.0,
                offset_y: 4.0,
                blur_radius: 8.0,
                color: Color::BLACK.with_alpha_factor(0.7),
            }),
            max_width_px: Some(1152.0),
            ..TextLayer::new("Viral Thumbnail Strategy", "Montserrat", 90.0)
        };

        let layers = [
            Layer::new(LayerKind::Overlay(banner))
                .labeled("Banner")
                .at(64.0, 324.0)
                .rotated(-2.0)
                .with_opacity(0.88),
            Layer::new(LayerKind::Text(headline))
                .labeled("Headline")
                .at(64.0, 60.0),
            Layer::new(LayerKind::Text(subheadline))
                .labeled("Subheadline")
                .at(64.0, 390.0),
        ];
        ws.layers.extend(layers);
        ws
    }

    /// Document format version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Canvas size (always canonical).
    pub fn canvas_size(&self) -> Canvas {
        self.canvas_size
    }

    /// Current background.
    pub fn background(&self) -> &BackgroundSpec {
        &self.background
    }

    /// Replace the background.
    pub fn set_background(&mut self, background: BackgroundSpec) {
        self.background = background;
    }

    /// Layers bottom to top.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layer ids bottom to top.
    pub fn layer_ids(&self) -> Vec<LayerId> {
        self.layers.iter().map(|l| l.id().clone()).collect()
    }

    /// Stack index of `id`.
    pub fn index_of(&self, id: &LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id() == id)
    }

    /// Borrow a layer.
    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    /// Mutably borrow a layer. The id itself cannot be changed through this handle.
    pub fn layer_mut(&mut self, id: &LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id() == id)
    }

    fn require_index(&self, id: &LayerId) -> ThumbResult<usize> {
        self.index_of(id)
            .ok_or_else(|| ThumbError::invalid_spec(format!("unknown layer id {id}")))
    }

    fn ensure_unique(&self, id: &LayerId) -> ThumbResult<()> {
        if self.index_of(id).is_some() {
            return Err(ThumbError::invalid_spec(format!("duplicate layer id {id}")));
        }
        Ok(())
    }

    /// Push a layer on top of the stack.
    pub fn add_layer(&mut self, layer: Layer) -> ThumbResult<LayerId> {
        self.ensure_unique(layer.id())?;
        let id = layer.id().clone();
        self.layers.push(layer);
        Ok(id)
    }

    /// Insert a layer at stack `index` (`0` = bottom, `len` = top).
    pub fn insert_layer(&mut self, index: usize, layer: Layer) -> ThumbResult<LayerId> {
        if index > self.layers.len() {
            return Err(ThumbError::invalid_spec(format!(
                "insert index {index} past top of {} layers",
                self.layers.len()
            )));
        }
        self.ensure_unique(layer.id())?;
        let id = layer.id().clone();
        self.layers.insert(index, layer);
        Ok(id)
    }

    /// Remove and return a layer.
    pub fn remove_layer(&mut self, id: &LayerId) -> ThumbResult<Layer> {
        let idx = self.require_index(id)?;
        Ok(self.layers.remove(idx))
    }

    /// Copy a layer under a fresh id directly above the source.
    pub fn duplicate_layer(&mut self, id: &LayerId) -> ThumbResult<LayerId> {
        let idx = self.require_index(id)?;
        let mut copy = self.layers[idx].clone();
        let new_id = LayerId::generate();
        copy.set_id(new_id.clone());
        if !copy.label.is_empty() {
            copy.label.push_str(" copy");
        }
        self.layers.insert(idx + 1, copy);
        Ok(new_id)
    }

    /// Swap a layer with the one above it. The top layer stays put.
    pub fn move_up(&mut self, id: &LayerId) -> ThumbResult<Vec<LayerId>> {
        let idx = self.require_index(id)?;
        if idx + 1 < self.layers.len() {
            self.layers.swap(idx, idx + 1);
        }
        Ok(self.layer_ids())
    }

    /// Swap a layer with the one below it. The bottom layer stays put.
    pub fn move_down(&mut self, id: &LayerId) -> ThumbResult<Vec<LayerId>> {
        let idx = self.require_index(id)?;
        if idx > 0 {
            self.layers.swap(idx, idx - 1);
        }
        Ok(self.layer_ids())
    }

    /// Drop every layer, keeping the background.
    pub fn clear_layers(&mut self) {
        self.layers.clear();
    }

    /// Full structural check: canvas, background, every layer and id uniqueness.
    pub fn validate(&self) -> ThumbResult<()> {
        if self.canvas_size != Canvas::CANONICAL {
            return Err(ThumbError::invalid_spec(format!(
                "canvasSize must be {}x{}, got {}x{}",
                Canvas::CANONICAL.width,
                Canvas::CANONICAL.height,
                self.canvas_size.width,
                self.canvas_size.height
            )));
        }
        self.background.validate()?;
        let mut seen = HashSet::with_capacity(self.layers.len());
        for layer in &self.layers {
            if !seen.insert(layer.id()) {
                return Err(ThumbError::invalid_spec(format!(
                    "duplicate layer id {}",
                    layer.id()
                )));
            }
            layer.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/workspace.rs"]
mod tests;
