use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use rayon::prelude::*;

use crate::{
    assets::{
        cache::ImageCache,
        fonts::{FontLibrary, FontOpts},
        text_shaper::TextShaper,
    },
    effects::composite::composite_at,
    foundation::{
        buffer::PixelBuffer,
        core::{Point, Size},
        error::{AssetLoadError, ThumbError, ThumbResult},
        geom::{Raster, rotate_raster},
    },
    render::{
        background::{missing_background, render_background},
        image_layer::{image_placeholder, render_image},
        overlay::render_overlay,
        scale::{Resolution, to_resolution},
        text::{TextPolicy, render_text, resolve_face},
    },
    scene::{
        model::{Layer, LayerId, LayerKind},
        workspace::Workspace,
    },
};

/// How a layer whose source asset failed to load is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaceholderStyle {
    /// Hatched box of the layer's size.
    #[default]
    Hatched,
    /// Leave the layer out.
    Omit,
}

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineOpts {
    /// Base directory for relative image paths.
    pub assets_root: Option<PathBuf>,
    /// Drawing of layers with missing assets.
    pub placeholder: PlaceholderStyle,
    /// Render layer rasters on the rayon pool. Compositing stays sequential.
    pub parallel_layers: bool,
    /// Text wrapping constants.
    pub text: TextPolicy,
    /// Font discovery.
    pub fonts: FontOpts,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            assets_root: None,
            placeholder: PlaceholderStyle::Hatched,
            parallel_layers: true,
            text: TextPolicy::default(),
            fonts: FontOpts::default(),
        }
    }
}

/// What a [`RenderIssue`] is attached to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IssueTarget {
    /// The workspace background.
    Background,
    /// A layer, by id.
    Layer(LayerId),
}

/// A non-fatal asset failure recorded during a render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderIssue {
    /// Background or layer that referenced the asset.
    pub target: IssueTarget,
    /// The load failure.
    pub error: AssetLoadError,
}

/// A text layer drawn with a different face than it asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontFallback {
    /// Layer id.
    pub layer: LayerId,
    /// Family named by the layer.
    pub requested: String,
    /// Family actually used.
    pub resolved: String,
}

/// Result of [`Engine::render_canvas`].
#[derive(Clone, Debug)]
pub struct CanvasRender {
    /// Final opaque pixels at the requested resolution.
    pub buffer: PixelBuffer,
    /// Asset failures, in layer order after any background issue.
    pub issues: Vec<RenderIssue>,
    /// Font substitutions, in layer order.
    pub font_fallbacks: Vec<FontFallback>,
}

struct LayerOutput {
    raster: Option<Raster>,
    issue: Option<AssetLoadError>,
    fallback: Option<FontFallback>,
}

/// Thumbnail renderer. Holds the font library and the decoded-image cache; renders are pure
/// functions of the workspace snapshot passed in.
#[derive(Debug)]
pub struct Engine {
    fonts: Arc<FontLibrary>,
    images: Arc<ImageCache>,
    opts: EngineOpts,
}

impl Engine {
    /// Build an engine, discovering fonts per `opts.fonts`.
    pub fn new(opts: EngineOpts) -> Self {
        let fonts = FontLibrary::load(&opts.fonts);
        Self::with_fonts(opts, fonts)
    }

    /// Build an engine around an already loaded font library.
    pub fn with_fonts(opts: EngineOpts, fonts: FontLibrary) -> Self {
        let images = match &opts.assets_root {
            Some(root) => ImageCache::with_root(root),
            None => ImageCache::new(),
        };
        Self {
            fonts: Arc::new(fonts),
            images: Arc::new(images),
            opts,
        }
    }

    /// Configuration in use.
    pub fn opts(&self) -> &EngineOpts {
        &self.opts
    }

    /// Font library in use.
    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    /// Decoded-image cache; callers invalidate entries when files change on disk.
    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Render `workspace` to an opaque buffer at `resolution`.
    ///
    /// Invalid descriptors fail the whole render. Missing assets do not: they are drawn as
    /// placeholders (or omitted) and listed in [`CanvasRender::issues`].
    #[tracing::instrument(skip(self, workspace), fields(layers = workspace.layers().len()))]
    pub fn render_canvas(
        &self,
        workspace: &Workspace,
        resolution: Resolution,
    ) -> ThumbResult<CanvasRender> {
        let t0 = Instant::now();
        workspace.validate()?;
        let canvas = workspace.canvas_size();

        let mut issues = Vec::new();
        let mut font_fallbacks = Vec::new();

        let mut buffer = match render_background(workspace.background(), canvas, &self.images) {
            Ok(buf) => buf,
            Err(ThumbError::AssetLoad(error)) => {
                issues.push(RenderIssue {
                    target: IssueTarget::Background,
                    error,
                });
                missing_background(canvas)?
            }
            Err(e) => return Err(e),
        };

        let visible: Vec<&Layer> = workspace.layers().iter().filter(|l| l.visible).collect();
        let outputs: Vec<ThumbResult<LayerOutput>> = if self.opts.parallel_layers {
            visible
                .par_iter()
                .map_init(TextShaper::new, |shaper, layer| self.render_layer(layer, shaper))
                .collect()
        } else {
            let mut shaper = TextShaper::new();
            visible
                .iter()
                .map(|layer| self.render_layer(layer, &mut shaper))
                .collect()
        };

        for (layer, output) in visible.iter().zip(outputs) {
            let output = output?;
            if let Some(error) = output.issue {
                issues.push(RenderIssue {
                    target: IssueTarget::Layer(layer.id().clone()),
                    error,
                });
            }
            if let Some(fallback) = output.fallback {
                font_fallbacks.push(fallback);
            }
            if let Some(raster) = output.raster {
                let (x, y) = layer.position.to_pixel();
                composite_at(
                    &mut buffer,
                    &raster.buffer,
                    x.saturating_add(raster.offset.0),
                    y.saturating_add(raster.offset.1),
                    layer.opacity as f32,
                );
            }
        }

        if resolution != Resolution::Canonical {
            buffer = to_resolution(&buffer, resolution)?;
        }
        tracing::debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            issues = issues.len(),
            "canvas rendered"
        );
        Ok(CanvasRender {
            buffer,
            issues,
            font_fallbacks,
        })
    }

    /// Render one layer on its own transparent buffer, cropped to its rotated bounds.
    ///
    /// Opacity is not applied. Missing assets yield the placeholder; an omitted layer is an
    /// asset error.
    pub fn render_layer_isolated(&self, layer: &Layer) -> ThumbResult<PixelBuffer> {
        layer.validate()?;
        let mut shaper = TextShaper::new();
        let output = self.render_layer(layer, &mut shaper)?;
        match (output.raster, output.issue) {
            (Some(raster), _) => Ok(raster.buffer),
            (None, Some(error)) => Err(ThumbError::AssetLoad(error)),
            (None, None) => Err(ThumbError::internal(format!(
                "layer {} produced no pixels",
                layer.id()
            ))),
        }
    }

    #[tracing::instrument(skip(self, layer, shaper), fields(id = %layer.id(), kind = layer.kind.type_name()))]
    fn render_layer(&self, layer: &Layer, shaper: &mut TextShaper) -> ThumbResult<LayerOutput> {
        let mut fallback = None;
        let drawn: ThumbResult<(Raster, Size)> = match &layer.kind {
            LayerKind::Text(text) => match resolve_face(text, &self.fonts) {
                Ok(face) => {
                    if face.fell_back {
                        fallback = Some(FontFallback {
                            layer: layer.id().clone(),
                            requested: face.requested.clone(),
                            resolved: face.resolved.clone(),
                        });
                    }
                    render_text(text, face, shaper, &self.opts.text).map(|t| (t.raster, t.content))
                }
                // No face at all: the layer cannot be drawn, so it is omitted.
                Err(error) => {
                    return Ok(LayerOutput {
                        raster: None,
                        issue: Some(error),
                        fallback: None,
                    });
                }
            },
            LayerKind::Overlay(overlay) => render_overlay(overlay).map(|r| (r, overlay.size)),
            LayerKind::Image(image) => match render_image(image, &self.images) {
                Err(ThumbError::AssetLoad(error)) => {
                    let raster = match self.opts.placeholder {
                        PlaceholderStyle::Hatched => Some(self.rotate(
                            layer,
                            image_placeholder(image)?,
                            image.size,
                        )?),
                        PlaceholderStyle::Omit => None,
                    };
                    return Ok(LayerOutput {
                        raster,
                        issue: Some(error),
                        fallback: None,
                    });
                }
                other => other.map(|r| (r, image.size)),
            },
        };
        let (raster, content) = drawn?;
        Ok(LayerOutput {
            raster: Some(self.rotate(layer, raster, content)?),
            issue: None,
            fallback,
        })
    }

    fn rotate(&self, layer: &Layer, raster: Raster, content: Size) -> ThumbResult<Raster> {
        if layer.rotation_degrees == 0.0 {
            return Ok(raster);
        }
        let pivot = Point::new(content.width / 2.0, content.height / 2.0);
        rotate_raster(&raster, layer.rotation_degrees, pivot)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineOpts::default())
    }
}

/// Write `buffer` as an 8-bit straight-alpha RGBA PNG.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn export_png(buffer: &PixelBuffer, path: impl AsRef<Path>) -> ThumbResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| ThumbError::io(format!("create {}: {e}", parent.display())))?;
    }
    image::save_buffer_with_format(
        path,
        &buffer.to_straight_rgba8(),
        buffer.width(),
        buffer.height(),
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| ThumbError::io(format!("write png {}: {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/render/engine.rs"]
mod tests;
