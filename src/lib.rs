//! Thumbkit is a deterministic CPU compositing engine for video thumbnails.
//!
//! A [`Workspace`] holds a background and an ordered stack of text, overlay and image layers in
//! a fixed 1280x720 canonical space. The [`Engine`] renders a workspace snapshot to an opaque
//! premultiplied RGBA8 [`PixelBuffer`]:
//!
//! - Build or load a [`Workspace`] (JSON via [`Workspace::from_json_str`])
//! - Create an [`Engine`] with [`EngineOpts`]
//! - Call [`Engine::render_canvas`] at [`Resolution::Canonical`] or [`Resolution::Preview`]
//! - Write the result with [`export_png`]
//!
//! Missing image or font sources never fail a render; they are reported in
//! [`CanvasRender::issues`]. Structurally invalid descriptors do.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Colors, images, fonts and shaping.
pub mod assets;
/// Pixel effects.
pub mod effects;
/// Core types and errors.
pub mod foundation;
/// Renderers, engine and compositor.
pub mod render;
/// Workspace model.
pub mod scene;

pub use crate::assets::color::Color;
pub use crate::assets::fonts::{FontLibrary, FontOpts};
pub use crate::foundation::buffer::PixelBuffer;
pub use crate::foundation::core::{Affine, Canvas, Point, Position, Rect, Size, Vec2};
pub use crate::foundation::error::{AssetLoadError, ThumbError, ThumbResult};
pub use crate::foundation::geom::Raster;
pub use crate::render::compositor::{Compositor, CompositorState};
pub use crate::render::engine::{
    CanvasRender, Engine, EngineOpts, FontFallback, IssueTarget, PlaceholderStyle, RenderIssue,
    export_png,
};
pub use crate::render::scale::{Resolution, ScaleAdapter};
pub use crate::render::text::TextPolicy;
pub use crate::scene::model::{
    BackgroundSpec, GradientDirection, GradientStop, ImageLayer, ImageShadow, Layer, LayerId,
    LayerKind, OverlayLayer, OverlayShape, TextAlign, TextLayer, TextShadow,
};
pub use crate::scene::workspace::{WORKSPACE_VERSION, Workspace};
