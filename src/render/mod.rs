//! CPU rendering: background, layer renderers, the engine and the compositor.

/// Background fills.
pub mod background;
/// Last-known-good render cache.
pub mod compositor;
/// Canvas renders, issues and PNG export.
pub mod engine;
/// Image layers.
pub mod image_layer;
/// Overlay shapes.
pub mod overlay;
/// Missing-asset hatching.
pub mod placeholder;
/// Preview scaling.
pub mod scale;
/// Text layers.
pub mod text;
pub(crate) mod vector;
