//! Pixel effects on premultiplied buffers.

/// Brightness, contrast and saturation.
pub mod adjust;
/// Separable Gaussian blur.
pub mod blur;
/// Source-over compositing.
pub mod composite;
/// Alpha masks, dilation and tinting.
pub mod morph;
