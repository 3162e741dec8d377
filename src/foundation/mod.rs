//! Core value types, errors, pixel math and raster geometry.

/// Pixel buffers in premultiplied RGBA8.
pub mod buffer;
/// Canvas, position and size types.
pub mod core;
/// Error taxonomy.
pub mod error;
/// Rasters, rotation and flips.
pub mod geom;
/// Fixed-point channel math.
pub mod math;
