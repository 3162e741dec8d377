//! Source assets: colors, decoded images, fonts and text shaping.

/// Decoded-image cache keyed by path.
pub mod cache;
/// Straight-alpha colors and hex parsing.
pub mod color;
/// Image decoding to premultiplied RGBA8.
pub mod decode;
/// Font discovery and family resolution.
pub mod fonts;
/// Single-line shaping with parley.
pub mod text_shaper;
