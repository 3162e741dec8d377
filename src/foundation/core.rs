use crate::foundation::error::{ThumbError, ThumbResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Largest accepted layer width or height, in canonical pixels.
pub const MAX_LAYER_EXTENT: f64 = 8192.0;

/// Largest accepted distance of a layer position from the canvas origin, per axis.
pub const MAX_COORDINATE: f64 = 100_000.0;

/// Canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Canonical authoring space; every descriptor coordinate lives here.
    pub const CANONICAL: Canvas = Canvas {
        width: 1280,
        height: 720,
    };

    /// Half-scale space used for interactive display only.
    pub const PREVIEW: Canvas = Canvas {
        width: 640,
        height: 360,
    };

    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> ThumbResult<Self> {
        if width == 0 || height == 0 {
            return Err(ThumbError::internal(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Number of pixels.
    pub fn area(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

/// Top-left anchored position in canonical space.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    /// Horizontal offset from the canvas left edge.
    pub x: f64,
    /// Vertical offset from the canvas top edge.
    pub y: f64,
}

impl Position {
    /// Shorthand constructor.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Nearest integer pixel, used when placing rasters on the canvas.
    pub fn to_pixel(self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }
}

/// Width/height pair in canonical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Size {
    /// Shorthand constructor.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Reject non-finite extents and extents outside `1..=MAX_LAYER_EXTENT`.
    pub fn validate(self, what: &str) -> ThumbResult<()> {
        if !self.width.is_finite() || !self.height.is_finite() {
            return Err(ThumbError::invalid_spec(format!("{what} size must be finite")));
        }
        if self.width < 1.0 || self.height < 1.0 {
            return Err(ThumbError::invalid_spec(format!(
                "{what} size must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_LAYER_EXTENT || self.height > MAX_LAYER_EXTENT {
            return Err(ThumbError::invalid_spec(format!(
                "{what} size must be at most {MAX_LAYER_EXTENT}x{MAX_LAYER_EXTENT}, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Integer pixel extent (rounded, never below 1).
    pub fn to_pixels(self) -> (u32, u32) {
        let w = self.width.round().max(1.0) as u32;
        let h = self.height.round().max(1.0) as u32;
        (w, h)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
