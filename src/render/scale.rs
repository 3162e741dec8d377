use image::imageops::FilterType;

use crate::foundation::{
    buffer::PixelBuffer,
    core::{Canvas, Position, Size},
    error::{ThumbError, ThumbResult},
    math::clamp_premul_in_place,
};

/// Preview edge length relative to canonical.
pub const PREVIEW_RATIO: f64 = 0.5;

/// Output resolution of a canvas render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resolution {
    /// Full 1280x720.
    #[default]
    Canonical,
    /// Half-size 640x360.
    Preview,
}

impl Resolution {
    /// Pixel extent of this resolution.
    pub fn canvas(self) -> Canvas {
        match self {
            Self::Canonical => Canvas::CANONICAL,
            Self::Preview => Canvas::PREVIEW,
        }
    }
}

/// Maps between canonical and preview coordinates.
///
/// Descriptors are always canonical; this exists for callers translating pointer input on a
/// preview surface back to descriptor space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleAdapter {
    ratio: f64,
}

impl Default for ScaleAdapter {
    fn default() -> Self {
        Self {
            ratio: PREVIEW_RATIO,
        }
    }
}

impl ScaleAdapter {
    /// Adapter with a custom preview ratio in `(0, 1]`.
    pub fn new(ratio: f64) -> ThumbResult<Self> {
        if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
            return Err(ThumbError::invalid_spec(format!(
                "preview ratio must be in (0, 1], got {ratio}"
            )));
        }
        Ok(Self { ratio })
    }

    /// Preview edge length relative to canonical.
    pub fn ratio(self) -> f64 {
        self.ratio
    }

    /// Canonical position to preview.
    pub fn to_preview(self, p: Position) -> Position {
        Position::new(p.x * self.ratio, p.y * self.ratio)
    }

    /// Preview position to canonical.
    pub fn to_canonical(self, p: Position) -> Position {
        Position::new(p.x / self.ratio, p.y / self.ratio)
    }

    /// Canonical size to preview.
    pub fn size_to_preview(self, s: Size) -> Size {
        Size::new(s.width * self.ratio, s.height * self.ratio)
    }

    /// Preview size to canonical.
    pub fn size_to_canonical(self, s: Size) -> Size {
        Size::new(s.width / self.ratio, s.height / self.ratio)
    }
}

/// Resample `buf` to exactly `width x height` with Lanczos3.
pub fn scale_buffer(buf: &PixelBuffer, width: u32, height: u32) -> ThumbResult<PixelBuffer> {
    if buf.width() == width && buf.height() == height {
        return Ok(buf.clone());
    }
    if width == 0 || height == 0 {
        return Err(ThumbError::internal(format!(
            "cannot scale to empty extent {width}x{height}"
        )));
    }
    let img = buf.to_premul_image()?;
    let scaled = image::imageops::resize(&img, width, height, FilterType::Lanczos3);
    let mut out = PixelBuffer::from_premul_image(scaled)?;
    clamp_premul_in_place(out.data_mut());
    Ok(out)
}

/// Downscale a canonical render to `resolution`.
pub fn to_resolution(buf: &PixelBuffer, resolution: Resolution) -> ThumbResult<PixelBuffer> {
    let canvas = resolution.canvas();
    scale_buffer(buf, canvas.width, canvas.height)
}

#[cfg(test)]
#[path = "../../tests/unit/render/scale.rs"]
mod tests;
