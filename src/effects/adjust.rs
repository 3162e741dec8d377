use crate::foundation::{
    buffer::PixelBuffer,
    error::{ThumbError, ThumbResult},
    math::{demultiply_px, premultiply_px},
};

/// Multiplicative color correction applied in the fixed order brightness, contrast, saturation.
///
/// `1.0` is neutral for every factor. Adjustments run on straight-alpha values, so translucent
/// pixels keep their alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorAdjust {
    /// Blend toward black (`0.0`) or beyond the source (`> 1.0`).
    pub brightness: f64,
    /// Blend toward the mean luminance of the image.
    pub contrast: f64,
    /// Blend toward per-pixel luminance.
    pub saturation: f64,
}

impl Default for ColorAdjust {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
        }
    }
}

impl ColorAdjust {
    /// Reject non-finite or negative factors.
    pub fn validate(&self) -> ThumbResult<()> {
        for (name, v) in [
            ("brightness", self.brightness),
            ("contrast", self.contrast),
            ("saturation", self.saturation),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ThumbError::invalid_spec(format!(
                    "{name} must be finite and >= 0, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Whether every factor is neutral.
    pub fn is_identity(&self) -> bool {
        self.brightness == 1.0 && self.contrast == 1.0 && self.saturation == 1.0
    }

    /// Apply the pipeline to `buf` in place.
    pub fn apply(&self, buf: &mut PixelBuffer) -> ThumbResult<()> {
        self.validate()?;
        if self.brightness != 1.0 {
            brightness(buf, self.brightness);
        }
        if self.contrast != 1.0 {
            contrast(buf, self.contrast);
        }
        if self.saturation != 1.0 {
            saturation(buf, self.saturation);
        }
        Ok(())
    }
}

fn luma(r: f64, g: f64, b: f64) -> f64 {
    (r * 299.0 + g * 587.0 + b * 114.0) / 1000.0
}

fn blend_channel(base: f64, value: f64, factor: f64) -> u8 {
    (base + (value - base) * factor).round().clamp(0.0, 255.0) as u8
}

fn map_straight(buf: &mut PixelBuffer, mut f: impl FnMut([u8; 4]) -> [u8; 4]) {
    for px in buf.data_mut().chunks_exact_mut(4) {
        if px[3] == 0 {
            continue;
        }
        let straight = demultiply_px([px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&premultiply_px(f(straight)));
    }
}

/// Scale color toward black by `factor`.
pub fn brightness(buf: &mut PixelBuffer, factor: f64) {
    map_straight(buf, |[r, g, b, a]| {
        [
            blend_channel(0.0, f64::from(r), factor),
            blend_channel(0.0, f64::from(g), factor),
            blend_channel(0.0, f64::from(b), factor),
            a,
        ]
    });
}

/// Mean luminance of all non-transparent pixels, rounded to an integer level.
pub fn mean_luminance(buf: &PixelBuffer) -> f64 {
    let mut sum = 0.0f64;
    let mut n = 0u64;
    for px in buf.data().chunks_exact(4) {
        if px[3] == 0 {
            continue;
        }
        let [r, g, b, _] = demultiply_px([px[0], px[1], px[2], px[3]]);
        sum += luma(f64::from(r), f64::from(g), f64::from(b)).floor();
        n += 1;
    }
    if n == 0 {
        return 0.0;
    }
    (sum / n as f64).round()
}

/// Push color away from (or toward) the image's mean luminance by `factor`.
pub fn contrast(buf: &mut PixelBuffer, factor: f64) {
    let mean = mean_luminance(buf);
    map_straight(buf, |[r, g, b, a]| {
        [
            blend_channel(mean, f64::from(r), factor),
            blend_channel(mean, f64::from(g), factor),
            blend_channel(mean, f64::from(b), factor),
            a,
        ]
    });
}

/// Push color away from (or toward) each pixel's own gray level by `factor`.
pub fn saturation(buf: &mut PixelBuffer, factor: f64) {
    map_straight(buf, |[r, g, b, a]| {
        let (rf, gf, bf) = (f64::from(r), f64::from(g), f64::from(b));
        let l = luma(rf, gf, bf).floor();
        [
            blend_channel(l, rf, factor),
            blend_channel(l, gf, factor),
            blend_channel(l, bf, factor),
            a,
        ]
    });
}

#[cfg(test)]
#[path = "../../tests/unit/effects/adjust.rs"]
mod tests;
