use crate::foundation::{
    core::Canvas,
    error::{ThumbError, ThumbResult},
    math::demultiply_px,
};

/// A raster of premultiplied RGBA8 pixels, tightly packed, row-major.
///
/// Every renderer in the engine produces and consumes this type. Buffers are plain values:
/// renders return fresh buffers and never share pixel storage with a previous call.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("digest", &format_args!("{:016x}", self.digest()))
            .finish()
    }
}

/// Upper bound on the pixel count of any intermediate buffer (512 MiB of RGBA8).
pub const MAX_BUFFER_PIXELS: u64 = 1 << 27;

fn byte_len(width: u32, height: u32) -> ThumbResult<usize> {
    if width == 0 || height == 0 {
        return Err(ThumbError::internal(format!(
            "degenerate pixel buffer {width}x{height}"
        )));
    }
    if u64::from(width) * u64::from(height) > MAX_BUFFER_PIXELS {
        return Err(ThumbError::internal(format!(
            "pixel buffer {width}x{height} exceeds {MAX_BUFFER_PIXELS} pixels"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| ThumbError::internal("pixel buffer size overflow"))
}

impl PixelBuffer {
    /// Fully transparent buffer.
    pub fn transparent(width: u32, height: u32) -> ThumbResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Buffer where every pixel is the premultiplied `px`.
    pub fn filled(width: u32, height: u32, px: [u8; 4]) -> ThumbResult<Self> {
        byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: px.repeat((width as usize) * (height as usize)),
        })
    }

    /// Wrap existing premultiplied bytes.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> ThumbResult<Self> {
        let len = byte_len(width, height)?;
        if data.len() != len {
            return Err(ThumbError::internal(format!(
                "pixel buffer expects {len} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Premultiplied bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable premultiplied bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume into premultiplied bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Premultiplied pixel at `(x, y)`, `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    /// Straight-alpha pixel at `(x, y)`.
    pub fn pixel_straight(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixel(x, y).map(demultiply_px)
    }

    /// Straight-alpha copy of the pixel data, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&demultiply_px([px[0], px[1], px[2], px[3]]));
        }
        out
    }

    /// Copy out the `width x height` region at `(x, y)`; pixels outside the source are transparent.
    pub fn crop(&self, x: i64, y: i64, width: u32, height: u32) -> ThumbResult<Self> {
        let mut out = Self::transparent(width, height)?;
        let row_bytes = (width as usize) * 4;
        for dy in 0..height as i64 {
            let sy = y + dy;
            if sy < 0 || sy >= i64::from(self.height) {
                continue;
            }
            for dx in 0..width as i64 {
                let sx = x + dx;
                if sx < 0 || sx >= i64::from(self.width) {
                    continue;
                }
                let si = ((sy as usize) * (self.width as usize) + (sx as usize)) * 4;
                let di = (dy as usize) * row_bytes + (dx as usize) * 4;
                out.data[di..di + 4].copy_from_slice(&self.data[si..si + 4]);
            }
        }
        Ok(out)
    }

    /// Stable 64-bit digest of dimensions and pixels.
    pub fn digest(&self) -> u64 {
        let mut hasher = xxhash_rust::xxh3::Xxh3::new();
        hasher.update(&self.width.to_le_bytes());
        hasher.update(&self.height.to_le_bytes());
        hasher.update(&self.data);
        hasher.digest()
    }

    /// View the premultiplied bytes as an `image` buffer (no conversion).
    pub(crate) fn to_premul_image(&self) -> ThumbResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| ThumbError::internal("pixel buffer does not match image layout"))
    }

    /// Take ownership of premultiplied bytes from an `image` buffer.
    pub(crate) fn from_premul_image(img: image::RgbaImage) -> ThumbResult<Self> {
        let (w, h) = img.dimensions();
        Self::from_premul(w, h, img.into_raw())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/buffer.rs"]
mod tests;
