use crate::{
    assets::color::Color,
    effects::composite::over,
    foundation::{buffer::PixelBuffer, error::ThumbResult},
};

const STRIPE_PERIOD: u32 = 24;
const STRIPE_WIDTH: u32 = 8;

/// Neutral base drawn under every background and used when a background asset is missing.
pub const BASE_COLOR: Color = Color::rgb(0x11, 0x11, 0x11);

const HATCH_COLOR: Color = Color::rgba(0xff, 0x00, 0xff, 0x99);

/// Diagonal hatching marking a layer whose source asset could not be loaded.
///
/// Drawn over `base` (premultiplied); stripes run from bottom-left to top-right.
pub fn hatched(width: u32, height: u32, base: [u8; 4]) -> ThumbResult<PixelBuffer> {
    let mut buf = PixelBuffer::filled(width, height, base)?;
    let stripe = HATCH_COLOR.to_premul();
    let row = (width as usize) * 4;
    let data = buf.data_mut();
    for y in 0..height {
        for x in 0..width {
            if (x + y) % STRIPE_PERIOD >= STRIPE_WIDTH {
                continue;
            }
            let i = (y as usize) * row + (x as usize) * 4;
            let dst = [data[i], data[i + 1], data[i + 2], data[i + 3]];
            data[i..i + 4].copy_from_slice(&over(dst, stripe, 1.0));
        }
    }
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/render/placeholder.rs"]
mod tests;
