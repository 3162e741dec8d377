use crate::{
    assets::color::Color,
    foundation::{
        buffer::PixelBuffer,
        error::ThumbResult,
        math::{mul_div255_u8, unit_to_u8},
    },
};

/// Alpha channel of a premultiplied buffer.
pub fn alpha_mask(buf: &PixelBuffer) -> Vec<u8> {
    buf.data().chunks_exact(4).map(|px| px[3]).collect()
}

/// Pixels a disc of `radius` reaches past its center (the padding a dilation needs).
pub fn dilation_reach(radius: f64) -> u32 {
    if !radius.is_finite() || radius <= 0.0 {
        return 0;
    }
    radius.ceil() as u32 + 1
}

/// Grow an alpha mask outward by a disc of `radius` pixels with an anti-aliased rim.
///
/// The mask must already have at least [`dilation_reach`] pixels of clear border, or growth is
/// clipped at the edges.
pub fn dilate_alpha(alpha: &[u8], width: u32, height: u32, radius: f64) -> Vec<u8> {
    let reach = dilation_reach(radius) as i32;
    if reach == 0 {
        return alpha.to_vec();
    }

    let mut taps = Vec::<(i32, i32, u16)>::new();
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let d = f64::from(dx * dx + dy * dy).sqrt();
            let w = (radius + 1.0 - d).clamp(0.0, 1.0);
            if w > 0.0 {
                taps.push((dx, dy, u16::from(unit_to_u8(w as f32))));
            }
        }
    }

    let (w, h) = (width as i32, height as i32);
    let mut out = vec![0u8; alpha.len()];
    for y in 0..h {
        for x in 0..w {
            let mut best = alpha[(y * w + x) as usize];
            if best == 255 {
                out[(y * w + x) as usize] = 255;
                continue;
            }
            for &(dx, dy, tw) in &taps {
                let (sx, sy) = (x + dx, y + dy);
                if sx < 0 || sy < 0 || sx >= w || sy >= h {
                    continue;
                }
                let a = alpha[(sy * w + sx) as usize];
                if a <= best {
                    continue;
                }
                let v = mul_div255_u8(u16::from(a), tw);
                if v > best {
                    best = v;
                    if best == 255 {
                        break;
                    }
                }
            }
            out[(y * w + x) as usize] = best;
        }
    }
    out
}

/// Fill a mask with `color`, scaling its alpha by the mask coverage and `opacity`.
pub fn tint_mask(
    alpha: &[u8],
    width: u32,
    height: u32,
    color: Color,
    opacity: f32,
) -> ThumbResult<PixelBuffer> {
    let premul = color.with_alpha_factor(opacity).to_premul();
    let mut data = Vec::with_capacity(alpha.len() * 4);
    for &a in alpha {
        let a16 = u16::from(a);
        data.extend_from_slice(&[
            mul_div255_u8(u16::from(premul[0]), a16),
            mul_div255_u8(u16::from(premul[1]), a16),
            mul_div255_u8(u16::from(premul[2]), a16),
            mul_div255_u8(u16::from(premul[3]), a16),
        ]);
    }
    PixelBuffer::from_premul(width, height, data)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/morph.rs"]
mod tests;
