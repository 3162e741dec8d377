use rayon::prelude::*;

use crate::foundation::{
    buffer::PixelBuffer,
    error::{ThumbError, ThumbResult},
    geom::Raster,
};

/// Largest accepted Gaussian sigma, in canonical pixels.
pub const MAX_BLUR_SIGMA: f64 = 256.0;

fn check_sigma(sigma: f64) -> ThumbResult<()> {
    if sigma > MAX_BLUR_SIGMA {
        return Err(ThumbError::invalid_spec(format!(
            "blur sigma must be at most {MAX_BLUR_SIGMA}, got {sigma}"
        )));
    }
    Ok(())
}

/// Kernel radius used for a Gaussian of standard deviation `sigma` (`ceil(3σ)`, 0 for no blur).
pub fn kernel_radius(sigma: f64) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    (3.0 * sigma).ceil() as u32
}

/// Separable Gaussian blur of premultiplied RGBA8 with clamped edges.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> ThumbResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| ThumbError::internal("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(ThumbError::internal(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

/// Blur a whole buffer with standard deviation `sigma`; edges clamp to the border pixels.
pub fn blur_buffer(buf: &PixelBuffer, sigma: f64) -> ThumbResult<PixelBuffer> {
    check_sigma(sigma)?;
    let radius = kernel_radius(sigma);
    if radius == 0 {
        return Ok(buf.clone());
    }
    let out = blur_rgba8_premul(buf.data(), buf.width(), buf.height(), radius, sigma as f32)?;
    PixelBuffer::from_premul(buf.width(), buf.height(), out)
}

/// Grow a raster by `pad` transparent pixels on every side, keeping its placement.
pub fn pad_raster(raster: &Raster, pad: u32) -> ThumbResult<Raster> {
    if pad == 0 {
        return Ok(raster.clone());
    }
    let p = i64::from(pad);
    let grow = |v: u32| {
        pad.checked_mul(2)
            .and_then(|d| v.checked_add(d))
            .ok_or_else(|| ThumbError::internal(format!("padding {pad} overflows raster extent")))
    };
    let (w, h) = (grow(raster.buffer.width())?, grow(raster.buffer.height())?);
    let buffer = raster.buffer.crop(-p, -p, w, h)?;
    Ok(Raster {
        buffer,
        offset: (raster.offset.0 - p, raster.offset.1 - p),
    })
}

/// Blur a transparent-edged raster, padding it first so the soft edge is not cut off.
pub fn blur_raster(raster: &Raster, sigma: f64) -> ThumbResult<Raster> {
    check_sigma(sigma)?;
    let radius = kernel_radius(sigma);
    if radius == 0 {
        return Ok(raster.clone());
    }
    let padded = pad_raster(raster, radius)?;
    Ok(Raster {
        buffer: blur_buffer(&padded.buffer, sigma)?,
        offset: padded.offset,
    })
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ThumbResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ThumbError::invalid_spec("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(ThumbError::internal("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let row_bytes = (width as usize) * 4;
    dst.par_chunks_mut(row_bytes)
        .zip(src.par_chunks(row_bytes))
        .for_each(|(out_row, in_row)| {
            for x in 0..w {
                let mut acc = [0u64; 4];
                for (ki, &kw) in k.iter().enumerate() {
                    let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                    let idx = (sx as usize) * 4;
                    for c in 0..4 {
                        acc[c] += u64::from(kw) * u64::from(in_row[idx + c]);
                    }
                }
                let out_idx = (x as usize) * 4;
                for c in 0..4 {
                    out_row[out_idx + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as usize;
    let h = height as i32;
    dst.par_chunks_mut(w * 4)
        .enumerate()
        .for_each(|(y, out_row)| {
            let y = y as i32;
            for x in 0..w {
                let mut acc = [0u64; 4];
                for (ki, &kw) in k.iter().enumerate() {
                    let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                    let idx = ((sy as usize) * w + x) * 4;
                    for c in 0..4 {
                        acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                    }
                }
                for c in 0..4 {
                    out_row[x * 4 + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
