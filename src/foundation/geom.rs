use crate::foundation::{
    buffer::PixelBuffer,
    core::{Affine, Point, Rect},
    error::{ThumbError, ThumbResult},
};

const BOUNDS_EPS: f64 = 1e-6;

/// A layer render: pixels plus the placement of their top-left corner relative to the layer's
/// `position`. Padding for stroke, shadow and blur makes the offset negative.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    /// Premultiplied pixels.
    pub buffer: PixelBuffer,
    /// Top-left of `buffer` relative to the layer position, in canonical pixels.
    pub offset: (i64, i64),
}

impl Raster {
    /// Raster placed at the layer position with no padding.
    pub fn at_origin(buffer: PixelBuffer) -> Self {
        Self {
            buffer,
            offset: (0, 0),
        }
    }

    /// Bounds of the raster in layer-local coordinates.
    pub fn bounds(&self) -> Rect {
        let (x, y) = self.offset;
        Rect::new(
            x as f64,
            y as f64,
            x as f64 + f64::from(self.buffer.width()),
            y as f64 + f64::from(self.buffer.height()),
        )
    }
}

/// Affine for a rotation of `degrees` about `pivot`; positive turns counter-clockwise on screen.
pub fn rotation_about(degrees: f64, pivot: Point) -> Affine {
    Affine::rotate_about(-degrees.to_radians(), pivot)
}

/// Width/height of the axis-aligned box enclosing a `w x h` rectangle rotated by `degrees`.
pub fn rotated_bounds(w: f64, h: f64, degrees: f64) -> (f64, f64) {
    let bbox = rotation_about(degrees, Point::new(w / 2.0, h / 2.0))
        .transform_rect_bbox(Rect::new(0.0, 0.0, w, h));
    (bbox.width(), bbox.height())
}

fn is_identity_rotation(degrees: f64) -> bool {
    degrees.rem_euclid(360.0).abs() < 1e-9
}

/// Rotate `raster` about `pivot` (layer-local coordinates), expanding the buffer to the rotated
/// bounding box so no corner is clipped.
pub fn rotate_raster(raster: &Raster, degrees: f64, pivot: Point) -> ThumbResult<Raster> {
    if !degrees.is_finite() {
        return Err(ThumbError::invalid_spec("rotation must be finite"));
    }
    if is_identity_rotation(degrees) {
        return Ok(raster.clone());
    }

    let fwd = rotation_about(degrees, pivot);
    let bbox = fwd.transform_rect_bbox(raster.bounds());
    let x0 = (bbox.x0 + BOUNDS_EPS).floor();
    let y0 = (bbox.y0 + BOUNDS_EPS).floor();
    let x1 = (bbox.x1 - BOUNDS_EPS).ceil();
    let y1 = (bbox.y1 - BOUNDS_EPS).ceil();
    let w = (x1 - x0).max(1.0);
    let h = (y1 - y0).max(1.0);
    if w > f64::from(u16::MAX) || h > f64::from(u16::MAX) {
        return Err(ThumbError::internal(format!(
            "rotated bounds too large: {w}x{h}"
        )));
    }

    let (dst_w, dst_h) = (w as u32, h as u32);
    let mut out = PixelBuffer::transparent(dst_w, dst_h)?;
    let inv = fwd.inverse();
    let (ox, oy) = (raster.offset.0 as f64, raster.offset.1 as f64);
    let row_bytes = (dst_w as usize) * 4;
    let data = out.data_mut();
    for y in 0..dst_h {
        for x in 0..dst_w {
            let world = Point::new(x0 + f64::from(x) + 0.5, y0 + f64::from(y) + 0.5);
            let src = inv * world;
            let px = sample_bilinear(&raster.buffer, src.x - ox - 0.5, src.y - oy - 0.5);
            let idx = (y as usize) * row_bytes + (x as usize) * 4;
            data[idx..idx + 4].copy_from_slice(&px);
        }
    }

    Ok(Raster {
        buffer: out,
        offset: (x0 as i64, y0 as i64),
    })
}

/// Bilinear sample of premultiplied pixels at continuous pixel-center coordinates.
pub fn sample_bilinear(src: &PixelBuffer, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (f64::from(src.width()), f64::from(src.height()));
    if x <= -1.0 || y <= -1.0 || x >= w || y >= h {
        return [0, 0, 0, 0];
    }
    let fx = x.floor();
    let fy = y.floor();
    let tx = x - fx;
    let ty = y - fy;
    let (ix, iy) = (fx as i64, fy as i64);

    let p00 = pixel_or_clear(src, ix, iy);
    let p10 = pixel_or_clear(src, ix + 1, iy);
    let p01 = pixel_or_clear(src, ix, iy + 1);
    let p11 = pixel_or_clear(src, ix + 1, iy + 1);

    let w00 = (1.0 - tx) * (1.0 - ty);
    let w10 = tx * (1.0 - ty);
    let w01 = (1.0 - tx) * ty;
    let w11 = tx * ty;

    let mut out = [0u8; 4];
    for c in 0..4 {
        let v = f64::from(p00[c]) * w00
            + f64::from(p10[c]) * w10
            + f64::from(p01[c]) * w01
            + f64::from(p11[c]) * w11;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

fn pixel_or_clear(src: &PixelBuffer, x: i64, y: i64) -> [u8; 4] {
    if x < 0 || y < 0 {
        return [0, 0, 0, 0];
    }
    src.pixel(x as u32, y as u32).unwrap_or([0, 0, 0, 0])
}

/// Mirror a buffer left-to-right.
pub fn flip_horizontal(buf: &PixelBuffer) -> ThumbResult<PixelBuffer> {
    let (w, h) = (buf.width() as usize, buf.height() as usize);
    let src = buf.data();
    let mut out = vec![0u8; src.len()];
    for y in 0..h {
        for x in 0..w {
            let si = (y * w + x) * 4;
            let di = (y * w + (w - 1 - x)) * 4;
            out[di..di + 4].copy_from_slice(&src[si..si + 4]);
        }
    }
    PixelBuffer::from_premul(buf.width(), buf.height(), out)
}

/// Mirror a buffer top-to-bottom.
pub fn flip_vertical(buf: &PixelBuffer) -> ThumbResult<PixelBuffer> {
    let row = (buf.width() as usize) * 4;
    let mut out = Vec::with_capacity(buf.data().len());
    for line in buf.data().chunks_exact(row).rev() {
        out.extend_from_slice(line);
    }
    PixelBuffer::from_premul(buf.width(), buf.height(), out)
}

/// Smallest integer rectangle containing both inputs.
pub(crate) fn union_bounds(a: (i64, i64, i64, i64), b: (i64, i64, i64, i64)) -> (i64, i64, i64, i64) {
    (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geom.rs"]
mod tests;
