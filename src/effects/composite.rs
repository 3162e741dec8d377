use crate::foundation::{
    buffer::PixelBuffer,
    error::{ThumbError, ThumbResult},
    geom::{Raster, union_bounds},
    math::{add_sat_u8, mul_div255_u8},
};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over with the source alpha scaled by `opacity`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Source-over of two equally sized byte buffers.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> ThumbResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ThumbError::internal(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite `src` onto `dst` with its top-left at `(x, y)` in `dst` pixels.
///
/// Parts of `src` outside `dst` are clipped.
pub fn composite_at(dst: &mut PixelBuffer, src: &PixelBuffer, x: i64, y: i64, opacity: f32) {
    if opacity <= 0.0 {
        return;
    }
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = x.saturating_add(sw).min(dw);
    let y1 = y.saturating_add(sh).min(dh);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let span = ((x1 - x0) as usize) * 4;
    let dst_row = (dw as usize) * 4;
    let src_row = (sw as usize) * 4;
    let src_data = src.data();
    let dst_data = dst.data_mut();
    for dy in y0..y1 {
        let sy = (dy - y) as usize;
        let di = (dy as usize) * dst_row + (x0 as usize) * 4;
        let si = sy * src_row + ((x0 - x) as usize) * 4;
        let d = &mut dst_data[di..di + span];
        let s = &src_data[si..si + span];
        for (dp, sp) in d.chunks_exact_mut(4).zip(s.chunks_exact(4)) {
            let out = over(
                [dp[0], dp[1], dp[2], dp[3]],
                [sp[0], sp[1], sp[2], sp[3]],
                opacity,
            );
            dp.copy_from_slice(&out);
        }
    }
}

/// Composite rasters bottom to top into one raster covering all of them.
pub fn stack_rasters(parts: &[&Raster]) -> ThumbResult<Raster> {
    let Some(first) = parts.first() else {
        return Err(ThumbError::internal("nothing to stack"));
    };
    let extent = |r: &Raster| {
        (
            r.offset.0,
            r.offset.1,
            r.offset.0.saturating_add(i64::from(r.buffer.width())),
            r.offset.1.saturating_add(i64::from(r.buffer.height())),
        )
    };
    let bounds = parts
        .iter()
        .skip(1)
        .fold(extent(first), |acc, r| union_bounds(acc, extent(r)));
    if parts.len() == 1 {
        return Ok((*first).clone());
    }
    let (w, h) = (
        raster_dim(bounds.2.checked_sub(bounds.0))?,
        raster_dim(bounds.3.checked_sub(bounds.1))?,
    );
    let mut out = PixelBuffer::transparent(w, h)?;
    for r in parts {
        composite_at(
            &mut out,
            &r.buffer,
            r.offset.0 - bounds.0,
            r.offset.1 - bounds.1,
            1.0,
        );
    }
    Ok(Raster {
        buffer: out,
        offset: (bounds.0, bounds.1),
    })
}

fn raster_dim(v: Option<i64>) -> ThumbResult<u32> {
    v.and_then(|v| u32::try_from(v.max(1)).ok())
        .ok_or_else(|| ThumbError::internal(format!("stacked raster extent {v:?} out of range")))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
