use image::imageops::FilterType;

use crate::{
    assets::{cache::ImageCache, color::Color},
    effects::{adjust::ColorAdjust, blur::blur_buffer, composite::over},
    foundation::{
        buffer::PixelBuffer,
        core::Canvas,
        error::ThumbResult,
        math::clamp_premul_in_place,
    },
    render::placeholder::{BASE_COLOR, hatched},
    scene::model::{BackgroundSpec, GradientDirection, GradientStop, validate_stops},
};

/// Produce the fully opaque base buffer for `spec`.
///
/// Image sources that cannot be read return [`crate::ThumbError::AssetLoad`]; callers substitute
/// [`missing_background`]. Translucent colors are flattened over [`BASE_COLOR`].
#[tracing::instrument(skip(spec, images), fields(kind = background_kind(spec)))]
pub fn render_background(
    spec: &BackgroundSpec,
    canvas: Canvas,
    images: &ImageCache,
) -> ThumbResult<PixelBuffer> {
    spec.validate()?;
    let base = BASE_COLOR.to_premul();
    match spec {
        BackgroundSpec::Solid { color } => {
            PixelBuffer::filled(canvas.width, canvas.height, over(base, color.to_premul(), 1.0))
        }
        BackgroundSpec::Gradient { stops, direction } => {
            render_gradient(stops, *direction, canvas)
        }
        BackgroundSpec::Image {
            source_path,
            blur_radius,
            brightness,
            contrast,
            saturation,
        } => {
            let decoded = images.get_or_load(source_path)?;
            let mut buf = aspect_fill(&decoded.to_buffer()?, canvas)?;
            buf = blur_buffer(&buf, *blur_radius)?;
            ColorAdjust {
                brightness: *brightness,
                contrast: *contrast,
                saturation: *saturation,
            }
            .apply(&mut buf)?;
            flatten(&mut buf, base);
            Ok(buf)
        }
    }
}

fn background_kind(spec: &BackgroundSpec) -> &'static str {
    match spec {
        BackgroundSpec::Solid { .. } => "solid",
        BackgroundSpec::Gradient { .. } => "gradient",
        BackgroundSpec::Image { .. } => "image",
    }
}

/// Base fill with hatching, used when a background image is unavailable.
pub fn missing_background(canvas: Canvas) -> ThumbResult<PixelBuffer> {
    hatched(canvas.width, canvas.height, BASE_COLOR.to_premul())
}

fn flatten(buf: &mut PixelBuffer, base: [u8; 4]) {
    for px in buf.data_mut().chunks_exact_mut(4) {
        let out = over(base, [px[0], px[1], px[2], px[3]], 1.0);
        px.copy_from_slice(&out);
    }
}

/// Scale `src` to cover `canvas` preserving aspect ratio, cropping the overflow evenly.
pub fn aspect_fill(src: &PixelBuffer, canvas: Canvas) -> ThumbResult<PixelBuffer> {
    if src.width() == canvas.width && src.height() == canvas.height {
        return Ok(src.clone());
    }
    let img = image::DynamicImage::ImageRgba8(src.to_premul_image()?);
    let filled = img
        .resize_to_fill(canvas.width, canvas.height, FilterType::Lanczos3)
        .to_rgba8();
    let mut out = PixelBuffer::from_premul_image(filled)?;
    clamp_premul_in_place(out.data_mut());
    Ok(out)
}

/// Position along the gradient axis for pixel `(x, y)`, in `[0, 1]`.
pub fn gradient_t(direction: GradientDirection, x: u32, y: u32, canvas: Canvas) -> f64 {
    let wm = f64::from(canvas.width.saturating_sub(1));
    let hm = f64::from(canvas.height.saturating_sub(1));
    let (x, y) = (f64::from(x), f64::from(y));
    let t = match direction {
        GradientDirection::Horizontal => {
            if wm == 0.0 {
                0.0
            } else {
                x / wm
            }
        }
        GradientDirection::Vertical => {
            if hm == 0.0 {
                0.0
            } else {
                y / hm
            }
        }
        GradientDirection::DiagonalTlBr | GradientDirection::DiagonalTrBl => {
            let denom = wm * wm + hm * hm;
            if denom == 0.0 {
                0.0
            } else if direction == GradientDirection::DiagonalTlBr {
                (x * wm + y * hm) / denom
            } else {
                ((wm - x) * wm + y * hm) / denom
            }
        }
    };
    t.clamp(0.0, 1.0)
}

/// Straight-alpha color at `t` along sorted `stops`, clamped outside the first and last stop.
pub fn sample_stops(stops: &[GradientStop], t: f64) -> Color {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Color::TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    if t >= last.offset {
        return last.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if t == b.offset {
            return b.color;
        }
        if t < b.offset {
            let f = (t - a.offset) / (b.offset - a.offset);
            let lerp = |c0: u8, c1: u8| -> u8 {
                (f64::from(c0) + (f64::from(c1) - f64::from(c0)) * f)
                    .round()
                    .clamp(0.0, 255.0) as u8
            };
            return Color::rgba(
                lerp(a.color.r, b.color.r),
                lerp(a.color.g, b.color.g),
                lerp(a.color.b, b.color.b),
                lerp(a.color.a, b.color.a),
            );
        }
    }
    last.color
}

fn render_gradient(
    stops: &[GradientStop],
    direction: GradientDirection,
    canvas: Canvas,
) -> ThumbResult<PixelBuffer> {
    validate_stops(stops)?;
    let base = BASE_COLOR.to_premul();
    let shade = |x: u32, y: u32| -> [u8; 4] {
        let c = sample_stops(stops, gradient_t(direction, x, y, canvas));
        over(base, c.to_premul(), 1.0)
    };

    let mut buf = PixelBuffer::transparent(canvas.width, canvas.height)?;
    let row = (canvas.width as usize) * 4;
    let data = buf.data_mut();
    match direction {
        GradientDirection::Horizontal => {
            let line: Vec<u8> = (0..canvas.width).flat_map(|x| shade(x, 0)).collect();
            for dst in data.chunks_exact_mut(row) {
                dst.copy_from_slice(&line);
            }
        }
        GradientDirection::Vertical => {
            for (y, dst) in data.chunks_exact_mut(row).enumerate() {
                let px = shade(0, y as u32);
                for d in dst.chunks_exact_mut(4) {
                    d.copy_from_slice(&px);
                }
            }
        }
        GradientDirection::DiagonalTlBr | GradientDirection::DiagonalTrBl => {
            for (y, dst) in data.chunks_exact_mut(row).enumerate() {
                for (x, d) in dst.chunks_exact_mut(4).enumerate() {
                    d.copy_from_slice(&shade(x as u32, y as u32));
                }
            }
        }
    }
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
