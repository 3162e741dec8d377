use crate::{
    assets::{
        color::Color,
        fonts::{FontLibrary, ResolvedFace},
        text_shaper::{ShapedLine, TextShaper},
    },
    effects::{
        blur::blur_raster,
        composite::stack_rasters,
        morph::{alpha_mask, dilate_alpha, dilation_reach, tint_mask},
    },
    foundation::{
        core::{Affine, Size},
        error::{AssetLoadError, ThumbError, ThumbResult},
        geom::Raster,
    },
    render::vector::VectorSurface,
    scene::model::{TextAlign, TextLayer},
};

/// Text layout constants.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextPolicy {
    /// Size decrement per shrink iteration, in points.
    pub shrink_step_pt: f64,
    /// Smallest size allowed by shrinking, as a fraction of the authored size.
    pub shrink_floor_ratio: f64,
    /// Distance between baselines as a multiple of the size.
    pub line_spacing: f64,
}

impl Default for TextPolicy {
    fn default() -> Self {
        Self {
            shrink_step_pt: 2.0,
            shrink_floor_ratio: 0.6,
            line_spacing: 1.1,
        }
    }
}

/// Rendered text layer before rotation.
#[derive(Clone, Debug)]
pub struct TextRender {
    /// Shadow, stroke and fill, placed relative to the layer position.
    pub raster: Raster,
    /// Text box; rotation pivots on its center.
    pub content: Size,
    /// Size actually used after shrinking.
    pub size_px: f64,
    /// Lines after wrapping.
    pub lines: Vec<String>,
    /// Face that drew the text.
    pub face: ResolvedFace,
}

/// Largest size in `[floor, size]` (stepping down by `policy.shrink_step_pt`) at which every
/// word fits `max_width`. Returns the floor-clamped size when nothing fits.
pub fn fit_size(
    paragraphs: &[&str],
    max_width: f64,
    size: f64,
    policy: &TextPolicy,
    mut measure: impl FnMut(&str, f64) -> ThumbResult<f64>,
) -> ThumbResult<f64> {
    let floor = (size * policy.shrink_floor_ratio.clamp(0.0, 1.0)).max(1.0).min(size);
    let step = if policy.shrink_step_pt.is_finite() && policy.shrink_step_pt > 0.0 {
        policy.shrink_step_pt
    } else {
        return Ok(size);
    };

    let mut current = size;
    loop {
        let mut fits = true;
        for word in paragraphs.iter().flat_map(|p| p.split_whitespace()) {
            if measure(word, current)? > max_width {
                fits = false;
                break;
            }
        }
        if fits {
            return Ok(current);
        }
        let next = current - step;
        if next < floor - 1e-9 {
            return Ok(current);
        }
        current = next;
    }
}

/// Greedy word wrap of one paragraph. Words wider than `max_width` on their own are broken at
/// character boundaries.
pub fn wrap_paragraph(
    paragraph: &str,
    max_width: f64,
    mut measure: impl FnMut(&str) -> ThumbResult<f64>,
) -> ThumbResult<Vec<String>> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in paragraph.split_whitespace() {
        let attempt = if current.is_empty() {
            word.to_owned()
        } else {
            format!("{current} {word}")
        };
        if measure(&attempt)? <= max_width {
            current = attempt;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if measure(word)? <= max_width {
            current = word.to_owned();
            continue;
        }
        for ch in word.chars() {
            let mut attempt = current.clone();
            attempt.push(ch);
            if current.is_empty() || measure(&attempt)? <= max_width {
                current = attempt;
            } else {
                lines.push(std::mem::replace(&mut current, ch.to_string()));
            }
        }
    }
    lines.push(current);
    Ok(lines)
}

fn paragraphs(text: &str) -> Vec<&str> {
    text.split('\n').map(|p| p.trim_end_matches('\r')).collect()
}

/// Wrap and size `layer`'s text without drawing it.
pub fn layout_lines(
    layer: &TextLayer,
    face: &ResolvedFace,
    shaper: &mut TextShaper,
    policy: &TextPolicy,
) -> ThumbResult<(f64, Vec<String>)> {
    let tracking = layer.tracking_px as f32;
    let paras = paragraphs(&layer.text);
    let Some(max_width) = layer.max_width_px else {
        return Ok((
            layer.font_size_pt,
            paras.iter().map(|p| (*p).to_owned()).collect(),
        ));
    };

    let size = fit_size(&paras, max_width, layer.font_size_pt, policy, |word, size| {
        Ok(f64::from(shaper.measure(word, face, size as f32, tracking)?))
    })?;
    let mut lines = Vec::new();
    for p in paras {
        if p.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        lines.extend(wrap_paragraph(p, max_width, |s| {
            Ok(f64::from(shaper.measure(s, face, size as f32, tracking)?))
        })?);
    }
    Ok((size, lines))
}

/// Resolve the face for `layer`, or the asset error recorded when no face exists at all.
pub fn resolve_face(layer: &TextLayer, fonts: &FontLibrary) -> Result<ResolvedFace, AssetLoadError> {
    fonts.resolve(&layer.font_family).ok_or_else(|| {
        AssetLoadError::new(
            &layer.font_family,
            "no font face available for this family or any fallback",
        )
    })
}

/// Draw `layer` unrotated: shadow, then stroke, then fill.
#[tracing::instrument(skip_all, fields(family = %layer.font_family, size = layer.font_size_pt))]
pub fn render_text(
    layer: &TextLayer,
    face: ResolvedFace,
    shaper: &mut TextShaper,
    policy: &TextPolicy,
) -> ThumbResult<TextRender> {
    let (size, lines) = layout_lines(layer, &face, shaper, policy)?;
    let size_f = size as f32;
    let tracking = layer.tracking_px as f32;

    let mut shaped = Vec::<ShapedLine>::with_capacity(lines.len());
    for line in &lines {
        shaped.push(shaper.shape_line(line, &face, size_f, tracking)?);
    }
    let ascent = shaped.iter().map(|l| l.ascent).fold(0.0f32, f32::max);
    let descent = shaped.iter().map(|l| l.descent).fold(0.0f32, f32::max);
    let (ascent, descent) = if ascent + descent > 0.0 {
        (f64::from(ascent), f64::from(descent))
    } else {
        (size * 0.8, size * 0.2)
    };
    let line_advance = size * policy.line_spacing;
    let widest = shaped.iter().map(|l| f64::from(l.width)).fold(0.0, f64::max);
    let box_w = layer.max_width_px.unwrap_or(widest).max(1.0).ceil();
    let box_h = (line_advance * (shaped.len().saturating_sub(1)) as f64 + ascent + descent)
        .max(1.0)
        .ceil();

    // Room for glyph overhang and the stroke rim around the text box.
    let margin = i64::from(dilation_reach(layer.stroke_width_px)) + (size * 0.25).ceil() as i64 + 1;
    let surf_w = box_w as i64 + 2 * margin;
    let surf_h = box_h as i64 + 2 * margin;
    let (sw, sh) = (to_dim(surf_w)?, to_dim(surf_h)?);

    let font = shaper.cpu_font(&face);
    let mut surface = VectorSurface::new(sw, sh)?;
    for (i, line) in shaped.iter().enumerate() {
        let lw = f64::from(line.width);
        let x = match layer.align {
            TextAlign::Left => 0.0,
            TextAlign::Center => (box_w - lw) / 2.0,
            TextAlign::Right => box_w - lw,
        };
        let top = i as f64 * line_advance + (ascent - f64::from(line.baseline));
        let at = Affine::translate((margin as f64 + x, margin as f64 + top));
        surface.fill_glyphs(&font, size_f, &line.glyphs, at, Color::WHITE);
    }
    let coverage = alpha_mask(&surface.finish()?);

    let silhouette = if layer.stroke_width_px > 0.0 {
        Some(dilate_alpha(&coverage, sw, sh, layer.stroke_width_px))
    } else {
        None
    };
    let body = Raster {
        buffer: tint_mask(&coverage, sw, sh, layer.color, 1.0)?,
        offset: (-margin, -margin),
    };
    let stroke = match &silhouette {
        Some(mask) => Some(Raster {
            buffer: tint_mask(mask, sw, sh, layer.stroke_color, 1.0)?,
            offset: (-margin, -margin),
        }),
        None => None,
    };
    let shadow = match &layer.shadow {
        Some(s) if s.color.a > 0 => {
            let mask = silhouette.as_deref().unwrap_or(&coverage);
            let tinted = Raster {
                buffer: tint_mask(mask, sw, sh, s.color, 1.0)?,
                offset: (
                    -margin + s.offset_x.round() as i64,
                    -margin + s.offset_y.round() as i64,
                ),
            };
            Some(blur_raster(&tinted, s.blur_radius)?)
        }
        _ => None,
    };

    let parts: Vec<&Raster> = shadow.iter().chain(stroke.iter()).chain([&body]).collect();
    let raster = stack_rasters(&parts)?;

    Ok(TextRender {
        raster,
        content: Size::new(box_w, box_h),
        size_px: size,
        lines,
        face,
    })
}

fn to_dim(v: i64) -> ThumbResult<u32> {
    u32::try_from(v.max(1)).map_err(|_| ThumbError::internal(format!("text surface extent {v}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
