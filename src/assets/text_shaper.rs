use std::{borrow::Cow, collections::HashMap};

use crate::{
    assets::fonts::ResolvedFace,
    foundation::error::{ThumbError, ThumbResult},
};

/// A glyph positioned inside a shaped line, in pixels from the line's top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGlyph {
    /// Glyph id in the face.
    pub id: u32,
    /// Pen x.
    pub x: f32,
    /// Baseline y.
    pub y: f32,
}

/// One line of shaped text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapedLine {
    /// Glyphs in visual order.
    pub glyphs: Vec<PlacedGlyph>,
    /// Advance width including tracking.
    pub width: f32,
    /// Distance from the line top to the baseline.
    pub baseline: f32,
    /// Ascent of the face at this size.
    pub ascent: f32,
    /// Descent of the face at this size (positive).
    pub descent: f32,
}

/// Stateful helper that shapes single lines with Parley from raw font bytes.
///
/// Holds Parley contexts and the families registered so far, so it is `!Sync`; renderers keep one
/// per worker thread.
pub struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    families: HashMap<u64, String>,
    cpu_fonts: HashMap<u64, vello_cpu::peniko::FontData>,
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TextShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextShaper")
            .field("registered_families", &self.families.len())
            .finish()
    }
}

impl TextShaper {
    /// Fresh Parley contexts with nothing registered.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
            cpu_fonts: HashMap::new(),
        }
    }

    fn family_for(&mut self, face: &ResolvedFace) -> ThumbResult<String> {
        let key = face.key;
        if let Some(name) = self.families.get(&key) {
            return Ok(name.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(face.bytes.as_ref().clone()), None);
        let ids: Vec<_> = families.iter().map(|(id, _)| *id).collect();
        let mut names = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(name) = self.font_ctx.collection.family_name(id) {
                names.push(name.to_owned());
            }
        }
        let name = names
            .iter()
            .find(|n| n.eq_ignore_ascii_case(&face.resolved))
            .or_else(|| names.first())
            .cloned()
            .ok_or_else(|| ThumbError::internal("font bytes registered no family"))?;

        self.families.insert(key, name.clone());
        Ok(name)
    }

    /// Font handle for glyph rasterization with `vello_cpu`.
    pub fn cpu_font(&mut self, face: &ResolvedFace) -> vello_cpu::peniko::FontData {
        self.cpu_fonts
            .entry(face.key)
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone()),
                    face.index,
                )
            })
            .clone()
    }

    /// Shape `text` as a single unbroken line.
    pub fn shape_line(
        &mut self,
        text: &str,
        face: &ResolvedFace,
        size_px: f32,
        tracking_px: f32,
    ) -> ThumbResult<ShapedLine> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ThumbError::invalid_spec("font size must be finite and > 0"));
        }
        if !tracking_px.is_finite() {
            return Err(ThumbError::invalid_spec("tracking must be finite"));
        }

        let family_name = self.family_for(face)?;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        if tracking_px != 0.0 {
            builder.push_default(parley::style::StyleProperty::LetterSpacing(tracking_px));
        }

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut out = ShapedLine::default();
        let mut first = true;
        for line in layout.lines() {
            let m = line.metrics();
            if first {
                out.baseline = m.baseline;
                out.ascent = m.ascent;
                out.descent = m.descent;
                first = false;
            }
            out.width = out.width.max(m.advance);
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                out.glyphs
                    .extend(run.positioned_glyphs().map(|g| PlacedGlyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    }));
            }
        }
        if first {
            // Empty input still reports the face metrics so blank lines keep their height.
            out.ascent = size_px * 0.8;
            out.descent = size_px * 0.2;
            out.baseline = out.ascent;
        }
        Ok(out)
    }

    /// Advance width of `text` on one line.
    pub fn measure(
        &mut self,
        text: &str,
        face: &ResolvedFace,
        size_px: f32,
        tracking_px: f32,
    ) -> ThumbResult<f32> {
        Ok(self.shape_line(text, face, size_px, tracking_px)?.width)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text_shaper.rs"]
mod tests;
