use crate::{
    assets::{color::Color, text_shaper::PlacedGlyph},
    foundation::{
        buffer::{MAX_BUFFER_PIXELS, PixelBuffer},
        core::Affine,
        error::{ThumbError, ThumbResult},
    },
};

/// Transparent `vello_cpu` drawing surface that reads back as a [`PixelBuffer`].
pub(crate) struct VectorSurface {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
}

impl VectorSurface {
    pub(crate) fn new(width: u32, height: u32) -> ThumbResult<Self> {
        if width == 0 || height == 0 {
            return Err(ThumbError::internal(format!(
                "vector surface must be non-empty, got {width}x{height}"
            )));
        }
        if u64::from(width) * u64::from(height) > MAX_BUFFER_PIXELS {
            return Err(ThumbError::internal(format!(
                "vector surface {width}x{height} is too large"
            )));
        }
        let width: u16 = width
            .try_into()
            .map_err(|_| ThumbError::internal("surface width exceeds u16"))?;
        let height: u16 = height
            .try_into()
            .map_err(|_| ThumbError::internal("surface height exceeds u16"))?;
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(width, height),
            width,
            height,
        })
    }

    fn set_color(&mut self, color: Color) {
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
    }

    /// Fill `path` (surface pixel coordinates) with `color`.
    pub(crate) fn fill_path(&mut self, path: &kurbo::BezPath, color: Color) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.set_color(color);
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Fill a glyph run placed by `transform` with `color`.
    pub(crate) fn fill_glyphs(
        &mut self,
        font: &vello_cpu::peniko::FontData,
        size_px: f32,
        glyphs: &[PlacedGlyph],
        transform: Affine,
        color: Color,
    ) {
        if glyphs.is_empty() {
            return;
        }
        self.ctx.set_transform(affine_to_cpu(transform));
        self.set_color(color);
        self.ctx
            .glyph_run(font)
            .font_size(size_px)
            .fill_glyphs(glyphs.iter().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            }));
    }

    /// Rasterize everything drawn so far.
    pub(crate) fn finish(mut self) -> ThumbResult<PixelBuffer> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        PixelBuffer::from_premul(
            u32::from(self.width),
            u32::from(self.height),
            pixmap.data_as_u8_slice().to_vec(),
        )
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/vector.rs"]
mod tests;
