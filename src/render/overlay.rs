use kurbo::{BezPath, Ellipse, Rect, RoundedRect, Shape};

use crate::{
    effects::blur::blur_raster,
    foundation::{error::ThumbResult, geom::Raster},
    render::vector::VectorSurface,
    scene::model::{OverlayLayer, OverlayShape},
};

const PATH_TOLERANCE: f64 = 0.1;
const BANNER_BODY: f64 = 0.75;
const BANNER_TAIL: f64 = 0.35;

/// Outline of `overlay` inside the box `(0, 0, w, h)`.
pub fn overlay_path(overlay: &OverlayLayer, w: f64, h: f64) -> BezPath {
    let radius = overlay.corner_radius.clamp(0.0, w.min(h) / 2.0);
    match overlay.shape {
        OverlayShape::Rectangle => RoundedRect::new(0.0, 0.0, w, h, radius).to_path(PATH_TOLERANCE),
        OverlayShape::Circle => Ellipse::from_rect(Rect::new(0.0, 0.0, w, h)).to_path(PATH_TOLERANCE),
        OverlayShape::Banner if !overlay.banner_tails => {
            RoundedRect::new(0.0, 0.0, w, h, radius).to_path(PATH_TOLERANCE)
        }
        OverlayShape::Banner => {
            let body_h = h * BANNER_BODY;
            let radius = overlay.corner_radius.clamp(0.0, w.min(body_h) / 2.0);
            let mut path = RoundedRect::new(0.0, 0.0, w, body_h, radius).to_path(PATH_TOLERANCE);
            let top = h - h * BANNER_TAIL;
            for (edge, inner, mid) in [(0.0, w / 2.0, w / 4.0), (w, w / 2.0, w - w / 4.0)] {
                path.move_to((edge, top));
                path.line_to((mid, h));
                path.line_to((inner, top));
                path.close_path();
            }
            path
        }
    }
}

/// Draw `overlay` unrotated at full color; opacity is left to the compositor.
#[tracing::instrument(skip_all, fields(shape = ?overlay.shape))]
pub fn render_overlay(overlay: &OverlayLayer) -> ThumbResult<Raster> {
    overlay.size.validate("overlay")?;
    let (w, h) = overlay.size.to_pixels();
    let mut surface = VectorSurface::new(w, h)?;
    surface.fill_path(
        &overlay_path(overlay, overlay.size.width, overlay.size.height),
        overlay.color,
    );
    let shape = Raster::at_origin(surface.finish()?);
    blur_raster(&shape, overlay.blur_radius)
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
