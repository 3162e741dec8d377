use crate::{
    assets::cache::ImageCache,
    effects::{
        blur::blur_raster,
        composite::stack_rasters,
        morph::{alpha_mask, tint_mask},
    },
    foundation::{
        error::ThumbResult,
        geom::{Raster, flip_horizontal, flip_vertical},
    },
    render::{
        placeholder::{BASE_COLOR, hatched},
        scale::scale_buffer,
    },
    scene::model::ImageLayer,
};

/// Draw `layer` unrotated: the picture scaled to `size`, flipped, over its optional shadow.
///
/// A missing or corrupt source returns [`crate::ThumbError::AssetLoad`].
#[tracing::instrument(skip(layer, images), fields(source = %layer.source_path))]
pub fn render_image(layer: &ImageLayer, images: &ImageCache) -> ThumbResult<Raster> {
    layer.size.validate("image")?;
    let decoded = images.get_or_load(&layer.source_path)?;
    let (w, h) = layer.size.to_pixels();
    let mut buf = scale_buffer(&decoded.to_buffer()?, w, h)?;
    if layer.flip_horizontal {
        buf = flip_horizontal(&buf)?;
    }
    if layer.flip_vertical {
        buf = flip_vertical(&buf)?;
    }
    let picture = Raster::at_origin(buf);

    let Some(shadow) = layer.shadow.filter(|s| s.opacity > 0.0) else {
        return Ok(picture);
    };
    let mask = alpha_mask(&picture.buffer);
    let tinted = Raster {
        buffer: tint_mask(&mask, w, h, shadow.color, shadow.opacity as f32)?,
        offset: (shadow.offset_x.round() as i64, shadow.offset_y.round() as i64),
    };
    let shadow = blur_raster(&tinted, shadow.blur_radius)?;
    stack_rasters(&[&shadow, &picture])
}

/// Hatched stand-in of the layer's size, drawn when the source cannot be loaded.
pub fn image_placeholder(layer: &ImageLayer) -> ThumbResult<Raster> {
    let (w, h) = layer.size.to_pixels();
    Ok(Raster::at_origin(hatched(w, h, BASE_COLOR.to_premul())?))
}

#[cfg(test)]
#[path = "../../tests/unit/render/image_layer.rs"]
mod tests;
