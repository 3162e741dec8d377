use std::{path::Path, sync::Arc};

use crate::foundation::{
    buffer::PixelBuffer, error::AssetLoadError, math::premultiply_rgba8_in_place,
};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl DecodedImage {
    /// Copy into an owned [`PixelBuffer`].
    pub fn to_buffer(&self) -> Result<PixelBuffer, AssetLoadError> {
        PixelBuffer::from_premul(self.width, self.height, self.rgba8_premul.as_ref().clone())
            .map_err(|e| AssetLoadError::new("<decoded>", e.to_string()))
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8], origin: &Path) -> Result<DecodedImage, AssetLoadError> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| AssetLoadError::new(origin, format!("decode image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(AssetLoadError::new(origin, "image has no pixels"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(DecodedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> Result<DecodedImage, AssetLoadError> {
    let bytes = std::fs::read(path).map_err(|e| AssetLoadError::new(path, format!("read: {e}")))?;
    decode_image(&bytes, path)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
