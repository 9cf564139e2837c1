use std::sync::Arc;

use crate::foundation::error::{SlideshowError, SlideshowResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Largest edge the CPU rasterizer can hold in one pixmap.
pub const MAX_IMAGE_EDGE: u32 = u16::MAX as u32;

/// Decoded bitmap in premultiplied RGBA8 form, ready to paint.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode encoded image bytes (PNG, JPEG, WebP, …) into a [`PreparedImage`].
pub fn decode_image(bytes: &[u8]) -> SlideshowResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| SlideshowError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(SlideshowError::decode("image has zero width or height"));
    }
    if width > MAX_IMAGE_EDGE || height > MAX_IMAGE_EDGE {
        return Err(SlideshowError::decode(format!(
            "image is {width}x{height}; edges above {MAX_IMAGE_EDGE} px are not supported"
        )));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
