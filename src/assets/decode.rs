use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::ReelResult;
use crate::foundation::math::mul_div255_u8;

/// Decoded frame image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct FrameImage {
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl FrameImage {
    /// Wrap already-premultiplied pixels.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        }
    }

    /// Whether the image has a drawable (non-zero) natural size.
    pub fn has_natural_size(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Decode encoded image bytes (PNG, JPEG, ...) into a [`FrameImage`].
pub fn decode_image(bytes: &[u8]) -> ReelResult<FrameImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode frame image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(FrameImage::from_premul(width, height, rgba8_premul))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255_u8(u16::from(px[0]), a);
        px[1] = mul_div255_u8(u16::from(px[1]), a);
        px[2] = mul_div255_u8(u16::from(px[2]), a);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
