use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{EmojiPadError, EmojiPadResult};

/// Prepared raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> EmojiPadResult<Self> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if width == 0 || height == 0 || rgba8_premul.len() != expected {
            return Err(EmojiPadError::asset_load(format!(
                "prepared image {width}x{height} does not match {} bytes",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }
}

/// Decode encoded image bytes (PNG, JPEG, ...) and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> EmojiPadResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    PreparedImage::from_premul(width, height, rgba8_premul)
}

/// Parse SVG bytes and rasterize them to a `size`-pixel square.
///
/// Sprites are drawn at a fixed size, so the vector source is rasterized once at that size
/// instead of being upscaled from its intrinsic dimensions.
pub fn decode_svg(bytes: &[u8], size: u32) -> EmojiPadResult<PreparedImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;

    let tree_size = tree.size();
    if !(tree_size.width().is_finite() && tree_size.width() > 0.0)
        || !(tree_size.height().is_finite() && tree_size.height() > 0.0)
    {
        return Err(EmojiPadError::asset_load("svg has invalid width/height"));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size)
        .ok_or_else(|| EmojiPadError::surface_unavailable("failed to allocate svg pixmap"))?;
    let sx = (size as f32) / tree_size.width();
    let sy = (size as f32) / tree_size.height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    // tiny-skia pixmaps are already premultiplied RGBA8.
    PreparedImage::from_premul(size, size, pixmap.data().to_vec())
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
