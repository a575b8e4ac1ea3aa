//! Offscreen sprite rasterization.

use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::blur_cpu::offset_blur_in_place;
use crate::foundation::core::PixelSize;
use crate::foundation::error::{EmojiPadError, EmojiPadResult};

/// A pre-rendered, padded sprite bitmap. Cheap to clone; pixels are shared and never rewritten.
#[derive(Clone, Debug)]
pub struct SpriteBitmap {
    size: PixelSize,
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl SpriteBitmap {
    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Premultiplied RGBA8 pixels, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub(crate) fn paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::clone(&self.pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

/// Draws sprite sources into fixed-size padded bitmaps, optionally blurred.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteRasterizer {
    size_px: u32,
    blur_radius: u32,
}

impl SpriteRasterizer {
    pub fn new(size_px: u32, blur_radius: u32) -> Self {
        Self {
            size_px,
            blur_radius,
        }
    }

    pub fn size_px(&self) -> u32 {
        self.size_px
    }

    /// Transparent margin around the sprite so blur taps have room to spread.
    pub fn padding(&self) -> u32 {
        self.blur_radius.saturating_mul(2)
    }

    pub fn bitmap_size(&self) -> PixelSize {
        let side = self.size_px.saturating_add(self.padding().saturating_mul(2));
        PixelSize::new(side, side)
    }

    /// Rasterize `source` scaled to the sprite size, inset by the padding.
    ///
    /// Fails with `SurfaceUnavailable` when the padded bitmap cannot be allocated.
    pub fn rasterize(&self, source: &PreparedImage, blur: bool) -> EmojiPadResult<SpriteBitmap> {
        let size = self.bitmap_size();
        let (w16, h16) = size.to_u16()?;
        if self.size_px == 0 {
            return Err(EmojiPadError::surface_unavailable("sprite size must be > 0"));
        }

        let src = pixmap_from_premul_bytes(&source.rgba8_premul, source.width, source.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(src)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        let pad = f64::from(self.padding());
        let side = f64::from(self.size_px);
        let tr = vello_cpu::kurbo::Affine::translate((pad, pad))
            * vello_cpu::kurbo::Affine::scale_non_uniform(
                side / f64::from(source.width),
                side / f64::from(source.height),
            );

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(tr);
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(source.width),
            f64::from(source.height),
        ));
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);

        if blur {
            offset_blur_in_place(
                pixmap.data_as_u8_slice_mut(),
                size.width,
                size.height,
                self.blur_radius,
            )?;
        }

        Ok(SpriteBitmap {
            size,
            pixmap: Arc::new(pixmap),
        })
    }
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> EmojiPadResult<vello_cpu::Pixmap> {
    let (w, h) = PixelSize::new(width, height).to_u16()?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(EmojiPadError::render("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../tests/unit/sprite.rs"]
mod tests;
