use std::fmt;

use crate::foundation::core::{Affine, affine_to_cpu};
use crate::foundation::error::EmojiPadResult;
use crate::render::FrameRGBA;
use crate::scene::layer::Layer;
use crate::surface::Surface;

/// Draws a layer stack onto a surface. Keeps one render context across frames.
#[derive(Default)]
pub struct Compositor {
    ctx: Option<vello_cpu::RenderContext>,
}

impl fmt::Debug for Compositor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compositor")
            .field("ctx_cached", &self.ctx.is_some())
            .finish()
    }
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> EmojiPadResult<R>,
    ) -> EmojiPadResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    /// Clear `surface` to the straight-alpha `background` and draw `layers` in order.
    pub fn draw(
        &mut self,
        surface: &mut Surface,
        background: [u8; 4],
        layers: &[Layer],
    ) -> EmojiPadResult<()> {
        let size = surface.size();
        let (w16, h16) = size.to_u16()?;
        self.with_ctx_mut(w16, h16, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            let [r, g, b, a] = background;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(size.width),
                f64::from(size.height),
            ));

            for layer in layers {
                let bm = layer.bitmap.size();
                let (w, h) = (f64::from(bm.width), f64::from(bm.height));
                ctx.set_transform(affine_to_cpu(layer_transform(layer)));
                ctx.set_paint(layer.bitmap.paint());
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
            }

            ctx.flush();
            ctx.render_to_pixmap(surface.pixmap_mut());
            Ok(())
        })
    }
}

/// Bitmap space to surface space: centred on the position, rotated, then scaled.
pub fn layer_transform(layer: &Layer) -> Affine {
    let bm = layer.bitmap.size();
    let half = (f64::from(bm.width) / 2.0, f64::from(bm.height) / 2.0);
    Affine::translate(layer.position.to_vec2())
        * Affine::rotate(layer.rotation)
        * Affine::scale(layer.scale)
        * Affine::translate((-half.0, -half.1))
}

/// Copy the surface contents out as a presentable frame.
pub fn snapshot(surface: &Surface) -> FrameRGBA {
    let size = surface.size();
    FrameRGBA {
        width: size.width,
        height: size.height,
        data: surface.data().to_vec(),
        premultiplied: true,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
