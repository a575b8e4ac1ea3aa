use std::time::Instant;

use crate::assets::loader::SpriteLoader;
use crate::config::EmojiPadConfig;
use crate::foundation::error::EmojiPadResult;
use crate::motion::advance_all;
use crate::render::compositor::{Compositor, snapshot};
use crate::render::run_loop::RenderLoop;
use crate::render::scheduler::FrameScheduler;
use crate::render::sink::FrameSink;
use crate::render::FrameRGBA;
use crate::scene::selector::RandomSelector;
use crate::scene::store::{LayerStore, PopulateParams};
use crate::sprite::SpriteRasterizer;
use crate::surface::{Surface, SurfaceInit, SurfaceManager, SurfaceState};

/// A populated emoji background bound to one surface.
///
/// Construction allocates the surface and builds every layer; after that the only mutations are
/// per-frame motion and debounced resizes.
#[derive(Debug)]
pub struct EmojiPad {
    config: EmojiPadConfig,
    surface: SurfaceManager,
    layers: LayerStore,
    compositor: Compositor,
    frames_drawn: u64,
}

impl EmojiPad {
    pub fn new(
        init: SurfaceInit,
        config: EmojiPadConfig,
        loader: &dyn SpriteLoader,
    ) -> EmojiPadResult<Self> {
        config.validate()?;
        let surface = Surface::from_init(init)?;
        Self::with_surface(surface, config, loader)
    }

    /// Build on an already allocated (possibly transferred) surface.
    #[tracing::instrument(skip_all, fields(width = surface.size().width, height = surface.size().height))]
    pub fn with_surface(
        surface: Surface,
        config: EmojiPadConfig,
        loader: &dyn SpriteLoader,
    ) -> EmojiPadResult<Self> {
        config.validate()?;
        let st = surface.state();
        let palette = config.resolved_palette()?;
        let size_px = config.resolved_sprite_size(st.css_width, st.css_height, st.device_pixel_ratio);
        let rasterizer = SpriteRasterizer::new(size_px, config.blur_radius);
        let mut selector = RandomSelector::new(config.seed, config.max_pick_retries);

        let params = PopulateParams {
            count: config.resolved_layer_count(st.css_width),
            blur_fraction: config.blur_fraction,
            base_scale: config.base_scale,
            blurred_base_scale: config.blurred_base_scale,
            spin_factor: config.spin_factor,
            bounds: surface.bounds(),
            threads: config.load_threads,
        };
        let layers = LayerStore::populate(&params, &palette, &mut selector, loader, &rasterizer)?;
        tracing::info!(
            layers = layers.len(),
            blurred = layers.blurred_count(),
            sprite_px = size_px,
            "emojipad ready"
        );

        Ok(Self {
            surface: SurfaceManager::new(surface, config.resize_debounce()),
            config,
            layers,
            compositor: Compositor::new(),
            frames_drawn: 0,
        })
    }

    pub fn config(&self) -> &EmojiPadConfig {
        &self.config
    }

    pub fn surface(&self) -> &Surface {
        self.surface.surface()
    }

    pub fn surface_state(&self) -> SurfaceState {
        self.surface.surface().state()
    }

    pub fn layers(&self) -> &LayerStore {
        &self.layers
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn has_pending_resize(&self) -> bool {
        self.surface.has_pending_resize()
    }

    /// Host resize signal, stamped now. Applied by a later frame once the burst settles.
    pub fn handle_resize(&mut self, css_width: f64, css_height: f64) {
        self.handle_resize_at(css_width, css_height, Instant::now());
    }

    pub fn handle_resize_at(&mut self, css_width: f64, css_height: f64, now: Instant) {
        tracing::trace!(css_width, css_height, "resize signalled");
        self.surface.signal_resize(css_width, css_height, now);
    }

    /// Produce one frame: apply a due resize, draw every layer, then advance every layer.
    pub fn render_frame(&mut self, now: Instant) -> EmojiPadResult<FrameRGBA> {
        self.surface.apply_due(now)?;
        self.compositor.draw(
            self.surface.surface_mut(),
            self.config.background_rgba,
            self.layers.layers(),
        )?;
        let bounds = self.surface.surface().bounds();
        advance_all(self.layers.layers_mut(), bounds);
        self.frames_drawn += 1;
        Ok(snapshot(self.surface.surface()))
    }

    pub fn into_loop<S: FrameSink, F: FrameScheduler>(self, sink: S, scheduler: F) -> RenderLoop<S, F> {
        RenderLoop::new(self, sink, scheduler)
    }
}

#[cfg(test)]
#[path = "../tests/unit/pad.rs"]
mod tests;
