use rayon::prelude::*;

use crate::assets::loader::{SpriteLoader, placeholder_sprite};
use crate::assets::palette::{SpriteId, SpritePalette};
use crate::foundation::core::{Bounds, Point, Rgba8Premul, Vec2};
use crate::foundation::error::{EmojiPadError, EmojiPadResult};
use crate::scene::layer::Layer;
use crate::scene::selector::{RandomSelector, UsedIndexSet};
use crate::sprite::SpriteRasterizer;

/// Inputs of one population pass.
#[derive(Clone, Debug)]
pub struct PopulateParams {
    pub count: usize,
    pub blur_fraction: f64,
    pub base_scale: f64,
    pub blurred_base_scale: f64,
    pub spin_factor: f64,
    pub bounds: Bounds,
    /// Rayon pool size for sprite loading; `None` uses the rayon default.
    pub threads: Option<usize>,
}

/// Everything about a slot that is decided before its sprite is loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerPlan {
    pub sprite: SpriteId,
    pub blurred: bool,
    pub scale: f64,
    pub position: Point,
    pub velocity: Vec2,
    pub spin: f64,
}

/// Ordered layers; index order is draw order.
#[derive(Clone, Debug, Default)]
pub struct LayerStore {
    layers: Vec<Layer>,
}

impl LayerStore {
    pub fn from_layers(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn blurred_count(&self) -> usize {
        self.layers.iter().filter(|l| l.blurred).count()
    }

    /// Build `params.count` layers.
    ///
    /// Slot plans are drawn first, in slot order, so the plan depends only on the selector state.
    /// Sprites are then loaded and rasterized in parallel and reassembled by slot. A slot whose
    /// sprite fails to load gets a placeholder; a bitmap that cannot be allocated aborts the pass.
    #[tracing::instrument(skip_all, fields(count = params.count, palette = palette.len()))]
    pub fn populate(
        params: &PopulateParams,
        palette: &SpritePalette,
        selector: &mut RandomSelector,
        loader: &dyn SpriteLoader,
        rasterizer: &SpriteRasterizer,
    ) -> EmojiPadResult<Self> {
        let plans = plan_layers(params, palette, selector)?;
        let pool = build_thread_pool(params.threads)?;
        let size_px = rasterizer.size_px();

        let built = pool.install(|| {
            plans
                .into_par_iter()
                .enumerate()
                .map(|(slot, plan)| -> EmojiPadResult<Layer> {
                    let source = match loader.load(&plan.sprite, size_px) {
                        Ok(src) => src,
                        Err(err) if err.is_recoverable() => {
                            tracing::warn!(slot, sprite = %plan.sprite, %err, "sprite load failed, using placeholder");
                            placeholder_sprite(size_px, placeholder_fill())?
                        }
                        Err(err) => return Err(err),
                    };
                    let bitmap = rasterizer.rasterize(&source, plan.blurred)?;
                    Ok(Layer {
                        bitmap,
                        sprite: plan.sprite,
                        blurred: plan.blurred,
                        scale: plan.scale,
                        position: plan.position,
                        rotation: 0.0,
                        velocity: plan.velocity,
                        spin: plan.spin,
                    })
                })
                .collect::<Vec<_>>()
        });

        let mut layers = Vec::with_capacity(built.len());
        for layer in built {
            layers.push(layer?);
        }
        tracing::debug!(layers = layers.len(), "population complete");
        Ok(Self { layers })
    }
}

/// Draw every random choice for `params.count` slots, in slot order.
pub fn plan_layers(
    params: &PopulateParams,
    palette: &SpritePalette,
    selector: &mut RandomSelector,
) -> EmojiPadResult<Vec<LayerPlan>> {
    let mut used = UsedIndexSet::new(palette.len());
    let blur_cutoff = params.count as f64 * params.blur_fraction;

    let mut plans = Vec::with_capacity(params.count);
    for i in 0..params.count {
        let idx = selector
            .pick_unused_index(&mut used)
            .ok_or_else(|| EmojiPadError::validation("sprite palette is empty"))?;
        let sprite = palette
            .get(idx)
            .cloned()
            .ok_or_else(|| EmojiPadError::validation(format!("palette index {idx} out of range")))?;

        let blurred = (i as f64) < blur_cutoff;
        let base = if blurred {
            params.blurred_base_scale
        } else {
            params.base_scale
        };
        let scale = base + selector.unit();
        let position = Point::new(
            selector.uniform(params.bounds.width),
            selector.uniform(params.bounds.height),
        );
        let velocity = Vec2::new(selector.non_zero_signed(), selector.non_zero_signed());
        let spin = selector.non_zero_signed() * params.spin_factor;

        plans.push(LayerPlan {
            sprite,
            blurred,
            scale,
            position,
            velocity,
            spin,
        });
    }
    Ok(plans)
}

fn placeholder_fill() -> Rgba8Premul {
    Rgba8Premul::from_straight_rgba(255, 204, 77, 255)
}

pub(crate) fn build_thread_pool(threads: Option<usize>) -> EmojiPadResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(EmojiPadError::validation(
            "sprite load 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| EmojiPadError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/store.rs"]
mod tests;
