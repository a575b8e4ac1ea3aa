//! EmojiPad is an animated emoji background engine.
//!
//! Sprites are scattered over a CPU drawing surface, half of them blurred, and drift and spin
//! under a per-frame render loop. The loop can run on the caller's thread or on a worker thread
//! that owns the surface and is driven by [`WorkerMessage`]s.
//!
//! - Build an [`EmojiPad`] from a [`SurfaceInit`], an [`EmojiPadConfig`] and a [`SpriteLoader`]
//! - Drive it with a [`RenderLoop`] into a [`FrameSink`], or hand it to a [`WorkerHandle`]
#![forbid(unsafe_code)]

pub mod assets;
pub mod blur_cpu;
pub mod composite_cpu;
pub mod config;
mod foundation;
pub mod motion;
pub mod pad;
pub mod render;
pub mod scene;
pub mod sprite;
pub mod surface;
pub mod worker;

pub use crate::foundation::core::{Affine, Bounds, PixelSize, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{EmojiPadError, EmojiPadResult};

pub use crate::assets::{
    DEFAULT_EMOJI_CODES, FsSpriteLoader, GlyphSpriteLoader, PreparedImage, SpriteId, SpriteLoader,
    SpritePalette, placeholder_sprite,
};
pub use crate::config::EmojiPadConfig;
pub use crate::pad::EmojiPad;
pub use crate::render::{
    FrameRGBA, FrameScheduler, FrameSink, ImmediateScheduler, InMemorySink, IntervalScheduler,
    LoopState, PngSink, RenderHandle, RenderLoop, SinkConfig,
};
pub use crate::scene::{Layer, LayerStore, RandomSelector};
pub use crate::sprite::{SpriteBitmap, SpriteRasterizer};
pub use crate::surface::{Surface, SurfaceInit, SurfaceState};
pub use crate::worker::{WorkerHandle, WorkerMessage};
