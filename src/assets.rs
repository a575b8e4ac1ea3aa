//! Sprite sources: the palette of selectable ids, decoders, and loaders.

pub mod decode;
pub mod loader;
pub mod palette;

pub use decode::PreparedImage;
pub use loader::{FsSpriteLoader, GlyphSpriteLoader, SpriteLoader, placeholder_sprite};
pub use palette::{DEFAULT_EMOJI_CODES, SpriteId, SpritePalette};
