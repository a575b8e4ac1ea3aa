use crate::assets::palette::SpriteId;
use crate::foundation::core::{Point, Vec2};
use crate::sprite::SpriteBitmap;

/// One drifting sprite. Position is the left/top anchor in device pixels.
#[derive(Clone, Debug)]
pub struct Layer {
    pub bitmap: SpriteBitmap,
    pub sprite: SpriteId,
    pub blurred: bool,
    pub scale: f64,
    pub position: Point,
    /// Radians, unbounded.
    pub rotation: f64,
    /// Per-frame displacement; `x` is the left speed, `y` the top speed.
    pub velocity: Vec2,
    /// Per-frame rotation delta in radians.
    pub spin: f64,
}

impl Layer {
    /// Drawn side length in device pixels.
    pub fn drawn_size(&self) -> (f64, f64) {
        let s = self.bitmap.size();
        (f64::from(s.width) * self.scale, f64::from(s.height) * self.scale)
    }
}
