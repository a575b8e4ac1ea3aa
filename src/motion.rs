//! Per-frame motion integration.

use crate::foundation::core::Bounds;
use crate::scene::layer::Layer;

/// Advance one layer by a single frame.
///
/// A velocity component is reflected when its coordinate lies outside `[0, bound]` before the
/// step; the step itself always applies. Overshoot is not clamped.
pub fn advance(layer: &mut Layer, bounds: Bounds) {
    if layer.position.x < 0.0 || layer.position.x > bounds.width {
        layer.velocity.x = -layer.velocity.x;
    }
    if layer.position.y < 0.0 || layer.position.y > bounds.height {
        layer.velocity.y = -layer.velocity.y;
    }
    layer.position += layer.velocity;
    layer.rotation += layer.spin;
}

pub fn advance_all(layers: &mut [Layer], bounds: Bounds) {
    for layer in layers {
        advance(layer, bounds);
    }
}

#[cfg(test)]
#[path = "../tests/unit/motion.rs"]
mod tests;
