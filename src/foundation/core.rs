use crate::foundation::error::{EmojiPadError, EmojiPadResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Device-pixel size of a drawing surface or bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn byte_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }

    /// Width/height as the `u16` pair `vello_cpu` surfaces are addressed with.
    pub fn to_u16(self) -> EmojiPadResult<(u16, u16)> {
        if self.is_empty() {
            return Err(EmojiPadError::surface_unavailable(format!(
                "surface size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        let w: u16 = self.width.try_into().map_err(|_| {
            EmojiPadError::surface_unavailable(format!("surface width exceeds u16: {}", self.width))
        })?;
        let h: u16 = self.height.try_into().map_err(|_| {
            EmojiPadError::surface_unavailable(format!(
                "surface height exceeds u16: {}",
                self.height
            ))
        })?;
        Ok((w, h))
    }
}

/// Motion bounds in surface pixel space: positions are expected in `[0, width] x [0, height]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl From<PixelSize> for Bounds {
    fn from(size: PixelSize) -> Self {
        Self {
            width: f64::from(size.width),
            height: f64::from(size.height),
        }
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
