//! Drawing surface sizing, ownership and debounced resize.

use std::time::{Duration, Instant};

use crate::foundation::core::{Bounds, PixelSize};
use crate::foundation::error::{EmojiPadError, EmojiPadResult};

/// Host-reported geometry at construction time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceInit {
    pub css_width: f64,
    pub css_height: f64,
    pub device_pixel_ratio: f64,
}

impl SurfaceInit {
    pub fn new(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            css_width,
            css_height,
            device_pixel_ratio,
        }
    }
}

/// Current surface geometry. `size` is the CSS size times the ratio, rounded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceState {
    pub size: PixelSize,
    pub css_width: f64,
    pub css_height: f64,
    pub device_pixel_ratio: f64,
}

impl SurfaceState {
    pub fn from_css(css_width: f64, css_height: f64, ratio: f64) -> EmojiPadResult<Self> {
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(EmojiPadError::validation(format!(
                "device pixel ratio must be finite and > 0, got {ratio}"
            )));
        }
        if !(css_width.is_finite() && css_width >= 0.0 && css_height.is_finite() && css_height >= 0.0)
        {
            return Err(EmojiPadError::validation(format!(
                "css size must be finite and >= 0, got {css_width}x{css_height}"
            )));
        }
        let size = PixelSize::new(
            (css_width * ratio).round() as u32,
            (css_height * ratio).round() as u32,
        );
        Ok(Self {
            size,
            css_width,
            css_height,
            device_pixel_ratio: ratio,
        })
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from(self.size)
    }
}

/// The backing pixmap plus its geometry. Owned by exactly one thread at a time.
#[derive(Debug)]
pub struct Surface {
    state: SurfaceState,
    pixmap: vello_cpu::Pixmap,
}

impl Surface {
    pub fn new(state: SurfaceState) -> EmojiPadResult<Self> {
        let (w, h) = state.size.to_u16()?;
        Ok(Self {
            state,
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    pub fn from_init(init: SurfaceInit) -> EmojiPadResult<Self> {
        Self::new(SurfaceState::from_css(
            init.css_width,
            init.css_height,
            init.device_pixel_ratio,
        )?)
    }

    /// Re-size a transferred surface to the geometry reported alongside it.
    pub fn adopt(self, init: SurfaceInit) -> EmojiPadResult<Self> {
        let state = SurfaceState::from_css(
            init.css_width,
            init.css_height,
            init.device_pixel_ratio,
        )?;
        if state.size == self.state.size {
            return Ok(Self { state, ..self });
        }
        Self::new(state)
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn size(&self) -> PixelSize {
        self.state.size
    }

    pub fn bounds(&self) -> Bounds {
        self.state.bounds()
    }

    /// Premultiplied RGBA8 contents.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut vello_cpu::Pixmap {
        &mut self.pixmap
    }

    /// Reallocate the backing pixmap for a new CSS size at the current ratio.
    pub fn resize_css(&mut self, css_width: f64, css_height: f64) -> EmojiPadResult<()> {
        let state = SurfaceState::from_css(css_width, css_height, self.state.device_pixel_ratio)?;
        let (w, h) = state.size.to_u16()?;
        self.pixmap = vello_cpu::Pixmap::new(w, h);
        self.state = state;
        Ok(())
    }
}

/// Collapses bursts of resize signals into one update, `delay` after the last signal.
#[derive(Clone, Debug)]
pub struct ResizeDebouncer {
    delay: Duration,
    pending: Option<PendingResize>,
}

#[derive(Clone, Copy, Debug)]
struct PendingResize {
    css_width: f64,
    css_height: f64,
    at: Instant,
}

impl ResizeDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record a resize signal, replacing any pending one and restarting the window.
    pub fn signal(&mut self, css_width: f64, css_height: f64, now: Instant) {
        self.pending = Some(PendingResize {
            css_width,
            css_height,
            at: now,
        });
    }

    /// Take the last reported size once the quiet period has elapsed.
    pub fn take_due(&mut self, now: Instant) -> Option<(f64, f64)> {
        let p = self.pending?;
        if now.saturating_duration_since(p.at) < self.delay {
            return None;
        }
        self.pending = None;
        Some((p.css_width, p.css_height))
    }
}

/// Owns the surface and applies debounced resizes to it.
#[derive(Debug)]
pub struct SurfaceManager {
    surface: Surface,
    debouncer: ResizeDebouncer,
}

impl SurfaceManager {
    pub fn new(surface: Surface, debounce: Duration) -> Self {
        Self {
            surface,
            debouncer: ResizeDebouncer::new(debounce),
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn into_surface(self) -> Surface {
        self.surface
    }

    pub fn signal_resize(&mut self, css_width: f64, css_height: f64, now: Instant) {
        self.debouncer.signal(css_width, css_height, now);
    }

    pub fn has_pending_resize(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Apply a due resize. Returns `true` when the surface changed.
    ///
    /// A size the surface cannot take (empty, negative, non-finite or wider than `u16`) is
    /// dropped with a warning and the previous surface stays.
    pub fn apply_due(&mut self, now: Instant) -> EmojiPadResult<bool> {
        let Some((w, h)) = self.debouncer.take_due(now) else {
            return Ok(false);
        };
        let next = match SurfaceState::from_css(w, h, self.surface.state.device_pixel_ratio)
            .and_then(|st| st.size.to_u16().map(|_| st))
        {
            Ok(st) => st,
            Err(err) => {
                tracing::warn!(css_width = w, css_height = h, %err, "ignoring unusable resize");
                return Ok(false);
            }
        };
        self.surface.resize_css(w, h)?;
        tracing::debug!(
            width = next.size.width,
            height = next.size.height,
            "surface resized"
        );
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../tests/unit/surface.rs"]
mod tests;
