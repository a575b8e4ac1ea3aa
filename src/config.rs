use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::assets::palette::SpritePalette;
use crate::foundation::error::{EmojiPadError, EmojiPadResult};

/// CSS width at or below which the host counts as a small (mobile) screen.
pub const MOBILE_BREAKPOINT_CSS_PX: f64 = 768.0;
/// Quiet period after the last resize signal before the surface is resized.
pub const RESIZE_DEBOUNCE_MS: u64 = 500;

/// Tunables for one EmojiPad instance.
///
/// Every field has a default; `None` fields are derived from the surface at construction.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmojiPadConfig {
    /// Number of layers. Defaults to 50 on small screens, 100 otherwise.
    pub layer_count: Option<usize>,
    /// Sprite side in device pixels. Defaults to `max(css_w, css_h) / (5 | 10) * ratio`.
    pub sprite_size_px: Option<u32>,
    pub blur_radius: u32,
    /// Leading fraction of layers that are blurred.
    pub blur_fraction: f64,
    pub base_scale: f64,
    pub blurred_base_scale: f64,
    /// Multiplier applied to the random rotation speed.
    pub spin_factor: f64,
    /// Straight (non-premultiplied) RGBA clear color.
    pub background_rgba: [u8; 4],
    pub resize_debounce_ms: u64,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Random draws before selection falls back to a scan.
    pub max_pick_retries: u32,
    /// Sprite load threads. `None` uses rayon defaults.
    pub load_threads: Option<usize>,
    pub mobile_breakpoint_css_px: f64,
    /// Custom sprite ids. `None` uses the built-in emoji palette.
    pub palette: Option<Vec<String>>,
}

impl Default for EmojiPadConfig {
    fn default() -> Self {
        Self {
            layer_count: None,
            sprite_size_px: None,
            blur_radius: 3,
            blur_fraction: 0.5,
            base_scale: 1.0,
            blurred_base_scale: 1.2,
            spin_factor: std::f64::consts::PI / 360.0,
            background_rgba: [138, 43, 226, 255],
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            seed: None,
            max_pick_retries: 64,
            load_threads: None,
            mobile_breakpoint_css_px: MOBILE_BREAKPOINT_CSS_PX,
            palette: None,
        }
    }
}

impl EmojiPadConfig {
    pub fn from_path(path: impl AsRef<Path>) -> EmojiPadResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            EmojiPadError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn from_reader(r: impl Read) -> EmojiPadResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| EmojiPadError::validation(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(s: &str) -> EmojiPadResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    pub fn validate(&self) -> EmojiPadResult<()> {
        if self.layer_count == Some(0) {
            return Err(EmojiPadError::validation("layer_count must be >= 1 when set"));
        }
        if self.sprite_size_px == Some(0) {
            return Err(EmojiPadError::validation(
                "sprite_size_px must be >= 1 when set",
            ));
        }
        if !(0.0..=1.0).contains(&self.blur_fraction) {
            return Err(EmojiPadError::validation("blur_fraction must be in [0, 1]"));
        }
        if !(self.base_scale.is_finite() && self.base_scale > 0.0)
            || !(self.blurred_base_scale.is_finite() && self.blurred_base_scale > 0.0)
        {
            return Err(EmojiPadError::validation("base scales must be finite and > 0"));
        }
        if !self.spin_factor.is_finite() {
            return Err(EmojiPadError::validation("spin_factor must be finite"));
        }
        if self.max_pick_retries == 0 {
            return Err(EmojiPadError::validation("max_pick_retries must be >= 1"));
        }
        if self.load_threads == Some(0) {
            return Err(EmojiPadError::validation(
                "load_threads must be >= 1 when set",
            ));
        }
        if let Some(p) = &self.palette
            && p.is_empty()
        {
            return Err(EmojiPadError::validation("palette must be non-empty when set"));
        }
        Ok(())
    }

    pub fn is_small_screen(&self, css_width: f64) -> bool {
        css_width <= self.mobile_breakpoint_css_px
    }

    pub fn resolved_layer_count(&self, css_width: f64) -> usize {
        self.layer_count
            .unwrap_or(if self.is_small_screen(css_width) { 50 } else { 100 })
    }

    pub fn resolved_sprite_size(&self, css_width: f64, css_height: f64, ratio: f64) -> u32 {
        if let Some(px) = self.sprite_size_px {
            return px;
        }
        let divisor = if self.is_small_screen(css_width) { 5.0 } else { 10.0 };
        ((css_width.max(css_height) / divisor) * ratio).round().max(1.0) as u32
    }

    pub fn resolved_palette(&self) -> EmojiPadResult<SpritePalette> {
        match &self.palette {
            Some(codes) => SpritePalette::from_codes(codes),
            None => Ok(SpritePalette::default()),
        }
    }

    pub fn resize_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.resize_debounce_ms)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
