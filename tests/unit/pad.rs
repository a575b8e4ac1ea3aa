use std::time::Duration;

use super::*;
use crate::assets::decode::PreparedImage;
use crate::assets::palette::SpriteId;
use crate::foundation::core::PixelSize;

struct SolidLoader;

impl SpriteLoader for SolidLoader {
    fn load(&self, _id: &SpriteId, size_px: u32) -> EmojiPadResult<PreparedImage> {
        PreparedImage::from_premul(
            size_px,
            size_px,
            [250u8, 200, 0, 255].repeat((size_px * size_px) as usize),
        )
    }
}

fn config(count: usize) -> EmojiPadConfig {
    EmojiPadConfig {
        layer_count: Some(count),
        sprite_size_px: Some(16),
        seed: Some(9),
        load_threads: Some(2),
        ..EmojiPadConfig::default()
    }
}

#[test]
fn construction_sizes_surface_and_populates() {
    let pad = EmojiPad::new(SurfaceInit::new(200.0, 100.0, 2.0), config(6), &SolidLoader).unwrap();
    assert_eq!(pad.surface().size(), PixelSize::new(400, 200));
    assert_eq!(pad.layers().len(), 6);
    assert_eq!(pad.layers().blurred_count(), 3);
}

#[test]
fn default_layer_count_depends_on_screen_width() {
    let cfg = EmojiPadConfig {
        sprite_size_px: Some(4),
        seed: Some(1),
        ..EmojiPadConfig::default()
    };
    let small = EmojiPad::new(SurfaceInit::new(400.0, 300.0, 1.0), cfg.clone(), &SolidLoader).unwrap();
    assert_eq!(small.layers().len(), 50);
    let large = EmojiPad::new(SurfaceInit::new(1024.0, 300.0, 1.0), cfg, &SolidLoader).unwrap();
    assert_eq!(large.layers().len(), 100);
}

#[test]
fn invalid_config_is_rejected_before_allocation() {
    let cfg = EmojiPadConfig {
        blur_fraction: 2.0,
        ..config(3)
    };
    let err = EmojiPad::new(SurfaceInit::new(10.0, 10.0, 1.0), cfg, &SolidLoader).unwrap_err();
    assert!(matches!(err, crate::EmojiPadError::Validation(_)));
}

#[test]
fn render_frame_draws_then_advances() {
    let mut pad = EmojiPad::new(SurfaceInit::new(100.0, 80.0, 1.0), config(4), &SolidLoader).unwrap();
    let before: Vec<_> = pad.layers().layers().iter().map(|l| (l.position, l.rotation)).collect();

    let frame = pad.render_frame(Instant::now()).unwrap();
    assert_eq!((frame.width, frame.height), (100, 80));
    assert_eq!(frame.data.len(), 100 * 80 * 4);
    assert_eq!(pad.frames_drawn(), 1);

    for (l, (p, r)) in pad.layers().layers().iter().zip(before) {
        assert_eq!(l.position, p + l.velocity);
        assert_eq!(l.rotation, r + l.spin);
    }
}

#[test]
fn resize_waits_for_the_debounce_window() {
    let mut pad = EmojiPad::new(SurfaceInit::new(100.0, 80.0, 2.0), config(2), &SolidLoader).unwrap();
    let t0 = Instant::now();
    pad.handle_resize_at(150.0, 90.0, t0);
    pad.handle_resize_at(120.0, 60.0, t0 + Duration::from_millis(200));

    let f = pad.render_frame(t0 + Duration::from_millis(600)).unwrap();
    assert_eq!((f.width, f.height), (200, 160));
    assert!(pad.has_pending_resize());

    let f = pad.render_frame(t0 + Duration::from_millis(700)).unwrap();
    assert_eq!((f.width, f.height), (240, 120));
    assert_eq!(pad.surface_state().css_width, 120.0);
    assert!(!pad.has_pending_resize());
}

#[test]
fn resize_keeps_layer_positions() {
    let mut pad = EmojiPad::new(SurfaceInit::new(100.0, 80.0, 1.0), config(3), &SolidLoader).unwrap();
    let t0 = Instant::now();
    pad.handle_resize_at(50.0, 40.0, t0);
    let before: Vec<_> = pad.layers().layers().iter().map(|l| l.position).collect();
    pad.render_frame(t0 + Duration::from_secs(1)).unwrap();
    // Positions only moved by one motion step, never rescaled to the new size.
    for (l, p) in pad.layers().layers().iter().zip(before) {
        assert!((l.position - p).hypot() <= l.velocity.hypot() + 1e-9);
    }
}

#[test]
fn unusable_resize_does_not_break_rendering() {
    let mut pad = EmojiPad::new(SurfaceInit::new(100.0, 80.0, 1.0), config(2), &SolidLoader).unwrap();
    let t0 = Instant::now();
    pad.handle_resize_at(-10.0, 80.0, t0);
    let f = pad.render_frame(t0 + Duration::from_secs(1)).unwrap();
    assert_eq!((f.width, f.height), (100, 80));
    assert!(!pad.has_pending_resize());

    pad.handle_resize_at(f64::NAN, 80.0, t0 + Duration::from_secs(1));
    let f = pad.render_frame(t0 + Duration::from_secs(2)).unwrap();
    assert_eq!((f.width, f.height), (100, 80));
    assert_eq!(pad.frames_drawn(), 2);
}
