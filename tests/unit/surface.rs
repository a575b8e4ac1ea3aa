use super::*;

#[test]
fn state_scales_css_by_ratio() {
    let s = SurfaceState::from_css(800.0, 600.0, 2.0).unwrap();
    assert_eq!(s.size, PixelSize::new(1600, 1200));
    let s = SurfaceState::from_css(333.0, 10.0, 1.5).unwrap();
    assert_eq!(s.size, PixelSize::new(500, 15));
}

#[test]
fn state_rejects_bad_ratio() {
    assert!(SurfaceState::from_css(10.0, 10.0, 0.0).is_err());
    assert!(SurfaceState::from_css(10.0, 10.0, f64::NAN).is_err());
    assert!(SurfaceState::from_css(-1.0, 10.0, 1.0).is_err());
}

#[test]
fn empty_surface_is_unavailable() {
    let err = Surface::from_init(SurfaceInit::new(0.0, 100.0, 1.0)).unwrap_err();
    assert!(matches!(err, EmojiPadError::SurfaceUnavailable(_)));
}

#[test]
fn surface_allocates_device_pixels() {
    let s = Surface::from_init(SurfaceInit::new(40.0, 30.0, 2.0)).unwrap();
    assert_eq!(s.size(), PixelSize::new(80, 60));
    assert_eq!(s.data().len(), 80 * 60 * 4);
}

#[test]
fn debouncer_applies_last_signal_after_quiet_period() {
    let t0 = Instant::now();
    let ms = Duration::from_millis;
    let mut d = ResizeDebouncer::new(ms(500));

    d.signal(100.0, 100.0, t0);
    d.signal(200.0, 150.0, t0 + ms(100));
    d.signal(300.0, 250.0, t0 + ms(300));

    assert_eq!(d.take_due(t0 + ms(500)), None);
    assert_eq!(d.take_due(t0 + ms(799)), None);
    assert_eq!(d.take_due(t0 + ms(800)), Some((300.0, 250.0)));
    assert_eq!(d.take_due(t0 + ms(2000)), None);
    assert!(!d.is_pending());
}

#[test]
fn manager_resizes_once_per_burst() {
    let t0 = Instant::now();
    let ms = Duration::from_millis;
    let surface = Surface::from_init(SurfaceInit::new(100.0, 100.0, 2.0)).unwrap();
    let mut m = SurfaceManager::new(surface, ms(500));

    for k in 0..5u64 {
        m.signal_resize(100.0 + k as f64, 50.0, t0 + ms(k * 50));
    }
    assert!(!m.apply_due(t0 + ms(300)).unwrap());
    assert!(m.apply_due(t0 + ms(700)).unwrap());
    assert_eq!(m.surface().size(), PixelSize::new(208, 100));
    assert!(!m.apply_due(t0 + ms(5000)).unwrap());
}

#[test]
fn manager_ignores_resize_to_nothing() {
    let t0 = Instant::now();
    let surface = Surface::from_init(SurfaceInit::new(10.0, 10.0, 1.0)).unwrap();
    let mut m = SurfaceManager::new(surface, Duration::ZERO);
    m.signal_resize(0.0, 0.0, t0);
    assert!(!m.apply_due(t0).unwrap());
    assert_eq!(m.surface().size(), PixelSize::new(10, 10));
}

#[test]
fn adopted_surface_takes_reported_geometry() {
    let s = Surface::from_init(SurfaceInit::new(10.0, 10.0, 1.0)).unwrap();
    let s = s.adopt(SurfaceInit::new(30.0, 20.0, 2.0)).unwrap();
    assert_eq!(s.size(), PixelSize::new(60, 40));
    assert_eq!(s.state().device_pixel_ratio, 2.0);

    let same = s.adopt(SurfaceInit::new(60.0, 40.0, 1.0)).unwrap();
    assert_eq!(same.size(), PixelSize::new(60, 40));
    assert_eq!(same.state().css_width, 60.0);
}

#[test]
fn manager_ignores_unusable_resizes() {
    let t0 = Instant::now();
    let surface = Surface::from_init(SurfaceInit::new(10.0, 10.0, 1.0)).unwrap();
    let mut m = SurfaceManager::new(surface, Duration::ZERO);
    for (w, h) in [(-10.0, 80.0), (f64::NAN, 80.0), (70000.0, 80.0), (f64::INFINITY, 5.0)] {
        m.signal_resize(w, h, t0);
        assert!(!m.apply_due(t0).unwrap(), "{w}x{h}");
        assert_eq!(m.surface().size(), PixelSize::new(10, 10));
    }
    m.signal_resize(12.0, 8.0, t0);
    assert!(m.apply_due(t0).unwrap());
    assert_eq!(m.surface().size(), PixelSize::new(12, 8));
}
