use super::*;

#[test]
fn pixel_size_rejects_empty_and_oversized() {
    assert!(PixelSize::new(0, 10).to_u16().is_err());
    assert!(PixelSize::new(10, 0).to_u16().is_err());
    assert!(PixelSize::new(70_000, 10).to_u16().is_err());
    assert_eq!(PixelSize::new(1600, 1200).to_u16().unwrap(), (1600, 1200));
}

#[test]
fn pixel_size_errors_are_surface_errors() {
    let err = PixelSize::new(0, 0).to_u16().unwrap_err();
    assert!(matches!(err, EmojiPadError::SurfaceUnavailable(_)));
}

#[test]
fn bounds_follow_pixel_size() {
    let b = Bounds::from(PixelSize::new(1600, 1200));
    assert_eq!(b.width, 1600.0);
    assert_eq!(b.height, 1200.0);
}

#[test]
fn premul_scales_color_by_alpha() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.a, 128);
    assert_eq!(c.r, 128);
    assert_eq!(c.g, 64);
    assert_eq!(c.b, 0);

    let opaque = Rgba8Premul::from_straight_rgba(138, 43, 226, 255);
    assert_eq!(opaque.to_array(), [138, 43, 226, 255]);
}
