use super::*;
use crate::assets::decode::PreparedImage;
use crate::assets::palette::SpriteId;
use crate::foundation::core::{Point, Vec2};
use crate::sprite::SpriteRasterizer;
use crate::surface::SurfaceInit;

const BG: [u8; 4] = [138, 43, 226, 255];

fn red_layer(pos: (f64, f64), scale: f64, rotation: f64) -> Layer {
    let src = PreparedImage::from_premul(4, 4, [255u8, 0, 0, 255].repeat(16)).unwrap();
    Layer {
        bitmap: SpriteRasterizer::new(4, 0).rasterize(&src, false).unwrap(),
        sprite: SpriteId::new("red"),
        blurred: false,
        scale,
        position: Point::new(pos.0, pos.1),
        rotation,
        velocity: Vec2::new(1.0, 1.0),
        spin: 0.0,
    }
}

fn px(surface: &Surface, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * surface.size().width + x) * 4) as usize;
    let d = surface.data();
    [d[i], d[i + 1], d[i + 2], d[i + 3]]
}

fn is_bg(p: [u8; 4]) -> bool {
    p.iter().zip(BG).all(|(a, b)| a.abs_diff(b) <= 1)
}

fn is_red(p: [u8; 4]) -> bool {
    p[0] > 240 && p[1] < 15 && p[2] < 15 && p[3] == 255
}

#[test]
fn empty_stack_clears_to_background() {
    let mut surface = Surface::from_init(SurfaceInit::new(8.0, 8.0, 1.0)).unwrap();
    Compositor::new().draw(&mut surface, BG, &[]).unwrap();
    assert!(surface.data().chunks_exact(4).all(|p| is_bg([p[0], p[1], p[2], p[3]])));
}

#[test]
fn layer_is_centred_on_its_position() {
    let mut surface = Surface::from_init(SurfaceInit::new(40.0, 40.0, 1.0)).unwrap();
    let layers = vec![red_layer((20.0, 20.0), 1.0, 0.0)];
    Compositor::new().draw(&mut surface, BG, &layers).unwrap();

    assert!(is_red(px(&surface, 19, 19)));
    assert!(is_red(px(&surface, 20, 20)));
    assert!(is_bg(px(&surface, 16, 20)));
    assert!(is_bg(px(&surface, 23, 20)));
    assert!(is_bg(px(&surface, 0, 0)));
}

#[test]
fn scale_grows_the_footprint() {
    let mut surface = Surface::from_init(SurfaceInit::new(40.0, 40.0, 1.0)).unwrap();
    let layers = vec![red_layer((20.0, 20.0), 2.0, 0.0)];
    Compositor::new().draw(&mut surface, BG, &layers).unwrap();
    assert!(is_red(px(&surface, 16, 20)));
    assert!(is_bg(px(&surface, 13, 20)));
}

#[test]
fn later_layers_draw_on_top() {
    let mut surface = Surface::from_init(SurfaceInit::new(40.0, 40.0, 1.0)).unwrap();
    let mut top = red_layer((20.0, 20.0), 1.0, 0.0);
    let blue = PreparedImage::from_premul(4, 4, [0u8, 0, 255, 255].repeat(16)).unwrap();
    top.bitmap = SpriteRasterizer::new(4, 0).rasterize(&blue, false).unwrap();
    let layers = vec![red_layer((20.0, 20.0), 1.0, 0.0), top];
    Compositor::new().draw(&mut surface, BG, &layers).unwrap();
    let p = px(&surface, 20, 20);
    assert!(p[2] > 240 && p[0] < 15, "{p:?}");
}

#[test]
fn transform_maps_bitmap_centre_to_position() {
    let l = red_layer((30.0, 12.0), 1.7, 0.9);
    let c = layer_transform(&l) * Point::new(2.0, 2.0);
    assert!((c.x - 30.0).abs() < 1e-9 && (c.y - 12.0).abs() < 1e-9);
}

#[test]
fn context_survives_surface_resize() {
    let mut c = Compositor::new();
    let mut surface = Surface::from_init(SurfaceInit::new(10.0, 10.0, 1.0)).unwrap();
    c.draw(&mut surface, BG, &[]).unwrap();
    surface.resize_css(20.0, 5.0).unwrap();
    c.draw(&mut surface, BG, &[]).unwrap();
    assert_eq!(surface.data().len(), 20 * 5 * 4);
    assert!(surface.data().chunks_exact(4).all(|p| is_bg([p[0], p[1], p[2], p[3]])));
}

#[test]
fn snapshot_copies_pixels() {
    let mut surface = Surface::from_init(SurfaceInit::new(3.0, 2.0, 1.0)).unwrap();
    Compositor::new().draw(&mut surface, BG, &[]).unwrap();
    let f = snapshot(&surface);
    assert_eq!((f.width, f.height), (3, 2));
    assert!(f.premultiplied);
    assert_eq!(f.data, surface.data());
}
