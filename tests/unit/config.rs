use super::*;

#[test]
fn defaults_follow_screen_class() {
    let cfg = EmojiPadConfig::default();
    assert_eq!(cfg.resolved_layer_count(1280.0), 100);
    assert_eq!(cfg.resolved_layer_count(768.0), 50);
    assert_eq!(cfg.resolved_sprite_size(800.0, 600.0, 2.0), 160);
    assert_eq!(cfg.resolved_sprite_size(400.0, 700.0, 1.0), 140);
}

#[test]
fn explicit_values_win_over_derived_ones() {
    let cfg = EmojiPadConfig {
        layer_count: Some(10),
        sprite_size_px: Some(48),
        ..EmojiPadConfig::default()
    };
    assert_eq!(cfg.resolved_layer_count(300.0), 10);
    assert_eq!(cfg.resolved_sprite_size(800.0, 600.0, 3.0), 48);
}

#[test]
fn json_overrides_merge_with_defaults() {
    let cfg = EmojiPadConfig::from_json_str(r#"{ "layer_count": 12, "seed": 7 }"#).unwrap();
    assert_eq!(cfg.layer_count, Some(12));
    assert_eq!(cfg.seed, Some(7));
    assert_eq!(cfg.blur_radius, 3);
    assert_eq!(cfg.resize_debounce_ms, 500);
}

#[test]
fn json_rejects_unknown_fields_and_bad_values() {
    assert!(EmojiPadConfig::from_json_str(r#"{ "layers": 3 }"#).is_err());
    assert!(EmojiPadConfig::from_json_str(r#"{ "layer_count": 0 }"#).is_err());
    assert!(EmojiPadConfig::from_json_str(r#"{ "blur_fraction": 1.5 }"#).is_err());
    assert!(EmojiPadConfig::from_json_str(r#"{ "palette": [] }"#).is_err());
}

#[test]
fn background_defaults_to_blueviolet() {
    let cfg = EmojiPadConfig::default();
    assert_eq!(cfg.background_rgba, [138, 43, 226, 255]);
}

#[test]
fn custom_palette_is_resolved() {
    let cfg = EmojiPadConfig {
        palette: Some(vec!["a".into(), "b".into()]),
        ..EmojiPadConfig::default()
    };
    let p = cfg.resolved_palette().unwrap();
    assert_eq!(p.len(), 2);
}
