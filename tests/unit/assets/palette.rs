use super::*;

#[test]
fn default_palette_has_site_emoji() {
    let p = SpritePalette::default();
    assert_eq!(p.len(), DEFAULT_EMOJI_CODES.len());
    assert_eq!(p.get(0).unwrap().as_str(), "1f0cf");
    assert!(p.get(p.len()).is_none());
}

#[test]
fn default_palette_ids_are_unique() {
    let mut ids: Vec<_> = SpritePalette::default().iter().cloned().collect();
    let n = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), n);
}

#[test]
fn empty_palette_is_rejected() {
    let empty: [&str; 0] = [];
    assert!(SpritePalette::from_codes(&empty).is_err());
}

#[test]
fn code_point_ids_decode_to_text() {
    assert_eq!(
        SpriteId::new("1f600").to_glyph_text().as_deref(),
        Some("\u{1f600}")
    );
    assert_eq!(
        SpriteId::new("263a-fe0f").to_glyph_text().as_deref(),
        Some("\u{263a}\u{fe0f}")
    );
    assert_eq!(SpriteId::new("smile").to_glyph_text(), None);
}
