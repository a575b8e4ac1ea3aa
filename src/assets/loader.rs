use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::decode::{PreparedImage, decode_image, decode_svg};
use crate::assets::palette::SpriteId;
use crate::foundation::core::{PixelSize, Rgba8Premul};
use crate::foundation::error::{EmojiPadError, EmojiPadResult};

/// Source of sprite pixels, addressed by [`SpriteId`].
///
/// Loads run on the population thread pool, so implementations must be shareable across threads.
/// A failed load is contained to its layer slot.
pub trait SpriteLoader: Send + Sync {
    /// Load the sprite for `id`, sized for a `size_px` square where the source is scalable.
    fn load(&self, id: &SpriteId, size_px: u32) -> EmojiPadResult<PreparedImage>;
}

impl<L: SpriteLoader + ?Sized> SpriteLoader for Arc<L> {
    fn load(&self, id: &SpriteId, size_px: u32) -> EmojiPadResult<PreparedImage> {
        (**self).load(id, size_px)
    }
}

/// Loads `<root>/<id>.<ext>` trying each configured extension in order.
#[derive(Clone, Debug)]
pub struct FsSpriteLoader {
    root: PathBuf,
    extensions: Vec<String>,
}

impl FsSpriteLoader {
    /// Loader over an emoji asset directory, preferring PNG and falling back to SVG.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: vec!["png".to_string(), "svg".to_string()],
        }
    }

    pub fn with_extensions<S: Into<String>>(mut self, exts: impl IntoIterator<Item = S>) -> Self {
        self.extensions = exts.into_iter().map(Into::into).collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn candidates(&self, id: &SpriteId) -> EmojiPadResult<Vec<(PathBuf, &str)>> {
        let stem = normalize_rel_path(id.as_str())?;
        Ok(self
            .extensions
            .iter()
            .map(|ext| (self.root.join(format!("{stem}.{ext}")), ext.as_str()))
            .collect())
    }
}

impl SpriteLoader for FsSpriteLoader {
    fn load(&self, id: &SpriteId, size_px: u32) -> EmojiPadResult<PreparedImage> {
        for (path, ext) in self.candidates(id)? {
            let bytes = match std::fs::read(&path) {
                Ok(b) => b,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(EmojiPadError::asset_load(format!(
                        "failed to read sprite '{}': {e}",
                        path.display()
                    )));
                }
            };
            let decoded = if ext.eq_ignore_ascii_case("svg") {
                decode_svg(&bytes, size_px.max(1))
            } else {
                decode_image(&bytes)
            };
            return decoded.map_err(|e| {
                EmojiPadError::asset_load(format!("failed to decode '{}': {e}", path.display()))
            });
        }
        Err(EmojiPadError::asset_load(format!(
            "no sprite file for '{id}' under '{}'",
            self.root.display()
        )))
    }
}

/// Renders sprites as font glyphs: code point ids (`1f600`) become their characters, any other
/// id is shaped as literal text.
#[derive(Clone)]
pub struct GlyphSpriteLoader {
    font: vello_cpu::peniko::FontData,
    color: [u8; 4],
}

impl GlyphSpriteLoader {
    pub fn new(font_bytes: Vec<u8>) -> Self {
        Self {
            font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0),
            color: [255, 255, 255, 255],
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> EmojiPadResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            EmojiPadError::validation(format!("read font '{}': {e}", path.display()))
        })?;
        Ok(Self::new(bytes))
    }

    pub fn with_color(mut self, rgba: [u8; 4]) -> Self {
        self.color = rgba;
        self
    }
}

impl SpriteLoader for GlyphSpriteLoader {
    fn load(&self, id: &SpriteId, size_px: u32) -> EmojiPadResult<PreparedImage> {
        let text = id.to_glyph_text().unwrap_or_else(|| id.as_str().to_string());
        rasterize_glyph_text(&text, &self.font, size_px, self.color)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct GlyphBrush {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

/// Parley contexts reused across loads on one thread.
///
/// Families are registered once per font blob, keyed by the blob id.
struct GlyphShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<GlyphBrush>,
    families: HashMap<u64, String>,
}

impl GlyphShaper {
    fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_name(&mut self, font: &vello_cpu::peniko::FontData) -> EmojiPadResult<String> {
        if let Some(name) = self.families.get(&font.data.id()) {
            return Ok(name.clone());
        }
        let families = self.font_ctx.collection.register_fonts(font.data.clone(), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            EmojiPadError::asset_load("no font families registered from font bytes")
        })?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| EmojiPadError::asset_load("registered font family has no name"))?
            .to_string();
        self.families.insert(font.data.id(), name.clone());
        Ok(name)
    }

    fn layout(
        &mut self,
        text: &str,
        font: &vello_cpu::peniko::FontData,
        size_px: f32,
        brush: GlyphBrush,
    ) -> EmojiPadResult<parley::Layout<GlyphBrush>> {
        let family_name = self.family_name(font)?;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));
        let mut layout: parley::Layout<GlyphBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

thread_local! {
    static GLYPH_SHAPER: RefCell<GlyphShaper> = RefCell::new(GlyphShaper::new());
}

fn rasterize_glyph_text(
    text: &str,
    font: &vello_cpu::peniko::FontData,
    size_px: u32,
    color: [u8; 4],
) -> EmojiPadResult<PreparedImage> {
    let (w16, h16) = PixelSize::new(size_px, size_px).to_u16()?;

    let [r, g, b, a] = color;
    let brush = GlyphBrush { r, g, b, a };
    let layout =
        GLYPH_SHAPER.with_borrow_mut(|shaper| shaper.layout(text, font, size_px as f32, brush))?;

    let lw = f64::from(layout.width());
    let lh = f64::from(layout.height());
    if text.trim().is_empty() || !(lw > 0.0 && lh > 0.0) {
        return Err(EmojiPadError::asset_load(format!(
            "glyph text '{text}' produced an empty layout"
        )));
    }

    // Fit the laid-out text into the square, centred.
    let side = f64::from(size_px);
    let fit = (side / lw).min(side / lh);
    let tr = vello_cpu::kurbo::Affine::translate(((side - lw * fit) / 2.0, (side - lh * fit) / 2.0))
        * vello_cpu::kurbo::Affine::scale(fit);

    let mut ctx = vello_cpu::RenderContext::new(w16, h16);
    ctx.set_transform(tr);
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
    ctx.render_to_pixmap(&mut pixmap);
    PreparedImage::from_premul(size_px, size_px, pixmap.data_as_u8_slice().to_vec())
}

/// Stand-in sprite for slots whose source failed to load: a soft disc in `fill`.
pub fn placeholder_sprite(size_px: u32, fill: Rgba8Premul) -> EmojiPadResult<PreparedImage> {
    use vello_cpu::kurbo::Shape;

    let (w16, h16) = PixelSize::new(size_px, size_px).to_u16()?;
    let side = f64::from(size_px);
    let disc = vello_cpu::kurbo::Circle::new((side / 2.0, side / 2.0), side * 0.45);

    let mut ctx = vello_cpu::RenderContext::new(w16, h16);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        fill.r, fill.g, fill.b, fill.a,
    ));
    ctx.fill_path(&disc.to_path(0.1));
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
    ctx.render_to_pixmap(&mut pixmap);
    PreparedImage::from_premul(size_px, size_px, pixmap.data_as_u8_slice().to_vec())
}

/// Normalize and validate a sprite path relative to the asset root.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub(crate) fn normalize_rel_path(source: &str) -> EmojiPadResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(EmojiPadError::validation("sprite paths must be relative"));
    }
    if s.is_empty() {
        return Err(EmojiPadError::validation("sprite id must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(EmojiPadError::validation("sprite paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(EmojiPadError::validation(
            "sprite path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
