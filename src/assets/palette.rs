use std::fmt;
use std::sync::Arc;

use crate::foundation::error::{EmojiPadError, EmojiPadResult};

/// Twemoji code points shipped with the site's `/assets/emoji` directory.
pub const DEFAULT_EMOJI_CODES: &[&str] = &[
    "1f0cf", "1f30d", "1f31d", "1f336-fe0f", "1f346", "1f34a", "1f34b", "1f34c", "1f351", "1f355",
    "1f369", "1f36a", "1f37f", "1f389", "1f3b2", "1f3b7", "1f3b8", "1f3c2", "1f3c6", "1f419",
    "1f42d", "1f437", "1f438", "1f44c", "1f47b", "1f47d", "1f47e", "1f480", "1f48e", "1f4a3",
    "1f4a9", "1f4ce", "1f4e3", "1f52a", "1f52b", "1f600", "1f602", "1f606", "1f607", "1f609",
    "1f60d", "1f610", "1f618", "1f61b", "1f621", "1f626", "1f628", "1f62c", "1f62d", "1f62e",
    "1f631", "1f633", "1f634", "1f636", "1f637", "1f644", "1f680", "1f6b2", "1f6f8", "1f6f9",
    "1f6fc", "1f911", "1f912", "1f913", "1f914", "1f916", "1f91f", "1f921", "1f923", "1f924",
    "1f929", "1f92a", "1f92b", "1f92c", "1f92e", "1f92f", "1f951", "1f955", "1f95e", "1f965",
    "1f96b", "1f970", "1f972", "1f973", "1f975", "1f976", "1f980", "1f981", "1f984", "1f98a",
    "1f98b", "1f9c0", "1f9c1", "1f9da", "1f9dc-200d-2640-fe0f", "1f9e0", "1fa82", "1fa99",
    "1fab2", "1fad2", "263a-fe0f", "2693", "270c-fe0f",
];

/// Identifier of one selectable sprite: an asset file stem (`1f600`) or a glyph string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SpriteId(pub String);

impl SpriteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode a dash-separated hex code point sequence (`1f9dc-200d-2640-fe0f`) into text.
    ///
    /// Returns `None` when the id is not a code point sequence.
    pub fn to_glyph_text(&self) -> Option<String> {
        self.0
            .split('-')
            .map(|part| u32::from_str_radix(part, 16).ok().and_then(char::from_u32))
            .collect()
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, immutable catalog of sprite identifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpritePalette {
    ids: Arc<[SpriteId]>,
}

impl Default for SpritePalette {
    fn default() -> Self {
        Self {
            ids: DEFAULT_EMOJI_CODES.iter().map(|&c| SpriteId::new(c)).collect(),
        }
    }
}

impl SpritePalette {
    pub fn new(ids: impl IntoIterator<Item = SpriteId>) -> EmojiPadResult<Self> {
        let ids: Arc<[SpriteId]> = ids.into_iter().collect();
        if ids.is_empty() {
            return Err(EmojiPadError::validation("sprite palette must be non-empty"));
        }
        Ok(Self { ids })
    }

    pub fn from_codes<S: AsRef<str>>(codes: &[S]) -> EmojiPadResult<Self> {
        Self::new(codes.iter().map(|c| SpriteId::new(c.as_ref())))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SpriteId> {
        self.ids.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpriteId> {
        self.ids.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/palette.rs"]
mod tests;
