/// Convenience result type used across EmojiPad.
pub type EmojiPadResult<T> = Result<T, EmojiPadError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum EmojiPadError {
    /// A drawing surface or offscreen bitmap could not be acquired.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// A single sprite source failed to load or decode.
    #[error("asset load failure: {0}")]
    AssetLoad(String),

    /// Invalid configuration or control message data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal raster errors (mismatched buffers and the like).
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EmojiPadError {
    /// Build a [`EmojiPadError::SurfaceUnavailable`] value.
    pub fn surface_unavailable(msg: impl Into<String>) -> Self {
        Self::SurfaceUnavailable(msg.into())
    }

    /// Build a [`EmojiPadError::AssetLoad`] value.
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    /// Build a [`EmojiPadError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`EmojiPadError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Whether population may continue past this error by substituting a placeholder.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::AssetLoad(_) | Self::Other(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
