use std::path::PathBuf;

use anyhow::Context as _;

use crate::foundation::error::EmojiPadResult;
use crate::render::FrameRGBA;

/// Geometry announced to a sink before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
}

/// Presentation boundary: receives every finished frame in order.
///
/// Frame size may change between frames after a resize.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> EmojiPadResult<()>;
    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> EmojiPadResult<()>;
    /// Called once after the last frame.
    fn end(&mut self) -> EmojiPadResult<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn begin(&mut self, cfg: SinkConfig) -> EmojiPadResult<()> {
        (**self).begin(cfg)
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> EmojiPadResult<()> {
        (**self).push_frame(idx, frame)
    }

    fn end(&mut self) -> EmojiPadResult<()> {
        (**self).end()
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    keep_last: Option<usize>,
    pushed: u64,
    ended: bool,
    /// Frames in presentation order.
    pub(crate) frames: Vec<(u64, FrameRGBA)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retain only the newest `n` frames.
    pub fn keep_last(n: usize) -> Self {
        Self {
            keep_last: Some(n.max(1)),
            ..Self::default()
        }
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    pub fn frames(&self) -> &[(u64, FrameRGBA)] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&FrameRGBA> {
        self.frames.last().map(|(_, f)| f)
    }

    /// Total frames received, including dropped ones.
    pub fn pushed(&self) -> u64 {
        self.pushed
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> EmojiPadResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.pushed = 0;
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> EmojiPadResult<()> {
        self.frames.push((idx, frame.clone()));
        self.pushed += 1;
        if let Some(n) = self.keep_last
            && self.frames.len() > n
        {
            let excess = self.frames.len() - n;
            self.frames.drain(..excess);
        }
        Ok(())
    }

    fn end(&mut self) -> EmojiPadResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes the last presented frame to a PNG file when the loop ends.
#[derive(Debug)]
pub struct PngSink {
    path: PathBuf,
    last: Option<FrameRGBA>,
}

impl PngSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last: None,
        }
    }
}

impl FrameSink for PngSink {
    fn begin(&mut self, _cfg: SinkConfig) -> EmojiPadResult<()> {
        self.last = None;
        Ok(())
    }

    fn push_frame(&mut self, _idx: u64, frame: &FrameRGBA) -> EmojiPadResult<()> {
        self.last = Some(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> EmojiPadResult<()> {
        let Some(frame) = self.last.take() else {
            tracing::warn!(path = %self.path.display(), "no frame presented, nothing written");
            return Ok(());
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            &self.path,
            &frame.to_unpremultiplied(),
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sink.rs"]
mod tests;
