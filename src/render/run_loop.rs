use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use crate::foundation::error::{EmojiPadError, EmojiPadResult};
use crate::pad::EmojiPad;
use crate::render::scheduler::FrameScheduler;
use crate::render::sink::{FrameSink, SinkConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Uninitialized,
    Running,
    Terminated,
}

/// Drives an [`EmojiPad`] frame by frame into a sink.
///
/// One full pass per scheduled frame; no frames are skipped. The liveness flag is checked before
/// every reschedule and once more after the scheduler wakes.
pub struct RenderLoop<S, F> {
    pad: EmojiPad,
    sink: S,
    scheduler: F,
    alive: Arc<AtomicBool>,
    state: LoopState,
    frame_idx: u64,
    frame_limit: Option<u64>,
}

impl<S: FrameSink, F: FrameScheduler> RenderLoop<S, F> {
    pub fn new(pad: EmojiPad, sink: S, scheduler: F) -> Self {
        Self {
            pad,
            sink,
            scheduler,
            alive: Arc::new(AtomicBool::new(true)),
            state: LoopState::Uninitialized,
            frame_idx: 0,
            frame_limit: None,
        }
    }

    /// Terminate on its own after `frames` frames.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn pad(&self) -> &EmojiPad {
        &self.pad
    }

    pub fn pad_mut(&mut self) -> &mut EmojiPad {
        &mut self.pad
    }

    pub fn frames_presented(&self) -> u64 {
        self.frame_idx
    }

    /// Clear the liveness flag; the loop terminates at its next check.
    pub fn stop(&self) {
        self.alive.store(false, Ordering::Release);
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
            && self.frame_limit.is_none_or(|limit| self.frame_idx < limit)
    }

    /// `Uninitialized -> Running`. Announces the surface size to the sink.
    pub fn start(&mut self) -> EmojiPadResult<()> {
        if self.state != LoopState::Uninitialized {
            return Ok(());
        }
        let size = self.pad.surface().size();
        self.sink.begin(SinkConfig {
            width: size.width,
            height: size.height,
        })?;
        self.state = LoopState::Running;
        Ok(())
    }

    /// Wait for the scheduler, render and present one frame.
    ///
    /// Returns `false` once the loop has terminated.
    pub fn step(&mut self) -> EmojiPadResult<bool> {
        if self.state != LoopState::Running {
            return Ok(false);
        }
        if !self.is_alive() {
            self.finish()?;
            return Ok(false);
        }
        let now = self.scheduler.next_frame();
        if !self.is_alive() {
            self.finish()?;
            return Ok(false);
        }
        let frame = self.pad.render_frame(now)?;
        self.sink.push_frame(self.frame_idx, &frame)?;
        self.frame_idx += 1;
        Ok(true)
    }

    /// `Running -> Terminated`. Idempotent.
    pub fn finish(&mut self) -> EmojiPadResult<()> {
        if self.state == LoopState::Running {
            self.state = LoopState::Terminated;
            tracing::debug!(frames = self.frame_idx, "render loop terminated");
            self.sink.end()?;
        }
        self.state = LoopState::Terminated;
        Ok(())
    }

    /// Run on the current thread until stopped. Returns the sink.
    pub fn run(mut self) -> EmojiPadResult<S> {
        self.start()?;
        loop {
            match self.step() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    self.state = LoopState::Terminated;
                    return Err(e);
                }
            }
        }
        self.into_sink()
    }

    /// Run on a dedicated thread. Dropping the returned handle stops the loop.
    pub fn spawn(self) -> EmojiPadResult<RenderHandle<S>>
    where
        S: 'static,
        F: 'static,
    {
        let alive = Arc::clone(&self.alive);
        let thread = std::thread::Builder::new()
            .name("emojipad-render".to_string())
            .spawn(move || self.run())
            .map_err(|e| EmojiPadError::render(format!("spawn render thread: {e}")))?;
        Ok(RenderHandle {
            alive,
            thread: Some(thread),
        })
    }

    /// Share an externally owned liveness flag.
    pub(crate) fn with_liveness(mut self, alive: Arc<AtomicBool>) -> Self {
        self.alive = alive;
        self
    }

    /// Give back the sink, ending it first if the loop is still running.
    pub fn into_sink(mut self) -> EmojiPadResult<S> {
        self.finish()?;
        Ok(self.sink)
    }
}

/// Cancellation handle for a loop running on its own thread.
#[derive(Debug)]
pub struct RenderHandle<S> {
    alive: Arc<AtomicBool>,
    thread: Option<JoinHandle<EmojiPadResult<S>>>,
}

impl<S> RenderHandle<S> {
    pub(crate) fn from_parts(alive: Arc<AtomicBool>, thread: JoinHandle<EmojiPadResult<S>>) -> Self {
        Self {
            alive,
            thread: Some(thread),
        }
    }

    pub fn stop(&self) {
        self.alive.store(false, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(|t| t.is_finished())
    }

    /// Wait for the loop to end. Returns the sink, or the error that ended the loop.
    pub fn join(mut self) -> EmojiPadResult<S> {
        let thread = self
            .thread
            .take()
            .ok_or_else(|| EmojiPadError::render("render thread already joined"))?;
        thread
            .join()
            .map_err(|_| EmojiPadError::render("render thread panicked"))?
    }
}

impl<S> Drop for RenderHandle<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/run_loop.rs"]
mod tests;
