//! Dual-context topology: the render loop runs on a worker thread that owns the surface.
//!
//! The host talks to the worker only through a FIFO channel of [`WorkerMessage`]s.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use crate::assets::loader::SpriteLoader;
use crate::config::EmojiPadConfig;
use crate::foundation::error::{EmojiPadError, EmojiPadResult};
use crate::pad::EmojiPad;
use crate::render::run_loop::{RenderHandle, RenderLoop};
use crate::render::scheduler::FrameScheduler;
use crate::render::sink::FrameSink;
use crate::surface::{Surface, SurfaceInit};

const INIT_POLL: Duration = Duration::from_millis(20);

/// Host to worker messages.
#[derive(Debug)]
pub enum WorkerMessage {
    /// Hands the surface to the worker. Without a surface the worker allocates its own.
    Init {
        surface: Option<Surface>,
        width: f64,
        height: f64,
        ratio: f64,
    },
    Resize {
        width: f64,
        height: f64,
    },
}

#[derive(serde::Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
enum Envelope {
    Init {
        width: f64,
        height: f64,
        #[serde(default = "default_ratio")]
        ratio: f64,
    },
    Resize {
        width: f64,
        height: f64,
    },
}

fn default_ratio() -> f64 {
    1.0
}

impl WorkerMessage {
    pub fn init(surface: Surface, init: SurfaceInit) -> Self {
        Self::Init {
            surface: Some(surface),
            width: init.css_width,
            height: init.css_height,
            ratio: init.device_pixel_ratio,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::Resize { .. } => "resize",
        }
    }

    /// Decode a `{ "name": ..., ... }` envelope.
    ///
    /// Unknown names decode to `None`. A known name with missing or mistyped fields is a
    /// validation error.
    pub fn from_json(json: &str) -> EmojiPadResult<Option<Self>> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| EmojiPadError::validation(format!("parse worker message: {e}")))?;
        match value.get("name").and_then(serde_json::Value::as_str) {
            Some("init" | "resize") => {}
            other => {
                tracing::trace!(name = ?other, "ignoring unrecognised worker message");
                return Ok(None);
            }
        }
        let env: Envelope = serde_json::from_value(value)
            .map_err(|e| EmojiPadError::validation(format!("worker message fields: {e}")))?;
        Ok(Some(match env {
            Envelope::Init {
                width,
                height,
                ratio,
            } => Self::Init {
                surface: None,
                width,
                height,
                ratio,
            },
            Envelope::Resize { width, height } => Self::Resize { width, height },
        }))
    }
}

/// Host-side handle to a worker thread running an [`EmojiPad`].
#[derive(Debug)]
pub struct WorkerHandle<S> {
    tx: Sender<WorkerMessage>,
    render: RenderHandle<S>,
}

impl<S: FrameSink + 'static> WorkerHandle<S> {
    /// Start the worker. It idles until an `init` message arrives.
    pub fn spawn<F: FrameScheduler + 'static>(
        config: EmojiPadConfig,
        loader: Arc<dyn SpriteLoader>,
        sink: S,
        scheduler: F,
    ) -> EmojiPadResult<Self> {
        config.validate()?;
        let (tx, rx) = mpsc::channel();
        let alive = Arc::new(AtomicBool::new(true));
        let worker_alive = Arc::clone(&alive);
        let thread = std::thread::Builder::new()
            .name("emojipad-worker".to_string())
            .spawn(move || worker_main(rx, worker_alive, config, loader, sink, scheduler))
            .map_err(|e| EmojiPadError::render(format!("spawn worker thread: {e}")))?;
        Ok(Self {
            tx,
            render: RenderHandle::from_parts(alive, thread),
        })
    }

    pub fn post(&self, msg: WorkerMessage) -> EmojiPadResult<()> {
        self.tx
            .send(msg)
            .map_err(|e| EmojiPadError::render(format!("worker has exited; dropped '{}'", e.0.name())))
    }

    /// Decode and post a JSON envelope. Returns `false` for unrecognised messages.
    pub fn post_json(&self, json: &str) -> EmojiPadResult<bool> {
        match WorkerMessage::from_json(json)? {
            Some(msg) => self.post(msg).map(|()| true),
            None => Ok(false),
        }
    }

    pub fn stop(&self) {
        self.render.stop();
    }

    pub fn is_finished(&self) -> bool {
        self.render.is_finished()
    }

    /// Close the channel and wait for the worker. Returns its sink, or the error that ended it.
    pub fn join(self) -> EmojiPadResult<S> {
        let Self { tx, render } = self;
        drop(tx);
        render.join()
    }
}

fn worker_main<S: FrameSink, F: FrameScheduler>(
    rx: Receiver<WorkerMessage>,
    alive: Arc<AtomicBool>,
    config: EmojiPadConfig,
    loader: Arc<dyn SpriteLoader>,
    sink: S,
    scheduler: F,
) -> EmojiPadResult<S> {
    let (surface, init) = loop {
        if !alive.load(Ordering::Acquire) {
            return Ok(sink);
        }
        match rx.recv_timeout(INIT_POLL) {
            Ok(WorkerMessage::Init {
                surface,
                width,
                height,
                ratio,
            }) => break (surface, SurfaceInit::new(width, height, ratio)),
            Ok(other) => {
                tracing::warn!(name = other.name(), "message before init ignored");
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Ok(sink),
        }
    };

    let surface = match surface {
        Some(s) => s.adopt(init)?,
        None => Surface::from_init(init)?,
    };
    let pad = EmojiPad::with_surface(surface, config, loader.as_ref())?;
    let mut lp = RenderLoop::new(pad, sink, scheduler).with_liveness(alive);
    lp.start()?;

    loop {
        drain_messages(&rx, &mut lp);
        if !lp.step()? {
            break;
        }
    }
    lp.into_sink()
}

fn drain_messages<S: FrameSink, F: FrameScheduler>(
    rx: &Receiver<WorkerMessage>,
    lp: &mut RenderLoop<S, F>,
) {
    loop {
        match rx.try_recv() {
            Ok(WorkerMessage::Resize { width, height }) => {
                lp.pad_mut().handle_resize(width, height);
            }
            Ok(WorkerMessage::Init { .. }) => {
                tracing::warn!("duplicate init ignored");
            }
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                lp.stop();
                return;
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/worker.rs"]
mod tests;
