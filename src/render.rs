//! Frame production: compositing, presentation sinks, scheduling and the loop itself.

pub mod compositor;
pub mod run_loop;
pub mod scheduler;
pub mod sink;

pub use compositor::Compositor;
pub use run_loop::{LoopState, RenderHandle, RenderLoop};
pub use scheduler::{FrameScheduler, ImmediateScheduler, IntervalScheduler};
pub use sink::{FrameSink, InMemorySink, PngSink, SinkConfig};

/// One presented frame.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy of the pixels, for encoders that expect it.
    pub fn to_unpremultiplied(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_in_place(&mut out);
        }
        out
    }
}

pub(crate) fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}
