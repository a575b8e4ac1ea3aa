use std::time::{Duration, Instant};

/// Host per-frame callback facility.
///
/// `next_frame` blocks until the next frame should be produced and returns its timestamp.
pub trait FrameScheduler: Send {
    fn next_frame(&mut self) -> Instant;
}

/// Fixed-interval pacing, 60 Hz by default.
#[derive(Debug)]
pub struct IntervalScheduler {
    interval: Duration,
    next: Option<Instant>,
}

impl IntervalScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    pub fn hz(rate: u32) -> Self {
        Self::new(Duration::from_secs(1) / rate.max(1))
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::hz(60)
    }
}

impl FrameScheduler for IntervalScheduler {
    fn next_frame(&mut self) -> Instant {
        let now = Instant::now();
        let target = match self.next {
            Some(t) if t > now => {
                std::thread::sleep(t - now);
                t
            }
            Some(t) => {
                // Late: resync instead of bursting to catch up.
                if now.duration_since(t) > self.interval { now } else { t }
            }
            None => now,
        };
        self.next = Some(target + self.interval);
        target.max(now)
    }
}

/// No pacing; every call returns immediately. Used headless and in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateScheduler;

impl FrameScheduler for ImmediateScheduler {
    fn next_frame(&mut self) -> Instant {
        Instant::now()
    }
}
