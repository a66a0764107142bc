//! Frame scheduling
//!
//! The animation only ever asks "what time is the next frame". Front ends
//! provide a real-time scheduler; tests use [`FixedStepScheduler`].

use std::time::Duration;

/// Source of animation frame timestamps
pub trait FrameScheduler {
    /// Current time since the scheduler epoch
    fn now(&self) -> Duration;

    /// Yield until the next frame and return its timestamp
    fn next_frame(&mut self) -> Duration;
}

/// Deterministic scheduler that advances a virtual clock by a fixed step
/// without sleeping
#[derive(Debug, Clone)]
pub struct FixedStepScheduler {
    now: Duration,
    step: Duration,
    frames: u64,
}

impl FixedStepScheduler {
    pub fn new(step: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            step,
            frames: 0,
        }
    }

    /// Number of frames handed out so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for FixedStepScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(16))
    }
}

impl FrameScheduler for FixedStepScheduler {
    fn now(&self) -> Duration {
        self.now
    }

    fn next_frame(&mut self) -> Duration {
        self.now += self.step;
        self.frames += 1;
        self.now
    }
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for &mut S {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn next_frame(&mut self) -> Duration {
        (**self).next_frame()
    }
}
