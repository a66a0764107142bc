//! Real-time frame scheduler for the terminal

use std::thread;
use std::time::{Duration, Instant};

use rapat_core::wheel::FrameScheduler;

/// Sleeps between frames so the animation plays at wall-clock speed
pub struct TerminalScheduler {
    epoch: Instant,
    interval: Duration,
}

impl TerminalScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            epoch: Instant::now(),
            interval,
        }
    }
}

impl FrameScheduler for TerminalScheduler {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn next_frame(&mut self) -> Duration {
        thread::sleep(self.interval);
        self.now()
    }
}
