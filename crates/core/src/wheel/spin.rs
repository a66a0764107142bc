//! Spin parameters and the eased rotation curve

use std::f64::consts::TAU;
use std::time::Duration;

use rand::Rng;

use super::geometry::{normalize_angle, rotation_for};

/// How a spin looks: how far it travels and how long it takes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinProfile {
    /// Minimum number of full turns
    pub base_spins: f64,
    /// Random extra turns added on top of `base_spins`
    pub spin_jitter: f64,
    pub duration: Duration,
}

impl SpinProfile {
    /// Single draw: 5 to 10 turns over four seconds
    pub const SINGLE: Self = Self {
        base_spins: 5.0,
        spin_jitter: 5.0,
        duration: Duration::from_millis(4000),
    };

    /// One sequential cycle: 3 to 5 turns over two seconds
    pub const SEQUENTIAL: Self = Self {
        base_spins: 3.0,
        spin_jitter: 2.0,
        duration: Duration::from_millis(2000),
    };

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Random total rotation.
    ///
    /// The final `U * 2π` term makes the resting angle uniform on `[0, 2π)`
    /// whatever the number of turns, so every equal-width segment is equally
    /// likely to end under the pointer.
    pub fn total_rotation<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let turns = self.base_spins + rng.gen::<f64>() * self.spin_jitter;
        turns * TAU + rng.gen::<f64>() * TAU
    }

    /// Random travel from `from` that comes to rest inside segment `index`.
    ///
    /// The landing point is drawn from the middle 80% of the segment so the
    /// pointer never rests on a border.
    pub fn rotation_landing_on<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        from: f64,
        segment_count: usize,
        index: usize,
    ) -> f64 {
        let turns = (self.base_spins + rng.gen::<f64>() * self.spin_jitter).floor();
        let fraction = 0.1 + rng.gen::<f64>() * 0.8;
        let target = rotation_for(segment_count, index, fraction);
        turns * TAU + normalize_angle(target - normalize_angle(from))
    }
}

/// Ease-out cubic on normalized progress `[0, 1]`
pub fn ease_out_cubic(progress: f64) -> f64 {
    let progress = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - progress).powi(3)
}

/// A single eased rotation of `total_rotation` radians starting at `from`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinAnimation {
    started_at: Duration,
    from: f64,
    total_rotation: f64,
    duration: Duration,
}

impl SpinAnimation {
    pub fn new(started_at: Duration, from: f64, total_rotation: f64, duration: Duration) -> Self {
        Self {
            started_at,
            from,
            total_rotation,
            duration,
        }
    }

    pub fn total_rotation(&self) -> f64 {
        self.total_rotation
    }

    /// Resting angle once the animation has finished
    pub fn final_angle(&self) -> f64 {
        self.from + self.total_rotation
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Progress in `[0, 1]` at time `now`
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Displayed rotation at time `now`; exactly [`Self::final_angle`] once finished
    pub fn angle_at(&self, now: Duration) -> f64 {
        if self.is_finished(now) {
            return self.final_angle();
        }
        self.from + self.total_rotation * ease_out_cubic(self.progress(now))
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        now.saturating_sub(self.started_at) >= self.duration
    }
}
