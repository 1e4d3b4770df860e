//! Time-based interpolation with easing curves.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    Linear,
    /// Quadratic slow end.
    #[default]
    EaseOut,
    /// Cubic slow end (`power3.out`).
    EaseOutCubic,
    /// Overshoots slightly before settling (`back.out`).
    BackOut,
}

impl Easing {
    /// Eased value for progress `t` in 0.0..=1.0.
    pub fn ease(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::BackOut => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
        }
    }
}

/// One run of an animation: waits `delay`, then goes from 0 to 1 over
/// `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    start: Instant,
    delay: Duration,
    duration: Duration,
    easing: Easing,
}

impl Tween {
    pub fn new(start: Instant, duration: Duration, easing: Easing) -> Self {
        Self { start, delay: Duration::ZERO, duration, easing }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Linear progress, 0.0 before the delay has passed, 1.0 once finished.
    pub fn raw(&self, now: Instant) -> f32 {
        let begin = self.start + self.delay;
        if now <= begin {
            return 0.0;
        }
        if self.duration.is_zero() {
            return 1.0;
        }
        (now.duration_since(begin).as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn progress(&self, now: Instant) -> f32 {
        self.easing.ease(self.raw(now))
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now >= self.start + self.delay + self.duration
    }
}
