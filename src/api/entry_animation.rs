use std::f32::consts::PI;
use std::time::{Duration, Instant};

/// Length of the y-scale ramp played after an animated refresh.
pub const ENTRY_ANIMATION_DURATION: Duration = Duration::from_millis(600);

/// Accelerate-decelerate easing for `t` in `[0, 1]`.
#[must_use]
pub fn accelerate_decelerate(t: f32) -> f32 {
    ((t + 1.0) * PI).cos() / 2.0 + 0.5
}

/// y-scale ramp from 0 to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryAnimation {
    started_at: Instant,
    duration: Duration,
}

impl EntryAnimation {
    #[must_use]
    pub fn start(now: Instant) -> Self {
        Self {
            started_at: now,
            duration: ENTRY_ANIMATION_DURATION,
        }
    }

    #[must_use]
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn y_scale_at(&self, now: Instant) -> f32 {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return 1.0;
        }
        accelerate_decelerate(progress)
    }

    #[must_use]
    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}
