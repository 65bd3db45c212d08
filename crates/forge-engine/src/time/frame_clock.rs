use std::time::{Duration, Instant};

/// Timing of one simulation step.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,
    /// Sum of every clamped `dt` so far. Pauses longer than the clamp do
    /// not count.
    pub elapsed: f32,
    pub now: Instant,
    pub frame_index: u64,
}

/// Produces [`FrameTime`]s with a clamped delta.
///
/// The lower clamp keeps `dt` non-zero when redraws come back to back; the
/// upper one keeps animations from jumping after a stall (debugger, window
/// drag, minimized surface).
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    elapsed: Duration,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            elapsed: Duration::ZERO,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Restarts delta measurement from now, e.g. when the app resumes.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;
        self.elapsed += dt;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: self.elapsed.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_clamped_both_ways() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(50));
        let start = clock.last;

        let ft = clock.tick_at(start);
        assert_eq!(ft.dt, 0.001);

        let ft = clock.tick_at(start + Duration::from_secs(5));
        assert_eq!(ft.dt, 0.05);
    }

    #[test]
    fn frame_index_and_elapsed_accumulate() {
        let mut clock = FrameClock::with_clamps(Duration::ZERO, Duration::from_secs(1));
        let start = clock.last;

        let a = clock.tick_at(start + Duration::from_millis(10));
        let b = clock.tick_at(start + Duration::from_millis(30));

        assert_eq!((a.frame_index, b.frame_index), (0, 1));
        assert!((b.elapsed - 0.030).abs() < 1e-6);
    }
}
