use std::time::{Duration, Instant};

/// Frame timing snapshot handed to the fill stage.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped (see [`FrameClock`]).
    pub dt: f32,

    /// Time since the clock was created.
    pub elapsed: Duration,

    /// Monotonic frame counter, starting at 0.
    pub frame_index: u64,
}

impl FrameTime {
    /// Snapshot for a single frame produced outside the display loop.
    pub fn first() -> Self {
        Self {
            dt: 0.0,
            elapsed: Duration::ZERO,
            frame_index: 0,
        }
    }
}

/// Produces `FrameTime` snapshots and a rolling frame rate.
///
/// Delta time is clamped so a stall (debugger, minimized window) does not
/// hand a huge `dt` to the fill stage.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,

    window_start: Instant,
    window_frames: u32,
    fps: f32,
}

/// How often the rolling frame rate is recomputed.
const FPS_WINDOW: Duration = Duration::from_secs(1);

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
            window_start: now,
            window_frames: 0,
            fps: 0.0,
        }
    }

    /// Advances the clock and returns the snapshot for the frame about to be drawn.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        self.window_frames += 1;
        let window = now.saturating_duration_since(self.window_start);
        if window >= FPS_WINDOW {
            self.fps = self.window_frames as f32 / window.as_secs_f32();
            self.window_frames = 0;
            self.window_start = now;
            log::debug!("frame {}: {:.1} fps", self.frame_index, self.fps);
        }

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start),
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }

    /// Frames per second over the last completed window, 0 until one completes.
    pub fn fps(&self) -> f32 {
        self.fps
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
    fn frame_index_counts_from_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn dt_is_clamped_to_the_configured_range() {
        let min = Duration::from_millis(1);
        let max = Duration::from_millis(50);
        let mut clock = FrameClock::with_clamps(min, max);
        let t0 = clock.start;

        let ft = clock.tick_at(t0);
        assert_eq!(ft.dt, min.as_secs_f32());

        let ft = clock.tick_at(t0 + Duration::from_secs(10));
        assert_eq!(ft.dt, max.as_secs_f32());
        assert_eq!(ft.elapsed, Duration::from_secs(10));
    }

    #[test]
    fn fps_is_reported_after_a_full_window() {
        let mut clock = FrameClock::new();
        let t0 = clock.start;
        for i in 1..=60u64 {
            clock.tick_at(t0 + Duration::from_millis(i * 1000 / 60));
        }
        assert!((clock.fps() - 60.0).abs() < 0.5, "fps = {}", clock.fps());
    }
}
