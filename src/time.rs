//! Frame timing.
//!
//! [`FrameClock`] turns display-refresh callbacks into clamped simulation
//! deltas and keeps a running FPS estimate for the window title.
//!
//! # Example
//!
//! ```ignore
//! use constellation::time::FrameClock;
//!
//! let mut clock = FrameClock::new(0.016, 0.033);
//!
//! // In the redraw handler:
//! let dt = clock.tick();
//! world.tick(dt);
//! println!("Frame {} at {:.1} fps", clock.frame(), clock.fps());
//! ```

use std::time::{Duration, Instant};

/// Per-frame delta time source.
#[derive(Debug)]
pub struct FrameClock {
    /// Timestamp of the previous tick, if any.
    last_frame: Option<Instant>,
    /// Delta returned for the very first tick.
    first_delta: f32,
    /// Upper clamp for every delta.
    max_delta: f32,
    /// Delta returned by the most recent tick.
    delta_secs: f32,
    /// Total frames ticked.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
}

impl FrameClock {
    /// Create a clock starting now.
    pub fn new(first_delta: f32, max_delta: f32) -> Self {
        Self::starting_at(Instant::now(), first_delta, max_delta)
    }

    /// Create a clock with an explicit start instant.
    pub fn starting_at(start: Instant, first_delta: f32, max_delta: f32) -> Self {
        Self {
            last_frame: None,
            first_delta,
            max_delta,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: start,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Tick at the current instant. Call once per frame.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Tick at `now` and return the clamped delta in seconds.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let raw = match self.last_frame {
            Some(last) => now.saturating_duration_since(last).as_secs_f32(),
            None => self.first_delta,
        };
        self.delta_secs = raw.clamp(0.0, self.max_delta);
        self.last_frame = Some(now);
        self.frame_count += 1;

        let fps_elapsed = now.saturating_duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_secs
    }

    /// Delta returned by the last tick.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Whether the last tick refreshed the FPS estimate.
    #[inline]
    pub fn fps_refreshed(&self) -> bool {
        self.fps_frame_count == self.frame_count && self.frame_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_uses_default() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, 0.016, 0.033);
        let dt = clock.tick_at(start + Duration::from_secs(5));
        assert_eq!(dt, 0.016);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_delta_between_frames() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, 0.016, 0.033);
        clock.tick_at(start);
        let dt = clock.tick_at(start + Duration::from_millis(20));
        assert!((dt - 0.020).abs() < 1e-6);
    }

    #[test]
    fn test_delta_clamped() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, 0.016, 0.033);
        clock.tick_at(start);
        let dt = clock.tick_at(start + Duration::from_millis(250));
        assert_eq!(dt, 0.033);
    }

    #[test]
    fn test_repeated_instant_gives_zero() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, 0.016, 0.033);
        clock.tick_at(start);
        assert_eq!(clock.tick_at(start), 0.0);
    }

    #[test]
    fn test_fps_estimate() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, 0.016, 0.033);
        for i in 1..=30 {
            clock.tick_at(start + Duration::from_millis(i * 20));
        }
        // 25 frames land in the first 500ms window
        assert!((clock.fps() - 50.0).abs() < 0.01);
    }
}
