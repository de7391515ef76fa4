//! Frame timing
//!
//! Hosts report a monotonically increasing timestamp in milliseconds with
//! every frame; the clock turns it into a per-frame delta.

use std::time::Duration;

/// Frame rate that per-frame speeds are tuned for (60 Hz).
pub const REFERENCE_FRAME_RATE_HZ: u32 = 60;

/// Delta reported for the very first frame, before any interval is known.
pub const FIRST_FRAME_DELTA: Duration = Duration::from_micros(16_666); // ~16.666ms

/// Tracks host frame timestamps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_count: u64,
    last_timestamp_ms: Option<f64>,
    last_delta: Duration,
    elapsed: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            last_timestamp_ms: None,
            last_delta: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    /// Advance to a new frame and return its delta.
    ///
    /// Timestamps that go backwards, or intervals that are not finite, yield
    /// a zero delta.
    pub fn tick(&mut self, timestamp_ms: f64) -> Duration {
        let delta = match self.last_timestamp_ms {
            Some(last) => Duration::try_from_secs_f64(((timestamp_ms - last) / 1000.0).max(0.0)).unwrap_or(Duration::ZERO),
            None => FIRST_FRAME_DELTA,
        };
        if timestamp_ms.is_finite() {
            self.last_timestamp_ms = Some(timestamp_ms);
        }
        self.last_delta = delta;
        self.elapsed = self.elapsed.saturating_add(delta);
        self.frame_count += 1;
        delta
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn last_delta(&self) -> Duration {
        self.last_delta
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
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
    fn first_frame_uses_default_delta() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(5_000.0), FIRST_FRAME_DELTA);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn later_frames_measure_interval() {
        let mut clock = FrameClock::new();
        clock.tick(1_000.0);
        let delta = clock.tick(1_050.0);
        assert!((delta.as_secs_f64() - 0.05).abs() < 1e-9);
        assert_eq!(clock.last_delta(), delta);
    }

    #[test]
    fn backwards_timestamp_is_zero_delta() {
        let mut clock = FrameClock::new();
        clock.tick(1_000.0);
        assert_eq!(clock.tick(900.0), Duration::ZERO);
    }

    #[test]
    fn non_finite_timestamps_are_zero_delta() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        assert_eq!(clock.tick(f64::INFINITY), Duration::ZERO);
        assert_eq!(clock.tick(f64::NAN), Duration::ZERO);
        assert_eq!(clock.frame_count(), 3);

        // The next finite timestamp measures from the last finite one.
        let delta = clock.tick(20.0);
        assert!((delta.as_secs_f64() - 0.02).abs() < 1e-9);
    }
}
