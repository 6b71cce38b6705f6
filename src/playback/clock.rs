use std::time::Instant;

/// Wall-clock reference for real-speed playback.
///
/// Holds the instant the current run started. The caller always passes
/// the current time in, so the clock never reads the system time itself.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackClock {
    epoch: Instant,
}

impl PlaybackClock {
    pub fn new(now: Instant) -> Self {
        Self { epoch: now }
    }

    /// Start a new run at `now`
    pub fn restart(&mut self, now: Instant) {
        self.epoch = now;
    }

    /// Milliseconds since the epoch; zero if `now` is before it
    pub fn elapsed_ms(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.epoch).as_secs_f64() * 1000.0
    }

    /// Whether a sample recorded at `sample_time` seconds is due at `now`
    pub fn is_due(&self, sample_time: f64, now: Instant) -> bool {
        sample_time * 1000.0 <= self.elapsed_ms(now)
    }
}
