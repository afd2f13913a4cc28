//! Millisecond UI clock for hosts that do not keep one.

use std::time::{Duration, Instant};

/// Monotonic clock counting milliseconds from its creation.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    origin: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Start counting from `origin` instead of now.
    pub fn starting_at(origin: Instant) -> Self {
        Self { origin }
    }

    /// Time since the clock started.
    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Milliseconds since the clock started, for [`MediaSession::advance`].
    ///
    /// [`MediaSession::advance`]: crate::MediaSession::advance
    pub fn now_ms(&self) -> u64 {
        u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX)
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
    fn test_clock_is_monotonic() {
        let clock = FrameClock::starting_at(Instant::now() - Duration::from_millis(250));
        let first = clock.now_ms();
        let second = clock.now_ms();
        assert!(first >= 250);
        assert!(second >= first);
    }
}
