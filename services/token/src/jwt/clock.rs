//! Time sources for resolving relative timestamps.

use chrono::Utc;

/// A source of the current Unix time in (possibly fractional) seconds.
pub trait Clock {
    /// Seconds since the Unix epoch.
    fn now(&self) -> f64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[allow(clippy::cast_precision_loss)]
    fn now(&self) -> f64 {
        Utc::now().timestamp_millis() as f64 / 1000.0
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedClock(f64);

impl FixedClock {
    /// Create a clock that always reports `seconds`.
    #[must_use]
    pub const fn new(seconds: f64) -> Self {
        Self(seconds)
    }

    /// Move the clock forward by `seconds`.
    pub fn advance(&mut self, seconds: f64) {
        self.0 += seconds;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_tracks_chrono() {
        let before = Utc::now().timestamp();
        let now = SystemClock.now().floor() as i64;
        let after = Utc::now().timestamp();
        assert!(before <= now && now <= after);
    }

    #[test]
    fn test_fixed_clock_advance() {
        let mut clock = FixedClock::new(1_000.5);
        assert!((clock.now() - 1_000.5).abs() < f64::EPSILON);
        clock.advance(10.0);
        assert!((clock.now() - 1_010.5).abs() < f64::EPSILON);
    }
}
