//! Time source abstraction.
//!
//! Verification and session encoding both need "now". This module provides a
//! `TimeSource` trait so the system clock is used in production and a fixed
//! instant in tests.

use std::time::{SystemTime, UNIX_EPOCH};

/// Abstraction over the wall clock.
pub trait TimeSource: Send + Sync {
    /// Get the current time in seconds since the Unix epoch.
    fn now_secs(&self) -> i64;
}

/// Real time source using the system clock.
///
/// This is the default implementation used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    #[allow(clippy::cast_possible_wrap)] // Seconds won't overflow i64 for billions of years
    fn now_secs(&self) -> i64 {
        // duration_since(UNIX_EPOCH) only fails if system time is before 1970.
        #[allow(clippy::expect_used)]
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before Unix epoch");
        duration.as_secs() as i64
    }
}

/// A time source frozen at a single instant.
///
/// Used by tests and fixtures that need to verify assertions with a known
/// `auth_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTimeSource {
    now_secs: i64,
}

impl FixedTimeSource {
    /// Create a time source that always reports `now_secs`.
    #[must_use]
    pub const fn new(now_secs: i64) -> Self {
        Self { now_secs }
    }
}

impl TimeSource for FixedTimeSource {
    fn now_secs(&self) -> i64 {
        self.now_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_time_source() {
        let source = SystemTimeSource;
        let t1 = source.now_secs();
        let t2 = source.now_secs();

        // Time should be reasonable (after 2020)
        assert!(t1 > 1_577_836_800); // 2020-01-01 00:00:00 UTC

        // Time should not go backwards
        assert!(t2 >= t1);
    }

    #[test]
    fn test_fixed_time_source() {
        let source = FixedTimeSource::new(1_234_567_890);
        assert_eq!(source.now_secs(), 1_234_567_890);
        assert_eq!(source.now_secs(), 1_234_567_890);
    }
}
