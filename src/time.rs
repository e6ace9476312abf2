//! Time abstraction traits for platform-agnostic timing.
//!
//! The manager never sleeps. It reads the clock on every call and compares
//! elapsed milliseconds against its configured intervals.

/// Trait for abstracting a monotonic time source.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    fn duration_since(&self, earlier: Self) -> Self::Duration;

    /// Returns true when strictly more than `interval_ms` passed since `earlier`.
    #[inline]
    fn elapsed_more_than(&self, earlier: Self, interval_ms: u64) -> bool {
        self.duration_since(earlier).as_millis() > interval_ms
    }
}
