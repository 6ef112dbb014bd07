//! Time handling for the instrument loop
//!
//! The engine runs on a single monotonic millisecond clock:
//! - Scheduler decisions, debounces and count windows all compare `u64` milliseconds
//! - Wall-clock time is a presentation concern (log rows pull it from `chrono` on std)
//! - Tests drive everything through [`FixedClock`]

/// Timestamp in milliseconds since device boot.
pub type Timestamp = u64;

/// Source of time for the engine.
pub trait TimeSource {
    /// Get current timestamp in milliseconds.
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs monotonic).
    fn is_wall_clock(&self) -> bool;

    /// Get precision in milliseconds.
    fn precision_ms(&self) -> u32;
}

/// Saturating difference between two timestamps.
///
/// Returns 0 when `later` precedes `earlier`; the scheduler treats a
/// backwards step as a zero-length loop rather than a giant interval.
pub fn delta_ms(earlier: Timestamp, later: Timestamp) -> u64 {
    later.saturating_sub(earlier)
}

/// Monotonic clock anchored at construction (requires std).
///
/// Wraps `std::time::Instant` so the value never goes backwards even
/// when the system wall clock is adjusted mid-patrol.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// Fixed time source for testing
#[derive(Debug, Clone)]
pub struct FixedClock {
    timestamp: Timestamp,
}

impl FixedClock {
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedClock {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}
