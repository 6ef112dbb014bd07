//! Error Types for Sampling and Configuration Failures
//!
//! ## Design Philosophy
//!
//! FieldWarden's error system follows embedded constraints:
//!
//! 1. **Small Size**: Variants carry only the numbers needed to act on the
//!    failure; errors cross the scheduler on every degraded tick.
//!
//! 2. **No Heap Allocation**: All error data is inline - no String, only
//!    &'static str for reasons. Deterministic memory usage.
//!
//! 3. **Copy Semantics**: Errors implement Copy so task steps can return
//!    them without move complications.
//!
//! ## Error Categories
//!
//! ### Read failures (per-step, recoverable)
//! - `InvalidReading`: Mathematically invalid (NaN, infinity)
//! - `OutOfRange`: Value outside the channel's physical range
//! - `Bus`: The sensor front-end reported a communication failure
//!
//! The scheduler logs these, counts them against the channel's
//! consecutive-failure ceiling, and keeps running. A channel that keeps
//! failing degrades to "unavailable"; the loop itself never stops.
//!
//! ### Configuration failures (startup, fatal)
//! - `ConfigError`: malformed ladders, zero capacities, zero periods
//!
//! Construction returns these before the loop starts; there is no safe
//! interpretation of a ladder with shuffled bounds.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use fieldwarden_core::errors::ReadError;
//!
//! fn handle_step(step: Result<(), ReadError>) {
//!     match step {
//!         Ok(()) => {
//!             // Fresh sample recorded - windows and classifier see it
//!         }
//!         Err(ReadError::OutOfRange { .. }) => {
//!             // Probe fault - the value is physically impossible
//!         }
//!         Err(ReadError::Bus { .. }) => {
//!             // Transient wiring/I2C issue - channel degrades after repeats
//!         }
//!         Err(_) => {
//!             // Log and keep the loop running
//!         }
//!     }
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for sensor read operations
pub type ReadResult<T> = Result<T, ReadError>;

/// Result type for configuration and construction
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Read failures - kept small, returned from task steps on every degraded tick
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ReadError {
    /// Value makes no mathematical sense (NaN, infinity)
    #[error("Invalid reading: not a finite number")]
    InvalidReading,

    /// Value outside the channel's physical range
    #[error("Value {value} outside range [{min}, {max}]")]
    OutOfRange {
        /// The reading that failed admission
        value: f64,
        /// Minimum the channel can physically produce
        min: f64,
        /// Maximum the channel can physically produce
        max: f64,
    },

    /// Sensor front-end reported a communication failure
    #[error("Bus failure: {reason}")]
    Bus {
        reason: &'static str,
    },
}

/// Configuration errors - fatal at startup, never seen by a running loop
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Ladder bounds must be strictly increasing
    #[error("Ladder bound at step {index} does not increase")]
    LadderNotAscending {
        /// Index of the offending step
        index: usize,
    },

    /// Final ladder step must be unbounded so every value classifies
    #[error("Ladder does not end with an unbounded step")]
    LadderUnterminated,

    /// A ring or batch was configured with zero capacity
    #[error("Zero capacity configured for {what}")]
    ZeroCapacity {
        what: &'static str,
    },

    /// A fixed-capacity collection cannot hold the requested configuration
    #[error("Capacity exceeded for {what}")]
    CapacityExceeded {
        what: &'static str,
    },

    /// A periodic task cannot have a zero period
    #[error("Zero period configured for task {task}")]
    ZeroPeriod {
        task: &'static str,
    },

    /// Pulse-to-dose conversion factor must be positive
    #[error("Conversion factor {value} is not positive")]
    BadConversionFactor {
        /// The rejected factor
        value: f64,
    },

    /// Profile text could not be parsed (std only, reason logged)
    #[error("Malformed profile: {reason}")]
    Malformed {
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for ReadError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidReading =>
                defmt::write!(fmt, "Invalid reading"),
            Self::OutOfRange { value, min, max } =>
                defmt::write!(fmt, "Value {} outside [{}, {}]", value, min, max),
            Self::Bus { reason } =>
                defmt::write!(fmt, "Bus failure: {}", reason),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::LadderNotAscending { index } =>
                defmt::write!(fmt, "Ladder step {} not ascending", index),
            Self::LadderUnterminated =>
                defmt::write!(fmt, "Ladder unterminated"),
            Self::ZeroCapacity { what } =>
                defmt::write!(fmt, "Zero capacity: {}", what),
            Self::CapacityExceeded { what } =>
                defmt::write!(fmt, "Capacity exceeded: {}", what),
            Self::ZeroPeriod { task } =>
                defmt::write!(fmt, "Zero period: {}", task),
            Self::BadConversionFactor { value } =>
                defmt::write!(fmt, "Bad conversion factor {}", value),
            Self::Malformed { reason } =>
                defmt::write!(fmt, "Malformed profile: {}", reason),
        }
    }
}
