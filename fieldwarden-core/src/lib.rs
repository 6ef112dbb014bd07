//! Core sampling and alert engine for FieldWarden
//!
//! Drives a handheld multi-sensor field instrument: a cooperative
//! scheduler polls a Geiger pulse line every pass and the slower
//! sensors at their own periods, windows the readings, and runs
//! threshold ladders and a storm model over the results. Findings come
//! out as graded alerts through pluggable sinks.
//!
//! Key constraints:
//! - Single-threaded loop; a missed pass is a missed Geiger pulse
//! - No heap allocation except boxed task and sink objects
//! - `no_std` capable; `std` adds JSON profiles and log-row formatting
//!
//! ```
//! use fieldwarden_core::{Classifier, SignalId};
//!
//! let classifier = Classifier::with_defaults().unwrap();
//! let step = classifier.classify(SignalId::Co2, 1250.0).unwrap();
//! assert_eq!(step.code, "CO2-CAUTION");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Macros for optional logging
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

pub mod alerts;
pub mod classify;
pub mod config;
pub mod constants;
pub mod counter;
pub mod engine;
pub mod errors;
#[cfg(feature = "std")]
pub mod logrow;
pub mod pressure;
pub mod scheduler;
pub mod signals;
pub mod stats;
pub mod time;
pub mod traits;
pub mod window;

// Public API
pub use alerts::{Alert, AlertLevel, AlertSink, AnomalyGrade, MemorySink, Severity};
pub use classify::{AlertBatch, Classifier, ThresholdLadder};
pub use config::Profile;
pub use counter::{CounterConfig, PulseCounter};
pub use engine::{AlertTask, EngineState, PollTask, PulseTask};
pub use errors::{ConfigError, ConfigResult, ReadError, ReadResult};
pub use scheduler::{LoopMonitor, Scheduler, Task, TaskPriority};
pub use signals::{Sample, SignalId};
pub use time::{delta_ms, TimeSource, Timestamp};
pub use traits::{CalibrationReporting, CalibrationStatus, PulseLine, SampleSource, VectorSource};
pub use window::HistoryWindow;

/// Crate version from the manifest
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
