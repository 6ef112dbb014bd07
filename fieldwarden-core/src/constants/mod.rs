//! Constants for FieldWarden Core
//!
//! Centralized, documented constants for the instrument loop. Every
//! numeric value the engine compares against lives here with its
//! purpose, unit and source.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Physics**: Conversion factors and physical reference values
//! - **Thresholds**: Ladder cut points and gate limits
//! - **Time**: Periods, count windows, debounces and horizons
//! - **Windows**: Ring capacities and minimum sample counts
//! - **Messages**: Alert codes and operator-facing message templates
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Reference datasheets or survey practice where applicable
//! 3. Names carry units (`_MS`, `_PPM`, `_HPH`) so call sites read right

/// Conversion factors and physical reference values.
pub mod physics;

/// Ladder cut points, stationarity limits and failure ceilings.
pub mod thresholds;

/// Periods, count windows, debounces and horizons in milliseconds.
pub mod time;

/// Ring capacities and minimum sample counts.
pub mod windows;

/// Alert codes and operator-facing message templates.
pub mod messages;

// Re-export commonly used constants for convenience
pub use physics::{GEIGER_CPM_PER_USVH, STANDARD_GRAVITY_MS2};

pub use thresholds::{
    CO2_CAUTION_PPM, CO2_DANGER_PPM, DOSE_CAUTION_USVH, DOSE_DANGER_USVH, FAILURE_CEILING,
    LUX_BRIGHT, LUX_INTENSE, TVOC_CAUTION_PPM, TVOC_DANGER_PPM,
};

pub use time::{
    ALERT_PERIOD_MS, COUNT_WINDOW_MS, IMU_PERIOD_MS, MS_PER_SECOND, PULSE_REFRACTORY_MS,
    RADIATION_WARMUP_MS,
};

pub use windows::{LOOP_INTERVAL_WINDOW, MAX_MESSAGE_LEN, MAX_TASKS};
