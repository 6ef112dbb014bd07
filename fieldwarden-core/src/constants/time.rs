//! Periods, Count Windows, Debounces and Horizons
//!
//! Everything here is in milliseconds on the monotonic engine clock.
//! Update periods trade freshness against bus traffic and power; the
//! defaults follow the reference instrument's duty cycle.

// ===== UNIT HELPERS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1_000;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: u64 = 60_000;

/// Milliseconds per hour.
pub const MS_PER_HOUR: u64 = 3_600_000;

// ===== TASK PERIODS =====

/// CO2/TVOC poll period (ms).
///
/// The SCD4x family produces a fresh conversion every ~5 s; polling
/// faster only collects `WouldBlock`.
pub const AIR_QUALITY_PERIOD_MS: u64 = 5_000;

/// Ambient light poll period (ms).
pub const LIGHT_PERIOD_MS: u64 = 4_000;

/// Barometric pressure poll period (ms).
pub const PRESSURE_PERIOD_MS: u64 = 3_000;

/// IMU snapshot period (ms). Fast enough for drift and flip detection
/// without starving the critical pulse poll.
pub const IMU_PERIOD_MS: u64 = 100;

/// Classification and alert emission period (ms).
pub const ALERT_PERIOD_MS: u64 = 1_000;

/// Age beyond which a stored sample no longer classifies (ms).
///
/// Three missed air-quality periods. A channel that stops producing
/// goes quiet instead of alerting on stale data.
pub const STALE_SAMPLE_MS: u64 = 15_000;

// ===== RADIATION COUNTING =====

/// Pulse count window (ms). CPM is literally the pulses in this window.
pub const COUNT_WINDOW_MS: u64 = 120_000;

/// Minimum spacing between counted pulses (ms).
///
/// The SBM-20 dead time is ~190 µs; anything inside 5 ms of the last
/// counted pulse is switch bounce or ringing, not a second event.
pub const PULSE_REFRACTORY_MS: u64 = 5;

/// Warm-up period before dose rate is reported (ms).
///
/// A freshly powered tube plus an empty count window produce garbage
/// dose figures; CPM is shown, dose is withheld until one full window
/// has elapsed since boot.
pub const RADIATION_WARMUP_MS: u64 = 120_000;

// ===== DEBOUNCES AND HORIZONS =====

/// Gravity flip must persist this long before a Critical fires (ms).
pub const GRAVITY_FLIP_DEBOUNCE_MS: u64 = 1_000;

/// Heading statistics horizon (ms).
pub const HEADING_HORIZON_MS: u64 = 10_000;

/// Gravity micro-variation horizon (ms).
pub const GRAVITY_HORIZON_MS: u64 = 30_000;

/// Spacing between retained pressure history points (ms).
///
/// Pressure is read every few seconds but trends are computed over
/// hours; one point per five minutes keeps 8 h of history in a small
/// ring.
pub const PRESSURE_HISTORY_INTERVAL_MS: u64 = 300_000;

/// How far back the trend computation reaches (ms).
pub const PRESSURE_TREND_LOOKBACK_MS: u64 = MS_PER_HOUR;

/// Tolerance when matching a historical pressure point (ms).
///
/// With five-minute spacing, the nearest stored point to "one hour
/// ago" can legitimately be a half-interval off.
pub const PRESSURE_MATCH_TOLERANCE_MS: u64 = 1_800_000;
