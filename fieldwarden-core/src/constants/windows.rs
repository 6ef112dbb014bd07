//! Ring Capacities and Minimum Sample Counts
//!
//! Capacities are const-generic parameters, so they live here as
//! `usize` constants the engine plugs into `HistoryWindow<N>` and the
//! heapless collections. Powers of 2 where the ring wraps often.

// ===== WINDOW CAPACITIES =====

/// Heading window slots. At the 100 ms IMU period a 10 s horizon needs
/// 100 live readings; 128 leaves headroom for jitter.
pub const HEADING_WINDOW: usize = 128;

/// Gravity magnitude window slots (30 s horizon, readings are only
/// pushed while stationary).
pub const GRAVITY_WINDOW: usize = 64;

/// Loop interval window slots. Covers the last 20 scheduler passes.
pub const LOOP_INTERVAL_WINDOW: usize = 20;

/// Pressure history slots. 96 points at five-minute spacing is 8 h,
/// enough for the 1 h trend with deep margin.
pub const PRESSURE_WINDOW: usize = 96;

// ===== MINIMUM SAMPLE COUNTS =====

/// Default minimum readings before a derived statistic is emitted.
pub const MIN_STAT_SAMPLES: usize = 3;

/// Minimum headings in the stationary window before drift is judged.
pub const MIN_DRIFT_SAMPLES: usize = 20;

/// Heading smoother taps (accepted readings the outlier gate compares
/// against).
pub const SMOOTHER_TAPS: usize = 3;

// ===== FIXED COLLECTION CAPACITIES =====

/// Scheduler task slots.
pub const MAX_TASKS: usize = 8;

/// Alerts one classification cycle can accumulate before dropping.
pub const MAX_BATCH_ALERTS: usize = 16;

/// Steps a threshold ladder can hold.
pub const MAX_LADDER_STEPS: usize = 4;

/// Bytes per alert message (summaries included).
pub const MAX_MESSAGE_LEN: usize = 96;

/// Sinks the alert task can fan out to.
pub const MAX_SINKS: usize = 4;
