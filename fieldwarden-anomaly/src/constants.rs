//! Detector cut points, noise floors and alert codes
//!
//! Everything a net compares against lives here, next to the unit it is
//! expressed in. Variance limits are stated as the standard deviation
//! they correspond to and squared at the point of comparison, so the
//! numbers stay in readable units.

// ===== HEADING DRIFT =====

/// Stationary heading spread that earns a Warning, degrees
pub const DRIFT_WARNING_DEG: f64 = 3.0;

/// Stationary heading spread that earns a Critical, degrees
pub const DRIFT_CRITICAL_DEG: f64 = 10.0;

// ===== FRAME CADENCE =====

/// Slots in the frame-arrival window
pub const TEMPORAL_WINDOW: usize = 32;

/// Arrivals required before cadence is judged
pub const TEMPORAL_MIN_SAMPLES: usize = 16;

/// Interval standard deviation that earns a Warning, milliseconds
pub const JITTER_SIGMA_WARNING_MS: f64 = 50.0;

/// Interval standard deviation that earns a Critical, milliseconds
pub const JITTER_SIGMA_CRITICAL_MS: f64 = 100.0;

// ===== MAGNETIC FIELD =====

/// Slots in each per-axis magnetometer window
pub const MAG_WINDOW: usize = 64;

/// Horizon for the magnetometer windows, milliseconds
pub const MAG_HORIZON_MS: u64 = 10_000;

/// Stationary samples required before field stability is judged
pub const MAG_MIN_SAMPLES: usize = 20;

/// Per-axis field standard deviation that earns a Warning, microtesla
pub const MAG_SIGMA_LIMIT_UT: f64 = 5.0;

// ===== GRAVITY =====

/// Stationary samples required before magnitude variation is judged
pub const GRAVITY_MIN_SAMPLES: usize = 20;

/// Gravity magnitude standard deviation that earns a Warning, m/s²
///
/// A resting accelerometer wanders by far less; variation above this
/// while the stationarity gate holds points at the sensor, not the
/// operator.
pub const GRAVITY_SIGMA_LIMIT_MS2: f64 = 0.05;

/// Cosine similarity below which consecutive gravity vectors count as
/// a flip
pub const GRAVITY_FLIP_COSINE: f64 = -0.5;

// ===== FRAME COHERENCE =====

/// Largest tolerated |dot| between linear acceleration and gravity,
/// in (m/s²)² - the fusion promises orthogonal outputs
pub const ACCEL_GRAVITY_DOT_LIMIT: f64 = 5.0;

/// Largest tolerated disagreement between the gyro z rate and the yaw
/// rate observed across frames, degrees per second
pub const YAW_DISAGREEMENT_DPS: f64 = 45.0;

/// Largest tolerated gap between cos(pitch)·cos(roll) and the
/// normalized gravity z component
pub const GRAVITY_Z_TOLERANCE: f64 = 0.5;

// ===== STILLNESS =====

/// Linear acceleration below this is implausibly quiet, m/s²
pub const STILL_ACCEL_FLOOR_MS2: f64 = 0.002;

/// Gyro magnitude below this is implausibly quiet, rad/s
pub const STILL_GYRO_FLOOR_RADS: f64 = 0.001;

/// Gravity magnitude within this of standard gravity counts as frozen,
/// m/s²
pub const STILL_GRAVITY_DEV_MS2: f64 = 0.005;

/// Pitch and roll within this of zero count as frozen, degrees
pub const STILL_TILT_FLOOR_DEG: f64 = 0.05;

/// Consecutive noise-free frames before the stuck finding fires
///
/// Fifty frames at the default 10 Hz is five seconds of physically
/// impossible silence.
pub const STILLNESS_RUN: u32 = 50;

// ===== ROTATION REFERENCE TABLE =====

/// Rotation rates the resonance net matches against, rad/s
///
/// The sequence follows the published Schumann mode values; here they
/// serve purely as fixed reference points for rate-lock detection.
pub const REFERENCE_RATES: [f64; 5] = [7.83, 14.3, 20.8, 27.3, 33.8];

/// Half-width of the match band around each reference rate, rad/s
pub const RESONANCE_BAND: f64 = 0.5;

// ===== SUITE CAPACITIES =====

/// Most nets one suite can hold
pub const MAX_NETS: usize = 8;

/// Most findings one observation pass can buffer
pub const MAX_NET_FINDINGS: usize = 8;

// ===== ALERT CODES =====

/// Stationary compass drift
pub const DRIFT_CODE: &str = "HEADING-DRIFT";

/// Frame cadence jitter
pub const JITTER_CODE: &str = "INTERVAL-JITTER";

/// Magnetic field unstable while still
pub const MAG_CODE: &str = "MAG-DISTURBANCE";

/// Gravity magnitude varying while still
pub const GRAVITY_VARIATION_CODE: &str = "GRAVITY-VARIATION";

/// Gravity vector reversed between frames
pub const GRAVITY_FLIP_CODE: &str = "GRAVITY-FLIP";

/// Linear acceleration not orthogonal to gravity
pub const VECTOR_MISMATCH_CODE: &str = "VECTOR-MISMATCH";

/// Gyro and Euler yaw rates disagree
pub const GYRO_MISMATCH_CODE: &str = "GYRO-MISMATCH";

/// Gravity direction contradicts pitch and roll
pub const GEOMETRY_CODE: &str = "GEOMETRY-MISMATCH";

/// Sensor outputs frozen below the noise floor
pub const STUCK_CODE: &str = "SENSOR-STUCK";

/// Rotation rate locked on a reference table entry
pub const RESONANCE_CODE: &str = "FIELD-RESONANCE";
