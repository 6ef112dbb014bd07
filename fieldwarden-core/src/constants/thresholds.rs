//! Ladder Cut Points and Gate Limits
//!
//! Default thresholds for the practical severity ladders plus the gates
//! that guard statistics updates. Ladder cuts are profile-overridable;
//! the defaults here follow occupational guidance and field practice.

// ===== AIR QUALITY =====

/// CO2 level where cognition measurably degrades (ppm).
///
/// 1000-2000 ppm produces drowsiness and complaints of stale air.
///
/// Source: ASHRAE ventilation guidance, Harvard COGfx study.
pub const CO2_CAUTION_PPM: f64 = 1000.0;

/// CO2 level requiring prompt exit (ppm).
///
/// Above 2000 ppm: headaches, sleepiness, loss of attention.
pub const CO2_DANGER_PPM: f64 = 2000.0;

/// Total VOC caution level (ppm).
///
/// 0.5-2.0 ppm TVOC correlates with "poor" indoor air in the
/// Mølhave comfort bands.
pub const TVOC_CAUTION_PPM: f64 = 0.5;

/// Total VOC danger level (ppm); irritation and headache territory.
pub const TVOC_DANGER_PPM: f64 = 2.0;

// ===== RADIATION =====

/// Dose rate worth limiting exposure over (µSv/h).
///
/// Normal background is 0.1-0.3 µSv/h; 0.5 is clearly elevated but not
/// acutely dangerous.
///
/// Source: UNSCEAR background surveys.
pub const DOSE_CAUTION_USVH: f64 = 0.5;

/// Dose rate requiring evacuation of the area (µSv/h).
///
/// 5 µSv/h sustained exceeds public annual limits within weeks.
pub const DOSE_DANGER_USVH: f64 = 5.0;

// ===== LIGHT =====

/// Upper bound of typical indoor lighting (lux).
pub const LUX_BRIGHT: f64 = 500.0;

/// Daylight bright enough to warrant UV precautions (lux).
pub const LUX_INTENSE: f64 = 2000.0;

// ===== SYSTEM HEALTH =====

/// Mean loop interval indicating scheduler strain (ms).
pub const LOOP_CAUTION_MS: f64 = 150.0;

/// Mean loop interval where pulse counting accuracy suffers (ms).
///
/// At 250 ms per loop the Geiger poll can miss whole pulse trains;
/// the instrument must say so.
pub const LOOP_DANGER_MS: f64 = 250.0;

/// Consecutive read failures before a channel degrades to unavailable.
///
/// Transient I2C hiccups recover within a few reads; fifteen in a row
/// means the probe or harness is gone.
pub const FAILURE_CEILING: u32 = 15;

// ===== ORIENTATION GATES =====

/// Linear acceleration below which the instrument counts as still (m/s²).
pub const STATIONARY_ACCEL_LIMIT_MS2: f64 = 0.05;

/// Tilt magnitude below which the instrument counts as level (degrees).
pub const STATIONARY_TILT_LIMIT_DEG: f64 = 5.0;

/// Angular distance from the recent circular mean that marks a heading
/// sample as a glitch (degrees).
pub const HEADING_OUTLIER_DEG: f64 = 90.0;

/// Consecutive rejections after which the heading smoother reseeds.
///
/// A glitch is one or two samples; five in a row pointing the same new
/// way is a real turn.
pub const SMOOTHER_RESEED_STREAK: u32 = 5;

// ===== PRESSURE TREND (hPa per hour) =====

/// Rapid pressure fall; severe weather indicator.
pub const PRESSURE_RAPID_FALL_HPH: f64 = -3.0;

/// Fast pressure fall; storm likely within hours.
pub const PRESSURE_FAST_FALL_HPH: f64 = -1.5;

/// Slow fall; unsettled weather approaching.
pub const PRESSURE_SLOW_FALL_HPH: f64 = -0.5;

/// Fast rise; clearing after a system passes.
pub const PRESSURE_FAST_RISE_HPH: f64 = 1.5;

/// Rapid rise; strong clearing, often gusty.
pub const PRESSURE_RAPID_RISE_HPH: f64 = 3.0;

/// Absolute pressure low enough to flag regardless of trend (hPa).
pub const PRESSURE_LOW_HPA: f64 = 980.0;

/// Absolute pressure high enough to flag a strong high (hPa).
pub const PRESSURE_HIGH_HPA: f64 = 1030.0;
