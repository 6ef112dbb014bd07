//! Physical Reference Values and Conversion Factors
//!
//! Device physics the engine depends on. These numbers come from tube
//! datasheets and standards bodies, not tuning.

/// Geiger tube counts per minute per µSv/h (SBM-20, Cs-137 calibration).
///
/// Dose rate is derived as `cpm / GEIGER_CPM_PER_USVH`. The factor is
/// tube-specific; replacing the tube means replacing this constant (or
/// overriding it in the profile).
///
/// Source: SBM-20 sensitivity ~60 cps/(mR/h) folded through the
/// mR/h-to-µSv/h conversion used by the reference firmware.
pub const GEIGER_CPM_PER_USVH: f64 = 53.032;

/// Standard gravitational acceleration (m/s²).
///
/// Reference magnitude for the gravity vector checks; a healthy IMU at
/// rest reports a gravity magnitude within a few hundredths of this.
///
/// Source: CGPM standard value.
pub const STANDARD_GRAVITY_MS2: f64 = 9.80665;

/// Mean sea-level atmospheric pressure (hPa).
///
/// Reference point for pressure sanity discussion and demo data; the
/// storm ladder itself works on change rates, not absolute offsets.
///
/// Source: ICAO standard atmosphere.
pub const SEA_LEVEL_PRESSURE_HPA: f64 = 1013.25;
