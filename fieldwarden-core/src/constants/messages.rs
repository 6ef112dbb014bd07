//! Alert Codes and Message Templates
//!
//! Operator-facing text is configuration data, not logic: the
//! classifier looks messages up by signal and tier, and replacing the
//! phrasing (or the language) touches only this file.
//!
//! Tables are indexed by severity tier: `[normal, caution, danger]`.
//! The normal-tier entries back status displays; only caution and
//! danger produce alerts.

// ===== AIR QUALITY =====

/// CO2 alert codes by tier.
pub const CO2_CODES: [&str; 3] = ["CO2-OK", "CO2-CAUTION", "CO2-DANGER"];

/// CO2 messages by tier.
pub const CO2_MESSAGES: [&str; 3] = [
    "CO2 within optimal range",
    "CAUTION: Elevated CO2 - Monitor and improve ventilation",
    "Leave in 5 min - cognitive impairment risk!",
];

/// TVOC alert codes by tier.
pub const TVOC_CODES: [&str; 3] = ["VOC-OK", "VOC-CAUTION", "VOC-DANGER"];

/// TVOC messages by tier.
pub const TVOC_MESSAGES: [&str; 3] = [
    "VOC within optimal range",
    "CAUTION: Elevated VOC - Monitor and improve ventilation",
    "DANGER: High VOC - Leave area in 5 minutes",
];

// ===== RADIATION =====

/// Dose rate alert codes by tier.
pub const DOSE_CODES: [&str; 3] = ["RAD-SAFE", "RAD-ELEVATED", "RAD-DANGER"];

/// Dose rate messages by tier.
pub const DOSE_MESSAGES: [&str; 3] = [
    "SAFE: Normal background radiation",
    "ELEVATED: Limit exposure to 30 min - elevated radiation",
    "DANGER: Evacuate in 5 min - dangerous radiation level!",
];

/// Shown instead of a dose tier while the count window warms up.
pub const DOSE_WARMUP_MESSAGE: &str = "WARMING UP: Dose rate ready soon - CPM only";

/// Code for the warm-up notice.
pub const DOSE_WARMUP_CODE: &str = "RAD-WARMUP";

// ===== LIGHT =====

/// Light alert codes by tier.
pub const LUX_CODES: [&str; 3] = ["LIGHT-OK", "LIGHT-BRIGHT", "LIGHT-INTENSE"];

/// Light messages by tier.
pub const LUX_MESSAGES: [&str; 3] = [
    "NORMAL: Typical indoor lighting - no UV concerns",
    "BRIGHT: Comfortable outdoor light - minimal UV protection needed",
    "BRIGHT SUN: Apply SPF 30+ sunscreen - UV Index likely 3-5",
];

// ===== SYSTEM HEALTH =====

/// Loop timing codes by tier.
pub const LOOP_CODES: [&str; 3] = ["SYS-OK", "TIMING-SLOW", "TIMING-CRITICAL"];

/// Loop timing messages by tier.
pub const LOOP_MESSAGES: [&str; 3] = [
    "SYSTEM OPTIMAL - Loop timing nominal",
    "CAUTION: TIMING-SLOW - Monitor performance",
    "CRITICAL: TIMING-CRITICAL - Consider optimization",
];

/// Code for a channel that crossed the consecutive-failure ceiling.
pub const SENSOR_FAILURE_CODE: &str = "SENSOR-FAIL";

// ===== WEATHER =====

/// Code for the watch tier of the storm-risk ladder.
pub const STORM_WATCH_CODE: &str = "STORM-WATCH";

/// Code for the warning tier of the storm-risk ladder.
pub const STORM_WARNING_CODE: &str = "STORM-WARNING";

/// Code for the severe tier of the storm-risk ladder.
pub const STORM_SEVERE_CODE: &str = "STORM-SEVERE";
