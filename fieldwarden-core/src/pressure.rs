//! Barometric Trend and Storm Outlook
//!
//! ## Overview
//!
//! Pressure is sampled every few seconds but weather lives on the scale
//! of hours. The monitor keeps one history point per five minutes
//! ([`PRESSURE_HISTORY_INTERVAL_MS`]) in a fixed ring and re-derives,
//! on every stored point:
//!
//! - the hourly **trend** (rising/falling/stable against ±0.5 hPa/h),
//! - a **storm risk** tier from the 1 h change, sharpened by the 3 h
//!   rate, following the classic barometer rules (rapid fall = storm),
//! - a fixed **forecast** line for displays.
//!
//! Historical comparisons use the nearest stored point within
//! [`PRESSURE_MATCH_TOLERANCE_MS`]; a gap in the record (dead sensor,
//! fresh boot) degrades the outlook to `Unknown` instead of inventing a
//! rate from mismatched points.
//!
//! [`PRESSURE_HISTORY_INTERVAL_MS`]: crate::constants::time::PRESSURE_HISTORY_INTERVAL_MS
//! [`PRESSURE_MATCH_TOLERANCE_MS`]: crate::constants::time::PRESSURE_MATCH_TOLERANCE_MS

use crate::constants::thresholds::{
    PRESSURE_FAST_FALL_HPH, PRESSURE_FAST_RISE_HPH, PRESSURE_HIGH_HPA, PRESSURE_LOW_HPA,
    PRESSURE_RAPID_FALL_HPH, PRESSURE_RAPID_RISE_HPH, PRESSURE_SLOW_FALL_HPH,
};
use crate::constants::time::{
    MS_PER_HOUR, PRESSURE_HISTORY_INTERVAL_MS, PRESSURE_MATCH_TOLERANCE_MS,
    PRESSURE_TREND_LOOKBACK_MS,
};
use crate::constants::windows::PRESSURE_WINDOW;
use crate::time::{delta_ms, Timestamp};
use crate::window::HistoryWindow;

/// Hourly pressure tendency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureTrend {
    Rising,
    Falling,
    Stable,
    /// Fewer than two history points
    InsufficientData,
}

impl PressureTrend {
    pub const fn name(&self) -> &'static str {
        match self {
            PressureTrend::Rising => "RISING",
            PressureTrend::Falling => "FALLING",
            PressureTrend::Stable => "STABLE",
            PressureTrend::InsufficientData => "INSUFFICIENT_DATA",
        }
    }
}

/// Storm risk tier from barometric behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StormRisk {
    /// No usable 1 h comparison point
    Unknown,
    Low,
    Moderate,
    High,
    Severe,
    /// Rapid rise after a system passes
    Clearing,
    /// Steady improvement
    Improving,
}

impl StormRisk {
    pub const fn name(&self) -> &'static str {
        match self {
            StormRisk::Unknown => "UNKNOWN",
            StormRisk::Low => "LOW",
            StormRisk::Moderate => "MODERATE",
            StormRisk::High => "HIGH",
            StormRisk::Severe => "SEVERE",
            StormRisk::Clearing => "CLEARING",
            StormRisk::Improving => "IMPROVING",
        }
    }
}

/// Absolute-pressure extremes that override the rate-based outlook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureExtreme {
    /// Below 980 hPa: inside a deep low
    DeepLow,
    /// Above 1030 hPa: strong high, stable air
    StrongHigh,
}

/// Current weather assessment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StormOutlook {
    pub trend: PressureTrend,
    pub risk: StormRisk,
    /// Pressure change over the last hour (hPa); 0 when unknown
    pub change_1h: f64,
    /// Display forecast line
    pub forecast: &'static str,
    /// Absolute-pressure special condition, if any
    pub extreme: Option<PressureExtreme>,
}

const FORECAST_BASELINE: &str = "Collecting baseline data...";
const FORECAST_NO_COMPARISON: &str = "Insufficient data for prediction";
const FORECAST_SEVERE_IMMINENT: &str = "SEVERE STORM IMMINENT - Seek shelter immediately!";
const FORECAST_SEVERE_APPROACHING: &str =
    "STRONG STORM APPROACHING - Take precautions within 2-4 hours";
const FORECAST_STORM_LIKELY: &str = "STORM LIKELY - Weather deteriorating in 4-8 hours";
const FORECAST_UNSETTLED: &str = "UNSETTLED WEATHER - Monitor conditions closely";
const FORECAST_CHANGE_POSSIBLE: &str =
    "WEATHER CHANGE POSSIBLE - Conditions may deteriorate slowly";
const FORECAST_RAPID_CLEARING: &str = "RAPID CLEARING - Conditions improving quickly";
const FORECAST_IMPROVING: &str = "WEATHER IMPROVING - Clearing conditions ahead";
const FORECAST_STABLE: &str = "STABLE CONDITIONS - No significant weather changes expected";
const FORECAST_STRONG_HIGH: &str = "HIGH PRESSURE - Stable, clear conditions likely";

impl Default for StormOutlook {
    fn default() -> Self {
        Self {
            trend: PressureTrend::InsufficientData,
            risk: StormRisk::Unknown,
            change_1h: 0.0,
            forecast: FORECAST_BASELINE,
            extreme: None,
        }
    }
}

/// Five-minute pressure history with derived outlook
#[derive(Debug, Clone, Default)]
pub struct PressureMonitor {
    history: HistoryWindow<PRESSURE_WINDOW>,
    last_point_at: Option<Timestamp>,
    outlook: StormOutlook,
}

impl PressureMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a fresh pressure reading
    ///
    /// Readings inside the five-minute history spacing are ignored (the
    /// poll task runs much faster than the weather model needs).
    /// Returns whether a history point was stored.
    pub fn record(&mut self, hpa: f64, now: Timestamp) -> bool {
        if let Some(last) = self.last_point_at {
            if delta_ms(last, now) < PRESSURE_HISTORY_INTERVAL_MS {
                return false;
            }
        }
        self.history.push_value(hpa, now);
        self.last_point_at = Some(now);
        self.analyze(now);
        true
    }

    /// Latest derived outlook
    pub fn outlook(&self) -> &StormOutlook {
        &self.outlook
    }

    /// Stored history points
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Nearest stored value to `target`, within the match tolerance
    fn closest_at(&self, target: Timestamp) -> Option<f64> {
        let mut best: Option<(u64, f64)> = None;
        for r in self.history.iter() {
            let distance = if r.timestamp >= target {
                r.timestamp - target
            } else {
                target - r.timestamp
            };
            match best {
                Some((d, _)) if d <= distance => {}
                _ => best = Some((distance, r.value)),
            }
        }
        match best {
            Some((d, v)) if d <= PRESSURE_MATCH_TOLERANCE_MS => Some(v),
            _ => None,
        }
    }

    fn analyze(&mut self, now: Timestamp) {
        if self.history.len() < 2 {
            self.outlook = StormOutlook::default();
            return;
        }

        let current = match self.history.newest() {
            Some(r) => r.value,
            None => return,
        };

        let p1h = self.closest_at(now.saturating_sub(PRESSURE_TREND_LOOKBACK_MS));
        let p3h = self.closest_at(now.saturating_sub(3 * MS_PER_HOUR));

        let Some(p1h) = p1h else {
            self.outlook = StormOutlook {
                trend: PressureTrend::InsufficientData,
                risk: StormRisk::Unknown,
                change_1h: 0.0,
                forecast: FORECAST_NO_COMPARISON,
                extreme: None,
            };
            return;
        };

        let change_1h = current - p1h;
        // Average hourly rate over three hours, when history reaches back
        let rate_3h = p3h.map(|p| (current - p) / 3.0).unwrap_or(0.0);

        let trend = if change_1h > 0.5 {
            PressureTrend::Rising
        } else if change_1h < -0.5 {
            PressureTrend::Falling
        } else {
            PressureTrend::Stable
        };

        let (mut risk, mut forecast) = if change_1h <= PRESSURE_RAPID_FALL_HPH {
            if rate_3h <= -2.0 {
                (StormRisk::Severe, FORECAST_SEVERE_IMMINENT)
            } else {
                (StormRisk::Severe, FORECAST_SEVERE_APPROACHING)
            }
        } else if change_1h <= PRESSURE_FAST_FALL_HPH {
            if rate_3h <= -1.0 {
                (StormRisk::High, FORECAST_STORM_LIKELY)
            } else {
                (StormRisk::High, FORECAST_UNSETTLED)
            }
        } else if change_1h <= PRESSURE_SLOW_FALL_HPH {
            (StormRisk::Moderate, FORECAST_CHANGE_POSSIBLE)
        } else if change_1h >= PRESSURE_RAPID_RISE_HPH {
            (StormRisk::Clearing, FORECAST_RAPID_CLEARING)
        } else if change_1h >= PRESSURE_FAST_RISE_HPH {
            (StormRisk::Improving, FORECAST_IMPROVING)
        } else {
            (StormRisk::Low, FORECAST_STABLE)
        };

        let mut extreme = None;
        if current < PRESSURE_LOW_HPA {
            extreme = Some(PressureExtreme::DeepLow);
            if !matches!(risk, StormRisk::Severe | StormRisk::High) {
                risk = StormRisk::High;
            }
        } else if current > PRESSURE_HIGH_HPA {
            extreme = Some(PressureExtreme::StrongHigh);
            risk = StormRisk::Low;
            forecast = FORECAST_STRONG_HIGH;
        }

        self.outlook = StormOutlook {
            trend,
            risk,
            change_1h,
            forecast,
            extreme,
        };
    }
}
