//! Geiger Pulse Counter: Debounce, Count Windows and Dose Derivation
//!
//! ## Overview
//!
//! The radiation channel is the one truly latency-critical part of the
//! instrument: tube pulses are milliseconds wide and arrive whenever
//! they please. The counter is therefore split from the rate-gated
//! sensors - the scheduler polls [`PulseCounter::observe_level`] every
//! tick, unconditionally, and everything else waits its turn.
//!
//! ## Counting model
//!
//! - A pulse is a rising edge on the tube line.
//! - Edges within [`PULSE_REFRACTORY_MS`] of the last *counted* pulse
//!   are bounce or ringing and are discarded; bounce does not extend
//!   the refractory window.
//! - Counts accumulate over a fixed window ([`COUNT_WINDOW_MS`]);
//!   when the window elapses it closes exactly once, yielding
//!   `cpm = pulses` (the window is the minute-pair the unit is named
//!   for) and `dose µSv/h = cpm / cpm_per_usvh`.
//! - Until [`RADIATION_WARMUP_MS`] has passed since construction, the
//!   dose figure is withheld: a half-warm tube produces plausible
//!   looking nonsense. CPM is reported regardless.
//!
//! [`PULSE_REFRACTORY_MS`]: crate::constants::time::PULSE_REFRACTORY_MS
//! [`COUNT_WINDOW_MS`]: crate::constants::time::COUNT_WINDOW_MS
//! [`RADIATION_WARMUP_MS`]: crate::constants::time::RADIATION_WARMUP_MS

use crate::constants::physics::GEIGER_CPM_PER_USVH;
use crate::constants::time::{COUNT_WINDOW_MS, PULSE_REFRACTORY_MS, RADIATION_WARMUP_MS};
use crate::errors::{ConfigError, ConfigResult};
use crate::time::{delta_ms, Timestamp};

/// Tunable counter parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CounterConfig {
    /// Count window length (ms)
    pub count_window_ms: u64,
    /// Minimum spacing between counted pulses (ms)
    pub refractory_ms: u64,
    /// Tube conversion factor (cpm per µSv/h)
    pub cpm_per_usvh: f64,
    /// Dose rate withheld until this long after construction (ms)
    pub warmup_ms: u64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            count_window_ms: COUNT_WINDOW_MS,
            refractory_ms: PULSE_REFRACTORY_MS,
            cpm_per_usvh: GEIGER_CPM_PER_USVH,
            warmup_ms: RADIATION_WARMUP_MS,
        }
    }
}

impl CounterConfig {
    /// Reject configurations the counter cannot run on
    pub fn validate(&self) -> ConfigResult<()> {
        if self.count_window_ms == 0 {
            return Err(ConfigError::ZeroPeriod { task: "pulse count window" });
        }
        if !(self.cpm_per_usvh > 0.0) || !self.cpm_per_usvh.is_finite() {
            return Err(ConfigError::BadConversionFactor { value: self.cpm_per_usvh });
        }
        Ok(())
    }
}

/// Result of one closed count window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSummary {
    /// Pulses counted in the closed window
    pub cpm: u32,
    /// Derived dose rate; `None` while warming up
    pub dose_rate: Option<f64>,
    /// Engine time when the window closed
    pub closed_at: Timestamp,
}

/// Debouncing pulse counter with a fixed count window
#[derive(Debug, Clone)]
pub struct PulseCounter {
    config: CounterConfig,
    boot_at: Timestamp,
    window_started: Timestamp,
    pulses: u32,
    total_pulses: u64,
    last_pulse_at: Option<Timestamp>,
    line_was_asserted: bool,
    last_cpm: Option<u32>,
    last_dose: Option<f64>,
}

impl PulseCounter {
    /// Create a counter; `now` anchors both warm-up and the first window
    pub fn new(config: CounterConfig, now: Timestamp) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            boot_at: now,
            window_started: now,
            pulses: 0,
            total_pulses: 0,
            last_pulse_at: None,
            line_was_asserted: false,
            last_cpm: None,
            last_dose: None,
        })
    }

    /// Feed the instantaneous tube line level; returns whether a pulse
    /// was counted
    ///
    /// Call this every scheduler tick. Only the rising edge counts, and
    /// only when it clears the refractory spacing from the last counted
    /// pulse.
    pub fn observe_level(&mut self, asserted: bool, now: Timestamp) -> bool {
        let rising_edge = asserted && !self.line_was_asserted;
        self.line_was_asserted = asserted;
        if !rising_edge {
            return false;
        }

        if let Some(last) = self.last_pulse_at {
            if delta_ms(last, now) <= self.config.refractory_ms {
                return false;
            }
        }

        self.last_pulse_at = Some(now);
        self.pulses += 1;
        self.total_pulses += 1;
        true
    }

    /// Close the count window if it has elapsed
    ///
    /// Returns the summary exactly once per window close; the next
    /// window starts at the close time, so a late poll stretches the
    /// closing window rather than losing pulses.
    pub fn poll_window(&mut self, now: Timestamp) -> Option<WindowSummary> {
        if delta_ms(self.window_started, now) < self.config.count_window_ms {
            return None;
        }

        let cpm = self.pulses;
        let dose_rate = if self.is_warmed_up(now) {
            Some(cpm as f64 / self.config.cpm_per_usvh)
        } else {
            None
        };

        self.last_cpm = Some(cpm);
        self.last_dose = dose_rate;
        self.pulses = 0;
        self.window_started = now;

        Some(WindowSummary {
            cpm,
            dose_rate,
            closed_at: now,
        })
    }

    /// Whether the warm-up period has elapsed
    pub fn is_warmed_up(&self, now: Timestamp) -> bool {
        delta_ms(self.boot_at, now) >= self.config.warmup_ms
    }

    /// CPM of the last closed window
    pub fn cpm(&self) -> Option<u32> {
        self.last_cpm
    }

    /// Dose rate of the last closed window; `None` before warm-up
    pub fn dose_rate(&self) -> Option<f64> {
        self.last_dose
    }

    /// Pulses accumulated in the currently open window
    pub fn pulses_in_window(&self) -> u32 {
        self.pulses
    }

    /// Lifetime counted pulses
    pub fn total_pulses(&self) -> u64 {
        self.total_pulses
    }

    /// Milliseconds the current window has been open
    pub fn window_age_ms(&self, now: Timestamp) -> u64 {
        delta_ms(self.window_started, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter_at(now: Timestamp) -> PulseCounter {
        PulseCounter::new(CounterConfig::default(), now).unwrap()
    }

    #[test]
    fn counts_rising_edges_only() {
        let mut c = counter_at(0);
        assert!(c.observe_level(true, 10));
        // Held level is the same pulse
        assert!(!c.observe_level(true, 11));
        assert!(!c.observe_level(false, 12));
        assert!(c.observe_level(true, 20));
        assert_eq!(c.pulses_in_window(), 2);
    }

    #[test]
    fn refractory_discards_bounce() {
        let mut c = counter_at(0);
        assert!(c.observe_level(true, 100));
        c.observe_level(false, 101);
        // 3 ms after the counted pulse: bounce
        assert!(!c.observe_level(true, 103));
        c.observe_level(false, 104);
        // Exactly at the refractory spacing: still bounce
        assert!(!c.observe_level(true, 105));
        c.observe_level(false, 105);
        // Past it: a real second pulse
        assert!(c.observe_level(true, 106));
        assert_eq!(c.pulses_in_window(), 2);
    }

    #[test]
    fn bounce_does_not_extend_refractory() {
        let mut c = counter_at(0);
        assert!(c.observe_level(true, 100));
        c.observe_level(false, 100);
        assert!(!c.observe_level(true, 103)); // discarded
        c.observe_level(false, 103);
        // Refractory is measured from t=100, not the bounce at t=103
        assert!(c.observe_level(true, 106));
    }

    #[test]
    fn window_close_yields_cpm_and_dose() {
        let mut c = counter_at(0);
        for i in 0..42u64 {
            c.observe_level(true, 1_000 + i * 100);
            c.observe_level(false, 1_050 + i * 100);
        }

        assert!(c.poll_window(119_999).is_none());
        let summary = c.poll_window(120_000).unwrap();
        assert_eq!(summary.cpm, 42);
        let dose = summary.dose_rate.unwrap();
        assert!((dose - 42.0 / GEIGER_CPM_PER_USVH).abs() < 1e-12);

        // Fires exactly once
        assert!(c.poll_window(120_000).is_none());
        assert_eq!(c.cpm(), Some(42));
        assert_eq!(c.pulses_in_window(), 0);
    }

    #[test]
    fn dose_withheld_during_warmup() {
        let config = CounterConfig {
            count_window_ms: 60_000,
            warmup_ms: 120_000,
            ..CounterConfig::default()
        };
        let mut c = PulseCounter::new(config, 0).unwrap();
        c.observe_level(true, 30_000);

        let first = c.poll_window(60_000).unwrap();
        assert_eq!(first.cpm, 1);
        assert!(first.dose_rate.is_none(), "dose must wait out the warm-up");
        assert!(!c.is_warmed_up(60_000));

        let second = c.poll_window(120_000).unwrap();
        assert!(second.dose_rate.is_some());
        assert!(c.is_warmed_up(120_000));
    }

    #[test]
    fn late_poll_stretches_window_without_losing_pulses() {
        let mut c = counter_at(0);
        c.observe_level(true, 119_000);
        c.observe_level(false, 119_001);
        c.observe_level(true, 124_000);

        let summary = c.poll_window(125_000).unwrap();
        assert_eq!(summary.cpm, 2);
        assert_eq!(summary.closed_at, 125_000);
        // Next window is anchored at the late close
        assert_eq!(c.window_age_ms(125_500), 500);
    }

    #[test]
    fn config_validation() {
        let bad_window = CounterConfig {
            count_window_ms: 0,
            ..CounterConfig::default()
        };
        assert!(bad_window.validate().is_err());

        let bad_factor = CounterConfig {
            cpm_per_usvh: 0.0,
            ..CounterConfig::default()
        };
        assert_eq!(
            bad_factor.validate().unwrap_err(),
            ConfigError::BadConversionFactor { value: 0.0 }
        );

        let nan_factor = CounterConfig {
            cpm_per_usvh: f64::NAN,
            ..CounterConfig::default()
        };
        assert!(nan_factor.validate().is_err());
    }
}
