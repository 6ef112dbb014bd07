//! Runtime Profile
//!
//! One plain struct carries everything an integrator tunes: task
//! periods, the two cut points of each threshold ladder, the pulse
//! counter settings and the failure ceiling. Defaults reproduce the
//! reference instrument; with `std` a profile round-trips through JSON
//! so a unit can ship with a site-specific file.
//!
//! Validation happens once, up front. A profile that passes
//! [`Profile::validate`] builds a classifier that cannot misclassify
//! and periods the scheduler accepts.

use crate::classify::{Classifier, ThresholdLadder};
use crate::constants::messages::{
    CO2_CODES, CO2_MESSAGES, DOSE_CODES, DOSE_MESSAGES, LOOP_CODES, LOOP_MESSAGES, LUX_CODES,
    LUX_MESSAGES, TVOC_CODES, TVOC_MESSAGES,
};
use crate::constants::thresholds::{
    CO2_CAUTION_PPM, CO2_DANGER_PPM, DOSE_CAUTION_USVH, DOSE_DANGER_USVH, FAILURE_CEILING,
    LOOP_CAUTION_MS, LOOP_DANGER_MS, LUX_BRIGHT, LUX_INTENSE, TVOC_CAUTION_PPM, TVOC_DANGER_PPM,
};
use crate::constants::time::{
    AIR_QUALITY_PERIOD_MS, ALERT_PERIOD_MS, IMU_PERIOD_MS, LIGHT_PERIOD_MS, PRESSURE_PERIOD_MS,
};
use crate::counter::CounterConfig;
use crate::errors::{ConfigError, ConfigResult};
use crate::signals::SignalId;

/// Task periods in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Periods {
    /// CO2/TVOC poll period
    pub air_quality_ms: u64,
    /// Ambient light poll period
    pub light_ms: u64,
    /// Barometric pressure poll period
    pub pressure_ms: u64,
    /// IMU snapshot period
    pub imu_ms: u64,
    /// Classification and alert emission period
    pub alert_ms: u64,
}

impl Default for Periods {
    fn default() -> Self {
        Self {
            air_quality_ms: AIR_QUALITY_PERIOD_MS,
            light_ms: LIGHT_PERIOD_MS,
            pressure_ms: PRESSURE_PERIOD_MS,
            imu_ms: IMU_PERIOD_MS,
            alert_ms: ALERT_PERIOD_MS,
        }
    }
}

/// The two cut points of a three-tier ladder
///
/// `caution` is the exclusive upper bound of the quiet tier, `danger`
/// of the caution tier; a value equal to a cut belongs to the tier
/// above it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LadderCuts {
    pub caution: f64,
    pub danger: f64,
}

impl LadderCuts {
    pub const fn new(caution: f64, danger: f64) -> Self {
        Self { caution, danger }
    }
}

/// Complete instrument profile
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Profile {
    /// Task periods
    pub periods: Periods,
    /// CO2 ladder cuts (ppm)
    pub co2: LadderCuts,
    /// TVOC ladder cuts (ppm)
    pub tvoc: LadderCuts,
    /// Dose rate ladder cuts (µSv/h)
    pub dose: LadderCuts,
    /// Ambient light ladder cuts (lux)
    pub lux: LadderCuts,
    /// Loop interval ladder cuts (ms)
    pub loop_interval: LadderCuts,
    /// Pulse counter settings
    pub counter: CounterConfig,
    /// Consecutive failures before a channel is declared lost
    pub failure_ceiling: u32,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            periods: Periods::default(),
            co2: LadderCuts::new(CO2_CAUTION_PPM, CO2_DANGER_PPM),
            tvoc: LadderCuts::new(TVOC_CAUTION_PPM, TVOC_DANGER_PPM),
            dose: LadderCuts::new(DOSE_CAUTION_USVH, DOSE_DANGER_USVH),
            lux: LadderCuts::new(LUX_BRIGHT, LUX_INTENSE),
            loop_interval: LadderCuts::new(LOOP_CAUTION_MS, LOOP_DANGER_MS),
            counter: CounterConfig::default(),
            failure_ceiling: FAILURE_CEILING,
        }
    }
}

impl Profile {
    /// Check the whole profile; an `Ok` profile builds without surprises
    pub fn validate(&self) -> ConfigResult<()> {
        let periods = [
            ("air_quality", self.periods.air_quality_ms),
            ("light", self.periods.light_ms),
            ("pressure", self.periods.pressure_ms),
            ("imu", self.periods.imu_ms),
            ("alerts", self.periods.alert_ms),
        ];
        for (task, period) in periods {
            if period == 0 {
                return Err(ConfigError::ZeroPeriod { task });
            }
        }
        if self.failure_ceiling == 0 {
            return Err(ConfigError::ZeroCapacity {
                what: "failure ceiling",
            });
        }
        self.counter.validate()?;
        self.classifier().map(|_| ())
    }

    /// Build the classifier from this profile's cut points
    ///
    /// Ladder shape errors (reversed or equal cuts) surface here.
    pub fn classifier(&self) -> ConfigResult<Classifier> {
        let mut classifier = Classifier::new();
        classifier.install(
            SignalId::DoseRate,
            ThresholdLadder::three_tier(
                [self.dose.caution, self.dose.danger],
                DOSE_CODES,
                DOSE_MESSAGES,
            )?,
        )?;
        classifier.install(
            SignalId::Co2,
            ThresholdLadder::three_tier(
                [self.co2.caution, self.co2.danger],
                CO2_CODES,
                CO2_MESSAGES,
            )?,
        )?;
        classifier.install(
            SignalId::Tvoc,
            ThresholdLadder::three_tier(
                [self.tvoc.caution, self.tvoc.danger],
                TVOC_CODES,
                TVOC_MESSAGES,
            )?,
        )?;
        classifier.install(
            SignalId::Lux,
            ThresholdLadder::three_tier(
                [self.lux.caution, self.lux.danger],
                LUX_CODES,
                LUX_MESSAGES,
            )?,
        )?;
        classifier.install(
            SignalId::LoopInterval,
            ThresholdLadder::three_tier(
                [self.loop_interval.caution, self.loop_interval.danger],
                LOOP_CODES,
                LOOP_MESSAGES,
            )?,
        )?;
        Ok(classifier)
    }

    /// Parse and validate a JSON profile
    ///
    /// Missing fields take their defaults, so a site file only has to
    /// name what it changes.
    #[cfg(feature = "std")]
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        let profile: Self = serde_json::from_str(text).map_err(|_| ConfigError::Malformed {
            reason: "profile JSON did not parse",
        })?;
        profile.validate()?;
        Ok(profile)
    }

    /// Serialize the profile as pretty JSON
    #[cfg(feature = "std")]
    pub fn to_json(&self) -> ConfigResult<std::string::String> {
        serde_json::to_string_pretty(self).map_err(|_| ConfigError::Malformed {
            reason: "profile did not serialize",
        })
    }

    /// Load a profile file, falling back to defaults on any problem
    ///
    /// A field unit must boot with a bad or missing profile; the
    /// fallback is logged, not fatal.
    #[cfg(feature = "std")]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match Self::from_json(&text) {
                Ok(profile) => {
                    log_info!("profile loaded from {}", path.display());
                    profile
                }
                Err(_e) => {
                    log_warn!("profile {} rejected: {}, using defaults", path.display(), _e);
                    Self::default()
                }
            },
            Err(_e) => {
                log_warn!("profile {} unreadable: {}, using defaults", path.display(), _e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::Severity;

    #[test]
    fn default_profile_validates() {
        Profile::default().validate().unwrap();
    }

    #[test]
    fn default_classifier_matches_stock_cuts() {
        let c = Profile::default().classifier().unwrap();
        assert_eq!(
            c.classify(SignalId::Co2, 1_500.0).unwrap().severity,
            Severity::Caution
        );
        assert_eq!(
            c.classify(SignalId::DoseRate, 6.0).unwrap().severity,
            Severity::Danger
        );
    }

    #[test]
    fn reversed_cuts_are_rejected() {
        let mut profile = Profile::default();
        profile.co2 = LadderCuts::new(2_000.0, 1_000.0);
        assert!(profile.validate().is_err());
    }

    #[test]
    fn equal_cuts_are_rejected() {
        let mut profile = Profile::default();
        profile.tvoc = LadderCuts::new(0.5, 0.5);
        assert!(profile.validate().is_err());
    }

    #[test]
    fn zero_period_is_rejected() {
        let mut profile = Profile::default();
        profile.periods.imu_ms = 0;
        assert_eq!(
            profile.validate().unwrap_err(),
            ConfigError::ZeroPeriod { task: "imu" }
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn partial_json_keeps_defaults() {
        let profile = Profile::from_json(r#"{"co2": {"caution": 800.0, "danger": 1600.0}}"#).unwrap();
        assert_eq!(profile.co2, LadderCuts::new(800.0, 1_600.0));
        // Everything unnamed stays stock
        assert_eq!(profile.tvoc, LadderCuts::new(TVOC_CAUTION_PPM, TVOC_DANGER_PPM));
        assert_eq!(profile.periods, Periods::default());
    }

    #[cfg(feature = "std")]
    #[test]
    fn bad_json_is_malformed() {
        let err = Profile::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[cfg(feature = "std")]
    #[test]
    fn invalid_values_fail_after_parse() {
        // Parses fine, validates badly
        let err = Profile::from_json(r#"{"co2": {"caution": 2000.0, "danger": 1000.0}}"#);
        assert!(err.is_err());
    }

    #[cfg(feature = "std")]
    #[test]
    fn json_round_trip() {
        let mut profile = Profile::default();
        profile.dose = LadderCuts::new(0.3, 3.0);
        let text = profile.to_json().unwrap();
        let back = Profile::from_json(&text).unwrap();
        assert_eq!(back, profile);
    }

    #[cfg(feature = "std")]
    #[test]
    fn missing_file_falls_back_to_defaults() {
        let profile = Profile::load_or_default(std::path::Path::new("/nonexistent/profile.json"));
        assert_eq!(profile, Profile::default());
    }
}
