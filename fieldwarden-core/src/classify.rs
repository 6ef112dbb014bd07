//! Threshold Ladders, the Classifier and Alert Aggregation
//!
//! ## Ladders
//!
//! A [`ThresholdLadder`] is an ordered list of severity steps with
//! strictly increasing exclusive upper bounds; the final step is
//! unbounded so classification is total. Intervals are closed-open:
//! a CO2 ladder cut at 1000 means 999.9 is `Normal` and 1000.0 is
//! `Caution`. Construction validates shape once, at startup, and hands
//! back a [`ConfigError`] instead of a ladder that misclassifies.
//!
//! ## Aggregation
//!
//! Each classification cycle collects its findings in an
//! [`AlertBatch`]. The batch ranks alerts across both vocabularies and
//! can produce a summary alert that leads with the highest tier
//! present, with the contributing codes joined the way the reference
//! instrument formats its display line ("DANGER: CO2-DANGER |
//! VOC-CAUTION").

use core::fmt::Write;

use heapless::{FnvIndexMap, Vec};

use crate::alerts::{Alert, AlertLevel, Severity};
use crate::constants::messages::{
    CO2_CODES, CO2_MESSAGES, DOSE_CODES, DOSE_MESSAGES, LOOP_CODES, LOOP_MESSAGES, LUX_CODES,
    LUX_MESSAGES, TVOC_CODES, TVOC_MESSAGES,
};
use crate::constants::thresholds::{
    CO2_CAUTION_PPM, CO2_DANGER_PPM, DOSE_CAUTION_USVH, DOSE_DANGER_USVH, LOOP_CAUTION_MS,
    LOOP_DANGER_MS, LUX_BRIGHT, LUX_INTENSE, TVOC_CAUTION_PPM, TVOC_DANGER_PPM,
};
use crate::constants::windows::{MAX_BATCH_ALERTS, MAX_LADDER_STEPS, MAX_MESSAGE_LEN};
use crate::errors::{ConfigError, ConfigResult};
use crate::signals::SignalId;
use crate::time::Timestamp;

/// Ladder slots; power of 2 as `FnvIndexMap` requires
const MAX_LADDERS: usize = 8;

/// One severity step of a ladder
#[derive(Debug, Clone, Copy)]
pub struct LadderStep {
    /// Exclusive upper bound; `f64::INFINITY` on the final step
    pub upper: f64,
    /// Tier this step classifies into
    pub severity: Severity,
    /// Stable alert code for this step
    pub code: &'static str,
    /// Operator-facing message template for this step
    pub message: &'static str,
}

/// Ordered severity steps with validated shape
#[derive(Debug, Clone)]
pub struct ThresholdLadder {
    steps: Vec<LadderStep, MAX_LADDER_STEPS>,
}

impl ThresholdLadder {
    /// Build a ladder from explicit steps
    ///
    /// Rejects empty ladders, non-increasing bounds and a bounded final
    /// step. A value equal to a bound belongs to the *next* step.
    pub fn new(steps: &[LadderStep]) -> ConfigResult<Self> {
        if steps.is_empty() {
            return Err(ConfigError::ZeroCapacity { what: "ladder" });
        }

        let mut prev = f64::NEG_INFINITY;
        for (index, step) in steps.iter().enumerate() {
            if step.upper <= prev || step.upper.is_nan() {
                return Err(ConfigError::LadderNotAscending { index });
            }
            prev = step.upper;
        }
        let last = steps.len() - 1;
        if steps[last].upper != f64::INFINITY {
            return Err(ConfigError::LadderUnterminated);
        }

        let mut out = Vec::new();
        for step in steps {
            out.push(*step)
                .map_err(|_| ConfigError::CapacityExceeded { what: "ladder steps" })?;
        }
        Ok(Self { steps: out })
    }

    /// Build the common three-tier ladder from two cut points
    ///
    /// `codes` and `messages` are indexed `[normal, caution, danger]`.
    pub fn three_tier(
        cuts: [f64; 2],
        codes: [&'static str; 3],
        messages: [&'static str; 3],
    ) -> ConfigResult<Self> {
        Self::new(&[
            LadderStep {
                upper: cuts[0],
                severity: Severity::Normal,
                code: codes[0],
                message: messages[0],
            },
            LadderStep {
                upper: cuts[1],
                severity: Severity::Caution,
                code: codes[1],
                message: messages[1],
            },
            LadderStep {
                upper: f64::INFINITY,
                severity: Severity::Danger,
                code: codes[2],
                message: messages[2],
            },
        ])
    }

    /// First step whose exclusive upper bound exceeds the value
    ///
    /// Total: the final step is unbounded. NaN never reaches here;
    /// admission rejects it at the channel edge.
    pub fn classify(&self, value: f64) -> &LadderStep {
        for step in self.steps.iter() {
            if value < step.upper {
                return step;
            }
        }
        // Unreachable by construction; the final bound is infinite
        &self.steps[self.steps.len() - 1]
    }

    /// The validated steps, lowest tier first
    pub fn steps(&self) -> &[LadderStep] {
        &self.steps
    }
}

/// Per-signal ladder routing
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    ladders: FnvIndexMap<SignalId, ThresholdLadder, MAX_LADDERS>,
}

impl Classifier {
    /// Empty classifier; signals without ladders never classify
    pub fn new() -> Self {
        Self {
            ladders: FnvIndexMap::new(),
        }
    }

    /// Classifier with the stock instrument ladders
    ///
    /// Dose rate, CO2, TVOC, light and loop timing, each three tiers
    /// with the default cut points from [`crate::constants::thresholds`].
    pub fn with_defaults() -> ConfigResult<Self> {
        let mut c = Self::new();
        c.install(
            SignalId::DoseRate,
            ThresholdLadder::three_tier(
                [DOSE_CAUTION_USVH, DOSE_DANGER_USVH],
                DOSE_CODES,
                DOSE_MESSAGES,
            )?,
        )?;
        c.install(
            SignalId::Co2,
            ThresholdLadder::three_tier([CO2_CAUTION_PPM, CO2_DANGER_PPM], CO2_CODES, CO2_MESSAGES)?,
        )?;
        c.install(
            SignalId::Tvoc,
            ThresholdLadder::three_tier(
                [TVOC_CAUTION_PPM, TVOC_DANGER_PPM],
                TVOC_CODES,
                TVOC_MESSAGES,
            )?,
        )?;
        c.install(
            SignalId::Lux,
            ThresholdLadder::three_tier([LUX_BRIGHT, LUX_INTENSE], LUX_CODES, LUX_MESSAGES)?,
        )?;
        c.install(
            SignalId::LoopInterval,
            ThresholdLadder::three_tier(
                [LOOP_CAUTION_MS, LOOP_DANGER_MS],
                LOOP_CODES,
                LOOP_MESSAGES,
            )?,
        )?;
        Ok(c)
    }

    /// Install or replace the ladder for a signal
    pub fn install(&mut self, signal: SignalId, ladder: ThresholdLadder) -> ConfigResult<()> {
        self.ladders
            .insert(signal, ladder)
            .map_err(|_| ConfigError::CapacityExceeded { what: "classifier ladders" })?;
        Ok(())
    }

    /// Classify a value on a signal; `None` when no ladder is installed
    pub fn classify(&self, signal: SignalId, value: f64) -> Option<&LadderStep> {
        self.ladders.get(&signal).map(|ladder| ladder.classify(value))
    }

    /// Build an alert when the value classifies above the quiet tier
    pub fn alert_for(&self, signal: SignalId, value: f64, now: Timestamp) -> Option<Alert> {
        let step = self.classify(signal, value)?;
        if step.severity == Severity::Normal {
            return None;
        }
        Some(Alert::practical(step.severity, step.code, step.message, now))
    }

    /// Installed ladder for a signal, if any
    pub fn ladder(&self, signal: SignalId) -> Option<&ThresholdLadder> {
        self.ladders.get(&signal)
    }
}

/// Alerts accumulated during one classification cycle
#[derive(Debug, Default)]
pub struct AlertBatch {
    alerts: Vec<Alert, MAX_BATCH_ALERTS>,
    dropped: u32,
}

impl AlertBatch {
    pub const fn new() -> Self {
        Self {
            alerts: Vec::new(),
            dropped: 0,
        }
    }

    /// Add a finding; full batches drop and count
    pub fn push(&mut self, alert: Alert) {
        if self.alerts.push(alert).is_err() {
            self.dropped += 1;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// Findings dropped since the last clear
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Iterate findings in insertion order
    pub fn iter(&self) -> core::slice::Iter<'_, Alert> {
        self.alerts.iter()
    }

    /// Highest level across the batch, ranked across both vocabularies
    pub fn max_level(&self) -> Option<AlertLevel> {
        self.alerts.iter().map(|a| a.level).max()
    }

    /// Summary alert leading with the highest tier present
    ///
    /// `None` when nothing in the batch is actionable. The message joins
    /// the actionable codes under the top tier's own label.
    pub fn summary(&self, now: Timestamp) -> Option<Alert> {
        let top = self.max_level()?;
        if !top.is_actionable() {
            return None;
        }

        let mut message: heapless::String<MAX_MESSAGE_LEN> = heapless::String::new();
        let _ = write!(message, "{}:", top.label());
        let mut first = true;
        for alert in self.alerts.iter().filter(|a| a.level.is_actionable()) {
            let sep = if first { " " } else { " | " };
            first = false;
            let _ = write!(message, "{}{}", sep, alert.code);
        }

        Some(Alert {
            level: top,
            code: "SUMMARY",
            message,
            emitted_at: now,
        })
    }

    /// Drop everything, ready for the next cycle
    pub fn clear(&mut self) {
        self.alerts.clear();
        self.dropped = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::AnomalyGrade;

    fn co2_ladder() -> ThresholdLadder {
        ThresholdLadder::three_tier([CO2_CAUTION_PPM, CO2_DANGER_PPM], CO2_CODES, CO2_MESSAGES)
            .unwrap()
    }

    #[test]
    fn three_tier_classifies_closed_open() {
        let ladder = co2_ladder();
        assert_eq!(ladder.classify(999.9).severity, Severity::Normal);
        // A value exactly at the cut belongs to the higher tier
        assert_eq!(ladder.classify(1000.0).severity, Severity::Caution);
        assert_eq!(ladder.classify(1999.9).severity, Severity::Caution);
        assert_eq!(ladder.classify(2000.0).severity, Severity::Danger);
        assert_eq!(ladder.classify(f64::MAX).severity, Severity::Danger);
    }

    #[test]
    fn ladder_rejects_shuffled_bounds() {
        let err = ThresholdLadder::new(&[
            LadderStep {
                upper: 100.0,
                severity: Severity::Normal,
                code: "A",
                message: "a",
            },
            LadderStep {
                upper: 50.0,
                severity: Severity::Caution,
                code: "B",
                message: "b",
            },
        ]);
        assert_eq!(err.unwrap_err(), ConfigError::LadderNotAscending { index: 1 });
    }

    #[test]
    fn ladder_rejects_bounded_final_step() {
        let err = ThresholdLadder::new(&[LadderStep {
            upper: 100.0,
            severity: Severity::Normal,
            code: "A",
            message: "a",
        }]);
        assert_eq!(err.unwrap_err(), ConfigError::LadderUnterminated);
    }

    #[test]
    fn ladder_rejects_empty() {
        assert!(ThresholdLadder::new(&[]).is_err());
    }

    #[test]
    fn default_classifier_covers_practical_signals() {
        let c = Classifier::with_defaults().unwrap();
        for signal in [
            SignalId::DoseRate,
            SignalId::Co2,
            SignalId::Tvoc,
            SignalId::Lux,
            SignalId::LoopInterval,
        ] {
            assert!(c.ladder(signal).is_some(), "missing ladder for {:?}", signal);
        }
        assert!(c.ladder(SignalId::HeadingDeg).is_none());
    }

    #[test]
    fn alert_only_above_quiet_tier() {
        let c = Classifier::with_defaults().unwrap();
        assert!(c.alert_for(SignalId::Co2, 600.0, 10).is_none());

        let caution = c.alert_for(SignalId::Co2, 1500.0, 10).unwrap();
        assert_eq!(caution.code, "CO2-CAUTION");
        assert_eq!(caution.level, AlertLevel::Practical(Severity::Caution));

        let danger = c.alert_for(SignalId::Co2, 2100.0, 10).unwrap();
        assert_eq!(danger.code, "CO2-DANGER");
        assert_eq!(
            danger.message.as_str(),
            "Leave in 5 min - cognitive impairment risk!"
        );
    }

    #[test]
    fn batch_summary_leads_with_highest_tier() {
        let mut batch = AlertBatch::new();
        batch.push(Alert::practical(Severity::Caution, "VOC-CAUTION", "voc", 5));
        batch.push(Alert::practical(Severity::Danger, "CO2-DANGER", "co2", 5));

        let summary = batch.summary(6).unwrap();
        assert_eq!(summary.level, AlertLevel::Practical(Severity::Danger));
        assert_eq!(summary.message.as_str(), "DANGER: VOC-CAUTION | CO2-DANGER");
        assert_eq!(summary.emitted_at, 6);
    }

    #[test]
    fn batch_summary_ranks_across_vocabularies() {
        let mut batch = AlertBatch::new();
        batch.push(Alert::practical(Severity::Caution, "LIGHT-BRIGHT", "lux", 5));
        batch.push(Alert::net(AnomalyGrade::Critical, "GRAVITY-FLIP", "flip", 5));

        let summary = batch.summary(5).unwrap();
        assert_eq!(summary.level, AlertLevel::Net(AnomalyGrade::Critical));
        assert!(summary.message.as_str().starts_with("CRITICAL:"));
    }

    #[test]
    fn quiet_batch_has_no_summary() {
        let mut batch = AlertBatch::new();
        assert!(batch.summary(0).is_none());

        batch.push(Alert::practical(Severity::Normal, "CO2-OK", "fine", 0));
        assert!(batch.summary(0).is_none());
    }

    #[test]
    fn batch_drops_beyond_capacity() {
        let mut batch = AlertBatch::new();
        for i in 0..(MAX_BATCH_ALERTS as u32 + 3) {
            batch.push(Alert::practical(Severity::Caution, "X", "x", i as u64));
        }
        assert_eq!(batch.len(), MAX_BATCH_ALERTS);
        assert_eq!(batch.dropped(), 3);
    }
}
