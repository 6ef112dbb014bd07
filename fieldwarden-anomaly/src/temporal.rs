//! Frame cadence jitter
//!
//! The scheduler promises the IMU task a steady period, and every
//! windowed statistic downstream leans on that promise. This net records
//! frame arrival times and judges the variance of the intervals between
//! them: rising jitter means the loop is straining - a slow sensor read,
//! bus contention, or a task overrunning its slice - and shows up here
//! before samples start going missing outright.

use core::fmt::Write;

use fieldwarden_core::constants::MAX_MESSAGE_LEN;
use fieldwarden_core::stats::interval_variance_ms2;
use fieldwarden_core::{Alert, AnomalyGrade, HistoryWindow};

use crate::constants::{
    JITTER_CODE, JITTER_SIGMA_CRITICAL_MS, JITTER_SIGMA_WARNING_MS, TEMPORAL_MIN_SAMPLES,
    TEMPORAL_WINDOW,
};
use crate::net::{AnomalyNet, NetOutput};
use crate::snapshot::ImuSnapshot;

/// Flags irregular frame arrival cadence
pub struct TemporalNet {
    arrivals: HistoryWindow<TEMPORAL_WINDOW>,
    reported: Option<AnomalyGrade>,
}

impl TemporalNet {
    /// A net with no arrivals recorded yet
    pub const fn new() -> Self {
        Self {
            arrivals: HistoryWindow::new(),
            reported: None,
        }
    }

    fn grade_for(variance_ms2: f64) -> Option<AnomalyGrade> {
        if variance_ms2 > JITTER_SIGMA_CRITICAL_MS * JITTER_SIGMA_CRITICAL_MS {
            Some(AnomalyGrade::Critical)
        } else if variance_ms2 > JITTER_SIGMA_WARNING_MS * JITTER_SIGMA_WARNING_MS {
            Some(AnomalyGrade::Warning)
        } else {
            None
        }
    }
}

impl Default for TemporalNet {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyNet for TemporalNet {
    fn name(&self) -> &'static str {
        "temporal"
    }

    fn observe(&mut self, frame: &ImuSnapshot, out: &mut NetOutput) {
        // Only the timestamp matters; the value slot is unused
        self.arrivals.push_value(0.0, frame.timestamp);

        if self.arrivals.len() < TEMPORAL_MIN_SAMPLES {
            return;
        }
        let Some(variance) = interval_variance_ms2(&self.arrivals) else {
            return;
        };
        match (Self::grade_for(variance), self.reported) {
            (Some(grade), prior) if prior.map_or(true, |worst| grade > worst) => {
                let mut message: heapless::String<MAX_MESSAGE_LEN> = heapless::String::new();
                let _ = write!(
                    message,
                    "Frame intervals vary by {:.0} ms2 - scheduler or bus strain",
                    variance
                );
                out.push(Alert::net(grade, JITTER_CODE, &message, frame.timestamp));
                self.reported = Some(grade);
            }
            (grade, _) => self.reported = grade,
        }
    }

    fn reset(&mut self) {
        self.arrivals.clear();
        self.reported = None;
    }
}
