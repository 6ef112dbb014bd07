//! Stationary heading drift
//!
//! A still compass should read a constant bearing. This net collects
//! smoothed headings only while the stationarity gate holds, then judges
//! the angular spread of the window: a few degrees of creep means
//! magnetic interference or a failing fusion, well before the heading is
//! obviously wrong. Motion pauses collection and lets the horizon drain
//! the window, so readings taken while walking never count as drift.

use core::fmt::Write;

use fieldwarden_core::constants::time::HEADING_HORIZON_MS;
use fieldwarden_core::constants::windows::{HEADING_WINDOW, MIN_DRIFT_SAMPLES};
use fieldwarden_core::constants::MAX_MESSAGE_LEN;
use fieldwarden_core::stats::angular_range_deg;
use fieldwarden_core::{Alert, AnomalyGrade, HistoryWindow};

use crate::constants::{DRIFT_CODE, DRIFT_CRITICAL_DEG, DRIFT_WARNING_DEG};
use crate::net::{AnomalyNet, NetOutput};
use crate::snapshot::ImuSnapshot;

/// Flags compass drift while the instrument is provably still
pub struct HeadingDriftNet {
    window: HistoryWindow<HEADING_WINDOW>,
    reported: Option<AnomalyGrade>,
}

impl HeadingDriftNet {
    /// A net with an empty stationary window
    pub const fn new() -> Self {
        Self {
            window: HistoryWindow::with_horizon(HEADING_HORIZON_MS),
            reported: None,
        }
    }

    /// Headings currently inside the stationary window
    pub fn samples(&self) -> usize {
        self.window.len()
    }

    fn grade_for(spread_deg: f64) -> Option<AnomalyGrade> {
        if spread_deg > DRIFT_CRITICAL_DEG {
            Some(AnomalyGrade::Critical)
        } else if spread_deg > DRIFT_WARNING_DEG {
            Some(AnomalyGrade::Warning)
        } else {
            None
        }
    }
}

impl Default for HeadingDriftNet {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyNet for HeadingDriftNet {
    fn name(&self) -> &'static str {
        "drift"
    }

    fn observe(&mut self, frame: &ImuSnapshot, out: &mut NetOutput) {
        self.window.expire(frame.timestamp);

        if !frame.is_stationary() {
            // Motion pauses collection; the horizon drains what remains
            if self.window.len() < MIN_DRIFT_SAMPLES {
                self.reported = None;
            }
            return;
        }
        let Some(heading) = frame.heading_deg else {
            return;
        };
        self.window.push_value(heading, frame.timestamp);

        if self.window.len() < MIN_DRIFT_SAMPLES {
            self.reported = None;
            return;
        }
        let Some(spread) = angular_range_deg(&self.window) else {
            return;
        };
        match (Self::grade_for(spread), self.reported) {
            (Some(grade), prior) if prior.map_or(true, |worst| grade > worst) => {
                let mut message: heapless::String<MAX_MESSAGE_LEN> = heapless::String::new();
                let _ = write!(
                    message,
                    "Heading drifted {:.1} deg across a stationary window",
                    spread
                );
                out.push(Alert::net(grade, DRIFT_CODE, &message, frame.timestamp));
                self.reported = Some(grade);
            }
            (grade, _) => self.reported = grade,
        }
    }

    fn reset(&mut self) {
        self.window.clear();
        self.reported = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldwarden_core::AlertLevel;

    fn still_frame(timestamp: u64, heading: f64) -> ImuSnapshot {
        let mut frame = ImuSnapshot::level(timestamp);
        frame.yaw_deg = heading;
        frame.heading_deg = Some(heading);
        // Keep the frame above the stillness noise floor, below the gate
        frame.lin_accel = [0.01, 0.0, 0.0];
        frame
    }

    fn moving_frame(timestamp: u64, heading: f64) -> ImuSnapshot {
        let mut frame = still_frame(timestamp, heading);
        frame.lin_accel = [1.5, 0.0, 0.0];
        frame
    }

    #[test]
    fn steady_heading_never_fires() {
        let mut net = HeadingDriftNet::new();
        let mut out = NetOutput::new();

        for i in 0..60 {
            let wobble = if i % 2 == 0 { 0.2 } else { -0.2 };
            net.observe(&still_frame(i * 100, 90.0 + wobble), &mut out);
        }
        assert!(out.is_empty());
    }

    #[test]
    fn creeping_heading_escalates_warning_then_critical() {
        let mut net = HeadingDriftNet::new();
        let mut out = NetOutput::new();

        // 1.2 deg/s of creep at 10 Hz
        for i in 0..120u64 {
            net.observe(&still_frame(i * 100, 90.0 + i as f64 * 0.12), &mut out);
        }
        let codes: Vec<_> = out.iter().map(|alert| alert.code).collect();
        assert_eq!(codes, vec![DRIFT_CODE, DRIFT_CODE]);

        let grades: Vec<_> = out.iter().map(|alert| alert.level).collect();
        assert_eq!(
            grades,
            vec![
                AlertLevel::Net(AnomalyGrade::Warning),
                AlertLevel::Net(AnomalyGrade::Critical),
            ]
        );
    }

    #[test]
    fn standing_drift_reports_once_not_per_frame() {
        let mut net = HeadingDriftNet::new();
        let mut out = NetOutput::new();

        // Drift in, then hold a wide but stable spread
        for i in 0..40u64 {
            net.observe(&still_frame(i * 100, 90.0 + i as f64 * 0.2), &mut out);
        }
        let after_entry = out.len();
        for i in 40..80u64 {
            net.observe(&still_frame(i * 100, 90.0 + (i % 2) as f64), &mut out);
        }
        assert_eq!(out.len(), after_entry);
    }

    #[test]
    fn motion_frames_never_count_as_drift() {
        let mut net = HeadingDriftNet::new();
        let mut out = NetOutput::new();

        // Wild heading swings, but all while moving
        for i in 0..200u64 {
            net.observe(&moving_frame(i * 100, (i as f64 * 47.0) % 360.0), &mut out);
        }
        assert!(out.is_empty());
        assert_eq!(net.samples(), 0);
    }

    #[test]
    fn horizon_drains_the_window_after_motion() {
        let mut net = HeadingDriftNet::new();
        let mut out = NetOutput::new();

        for i in 0..30u64 {
            net.observe(&still_frame(i * 100, 120.0), &mut out);
        }
        assert!(net.samples() >= MIN_DRIFT_SAMPLES);

        // Walk for longer than the horizon; stale headings age out
        let walk_start = 3_000;
        for i in 0..120u64 {
            net.observe(&moving_frame(walk_start + i * 100, 10.0), &mut out);
        }
        assert_eq!(net.samples(), 0);
    }

    #[test]
    fn reset_rearms_the_net() {
        let mut net = HeadingDriftNet::new();
        let mut out = NetOutput::new();

        for i in 0..60u64 {
            net.observe(&still_frame(i * 100, i as f64 * 0.3), &mut out);
        }
        assert!(!out.is_empty());

        net.reset();
        assert_eq!(net.samples(), 0);
        out.clear();
        net.observe(&still_frame(10_000, 90.0), &mut out);
        assert!(out.is_empty());
    }
}
