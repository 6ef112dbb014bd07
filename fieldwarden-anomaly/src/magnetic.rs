//! Magnetic field stability
//!
//! With the instrument still, the magnetometer should report the local
//! field plus sensor noise and nothing else. Variance on any axis beyond
//! the noise figure means moving iron, a power line, or a transmitter
//! nearby - conditions that quietly corrupt the fused heading long
//! before the drift net can prove it. Parts without a magnetometer
//! simply never feed this net.

use core::fmt::Write;

use fieldwarden_core::constants::MAX_MESSAGE_LEN;
use fieldwarden_core::stats::linear_variance;
use fieldwarden_core::{Alert, AnomalyGrade, HistoryWindow};

use crate::constants::{MAG_CODE, MAG_HORIZON_MS, MAG_MIN_SAMPLES, MAG_SIGMA_LIMIT_UT, MAG_WINDOW};
use crate::net::{AnomalyNet, NetOutput};
use crate::snapshot::ImuSnapshot;

const AXES: [&str; 3] = ["x", "y", "z"];

/// Flags field variance while the instrument is still
pub struct MagneticNet {
    axes: [HistoryWindow<MAG_WINDOW>; 3],
    reported: bool,
}

impl MagneticNet {
    /// A net with empty per-axis windows
    pub const fn new() -> Self {
        Self {
            axes: [
                HistoryWindow::with_horizon(MAG_HORIZON_MS),
                HistoryWindow::with_horizon(MAG_HORIZON_MS),
                HistoryWindow::with_horizon(MAG_HORIZON_MS),
            ],
            reported: false,
        }
    }

    /// Field samples currently inside the stationary windows
    pub fn samples(&self) -> usize {
        self.axes[0].len()
    }
}

impl Default for MagneticNet {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyNet for MagneticNet {
    fn name(&self) -> &'static str {
        "magnetic"
    }

    fn observe(&mut self, frame: &ImuSnapshot, out: &mut NetOutput) {
        for axis in self.axes.iter_mut() {
            axis.expire(frame.timestamp);
        }
        if !frame.is_stationary() {
            if self.samples() < MAG_MIN_SAMPLES {
                self.reported = false;
            }
            return;
        }
        let Some(field) = frame.mag else {
            return;
        };
        for (axis, component) in self.axes.iter_mut().zip(field) {
            axis.push_value(component, frame.timestamp);
        }
        if self.samples() < MAG_MIN_SAMPLES {
            self.reported = false;
            return;
        }

        let mut worst: Option<(&'static str, f64)> = None;
        for (label, axis) in AXES.iter().copied().zip(self.axes.iter()) {
            if let Some(variance) = linear_variance(axis) {
                if worst.map_or(true, |(_, peak)| variance > peak) {
                    worst = Some((label, variance));
                }
            }
        }
        let Some((label, variance)) = worst else {
            return;
        };
        if variance > MAG_SIGMA_LIMIT_UT * MAG_SIGMA_LIMIT_UT {
            if !self.reported {
                let mut message: heapless::String<MAX_MESSAGE_LEN> = heapless::String::new();
                let _ = write!(
                    message,
                    "Magnetic field unstable while still - {} axis variance {:.1} uT2",
                    label, variance
                );
                out.push(Alert::net(
                    AnomalyGrade::Warning,
                    MAG_CODE,
                    &message,
                    frame.timestamp,
                ));
                self.reported = true;
            }
        } else {
            self.reported = false;
        }
    }

    fn reset(&mut self) {
        for axis in self.axes.iter_mut() {
            axis.clear();
        }
        self.reported = false;
    }
}
