//! Hardware Seams: Sources, Pulse Lines and Capability Probing
//!
//! The engine never talks to a bus directly. Concrete sensor drivers
//! (or test scripts) implement these traits and the tasks own them;
//! everything above the seam is deterministic and host-testable.
//!
//! ## Non-blocking contract
//!
//! Scalar and vector sources follow the `nb` convention:
//! `Err(nb::Error::WouldBlock)` means "no fresh conversion yet" - the
//! CO2 front-end flags data-ready roughly every five seconds and the
//! task simply tries again next period. `WouldBlock` is not a failure:
//! it does not count against the channel's failure ceiling and does not
//! reset task timers.
//!
//! ## Capability probing
//!
//! Parts differ in what they can report. The reference IMU exposes a
//! per-subsystem calibration tuple; cheaper parts expose nothing.
//! [`CalibrationReporting`] makes the probe explicit: ask, get
//! [`CalibrationStatus::Unsupported`], move on - no reflection, no
//! guessing from device IDs.

use crate::errors::ReadError;
use crate::signals::SignalId;

/// Scalar sensor channel (CO2, TVOC, lux, pressure)
pub trait SampleSource {
    /// Channel this source feeds
    fn channel(&self) -> SignalId;

    /// Read the current value
    ///
    /// `WouldBlock` when the hardware has no fresh conversion; a real
    /// error when the bus or probe failed.
    fn read(&mut self) -> nb::Result<f64, ReadError>;
}

/// Three-axis vector channel (Euler angles, linear acceleration,
/// gravity, gyro, magnetometer)
pub trait VectorSource {
    /// Read the current 3-vector
    fn read(&mut self) -> nb::Result<[f64; 3], ReadError>;
}

/// Digital pulse line from the Geiger front-end
///
/// Level-read, not edge-read: the counter does its own edge detection
/// and debouncing, so implementations just report the instantaneous
/// line state.
pub trait PulseLine {
    /// Whether the line is currently asserted (pulse present)
    fn is_asserted(&mut self) -> Result<bool, ReadError>;
}

/// What a part reports about its own calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationStatus {
    /// Part has no calibration reporting
    Unsupported,
    /// Per-subsystem scores, 0 (uncalibrated) to 3 (fully calibrated)
    Reported {
        sys: u8,
        gyro: u8,
        accel: u8,
        mag: u8,
    },
}

impl CalibrationStatus {
    /// All reported subsystems at the top score
    pub const fn is_fully_calibrated(&self) -> bool {
        match self {
            CalibrationStatus::Unsupported => false,
            CalibrationStatus::Reported {
                sys,
                gyro,
                accel,
                mag,
            } => *sys == 3 && *gyro == 3 && *accel == 3 && *mag == 3,
        }
    }

    /// Lowest subsystem score; `None` when unsupported
    pub const fn weakest(&self) -> Option<u8> {
        match self {
            CalibrationStatus::Unsupported => None,
            CalibrationStatus::Reported {
                sys,
                gyro,
                accel,
                mag,
            } => {
                let mut min = *sys;
                if *gyro < min {
                    min = *gyro;
                }
                if *accel < min {
                    min = *accel;
                }
                if *mag < min {
                    min = *mag;
                }
                Some(min)
            }
        }
    }
}

/// Optional capability: the part can describe its calibration state
pub trait CalibrationReporting {
    /// Current calibration status; cheap enough to poll
    fn calibration(&self) -> CalibrationStatus {
        CalibrationStatus::Unsupported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calibration_scores() {
        assert!(!CalibrationStatus::Unsupported.is_fully_calibrated());
        assert_eq!(CalibrationStatus::Unsupported.weakest(), None);

        let partial = CalibrationStatus::Reported {
            sys: 3,
            gyro: 3,
            accel: 2,
            mag: 3,
        };
        assert!(!partial.is_fully_calibrated());
        assert_eq!(partial.weakest(), Some(2));

        let full = CalibrationStatus::Reported {
            sys: 3,
            gyro: 3,
            accel: 3,
            mag: 3,
        };
        assert!(full.is_fully_calibrated());
    }
}
