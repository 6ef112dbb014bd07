//! One fused IMU frame
//!
//! The sampling task reads every vector channel in a single pass and
//! hands the result to the nets as one snapshot, so all detectors judge
//! the same instant. Angles follow the fusion convention: yaw, pitch and
//! roll in degrees, gyro rates in rad/s, accelerations in m/s².

use fieldwarden_core::constants::STANDARD_GRAVITY_MS2;
use fieldwarden_core::stats::{self, magnitude};
use fieldwarden_core::Timestamp;

/// One IMU frame as the sampling task hands it to the nets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImuSnapshot {
    /// When the frame was read, milliseconds since boot
    pub timestamp: Timestamp,
    /// Raw fused yaw, degrees
    pub yaw_deg: f64,
    /// Raw fused pitch, degrees
    pub pitch_deg: f64,
    /// Raw fused roll, degrees
    pub roll_deg: f64,
    /// Outlier-smoothed compass heading, degrees
    ///
    /// `None` until the smoother has seeded; holds the last accepted
    /// value while a spike is being rejected.
    pub heading_deg: Option<f64>,
    /// Linear acceleration with gravity removed, m/s²
    pub lin_accel: [f64; 3],
    /// Gravity vector as the fusion reports it, m/s²
    pub gravity: [f64; 3],
    /// Angular rates, rad/s
    pub gyro: [f64; 3],
    /// Magnetometer components in microtesla, `None` when the part
    /// carries no magnetometer or the read failed
    pub mag: Option<[f64; 3]>,
}

impl ImuSnapshot {
    /// A still, level, upright frame at the given time
    ///
    /// Useful as a starting point for tests and demos. Note that it is
    /// *implausibly* perfect: a stream of unmodified level frames will
    /// eventually trip the stillness net, exactly as a frozen sensor
    /// would.
    pub const fn level(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            yaw_deg: 0.0,
            pitch_deg: 0.0,
            roll_deg: 0.0,
            heading_deg: Some(0.0),
            lin_accel: [0.0; 3],
            gravity: [0.0, 0.0, STANDARD_GRAVITY_MS2],
            gyro: [0.0; 3],
            mag: None,
        }
    }

    /// Linear acceleration magnitude, m/s²
    pub fn accel_mag(&self) -> f64 {
        magnitude(self.lin_accel)
    }

    /// Gravity vector magnitude, m/s²
    pub fn gravity_mag(&self) -> f64 {
        magnitude(self.gravity)
    }

    /// Rotation rate magnitude, rad/s
    pub fn gyro_mag(&self) -> f64 {
        magnitude(self.gyro)
    }

    /// Yaw-axis rotation rate, degrees per second
    pub fn gyro_z_dps(&self) -> f64 {
        stats::rad_to_deg(self.gyro[2])
    }

    /// Whether this frame passes the shared stationarity gate
    pub fn is_stationary(&self) -> bool {
        stats::is_stationary(self.accel_mag(), self.pitch_deg, self.roll_deg)
    }
}
