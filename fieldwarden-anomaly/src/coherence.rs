//! Cross-sensor frame coherence
//!
//! The fusion hands out several views of the same physical state, and
//! those views have to agree. Three checks run on every frame:
//!
//! 1. Linear acceleration is gravity-compensated, so its dot product
//!    with the gravity vector should sit near zero.
//! 2. The yaw rate observed between consecutive frames should match the
//!    gyro z axis, which measures exactly that rotation.
//! 3. The gravity z component, normalized, should equal
//!    cos(pitch)·cos(roll), which is plain geometry.
//!
//! Any sustained disagreement means one of the inputs is lying, and a
//! threshold ladder downstream has no way to tell which. Each check
//! holds its own latch, so one finding per disagreement episode.

use core::fmt::Write;

use libm::{cos, fabs};

use fieldwarden_core::constants::MAX_MESSAGE_LEN;
use fieldwarden_core::stats::{angular_delta_deg, deg_to_rad, dot};
use fieldwarden_core::{delta_ms, Alert, AnomalyGrade, Timestamp};

use crate::constants::{
    ACCEL_GRAVITY_DOT_LIMIT, GEOMETRY_CODE, GRAVITY_Z_TOLERANCE, GYRO_MISMATCH_CODE,
    VECTOR_MISMATCH_CODE, YAW_DISAGREEMENT_DPS,
};
use crate::net::{AnomalyNet, NetOutput};
use crate::snapshot::ImuSnapshot;

/// Flags frames whose sensor views contradict each other
pub struct CoherenceNet {
    prev_yaw: Option<(f64, Timestamp)>,
    vector_active: bool,
    gyro_active: bool,
    geometry_active: bool,
}

impl CoherenceNet {
    /// A net with no prior frame
    pub const fn new() -> Self {
        Self {
            prev_yaw: None,
            vector_active: false,
            gyro_active: false,
            geometry_active: false,
        }
    }
}

impl Default for CoherenceNet {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyNet for CoherenceNet {
    fn name(&self) -> &'static str {
        "coherence"
    }

    fn observe(&mut self, frame: &ImuSnapshot, out: &mut NetOutput) {
        // Check 1: linear acceleration should be orthogonal to gravity
        let alignment = fabs(dot(frame.lin_accel, frame.gravity));
        if alignment > ACCEL_GRAVITY_DOT_LIMIT {
            if !self.vector_active {
                let mut message: heapless::String<MAX_MESSAGE_LEN> = heapless::String::new();
                let _ = write!(
                    message,
                    "Linear acceleration not orthogonal to gravity (dot {:.1})",
                    alignment
                );
                out.push(Alert::net(
                    AnomalyGrade::Warning,
                    VECTOR_MISMATCH_CODE,
                    &message,
                    frame.timestamp,
                ));
                self.vector_active = true;
            }
        } else {
            self.vector_active = false;
        }

        // Check 2: yaw rate across frames should match the gyro z axis
        if let Some((prev_yaw, prev_at)) = self.prev_yaw {
            let dt_ms = delta_ms(prev_at, frame.timestamp);
            if dt_ms > 0 {
                let observed_dps =
                    angular_delta_deg(prev_yaw, frame.yaw_deg) / (dt_ms as f64 / 1_000.0);
                let disagreement = fabs(observed_dps - frame.gyro_z_dps());
                if disagreement > YAW_DISAGREEMENT_DPS {
                    if !self.gyro_active {
                        let mut message: heapless::String<MAX_MESSAGE_LEN> =
                            heapless::String::new();
                        let _ = write!(
                            message,
                            "Gyro and Euler disagree on yaw rate by {:.0} deg/s",
                            disagreement
                        );
                        out.push(Alert::net(
                            AnomalyGrade::Warning,
                            GYRO_MISMATCH_CODE,
                            &message,
                            frame.timestamp,
                        ));
                        self.gyro_active = true;
                    }
                } else {
                    self.gyro_active = false;
                }
            }
        }
        self.prev_yaw = Some((frame.yaw_deg, frame.timestamp));

        // Check 3: gravity direction should match pitch and roll
        let gravity_mag = frame.gravity_mag();
        if gravity_mag > 0.0 {
            let measured = frame.gravity[2] / gravity_mag;
            let expected = cos(deg_to_rad(frame.pitch_deg)) * cos(deg_to_rad(frame.roll_deg));
            if fabs(expected - measured) > GRAVITY_Z_TOLERANCE {
                if !self.geometry_active {
                    let mut message: heapless::String<MAX_MESSAGE_LEN> = heapless::String::new();
                    let _ = write!(
                        message,
                        "Gravity direction contradicts pitch/roll (gap {:.2})",
                        fabs(expected - measured)
                    );
                    out.push(Alert::net(
                        AnomalyGrade::Warning,
                        GEOMETRY_CODE,
                        &message,
                        frame.timestamp,
                    ));
                    self.geometry_active = true;
                }
            } else {
                self.geometry_active = false;
            }
        }
    }

    fn reset(&mut self) {
        self.prev_yaw = None;
        self.vector_active = false;
        self.gyro_active = false;
        self.geometry_active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldwarden_core::constants::STANDARD_GRAVITY_MS2;

    fn codes(out: &NetOutput) -> Vec<&'static str> {
        out.iter().map(|alert| alert.code).collect()
    }

    #[test]
    fn coherent_frames_stay_quiet() {
        let mut net = CoherenceNet::new();
        let mut out = NetOutput::new();

        for i in 0..50u64 {
            let mut frame = ImuSnapshot::level(i * 100);
            frame.lin_accel = [0.3, 0.1, 0.0]; // walking noise, orthogonal
            net.observe(&frame, &mut out);
        }
        assert!(out.is_empty());
    }

    #[test]
    fn accel_parallel_to_gravity_is_flagged_once() {
        let mut net = CoherenceNet::new();
        let mut out = NetOutput::new();

        for i in 0..10u64 {
            let mut frame = ImuSnapshot::level(i * 100);
            frame.lin_accel = [0.0, 0.0, 1.0]; // dot = 9.8, over the limit
            net.observe(&frame, &mut out);
        }
        assert_eq!(codes(&out), vec![VECTOR_MISMATCH_CODE]);
    }

    #[test]
    fn yaw_jump_without_gyro_motion_is_flagged() {
        let mut net = CoherenceNet::new();
        let mut out = NetOutput::new();

        let mut frame = ImuSnapshot::level(0);
        net.observe(&frame, &mut out);
        frame.timestamp = 100;
        frame.yaw_deg = 30.0; // 300 deg/s observed, gyro says zero
        net.observe(&frame, &mut out);

        assert_eq!(codes(&out), vec![GYRO_MISMATCH_CODE]);
    }

    #[test]
    fn agreeing_yaw_and_gyro_stay_quiet() {
        let mut net = CoherenceNet::new();
        let mut out = NetOutput::new();

        // 20 deg per 100 ms frame with the gyro reporting the same rate
        let rate_rads = deg_to_rad(200.0);
        for i in 0..30u64 {
            let mut frame = ImuSnapshot::level(i * 100);
            frame.yaw_deg = (i as f64 * 20.0) % 360.0;
            frame.gyro = [0.0, 0.0, rate_rads];
            net.observe(&frame, &mut out);
        }
        assert!(out.is_empty());
    }

    #[test]
    fn yaw_wraparound_is_not_a_jump() {
        let mut net = CoherenceNet::new();
        let mut out = NetOutput::new();

        let mut frame = ImuSnapshot::level(0);
        frame.yaw_deg = 359.0;
        net.observe(&frame, &mut out);
        frame.timestamp = 100;
        frame.yaw_deg = 1.0; // 2 deg across the wrap
        frame.gyro = [0.0, 0.0, deg_to_rad(20.0)];
        net.observe(&frame, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn sideways_gravity_contradicts_level_attitude() {
        let mut net = CoherenceNet::new();
        let mut out = NetOutput::new();

        for i in 0..10u64 {
            let mut frame = ImuSnapshot::level(i * 100);
            frame.gravity = [STANDARD_GRAVITY_MS2, 0.0, 0.0]; // level angles, sideways gravity
            net.observe(&frame, &mut out);
        }
        assert_eq!(codes(&out), vec![GEOMETRY_CODE]);
    }

    #[test]
    fn each_check_latches_independently() {
        let mut net = CoherenceNet::new();
        let mut out = NetOutput::new();

        // Both the vector and geometry checks break on the same frames
        for i in 0..10u64 {
            let mut frame = ImuSnapshot::level(i * 100);
            frame.gravity = [STANDARD_GRAVITY_MS2, 0.0, 0.0];
            frame.lin_accel = [1.0, 0.0, 0.0];
            net.observe(&frame, &mut out);
        }
        let mut found = codes(&out);
        found.sort_unstable();
        assert_eq!(found, vec![GEOMETRY_CODE, VECTOR_MISMATCH_CODE]);
    }

    #[test]
    fn cleared_disagreement_rearms_the_check() {
        let mut net = CoherenceNet::new();
        let mut out = NetOutput::new();

        let mut frame = ImuSnapshot::level(0);
        frame.lin_accel = [0.0, 0.0, 1.0];
        net.observe(&frame, &mut out);
        assert_eq!(out.len(), 1);

        frame.timestamp = 100;
        frame.lin_accel = [0.1, 0.0, 0.0];
        net.observe(&frame, &mut out);

        frame.timestamp = 200;
        frame.lin_accel = [0.0, 0.0, -1.2];
        net.observe(&frame, &mut out);
        assert_eq!(codes(&out), vec![VECTOR_MISMATCH_CODE, VECTOR_MISMATCH_CODE]);
    }
}
