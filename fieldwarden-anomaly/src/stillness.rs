//! Noise floor collapse
//!
//! Real sensors are never silent. Even bolted to bedrock, an IMU shows
//! micro-g accelerometer noise, fractional-degree attitude dither and
//! gyro bias wander. A stretch of frames with *none* of that - every
//! channel pinned inside floors far below physical noise - means the
//! driver is replaying a stale frame or the part has latched up. This is
//! the inverse of every other net: it fires on data being too perfect.

use core::fmt::Write;

use libm::fabs;

use fieldwarden_core::constants::{MAX_MESSAGE_LEN, STANDARD_GRAVITY_MS2};
use fieldwarden_core::{Alert, AnomalyGrade};

use crate::constants::{
    STILLNESS_RUN, STILL_ACCEL_FLOOR_MS2, STILL_GRAVITY_DEV_MS2, STILL_GYRO_FLOOR_RADS,
    STILL_TILT_FLOOR_DEG, STUCK_CODE,
};
use crate::net::{AnomalyNet, NetOutput};
use crate::snapshot::ImuSnapshot;

/// Flags sensor streams frozen below the physical noise floor
pub struct StillnessNet {
    run: u32,
    reported: bool,
}

impl StillnessNet {
    /// A net with no frozen streak
    pub const fn new() -> Self {
        Self {
            run: 0,
            reported: false,
        }
    }

    /// Length of the current noise-free streak, in frames
    pub fn streak(&self) -> u32 {
        self.run
    }

    fn is_frozen(frame: &ImuSnapshot) -> bool {
        frame.accel_mag() < STILL_ACCEL_FLOOR_MS2
            && frame.gyro_mag() < STILL_GYRO_FLOOR_RADS
            && fabs(frame.gravity_mag() - STANDARD_GRAVITY_MS2) < STILL_GRAVITY_DEV_MS2
            && fabs(frame.pitch_deg) < STILL_TILT_FLOOR_DEG
            && fabs(frame.roll_deg) < STILL_TILT_FLOOR_DEG
    }
}

impl Default for StillnessNet {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyNet for StillnessNet {
    fn name(&self) -> &'static str {
        "stillness"
    }

    fn observe(&mut self, frame: &ImuSnapshot, out: &mut NetOutput) {
        if !Self::is_frozen(frame) {
            self.run = 0;
            self.reported = false;
            return;
        }
        self.run = self.run.saturating_add(1);
        if self.run >= STILLNESS_RUN && !self.reported {
            let mut message: heapless::String<MAX_MESSAGE_LEN> = heapless::String::new();
            let _ = write!(
                message,
                "No sensor noise for {} consecutive frames - IMU may be frozen",
                self.run
            );
            out.push(Alert::net(
                AnomalyGrade::Warning,
                STUCK_CODE,
                &message,
                frame.timestamp,
            ));
            self.reported = true;
        }
    }

    fn reset(&mut self) {
        self.run = 0;
        self.reported = false;
    }
}
