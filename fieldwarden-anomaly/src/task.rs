//! The IMU sampling task
//!
//! One periodic task bridges the orientation hardware into the engine:
//! it reads the four mandatory vector channels plus the optional
//! magnetometer in a single pass, stores the scalar projections the
//! classifier and log rows consume, and feeds the assembled frame to the
//! net suite. Findings land in the engine's pending batch alongside the
//! practical alerts and drain through the same sinks.
//!
//! ## Read policy
//!
//! A frame only counts when every mandatory channel produced: one
//! `WouldBlock` anywhere skips the whole pass rather than mixing stale
//! and fresh axes. Hard errors are charged to the channel that best
//! represents the failed source. The magnetometer is optional equipment:
//! its errors degrade the frame to `mag: None` and nothing else.

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;
#[cfg(feature = "std")]
use std::boxed::Box;

use fieldwarden_core::engine::EngineState;
use fieldwarden_core::stats::{magnitude, HeadingSmoother};
use fieldwarden_core::{
    CalibrationReporting, CalibrationStatus, ReadError, Sample, SignalId, Task, Timestamp,
    VectorSource,
};

use crate::net::NetOutput;
use crate::snapshot::ImuSnapshot;
use crate::suite::NetSuite;

/// Periodic task: one fused IMU frame per period
///
/// Type parameters are the four mandatory sources: Euler angles (yaw,
/// pitch, roll in degrees), linear acceleration, gravity and gyro. The
/// Euler source doubles as the calibration probe, checked once at
/// construction.
pub struct ImuTask<E, A, G, Y> {
    euler: E,
    accel: A,
    gravity: G,
    gyro: Y,
    mag: Option<Box<dyn VectorSource>>,
    smoother: HeadingSmoother,
    last_heading: Option<f64>,
    suite: NetSuite,
    scratch: NetOutput,
    calibration: CalibrationStatus,
}

impl<E, A, G, Y> ImuTask<E, A, G, Y>
where
    E: VectorSource + CalibrationReporting,
    A: VectorSource,
    G: VectorSource,
    Y: VectorSource,
{
    /// Builds the task and probes the Euler source for calibration
    pub fn new(euler: E, accel: A, gravity: G, gyro: Y, suite: NetSuite) -> Self {
        let calibration = euler.calibration();
        if let Some(weakest) = calibration.weakest() {
            if weakest == 0 {
                log_warn!("IMU reports an uncalibrated subsystem; orientation data suspect");
            }
        }
        Self {
            euler,
            accel,
            gravity,
            gyro,
            mag: None,
            smoother: HeadingSmoother::new(),
            last_heading: None,
            suite,
            scratch: NetOutput::new(),
            calibration,
        }
    }

    /// Attaches an optional magnetometer probe
    pub fn with_magnetometer(mut self, probe: impl VectorSource + 'static) -> Self {
        self.mag = Some(Box::new(probe));
        self
    }

    /// Calibration status probed at construction
    pub fn calibration(&self) -> CalibrationStatus {
        self.calibration
    }

    /// The net roster this task drives
    pub fn suite(&self) -> &NetSuite {
        &self.suite
    }
}

/// Reads one mandatory channel; `None` means no fresh frame yet
fn read_channel<S: VectorSource>(
    source: &mut S,
    channel: SignalId,
    now: Timestamp,
    cx: &mut EngineState,
) -> Result<Option<[f64; 3]>, ReadError> {
    match source.read() {
        Ok(vector) => Ok(Some(vector)),
        Err(nb::Error::WouldBlock) => Ok(None),
        Err(nb::Error::Other(e)) => {
            cx.note_failure(channel, now);
            Err(e)
        }
    }
}

/// Admits and stores one scalar projection
fn store(
    cx: &mut EngineState,
    channel: SignalId,
    value: f64,
    now: Timestamp,
) -> Result<(), ReadError> {
    match Sample::admitted(channel, value, now) {
        Ok(sample) => {
            cx.accept(sample);
            Ok(())
        }
        Err(e) => {
            cx.note_failure(channel, now);
            Err(e)
        }
    }
}

impl<E, A, G, Y> Task<EngineState> for ImuTask<E, A, G, Y>
where
    E: VectorSource + CalibrationReporting,
    A: VectorSource,
    G: VectorSource,
    Y: VectorSource,
{
    fn name(&self) -> &'static str {
        "imu"
    }

    fn step(&mut self, now: Timestamp, cx: &mut EngineState) -> Result<(), ReadError> {
        let Some(euler) = read_channel(&mut self.euler, SignalId::HeadingDeg, now, cx)? else {
            return Ok(());
        };
        let Some(lin_accel) = read_channel(&mut self.accel, SignalId::AccelMag, now, cx)? else {
            return Ok(());
        };
        let Some(gravity) = read_channel(&mut self.gravity, SignalId::GravityMag, now, cx)? else {
            return Ok(());
        };
        let Some(gyro) = read_channel(&mut self.gyro, SignalId::GyroRate, now, cx)? else {
            return Ok(());
        };
        let mag = match self.mag.as_mut() {
            None => None,
            Some(probe) => match probe.read() {
                Ok(field) => Some(field),
                Err(nb::Error::WouldBlock) => None,
                Err(nb::Error::Other(_e)) => {
                    log_debug!("magnetometer read failed: {:?}", _e);
                    None
                }
            },
        };

        let [yaw, pitch, roll] = euler;
        let heading = match self.smoother.smooth(yaw) {
            Some(smoothed) => {
                self.last_heading = Some(smoothed);
                store(cx, SignalId::HeadingDeg, smoothed, now)?;
                Some(smoothed)
            }
            // Spike rejected; the frame holds the last accepted heading
            None => self.last_heading,
        };
        store(cx, SignalId::PitchDeg, pitch, now)?;
        store(cx, SignalId::RollDeg, roll, now)?;
        store(cx, SignalId::GravityMag, magnitude(gravity), now)?;
        store(cx, SignalId::AccelMag, magnitude(lin_accel), now)?;
        store(cx, SignalId::GyroRate, magnitude(gyro), now)?;

        let frame = ImuSnapshot {
            timestamp: now,
            yaw_deg: yaw,
            pitch_deg: pitch,
            roll_deg: roll,
            heading_deg: heading,
            lin_accel,
            gravity,
            gyro,
            mag,
        };
        self.suite.observe(&frame, &mut self.scratch);
        for finding in self.scratch.take() {
            cx.pending.push(finding);
        }
        Ok(())
    }
}
