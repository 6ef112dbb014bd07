//! Signal Channels and Samples
//!
//! ## Overview
//!
//! Everything the instrument measures flows through this module as a
//! [`Sample`]: one `f64` value on one [`SignalId`] channel at one
//! millisecond timestamp. The channel set is fixed at compile time -
//! a handheld has a known bill of materials, and fixed channels keep
//! per-channel state in plain arrays instead of maps.
//!
//! ## Admission
//!
//! Raw values pass [`SignalId::admit`] before they reach any window or
//! classifier: non-finite values and values outside the channel's
//! physical range are rejected as [`ReadError`]s. A CO2 reading of NaN
//! or a negative lux level never corrupts downstream statistics.
//!
//! ## Angular channels
//!
//! `HeadingDeg` is circular: 359° and 1° are 2° apart. Statistics over
//! angular channels go through the circular-mean path in
//! [`crate::stats`]; [`SignalId::is_angular`] is how windowed consumers
//! pick the right math.

use crate::errors::{ReadError, ReadResult};
use crate::time::Timestamp;

/// Measurement channels of the instrument
///
/// Discriminants are stable and double as indexes into per-channel
/// state arrays (`latest`, health counters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SignalId {
    /// Raw Geiger pulse count over the last closed window
    RadiationCpm = 0,
    /// Dose rate derived from CPM
    DoseRate = 1,
    /// Carbon dioxide concentration
    Co2 = 2,
    /// Total volatile organic compounds
    Tvoc = 3,
    /// Ambient light level
    Lux = 4,
    /// Barometric pressure
    PressureHpa = 5,
    /// Compass heading, circular
    HeadingDeg = 6,
    /// Pitch angle from the IMU
    PitchDeg = 7,
    /// Roll angle from the IMU
    RollDeg = 8,
    /// Gravity vector magnitude
    GravityMag = 9,
    /// Linear acceleration magnitude
    AccelMag = 10,
    /// Gyroscope rotation rate magnitude
    GyroRate = 11,
    /// Measured scheduler loop interval
    LoopInterval = 12,
}

impl SignalId {
    /// Number of channels; sizes per-channel state arrays.
    pub const COUNT: usize = 13;

    /// Every channel, in discriminant order.
    pub const ALL: [SignalId; Self::COUNT] = [
        SignalId::RadiationCpm,
        SignalId::DoseRate,
        SignalId::Co2,
        SignalId::Tvoc,
        SignalId::Lux,
        SignalId::PressureHpa,
        SignalId::HeadingDeg,
        SignalId::PitchDeg,
        SignalId::RollDeg,
        SignalId::GravityMag,
        SignalId::AccelMag,
        SignalId::GyroRate,
        SignalId::LoopInterval,
    ];

    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            SignalId::RadiationCpm => "radiation_cpm",
            SignalId::DoseRate => "dose_rate",
            SignalId::Co2 => "co2",
            SignalId::Tvoc => "tvoc",
            SignalId::Lux => "lux",
            SignalId::PressureHpa => "pressure",
            SignalId::HeadingDeg => "heading",
            SignalId::PitchDeg => "pitch",
            SignalId::RollDeg => "roll",
            SignalId::GravityMag => "gravity_mag",
            SignalId::AccelMag => "accel_mag",
            SignalId::GyroRate => "gyro_rate",
            SignalId::LoopInterval => "loop_interval",
        }
    }

    /// Get expected unit of measurement
    pub const fn unit(&self) -> &'static str {
        match self {
            SignalId::RadiationCpm => "cpm",
            SignalId::DoseRate => "µSv/h",
            SignalId::Co2 => "ppm",
            SignalId::Tvoc => "ppm",
            SignalId::Lux => "lux",
            SignalId::PressureHpa => "hPa",
            SignalId::HeadingDeg => "°",
            SignalId::PitchDeg => "°",
            SignalId::RollDeg => "°",
            SignalId::GravityMag => "m/s²",
            SignalId::AccelMag => "m/s²",
            SignalId::GyroRate => "rad/s",
            SignalId::LoopInterval => "ms",
        }
    }

    /// Physical admission range for the channel
    ///
    /// Values outside this range indicate a faulty probe or bus glitch,
    /// not an extreme environment. Ranges follow the parts the channels
    /// were sized for (SBM-20 tube, SCD4x, BMP280, BNO055 at ±16 g and
    /// ±2000 °/s).
    pub const fn valid_range(&self) -> (f64, f64) {
        match self {
            SignalId::RadiationCpm => (0.0, 100_000.0),
            SignalId::DoseRate => (0.0, 2_000.0),
            SignalId::Co2 => (0.0, 40_000.0),
            SignalId::Tvoc => (0.0, 65.0),
            SignalId::Lux => (0.0, 120_000.0),
            SignalId::PressureHpa => (300.0, 1_100.0),
            SignalId::HeadingDeg => (0.0, 360.0),
            SignalId::PitchDeg => (-180.0, 180.0),
            SignalId::RollDeg => (-90.0, 90.0),
            SignalId::GravityMag => (0.0, 20.0),
            SignalId::AccelMag => (0.0, 160.0),
            SignalId::GyroRate => (-35.0, 35.0),
            SignalId::LoopInterval => (0.0, 60_000.0),
        }
    }

    /// Whether the channel wraps at 360° and needs circular statistics
    pub const fn is_angular(&self) -> bool {
        matches!(self, SignalId::HeadingDeg)
    }

    /// Index into per-channel state arrays
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Admit a raw value onto this channel
    ///
    /// Rejects non-finite values first, then anything outside
    /// [`valid_range`](Self::valid_range).
    pub fn admit(&self, value: f64) -> ReadResult<()> {
        if !value.is_finite() {
            return Err(ReadError::InvalidReading);
        }
        let (min, max) = self.valid_range();
        if value < min || value > max {
            return Err(ReadError::OutOfRange { value, min, max });
        }
        Ok(())
    }
}

/// One measurement: a value on a channel at a time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Channel the value belongs to
    pub channel: SignalId,
    /// Measured value in the channel's unit
    pub value: f64,
    /// Milliseconds since boot when the value was read
    pub timestamp: Timestamp,
}

impl Sample {
    /// Create a sample; admission is the caller's responsibility.
    pub const fn new(channel: SignalId, value: f64, timestamp: Timestamp) -> Self {
        Self {
            channel,
            value,
            timestamp,
        }
    }

    /// Admit and create in one step.
    pub fn admitted(channel: SignalId, value: f64, timestamp: Timestamp) -> ReadResult<Self> {
        channel.admit(value)?;
        Ok(Self::new(channel, value, timestamp))
    }
}
