//! IMU anomaly nets for FieldWarden
//!
//! The core crate trusts its sensors: a reading that passes range
//! admission is taken at face value. This crate does not. It watches the
//! orientation stack - fused Euler angles, linear acceleration, gravity,
//! gyro rates and the optional magnetometer - for patterns that mean the
//! *instrument* has gone strange, as opposed to the environment. A
//! compass that creeps while the unit sits on a rock, a gravity vector
//! that flips between frames, Euler angles that contradict the gyro:
//! none of these trip a threshold ladder, and all of them poison every
//! downstream reading until someone notices.
//!
//! ## The Standard Battery
//!
//! Each detector ("net") owns a small sliding window or a scrap of
//! last-seen state, judges exactly one pattern, and grades findings on
//! the [`AnomalyGrade`](fieldwarden_core::AnomalyGrade) scale:
//!
//! | Net | Watches for | Worst grade |
//! |-----|-------------|-------------|
//! | [`HeadingDriftNet`] | Compass creep while provably stationary | Critical |
//! | [`TemporalNet`] | Frame cadence jitter from scheduler or bus strain | Critical |
//! | [`MagneticNet`] | Field variance with the unit still (interference) | Warning |
//! | [`GravityNet`] | Magnitude micro-variation, and outright vector flips | Critical |
//! | [`CoherenceNet`] | Euler / gyro / gravity frames contradicting each other | Warning |
//! | [`StillnessNet`] | Noise floor collapse - a sensor frozen mid-value | Warning |
//! | [`ResonanceNet`] | Rotation rate locked onto a reference table entry | Warning |
//!
//! ## Why Fixed Rules
//!
//! A learned model wants training data this instrument will never see
//! twice: every deployment is a different rock, a different pocket, a
//! different operator gait. The patterns above are physics, not
//! statistics - gravity does not flip, a still compass does not walk -
//! so each net encodes its rule directly and stays explainable down to
//! the constant. When a finding fires, the message names the measured
//! value and the rule it broke, and an operator can check the arithmetic
//! on paper.
//!
//! ## Firing Discipline
//!
//! Nets observe at the IMU rate (10 Hz by default) but alert batches
//! drain once a second, so a net that re-reported a standing condition
//! every frame would flood the batch with duplicates. Every net is
//! therefore edge-triggered: it fires when a pattern is entered or
//! escalates to a worse grade, stays silent while the condition merely
//! persists, and re-arms when the pattern clears.
//!
//! ## Memory Model
//!
//! All detector state is fixed-size and inline; the only allocations are
//! the boxed net objects inside [`NetSuite`] and the optional boxed
//! magnetometer probe, both made once at construction:
//!
//! | State | Size |
//! |-------|------|
//! | Heading window (128 slots) | ~2 KB |
//! | Magnetometer windows (3 x 64) | ~3 KB |
//! | Gravity window (64 slots) | ~1 KB |
//! | Cadence window (32 slots) | ~0.5 KB |
//! | Latches and last-seen state | < 100 B |
//!
//! ## Integration
//!
//! [`ImuTask`] plugs into the core scheduler like any other task: it
//! reads the vector channels, stores the scalar projections the log rows
//! use, and feeds each frame through the suite. Nets can also be driven
//! directly:
//!
//! ```
//! use fieldwarden_anomaly::{AnomalyNet, HeadingDriftNet, ImuSnapshot, NetOutput};
//!
//! let mut net = HeadingDriftNet::new();
//! let mut out = NetOutput::new();
//! net.observe(&ImuSnapshot::level(0), &mut out);
//! assert!(out.is_empty()); // one frame proves nothing
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Macros for optional logging
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

pub mod coherence;
pub mod constants;
pub mod drift;
pub mod gravity;
pub mod magnetic;
pub mod net;
pub mod resonance;
pub mod snapshot;
pub mod stillness;
pub mod suite;
pub mod task;
pub mod temporal;

// Public API
pub use coherence::CoherenceNet;
pub use drift::HeadingDriftNet;
pub use gravity::GravityNet;
pub use magnetic::MagneticNet;
pub use net::{AnomalyNet, NetOutput};
pub use resonance::ResonanceNet;
pub use snapshot::ImuSnapshot;
pub use stillness::StillnessNet;
pub use suite::NetSuite;
pub use task::ImuTask;
pub use temporal::TemporalNet;
