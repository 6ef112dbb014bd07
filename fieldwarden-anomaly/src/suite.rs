//! The net battery
//!
//! A [`NetSuite`] owns a fixed roster of boxed nets and drives them all
//! with the same frames in the same order, so every detector judges an
//! identical view of the stream. The standard battery wires the seven
//! stock nets; callers with unusual hardware can start empty and add
//! their own.

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;
#[cfg(feature = "std")]
use std::boxed::Box;

use fieldwarden_core::{ConfigError, ConfigResult};
use heapless::Vec;

use crate::coherence::CoherenceNet;
use crate::constants::MAX_NETS;
use crate::drift::HeadingDriftNet;
use crate::gravity::GravityNet;
use crate::magnetic::MagneticNet;
use crate::net::{AnomalyNet, NetOutput};
use crate::resonance::ResonanceNet;
use crate::snapshot::ImuSnapshot;
use crate::stillness::StillnessNet;
use crate::temporal::TemporalNet;

/// A roster of anomaly nets driven as one unit
#[derive(Default)]
pub struct NetSuite {
    nets: Vec<Box<dyn AnomalyNet>, MAX_NETS>,
}

impl NetSuite {
    /// An empty suite
    pub fn new() -> Self {
        Self { nets: Vec::new() }
    }

    /// The standard battery: all seven stock nets
    pub fn with_defaults() -> ConfigResult<Self> {
        let mut suite = Self::new();
        suite.add(HeadingDriftNet::new())?;
        suite.add(TemporalNet::new())?;
        suite.add(MagneticNet::new())?;
        suite.add(GravityNet::new())?;
        suite.add(CoherenceNet::new())?;
        suite.add(StillnessNet::new())?;
        suite.add(ResonanceNet::new())?;
        Ok(suite)
    }

    /// Adds a net to the roster
    pub fn add<N: AnomalyNet + 'static>(&mut self, net: N) -> ConfigResult<()> {
        self.nets
            .push(Box::new(net))
            .map_err(|_| ConfigError::CapacityExceeded {
                what: "anomaly nets",
            })
    }

    /// Number of nets on the roster
    pub fn len(&self) -> usize {
        self.nets.len()
    }

    /// Whether the roster is empty
    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
    }

    /// Names of the rostered nets, in drive order
    pub fn names(&self) -> Vec<&'static str, MAX_NETS> {
        self.nets.iter().map(|net| net.name()).collect()
    }

    /// Drives every net with one frame
    pub fn observe(&mut self, frame: &ImuSnapshot, out: &mut NetOutput) {
        for net in self.nets.iter_mut() {
            net.observe(frame, out);
        }
    }

    /// Resets every net, as after a sensor power cycle
    pub fn reset_all(&mut self) {
        for net in self.nets.iter_mut() {
            net.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{GRAVITY_FLIP_CODE, STILLNESS_RUN, STUCK_CODE};
    use fieldwarden_core::constants::STANDARD_GRAVITY_MS2;

    #[test]
    fn standard_battery_has_the_expected_roster() {
        let suite = NetSuite::with_defaults().unwrap();
        assert_eq!(suite.len(), 7);

        let names = suite.names();
        assert_eq!(
            names.as_slice(),
            &[
                "drift",
                "temporal",
                "magnetic",
                "gravity",
                "coherence",
                "stillness",
                "resonance",
            ]
        );
    }

    #[test]
    fn roster_capacity_is_enforced() {
        let mut suite = NetSuite::with_defaults().unwrap();
        suite.add(ResonanceNet::new()).unwrap(); // eighth slot

        let overflow = suite.add(ResonanceNet::new());
        assert_eq!(
            overflow,
            Err(ConfigError::CapacityExceeded {
                what: "anomaly nets"
            })
        );
    }

    #[test]
    fn a_flip_reaches_the_output_through_the_suite() {
        let mut suite = NetSuite::with_defaults().unwrap();
        let mut out = NetOutput::new();

        let mut frame = ImuSnapshot::level(0);
        frame.lin_accel = [0.01, 0.0, 0.0];
        suite.observe(&frame, &mut out);

        frame.timestamp = 100;
        frame.gravity = [0.0, 0.0, -STANDARD_GRAVITY_MS2];
        frame.pitch_deg = 180.0; // inverted attitude agrees with gravity
        suite.observe(&frame, &mut out);

        assert!(out.iter().any(|alert| alert.code == GRAVITY_FLIP_CODE));
    }

    #[test]
    fn reset_clears_every_latch() {
        let mut suite = NetSuite::with_defaults().unwrap();
        let mut out = NetOutput::new();

        // Freeze long enough for the stillness net to latch
        for i in 0..STILLNESS_RUN as u64 + 10 {
            suite.observe(&ImuSnapshot::level(i * 100), &mut out);
        }
        assert!(out.iter().any(|alert| alert.code == STUCK_CODE));

        suite.reset_all();
        out.clear();

        // A short freeze after reset stays below the run length
        for i in 0..10u64 {
            suite.observe(&ImuSnapshot::level(20_000 + i * 100), &mut out);
        }
        assert!(out.is_empty());
    }
}
