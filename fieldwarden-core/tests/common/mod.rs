//! Shared fixtures for the integration suite
//!
//! Provides:
//! - Scripted sensor hardware (sources and pulse lines that replay
//!   fixed result scripts)
//! - A capturing alert sink the tests can keep a handle on
//! - A full patrol-loop rig wiring scheduler, engine state and the
//!   alert task together under simulated time
//! - Deterministic value generators so two runs see identical data

#![allow(dead_code)]

pub mod generators;
pub mod harness;

pub use generators::TestRng;
pub use harness::{CaptureSink, PatrolRig, ScriptedLine, ScriptedSource};

/// Assert two floats agree within an absolute tolerance
#[macro_export]
macro_rules! assert_close {
    ($actual:expr, $expected:expr, $tolerance:expr) => {
        let diff = ($actual - $expected).abs();
        if diff > $tolerance {
            panic!(
                "Value {} not within {} of expected {} (diff: {})",
                $actual, $tolerance, $expected, diff
            );
        }
    };
}
