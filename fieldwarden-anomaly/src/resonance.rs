//! Rotation rate reference matching
//!
//! Survey practice flags instruments whose rotation rate sits on one of
//! a short table of reference values: a handheld unit has no business
//! rotating at a constant rate at all, and a match against the table is
//! treated as a pattern worth an operator's glance rather than noise.
//! The net reports band entry once and stays quiet while the rate camps
//! inside the band; hopping to a different table row is a new entry.

use core::fmt::Write;

use libm::fabs;

use fieldwarden_core::constants::MAX_MESSAGE_LEN;
use fieldwarden_core::{Alert, AnomalyGrade};

use crate::constants::{REFERENCE_RATES, RESONANCE_BAND, RESONANCE_CODE};
use crate::net::{AnomalyNet, NetOutput};
use crate::snapshot::ImuSnapshot;

/// Flags gyro magnitudes locked onto a reference table entry
pub struct ResonanceNet {
    locked: Option<usize>,
}

impl ResonanceNet {
    /// A net with no active lock
    pub const fn new() -> Self {
        Self { locked: None }
    }

    /// Index of the matched table row, if any
    pub fn locked_row(&self) -> Option<usize> {
        self.locked
    }
}

impl Default for ResonanceNet {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyNet for ResonanceNet {
    fn name(&self) -> &'static str {
        "resonance"
    }

    fn observe(&mut self, frame: &ImuSnapshot, out: &mut NetOutput) {
        let rate = frame.gyro_mag();
        let hit = REFERENCE_RATES
            .iter()
            .position(|&reference| fabs(rate - reference) <= RESONANCE_BAND);

        match (hit, self.locked) {
            (Some(row), Some(held)) if row == held => {} // camped inside the band
            (Some(row), _) => {
                let mut message: heapless::String<MAX_MESSAGE_LEN> = heapless::String::new();
                let _ = write!(
                    message,
                    "Rotation rate {:.2} rad/s locked on reference {:.2}",
                    rate, REFERENCE_RATES[row]
                );
                out.push(Alert::net(
                    AnomalyGrade::Warning,
                    RESONANCE_CODE,
                    &message,
                    frame.timestamp,
                ));
                self.locked = Some(row);
            }
            (None, _) => self.locked = None,
        }
    }

    fn reset(&mut self) {
        self.locked = None;
    }
}
