//! Gravity magnitude variation and vector flips
//!
//! Two very different failures share the gravity channel. Magnitude
//! wobble while the unit is still points at a degrading accelerometer or
//! fusion: gravity does not change strength on a bench. A sign reversal
//! between consecutive frames is blunter - the unit was turned over, or
//! the fusion re-seeded upside down - and fires Critical immediately,
//! moving or not. Flips are debounced so a unit tumbling in a pocket
//! reports once a second instead of once a frame.

use core::fmt::Write;

use fieldwarden_core::constants::time::{GRAVITY_FLIP_DEBOUNCE_MS, GRAVITY_HORIZON_MS};
use fieldwarden_core::constants::windows::GRAVITY_WINDOW;
use fieldwarden_core::constants::MAX_MESSAGE_LEN;
use fieldwarden_core::stats::{cosine_similarity, linear_variance};
use fieldwarden_core::{delta_ms, Alert, AnomalyGrade, HistoryWindow, Timestamp};

use crate::constants::{
    GRAVITY_FLIP_CODE, GRAVITY_FLIP_COSINE, GRAVITY_MIN_SAMPLES, GRAVITY_SIGMA_LIMIT_MS2,
    GRAVITY_VARIATION_CODE,
};
use crate::net::{AnomalyNet, NetOutput};
use crate::snapshot::ImuSnapshot;

/// Flags gravity micro-variation and outright vector reversals
pub struct GravityNet {
    magnitudes: HistoryWindow<GRAVITY_WINDOW>,
    previous: Option<[f64; 3]>,
    last_flip_at: Option<Timestamp>,
    variation_reported: bool,
}

impl GravityNet {
    /// A net with no gravity history
    pub const fn new() -> Self {
        Self {
            magnitudes: HistoryWindow::with_horizon(GRAVITY_HORIZON_MS),
            previous: None,
            last_flip_at: None,
            variation_reported: false,
        }
    }

    /// Magnitude samples currently inside the stationary window
    pub fn samples(&self) -> usize {
        self.magnitudes.len()
    }
}

impl Default for GravityNet {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyNet for GravityNet {
    fn name(&self) -> &'static str {
        "gravity"
    }

    fn observe(&mut self, frame: &ImuSnapshot, out: &mut NetOutput) {
        // Flip check first; reversals matter even in motion
        if let Some(previous) = self.previous {
            if cosine_similarity(previous, frame.gravity) < GRAVITY_FLIP_COSINE {
                let suppressed = self
                    .last_flip_at
                    .map_or(false, |at| delta_ms(at, frame.timestamp) < GRAVITY_FLIP_DEBOUNCE_MS);
                if !suppressed {
                    out.push(Alert::net(
                        AnomalyGrade::Critical,
                        GRAVITY_FLIP_CODE,
                        "Gravity vector reversed - instrument inverted or fusion fault",
                        frame.timestamp,
                    ));
                    self.last_flip_at = Some(frame.timestamp);
                }
            }
        }
        self.previous = Some(frame.gravity);

        // Magnitude variation only learns while still
        self.magnitudes.expire(frame.timestamp);
        if !frame.is_stationary() {
            if self.magnitudes.len() < GRAVITY_MIN_SAMPLES {
                self.variation_reported = false;
            }
            return;
        }
        self.magnitudes.push_value(frame.gravity_mag(), frame.timestamp);
        if self.magnitudes.len() < GRAVITY_MIN_SAMPLES {
            self.variation_reported = false;
            return;
        }
        let Some(variance) = linear_variance(&self.magnitudes) else {
            return;
        };
        if variance > GRAVITY_SIGMA_LIMIT_MS2 * GRAVITY_SIGMA_LIMIT_MS2 {
            if !self.variation_reported {
                let mut message: heapless::String<MAX_MESSAGE_LEN> = heapless::String::new();
                let _ = write!(
                    message,
                    "Gravity magnitude varying while still - variance {:.4}",
                    variance
                );
                out.push(Alert::net(
                    AnomalyGrade::Warning,
                    GRAVITY_VARIATION_CODE,
                    &message,
                    frame.timestamp,
                ));
                self.variation_reported = true;
            }
        } else {
            self.variation_reported = false;
        }
    }

    fn reset(&mut self) {
        self.magnitudes.clear();
        self.previous = None;
        self.last_flip_at = None;
        self.variation_reported = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldwarden_core::constants::STANDARD_GRAVITY_MS2;

    fn upright(timestamp: u64) -> ImuSnapshot {
        let mut frame = ImuSnapshot::level(timestamp);
        frame.lin_accel = [0.01, 0.0, 0.0];
        frame
    }

    fn inverted(timestamp: u64) -> ImuSnapshot {
        let mut frame = upright(timestamp);
        frame.gravity = [0.0, 0.0, -STANDARD_GRAVITY_MS2];
        frame
    }

    fn codes(out: &NetOutput) -> Vec<&'static str> {
        out.iter().map(|alert| alert.code).collect()
    }

    #[test]
    fn flip_fires_critical_exactly_once() {
        let mut net = GravityNet::new();
        let mut out = NetOutput::new();

        net.observe(&upright(0), &mut out);
        net.observe(&upright(100), &mut out);
        net.observe(&inverted(200), &mut out);

        assert_eq!(codes(&out), vec![GRAVITY_FLIP_CODE]);
    }

    #[test]
    fn second_flip_inside_the_debounce_is_suppressed() {
        let mut net = GravityNet::new();
        let mut out = NetOutput::new();

        net.observe(&upright(0), &mut out);
        net.observe(&inverted(200), &mut out);
        net.observe(&upright(400), &mut out); // back again, 200 ms later
        net.observe(&inverted(600), &mut out);

        assert_eq!(codes(&out), vec![GRAVITY_FLIP_CODE]);
    }

    #[test]
    fn flip_after_the_debounce_reports_again() {
        let mut net = GravityNet::new();
        let mut out = NetOutput::new();

        net.observe(&upright(0), &mut out);
        net.observe(&inverted(200), &mut out);
        for i in 3..20u64 {
            net.observe(&inverted(i * 100), &mut out);
        }
        net.observe(&upright(2_000), &mut out);

        assert_eq!(codes(&out), vec![GRAVITY_FLIP_CODE, GRAVITY_FLIP_CODE]);
    }

    #[test]
    fn resting_gravity_noise_stays_quiet() {
        let mut net = GravityNet::new();
        let mut out = NetOutput::new();

        for i in 0..60u64 {
            let mut frame = upright(i * 100);
            let wobble = if i % 2 == 0 { 0.01 } else { -0.01 };
            frame.gravity = [0.0, 0.0, STANDARD_GRAVITY_MS2 + wobble];
            net.observe(&frame, &mut out);
        }
        assert!(out.is_empty());
    }

    #[test]
    fn magnitude_wobble_fires_one_warning() {
        let mut net = GravityNet::new();
        let mut out = NetOutput::new();

        // +-0.1 m/s2 swings: variance 0.01, four times the limit
        for i in 0..60u64 {
            let mut frame = upright(i * 100);
            let wobble = if i % 2 == 0 { 0.1 } else { -0.1 };
            frame.gravity = [0.0, 0.0, STANDARD_GRAVITY_MS2 + wobble];
            net.observe(&frame, &mut out);
        }
        assert_eq!(codes(&out), vec![GRAVITY_VARIATION_CODE]);
    }

    #[test]
    fn motion_pauses_magnitude_learning() {
        let mut net = GravityNet::new();
        let mut out = NetOutput::new();

        for i in 0..60u64 {
            let mut frame = upright(i * 100);
            frame.lin_accel = [3.0, 0.0, 0.0];
            let wobble = if i % 2 == 0 { 0.2 } else { -0.2 };
            frame.gravity = [0.0, 0.0, STANDARD_GRAVITY_MS2 + wobble];
            net.observe(&frame, &mut out);
        }
        assert!(out.is_empty());
        assert_eq!(net.samples(), 0);
    }
}
