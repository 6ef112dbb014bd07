//! Windowed Statistics: Linear, Circular and Interval Math
//!
//! ## Overview
//!
//! All derived quantities the alert engine consumes come from here:
//! linear mean/variance/range over a [`HistoryWindow`], circular mean and
//! angular range for the heading channel, and timestamp interval variance
//! for cadence health.
//!
//! ## Circular statistics
//!
//! Headings live on a circle; the arithmetic mean of 350° and 10° is 180°,
//! which points the wrong way entirely. Circular quantities average unit
//! vectors and come back through `atan2`:
//!
//! ```text
//! mean = atan2(Σ sin(hᵢ), Σ cos(hᵢ))
//! ```
//!
//! Ranges and deviations re-express angles as `(a + 180) mod 360 - 180`,
//! the shortest signed distance in [-180, 180). Every circular result is
//! invariant under whole-window rotation, which the property tests pin
//! down.
//!
//! ## Gating
//!
//! Each statistic returns `None` below its own mathematical minimum
//! (variance needs 2 readings, interval variance needs 3). The
//! [`derive`] dispatcher additionally applies the caller's configured
//! minimum sample count so half-filled windows stay silent.

use libm::{atan2, cos, fabs, fmod, sin, sqrt};

use crate::constants::thresholds::{
    HEADING_OUTLIER_DEG, SMOOTHER_RESEED_STREAK, STATIONARY_ACCEL_LIMIT_MS2,
    STATIONARY_TILT_LIMIT_DEG,
};
use crate::constants::windows::SMOOTHER_TAPS;
use crate::signals::SignalId;
use crate::window::HistoryWindow;

/// Degrees to radians
pub const fn deg_to_rad(deg: f64) -> f64 {
    deg * core::f64::consts::PI / 180.0
}

/// Radians to degrees
pub const fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / core::f64::consts::PI
}

/// Re-express an angle as the shortest signed offset in [-180, 180)
///
/// `wrap_deg(350.0 - 10.0)` is -20: ten degrees past north to 350 is a
/// 20° left difference, not 340°.
pub fn wrap_deg(angle: f64) -> f64 {
    let mut a = fmod(angle + 180.0, 360.0);
    if a < 0.0 {
        a += 360.0;
    }
    a - 180.0
}

/// Shortest signed angular difference `to - from` in [-180, 180)
pub fn angular_delta_deg(from: f64, to: f64) -> f64 {
    wrap_deg(to - from)
}

/// Normalize an angle into [0, 360)
pub fn normalize_deg(angle: f64) -> f64 {
    let a = fmod(angle, 360.0);
    if a < 0.0 {
        a + 360.0
    } else {
        a
    }
}

/// Arithmetic mean of window values
pub fn linear_mean<const N: usize>(window: &HistoryWindow<N>) -> Option<f64> {
    if window.is_empty() {
        return None;
    }
    let sum: f64 = window.iter().map(|r| r.value).sum();
    Some(sum / window.len() as f64)
}

/// Population variance of window values; needs at least 2 readings
pub fn linear_variance<const N: usize>(window: &HistoryWindow<N>) -> Option<f64> {
    if window.len() < 2 {
        return None;
    }
    let mean = linear_mean(window)?;
    let sum_sq: f64 = window
        .iter()
        .map(|r| {
            let d = r.value - mean;
            d * d
        })
        .sum();
    Some(sum_sq / window.len() as f64)
}

/// Spread between the largest and smallest window value
pub fn value_range<const N: usize>(window: &HistoryWindow<N>) -> Option<f64> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for r in window.iter() {
        if r.value < min {
            min = r.value;
        }
        if r.value > max {
            max = r.value;
        }
    }
    if window.is_empty() {
        return None;
    }
    Some(max - min)
}

/// Population variance of successive timestamp deltas, in ms²
///
/// Needs at least 3 readings (2 deltas). A steady cadence scores 0;
/// scheduler stalls and bus retries inflate it.
pub fn interval_variance_ms2<const N: usize>(window: &HistoryWindow<N>) -> Option<f64> {
    if window.len() < 3 {
        return None;
    }

    let n_deltas = (window.len() - 1) as f64;
    let mut prev: Option<u64> = None;
    let mut sum = 0.0;
    for r in window.iter() {
        if let Some(p) = prev {
            sum += r.timestamp.saturating_sub(p) as f64;
        }
        prev = Some(r.timestamp);
    }
    let mean = sum / n_deltas;

    let mut prev: Option<u64> = None;
    let mut sum_sq = 0.0;
    for r in window.iter() {
        if let Some(p) = prev {
            let d = r.timestamp.saturating_sub(p) as f64 - mean;
            sum_sq += d * d;
        }
        prev = Some(r.timestamp);
    }
    Some(sum_sq / n_deltas)
}

/// Circular mean of window values interpreted as degrees, in [0, 360)
///
/// Unit-vector averaging; antipodal cancellation (vector sum near zero)
/// falls back to whatever `atan2` makes of the residue, which is as good
/// as any direction for a window with no preferred heading.
pub fn circular_mean_deg<const N: usize>(window: &HistoryWindow<N>) -> Option<f64> {
    if window.is_empty() {
        return None;
    }
    let mut sin_sum = 0.0;
    let mut cos_sum = 0.0;
    for r in window.iter() {
        let rad = deg_to_rad(r.value);
        sin_sum += sin(rad);
        cos_sum += cos(rad);
    }
    Some(normalize_deg(rad_to_deg(atan2(sin_sum, cos_sum))))
}

/// Wraparound-aware spread of window values interpreted as degrees
///
/// Deviations are taken against the circular mean and wrapped into
/// [-180, 180) before the max-min, so a window straddling north
/// ([350°, 10°]) scores 20, not 340.
pub fn angular_range_deg<const N: usize>(window: &HistoryWindow<N>) -> Option<f64> {
    let mean = circular_mean_deg(window)?;
    let mut min_dev = f64::INFINITY;
    let mut max_dev = f64::NEG_INFINITY;
    for r in window.iter() {
        let dev = angular_delta_deg(mean, r.value);
        if dev < min_dev {
            min_dev = dev;
        }
        if dev > max_dev {
            max_dev = dev;
        }
    }
    Some(max_dev - min_dev)
}

/// Population variance of wrapped deviations from the circular mean, deg²
pub fn circular_variance_deg2<const N: usize>(window: &HistoryWindow<N>) -> Option<f64> {
    if window.len() < 2 {
        return None;
    }
    let mean = circular_mean_deg(window)?;
    let sum_sq: f64 = window
        .iter()
        .map(|r| {
            let d = angular_delta_deg(mean, r.value);
            d * d
        })
        .sum();
    Some(sum_sq / window.len() as f64)
}

/// Stationarity gate for orientation statistics
///
/// Heading, gravity and magnetic windows only learn while the instrument
/// is effectively still: low linear acceleration and near-level tilt.
/// Swinging on a lanyard must not count as compass drift.
pub fn is_stationary(accel_mag: f64, pitch_deg: f64, roll_deg: f64) -> bool {
    accel_mag < STATIONARY_ACCEL_LIMIT_MS2
        && fabs(pitch_deg) < STATIONARY_TILT_LIMIT_DEG
        && fabs(roll_deg) < STATIONARY_TILT_LIMIT_DEG
}

/// Which derived quantity to compute over a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    /// Central value (circular mean on angular channels)
    Mean,
    /// Population variance (wrapped deviations on angular channels)
    Variance,
    /// Max-min spread (wraparound-aware on angular channels)
    Range,
    /// Variance of successive timestamp deltas
    IntervalVariance,
}

/// One derived quantity with its provenance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedStatistic {
    /// Channel the source window belongs to
    pub signal: SignalId,
    /// Quantity computed
    pub kind: StatKind,
    /// Result in the channel's unit (or ms² for interval variance)
    pub value: f64,
    /// Readings that went into the computation
    pub sample_count: usize,
}

/// Compute one statistic over a window, honoring a minimum sample count
///
/// Angular channels are dispatched to the circular implementations;
/// everything else takes the linear path. Returns `None` below
/// `min_samples` or below the statistic's own mathematical minimum.
pub fn derive<const N: usize>(
    signal: SignalId,
    kind: StatKind,
    window: &HistoryWindow<N>,
    min_samples: usize,
) -> Option<DerivedStatistic> {
    if window.len() < min_samples {
        return None;
    }
    let value = match (kind, signal.is_angular()) {
        (StatKind::Mean, false) => linear_mean(window)?,
        (StatKind::Mean, true) => circular_mean_deg(window)?,
        (StatKind::Variance, false) => linear_variance(window)?,
        (StatKind::Variance, true) => circular_variance_deg2(window)?,
        (StatKind::Range, false) => value_range(window)?,
        (StatKind::Range, true) => angular_range_deg(window)?,
        (StatKind::IntervalVariance, _) => interval_variance_ms2(window)?,
    };
    Some(DerivedStatistic {
        signal,
        kind,
        value,
        sample_count: window.len(),
    })
}

/// Outlier-rejecting smoother for the heading channel
///
/// Keeps the last few accepted headings; a new heading more than
/// [`HEADING_OUTLIER_DEG`] away from their circular mean is discarded as
/// a magnetometer glitch. Genuine fast turns would reject forever, so a
/// run of consecutive rejections reseeds the smoother from the raw value.
#[derive(Debug, Clone)]
pub struct HeadingSmoother {
    accepted: [f64; SMOOTHER_TAPS],
    len: usize,
    pos: usize,
    rejected_streak: u32,
}

impl HeadingSmoother {
    pub const fn new() -> Self {
        Self {
            accepted: [0.0; SMOOTHER_TAPS],
            len: 0,
            pos: 0,
            rejected_streak: 0,
        }
    }

    /// Offer a raw heading; returns the smoothed heading or `None` when
    /// the value was rejected as an outlier
    ///
    /// The smoothed value is the circular mean of the accepted taps, so
    /// feeding an already-smooth sequence back through changes it by
    /// well under a degree.
    pub fn smooth(&mut self, raw_deg: f64) -> Option<f64> {
        if self.len == SMOOTHER_TAPS {
            let mean = self.tap_mean();
            if fabs(angular_delta_deg(mean, raw_deg)) > HEADING_OUTLIER_DEG {
                self.rejected_streak += 1;
                if self.rejected_streak < SMOOTHER_RESEED_STREAK {
                    log_debug!("heading outlier {:.1} rejected (mean {:.1})", raw_deg, mean);
                    return None;
                }
                // Sustained disagreement is a real turn, not a glitch
                self.len = 0;
                self.pos = 0;
            }
        }

        self.rejected_streak = 0;
        self.accepted[self.pos] = normalize_deg(raw_deg);
        self.pos = (self.pos + 1) % SMOOTHER_TAPS;
        if self.len < SMOOTHER_TAPS {
            self.len += 1;
        }
        Some(self.tap_mean())
    }

    /// Forget all accepted headings
    pub fn reset(&mut self) {
        self.len = 0;
        self.pos = 0;
        self.rejected_streak = 0;
    }

    fn tap_mean(&self) -> f64 {
        let mut sin_sum = 0.0;
        let mut cos_sum = 0.0;
        for &h in self.accepted.iter().take(self.len) {
            let rad = deg_to_rad(h);
            sin_sum += sin(rad);
            cos_sum += cos(rad);
        }
        normalize_deg(rad_to_deg(atan2(sin_sum, cos_sum)))
    }
}

impl Default for HeadingSmoother {
    fn default() -> Self {
        Self::new()
    }
}

/// Magnitude of a 3-vector
pub fn magnitude(v: [f64; 3]) -> f64 {
    sqrt(v[0] * v[0] + v[1] * v[1] + v[2] * v[2])
}

/// Dot product of two 3-vectors
pub fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Cosine of the angle between two 3-vectors; 0 when either is null
pub fn cosine_similarity(a: [f64; 3], b: [f64; 3]) -> f64 {
    let denom = magnitude(a) * magnitude(b);
    if denom == 0.0 {
        return 0.0;
    }
    dot(a, b) / denom
}
