//! Property Tests for the Statistics Kernel
//!
//! The statistics module makes two families of structural claims: circular
//! results are invariant under whole-window rotation, and linear results
//! agree with straightforward reference arithmetic. The unit tests pin
//! hand-picked values; the generators here sweep the input space for the
//! claims themselves.
//!
//! ## Test Scope
//!
//! - Angle helpers: wrap/normalize output ranges and congruence modulo a turn
//! - Shortest-arc deltas: cancellation and composition around the circle
//! - Circular mean, range and variance under whole-window rotation
//! - Linear statistics against two-pass slice arithmetic
//! - Ring overwrite, horizon expiry and cadence bookkeeping

use proptest::prelude::*;

use fieldwarden_core::stats::{
    angular_delta_deg, angular_range_deg, circular_mean_deg, circular_variance_deg2,
    interval_variance_ms2, linear_mean, linear_variance, normalize_deg, value_range, wrap_deg,
};
use fieldwarden_core::HistoryWindow;

/// Builds a window from values at a fixed 100 ms cadence.
fn window_of<const N: usize>(values: &[f64]) -> HistoryWindow<N> {
    let mut window = HistoryWindow::new();
    for (index, &value) in values.iter().enumerate() {
        window.push_value(value, index as u64 * 100);
    }
    window
}

/// Headings clustered inside a 120° arc.
///
/// Keeping the whole window on one side of the circle keeps the unit
/// vector sum long, so the circular mean stays well conditioned and the
/// rotation comparisons below can use a tight tolerance.
fn clustered_headings() -> impl Strategy<Value = Vec<f64>> {
    (0.0f64..360.0, prop::collection::vec(-60.0f64..60.0, 2..=12)).prop_map(
        |(center, offsets)| {
            offsets
                .into_iter()
                .map(|offset| normalize_deg(center + offset))
                .collect()
        },
    )
}

// ===== ANGLE HELPERS =====

proptest! {
    #[test]
    fn wrap_stays_in_the_half_open_range(angle in -1.0e6f64..1.0e6) {
        let wrapped = wrap_deg(angle);
        prop_assert!((-180.0..180.0).contains(&wrapped), "wrap({}) = {}", angle, wrapped);
        // Wrapping changes an angle by a whole number of turns, nothing else.
        prop_assert!(wrap_deg(wrapped - angle).abs() < 1e-6);
    }

    #[test]
    fn wrap_is_idempotent(angle in -1.0e6f64..1.0e6) {
        let once = wrap_deg(angle);
        prop_assert!((wrap_deg(once) - once).abs() < 1e-9);
    }

    #[test]
    fn normalize_stays_congruent_to_its_input(angle in -1.0e6f64..1.0e6) {
        let normalized = normalize_deg(angle);
        prop_assert!((0.0..360.0).contains(&normalized));
        prop_assert!(wrap_deg(normalized - angle).abs() < 1e-6);
    }

    #[test]
    fn deltas_cancel_modulo_a_full_turn(a in 0.0f64..360.0, b in 0.0f64..360.0) {
        let forward = angular_delta_deg(a, b);
        let back = angular_delta_deg(b, a);
        prop_assert!((-180.0..180.0).contains(&forward));
        // forward + back is a whole number of turns, so it wraps to zero.
        prop_assert!(wrap_deg(forward + back).abs() < 1e-9);
    }

    #[test]
    fn deltas_compose_around_the_circle(
        a in 0.0f64..360.0,
        b in 0.0f64..360.0,
        c in 0.0f64..360.0,
    ) {
        let legs = angular_delta_deg(a, b) + angular_delta_deg(b, c);
        let direct = angular_delta_deg(a, c);
        prop_assert!(wrap_deg(legs - direct).abs() < 1e-9);
    }

    #[test]
    fn pair_mean_bisects_the_short_arc(a in 10.0f64..170.0, b in 10.0f64..170.0) {
        let mean = circular_mean_deg(&window_of::<4>(&[a, b])).unwrap();
        prop_assert!((mean - (a + b) / 2.0).abs() < 1e-6);
    }

    #[test]
    fn circular_mean_rotates_with_the_window(
        headings in clustered_headings(),
        rotation in 0.0f64..360.0,
    ) {
        let rotated: Vec<f64> = headings
            .iter()
            .map(|heading| normalize_deg(heading + rotation))
            .collect();

        let base = circular_mean_deg(&window_of::<16>(&headings)).unwrap();
        let turned = circular_mean_deg(&window_of::<16>(&rotated)).unwrap();

        prop_assert!(
            angular_delta_deg(normalize_deg(base + rotation), turned).abs() < 1e-6,
            "mean {} rotated by {} should land at {}",
            base,
            rotation,
            turned,
        );
    }

    #[test]
    fn heading_spread_survives_rotation(
        headings in clustered_headings(),
        rotation in 0.0f64..360.0,
    ) {
        let rotated: Vec<f64> = headings
            .iter()
            .map(|heading| normalize_deg(heading + rotation))
            .collect();

        let base = window_of::<16>(&headings);
        let turned = window_of::<16>(&rotated);

        let range_base = angular_range_deg(&base).unwrap();
        let range_turned = angular_range_deg(&turned).unwrap();
        prop_assert!((range_base - range_turned).abs() < 1e-6);

        let variance_base = circular_variance_deg2(&base).unwrap();
        let variance_turned = circular_variance_deg2(&turned).unwrap();
        prop_assert!((variance_base - variance_turned).abs() < 1e-6);
    }
}

// ===== WINDOWED STATISTICS =====

proptest! {
    #[test]
    fn linear_mean_sits_between_the_extremes(
        values in prop::collection::vec(-1.0e5f64..1.0e5, 1..=16),
    ) {
        let window = window_of::<16>(&values);
        let mean = linear_mean(&window).unwrap();

        let reference: f64 = values.iter().sum::<f64>() / values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        prop_assert!(mean >= min - 1e-9 && mean <= max + 1e-9);
        prop_assert!((mean - reference).abs() < 1e-9);
        prop_assert!((value_range(&window).unwrap() - (max - min)).abs() < 1e-9);
    }

    #[test]
    fn variance_matches_the_two_pass_reference(
        values in prop::collection::vec(-1.0e5f64..1.0e5, 2..=16),
    ) {
        let window = window_of::<16>(&values);
        let variance = linear_variance(&window).unwrap();

        let mean: f64 = values.iter().sum::<f64>() / values.len() as f64;
        let reference: f64 = values
            .iter()
            .map(|value| (value - mean) * (value - mean))
            .sum::<f64>()
            / values.len() as f64;

        prop_assert!(variance >= 0.0);
        prop_assert!((variance - reference).abs() <= 1e-9 * (1.0 + reference));
    }

    #[test]
    fn ring_overwrite_keeps_the_newest_readings(
        values in prop::collection::vec(-1.0e3f64..1.0e3, 1..=24),
    ) {
        let window = window_of::<8>(&values);
        let kept = values.len().min(8);

        prop_assert_eq!(window.len(), kept);
        prop_assert_eq!(window.newest().unwrap().value, *values.last().unwrap());

        let tail = &values[values.len() - kept..];
        prop_assert_eq!(window.oldest().unwrap().value, tail[0]);

        let tail_mean: f64 = tail.iter().sum::<f64>() / kept as f64;
        prop_assert!((linear_mean(&window).unwrap() - tail_mean).abs() < 1e-9);
    }

    #[test]
    fn expiry_drops_exactly_the_stale_readings(
        count in 1usize..=16,
        extra in 0u64..2_000,
    ) {
        let mut window: HistoryWindow<16> = HistoryWindow::with_horizon(1_000);
        for index in 0..count {
            window.push_value(index as f64, index as u64 * 100);
        }

        let now = (count as u64 - 1) * 100 + extra;
        window.expire(now);

        let survivors = (0..count)
            .filter(|&index| now - index as u64 * 100 <= 1_000)
            .count();
        prop_assert_eq!(window.len(), survivors);

        if survivors > 0 {
            let first_kept = (count - survivors) as f64;
            prop_assert_eq!(window.oldest().unwrap().value, first_kept);
            prop_assert_eq!(window.newest().unwrap().value, (count - 1) as f64);
        }
    }

    #[test]
    fn steady_cadence_scores_zero_interval_variance(
        step in 10u64..1_000,
        count in 3usize..=16,
    ) {
        let mut window: HistoryWindow<16> = HistoryWindow::new();
        for index in 0..count {
            window.push_value(0.0, index as u64 * step);
        }
        prop_assert!(interval_variance_ms2(&window).unwrap().abs() < 1e-9);
    }
}
