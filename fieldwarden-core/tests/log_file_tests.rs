//! Tests for field-log output written through real files
//!
//! The crate formats header and row strings; storage is the caller's.
//! These tests play that caller: append rows from a live patrol to a
//! temp file, read it back and check the log still parses as a CSV
//! with a stable shape.

mod common;

#[cfg(all(test, feature = "std"))]
mod tests {
    use std::fs::OpenOptions;
    use std::io::Write;

    use chrono::NaiveDate;
    use tempfile::TempDir;

    use fieldwarden_core::constants::time::PRESSURE_HISTORY_INTERVAL_MS;
    use fieldwarden_core::logrow::LogSchema;
    use fieldwarden_core::{Classifier, Profile, SignalId};

    use crate::common::harness::{PatrolRig, ScriptedLine, ScriptedSource};

    /// Columns in the stock schema: timestamp, ten numeric signals,
    /// five status codes, three weather cells, readiness, alerts.
    const STANDARD_FIELD_COUNT: usize = 21;

    fn wall(second: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 19)
            .unwrap()
            .and_hms_opt(6, 45, second)
            .unwrap()
    }

    /// Rig with quiet air, a strong-high barometric history and all
    /// scalar sources attached
    fn logging_rig() -> (PatrolRig, Classifier) {
        let profile = Profile::default();
        let classifier = profile.classifier().unwrap();

        let mut rig = PatrolRig::new(profile);
        rig.add_line(ScriptedLine::quiet());
        rig.add_source(ScriptedSource::steady(SignalId::Co2, 450.0), 5_000);
        rig.add_source(ScriptedSource::steady(SignalId::Tvoc, 0.12), 5_000);
        rig.add_source(ScriptedSource::steady(SignalId::Lux, 120.0), 4_000);
        rig.add_source(ScriptedSource::steady(SignalId::PressureHpa, 1_033.2), 3_000);
        rig.add_alert_task();

        // Rising history into a strong high; the stock forecast for it
        // carries a comma, which the row sanitizer must neutralize.
        let end_ms = 47 * PRESSURE_HISTORY_INTERVAL_MS;
        for i in 0..48u64 {
            let at = i * PRESSURE_HISTORY_INTERVAL_MS;
            let hours_back = (end_ms - at) as f64 / 3_600_000.0;
            assert!(rig.state.pressure.record(1_033.0 - 2.0 * hours_back, at));
        }
        rig.now = end_ms;

        (rig, classifier)
    }

    #[test]
    fn log_file_keeps_a_stable_shape() {
        let (mut rig, classifier) = logging_rig();
        let schema = LogSchema::standard();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patrol.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", schema.header()).unwrap();

        for second in 0..3 {
            rig.run_for(1_000);
            let row = schema.format_row_at(&rig.state, &classifier, rig.now, wall(second));
            writeln!(file, "{}", row).unwrap();
        }
        file.flush().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);

        for line in &lines {
            assert_eq!(
                line.split(',').count(),
                STANDARD_FIELD_COUNT,
                "sheared row: {}",
                line
            );
        }
    }

    #[test]
    fn rows_carry_samples_statuses_and_sanitized_forecast() {
        let (mut rig, classifier) = logging_rig();
        rig.run_for(2_000);

        let schema = LogSchema::standard();
        let row = schema.format_row_at(&rig.state, &classifier, rig.now, wall(7));
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(fields.len(), STANDARD_FIELD_COUNT);

        assert_eq!(fields[0], "2025-07-19 06:45:07");
        assert_eq!(fields[1], "450");
        assert_eq!(fields[4], "1033.2");
        // The quiet line's first window closed on the opening tick:
        // zero pulses, zero dose, and the warm-up long since over.
        assert_eq!(fields[5], "0");
        assert_eq!(fields[6], "0.000");
        // Heading never sampled: the cell stays empty, not zero.
        assert_eq!(fields[7], "");

        assert_eq!(fields[11], "CO2-OK");
        assert_eq!(fields[13], "RAD-SAFE");
        assert_eq!(fields[16], "RISING");
        assert_eq!(fields[17], "LOW");
        assert_eq!(fields[18], "HIGH PRESSURE - Stable; clear conditions likely");
        assert_eq!(fields[19], "YES");
        assert_eq!(fields[20], "");
    }

    /// Appending from a fresh handle mirrors a logger that reopens the
    /// file each patrol leg.
    #[test]
    fn appended_rows_extend_an_existing_log() {
        let (mut rig, classifier) = logging_rig();
        let schema = LogSchema::standard();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patrol.csv");

        {
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "{}", schema.header()).unwrap();
            rig.run_for(1_000);
            let row = schema.format_row_at(&rig.state, &classifier, rig.now, wall(0));
            writeln!(file, "{}", row).unwrap();
        }

        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            for second in 1..3 {
                rig.run_for(1_000);
                let row = schema.format_row_at(&rig.state, &classifier, rig.now, wall(second));
                writeln!(file, "{}", row).unwrap();
            }
        }

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with("Timestamp,"));
    }
}
