//! Append-Only Log Row Formatting
//!
//! A field log is one CSV header followed by rows that never change
//! shape. [`LogSchema`] declares the numeric column set once, at
//! start-up; [`LogSchema::format_row`] renders the current engine state
//! into one row. File handling stays outside the crate - the caller
//! appends the strings wherever its storage lives.
//!
//! Columns, in order: local wall-clock timestamp, the schema's numeric
//! signals, one status code per practical category, the weather
//! columns, the radiation readiness flag and the last alert summary.
//! Text fields are sanitized so a comma in a forecast cannot shear the
//! row.

use std::fmt::Write as _;

use chrono::NaiveDateTime;

use heapless::Vec;

use crate::classify::Classifier;
use crate::constants::messages::DOSE_WARMUP_CODE;
use crate::engine::EngineState;
use crate::errors::{ConfigError, ConfigResult};
use crate::signals::SignalId;
use crate::time::Timestamp;

/// Timestamp layout at the head of every row
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Declared numeric column set for a log file
#[derive(Debug, Clone)]
pub struct LogSchema {
    signals: Vec<SignalId, { SignalId::COUNT }>,
}

impl LogSchema {
    /// Schema over the given signals, in column order
    pub fn new(signals: &[SignalId]) -> ConfigResult<Self> {
        if signals.is_empty() {
            return Err(ConfigError::ZeroCapacity {
                what: "log schema signals",
            });
        }
        let mut out = Vec::new();
        for signal in signals {
            out.push(*signal)
                .map_err(|_| ConfigError::CapacityExceeded {
                    what: "log schema signals",
                })?;
        }
        Ok(Self { signals: out })
    }

    /// The stock field-log column set
    pub fn standard() -> Self {
        let mut signals = Vec::new();
        // Capacity is COUNT; these pushes cannot overflow
        for signal in [
            SignalId::Co2,
            SignalId::Tvoc,
            SignalId::Lux,
            SignalId::PressureHpa,
            SignalId::RadiationCpm,
            SignalId::DoseRate,
            SignalId::HeadingDeg,
            SignalId::PitchDeg,
            SignalId::RollDeg,
            SignalId::LoopInterval,
        ] {
            let _ = signals.push(signal);
        }
        Self { signals }
    }

    /// Signals backing the numeric columns
    pub fn signals(&self) -> &[SignalId] {
        &self.signals
    }

    /// The CSV header line, without a trailing newline
    pub fn header(&self) -> String {
        let mut line = String::from("Timestamp");
        for signal in self.signals.iter() {
            line.push(',');
            line.push_str(column_name(*signal));
        }
        line.push_str(concat!(
            ",CO2_Status,VOC_Status,Radiation_Status,Light_Status,Loop_Status",
            ",Pressure_Trend,Storm_Risk,Weather_Forecast,Radiation_Ready,Alerts"
        ));
        line
    }

    /// Render one row from the current state
    ///
    /// `now` is engine time (for warm-up and the loop mean); the wall
    /// clock stamps the row. Missing values render as empty fields, not
    /// zeros.
    pub fn format_row_at(
        &self,
        state: &EngineState,
        classifier: &Classifier,
        now: Timestamp,
        wall: NaiveDateTime,
    ) -> String {
        let mut row = String::new();
        let _ = write!(row, "{}", wall.format(TIMESTAMP_FORMAT));

        for signal in self.signals.iter() {
            row.push(',');
            let value = match signal {
                SignalId::LoopInterval => state.mean_loop_interval(),
                _ => state.latest(*signal).map(|s| s.value),
            };
            if let Some(value) = value {
                push_value(&mut row, *signal, value);
            }
        }

        push_status(&mut row, state, classifier, SignalId::Co2);
        push_status(&mut row, state, classifier, SignalId::Tvoc);
        push_radiation_status(&mut row, state, classifier, now);
        push_status(&mut row, state, classifier, SignalId::Lux);
        row.push(',');
        if let Some(mean) = state.mean_loop_interval() {
            if let Some(step) = classifier.classify(SignalId::LoopInterval, mean) {
                row.push_str(step.code);
            }
        }

        let outlook = state.pressure.outlook();
        let _ = write!(
            row,
            ",{},{},{}",
            outlook.trend.name(),
            outlook.risk.name(),
            sanitized(outlook.forecast)
        );

        let ready = if state.counter.is_warmed_up(now) {
            "YES"
        } else {
            "NO"
        };
        row.push(',');
        row.push_str(ready);

        row.push(',');
        if let Some(ref summary) = state.last_summary {
            row.push_str(&sanitized(summary.message.as_str()));
        }

        row
    }

    /// Render one row stamped with the local wall clock
    pub fn format_row(&self, state: &EngineState, classifier: &Classifier, now: Timestamp) -> String {
        self.format_row_at(state, classifier, now, chrono::Local::now().naive_local())
    }
}

impl Default for LogSchema {
    fn default() -> Self {
        Self::standard()
    }
}

/// CSV column name for a signal, in the field-log convention
fn column_name(signal: SignalId) -> &'static str {
    match signal {
        SignalId::RadiationCpm => "CPM",
        SignalId::DoseRate => "uSv_h",
        SignalId::Co2 => "CO2_ppm",
        SignalId::Tvoc => "TVOC_ppm",
        SignalId::Lux => "Lux",
        SignalId::PressureHpa => "Pressure_hPa",
        SignalId::HeadingDeg => "Heading_deg",
        SignalId::PitchDeg => "Pitch_deg",
        SignalId::RollDeg => "Roll_deg",
        SignalId::GravityMag => "Gravity_ms2",
        SignalId::AccelMag => "Accel_ms2",
        SignalId::GyroRate => "Gyro_rads",
        SignalId::LoopInterval => "Loop_ms",
    }
}

/// Per-signal display precision
fn push_value(row: &mut String, signal: SignalId, value: f64) {
    let _ = match signal {
        SignalId::RadiationCpm | SignalId::Co2 | SignalId::Lux => write!(row, "{:.0}", value),
        SignalId::DoseRate => write!(row, "{:.3}", value),
        SignalId::Tvoc | SignalId::GravityMag | SignalId::AccelMag | SignalId::GyroRate => {
            write!(row, "{:.2}", value)
        }
        _ => write!(row, "{:.1}", value),
    };
}

fn push_status(row: &mut String, state: &EngineState, classifier: &Classifier, signal: SignalId) {
    row.push(',');
    let Some(sample) = state.latest(signal) else {
        return;
    };
    if let Some(step) = classifier.classify(signal, sample.value) {
        row.push_str(step.code);
    }
}

fn push_radiation_status(
    row: &mut String,
    state: &EngineState,
    classifier: &Classifier,
    now: Timestamp,
) {
    row.push(',');
    if !state.counter.is_warmed_up(now) {
        row.push_str(DOSE_WARMUP_CODE);
        return;
    }
    if let Some(dose) = state.counter.dose_rate() {
        if let Some(step) = classifier.classify(SignalId::DoseRate, dose) {
            row.push_str(step.code);
        }
    }
}

/// Commas would shear the row; semicolons read the same
fn sanitized(text: &str) -> String {
    text.replace(',', ";")
}
