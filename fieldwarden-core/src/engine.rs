//! Engine State and the Instrument Task Set
//!
//! ## Overview
//!
//! [`EngineState`] is the shared context the scheduler threads through
//! every task: the latest sample per channel, per-channel health, the
//! Geiger pulse accumulator, the loop-interval window, the barometric
//! monitor and the pending alert batch. Tasks own their hardware seams
//! ([`SampleSource`], [`PulseLine`]); everything they learn lands in
//! the state.
//!
//! ## The stock tasks
//!
//! - [`PulseTask`] (critical): samples the Geiger line every tick and
//!   folds closed count windows into CPM/dose samples.
//! - [`PollTask`] (normal): reads one scalar channel at its period and
//!   stores the admitted sample.
//! - [`AlertTask`] (normal): runs the threshold ladders over fresh
//!   data, folds in the storm outlook and any sensor-failure findings,
//!   and fans the batch out to its sinks, summary line first.
//!
//! ## Failure accounting
//!
//! Every failed read counts against its channel; a run of consecutive
//! failures reaching the ceiling marks the channel unavailable and
//! raises a single Critical alert. One good read restores the channel
//! and re-arms the alert.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

#[cfg(feature = "std")]
use std::boxed::Box;

use core::fmt::Write;

use heapless::Vec;

use crate::alerts::{Alert, AlertSink, AnomalyGrade, Severity};
use crate::classify::{AlertBatch, Classifier};
use crate::constants::messages::{
    DOSE_WARMUP_CODE, DOSE_WARMUP_MESSAGE, SENSOR_FAILURE_CODE, STORM_SEVERE_CODE,
    STORM_WARNING_CODE, STORM_WATCH_CODE,
};
use crate::constants::thresholds::FAILURE_CEILING;
use crate::constants::time::STALE_SAMPLE_MS;
use crate::constants::windows::{LOOP_INTERVAL_WINDOW, MAX_MESSAGE_LEN, MAX_SINKS};
use crate::counter::{CounterConfig, PulseCounter};
use crate::errors::{ConfigError, ConfigResult, ReadError};
use crate::pressure::{PressureExtreme, PressureMonitor, StormRisk};
use crate::scheduler::{LoopMonitor, Task};
use crate::signals::{Sample, SignalId};
use crate::stats;
use crate::time::{delta_ms, Timestamp};
use crate::traits::{PulseLine, SampleSource};
use crate::window::HistoryWindow;

/// Consecutive-failure record for one channel
#[derive(Debug, Clone, Copy)]
pub struct ChannelHealth {
    /// Failed reads since the last success
    pub consecutive_errors: u32,
    /// Cleared when failures reach the ceiling; restored by a success
    pub available: bool,
}

impl Default for ChannelHealth {
    fn default() -> Self {
        Self {
            consecutive_errors: 0,
            available: true,
        }
    }
}

impl ChannelHealth {
    fn record_ok(&mut self) {
        self.consecutive_errors = 0;
        self.available = true;
    }

    /// Count a failure; true exactly when this one reaches the ceiling
    fn record_err(&mut self, ceiling: u32) -> bool {
        self.consecutive_errors = self.consecutive_errors.saturating_add(1);
        let crossing = self.consecutive_errors == ceiling;
        if crossing {
            self.available = false;
        }
        crossing
    }
}

/// Shared context the scheduler threads through every task
#[derive(Debug)]
pub struct EngineState {
    latest: [Option<Sample>; SignalId::COUNT],
    health: [ChannelHealth; SignalId::COUNT],
    /// Geiger pulse accumulator
    pub counter: PulseCounter,
    loop_intervals: HistoryWindow<LOOP_INTERVAL_WINDOW>,
    /// Barometric history and storm outlook
    pub pressure: PressureMonitor,
    /// Findings awaiting the next alert pass
    pub pending: AlertBatch,
    /// Summary of the most recent alert pass, `None` when it was quiet
    pub last_summary: Option<Alert>,
    failure_ceiling: u32,
}

impl EngineState {
    /// Fresh state; `now` anchors the radiation warm-up clock
    pub fn new(counter: CounterConfig, now: Timestamp) -> ConfigResult<Self> {
        Ok(Self {
            latest: [None; SignalId::COUNT],
            health: [ChannelHealth::default(); SignalId::COUNT],
            counter: PulseCounter::new(counter, now)?,
            loop_intervals: HistoryWindow::new(),
            pressure: PressureMonitor::new(),
            pending: AlertBatch::new(),
            last_summary: None,
            failure_ceiling: FAILURE_CEILING,
        })
    }

    /// Override the consecutive-failure ceiling
    pub fn set_failure_ceiling(&mut self, ceiling: u32) {
        self.failure_ceiling = ceiling;
    }

    /// Store a validated sample and restore its channel's health
    ///
    /// Pressure samples also feed the barometric monitor, which keeps
    /// its own five-minute history cadence.
    pub fn accept(&mut self, sample: Sample) {
        if sample.channel == SignalId::PressureHpa {
            self.pressure.record(sample.value, sample.timestamp);
        }
        self.health[sample.channel.index()].record_ok();
        self.latest[sample.channel.index()] = Some(sample);
    }

    /// Latest sample on a channel, if any ever arrived
    pub fn latest(&self, channel: SignalId) -> Option<&Sample> {
        self.latest[channel.index()].as_ref()
    }

    /// Health record for a channel
    pub fn health(&self, channel: SignalId) -> &ChannelHealth {
        &self.health[channel.index()]
    }

    /// Restore a channel's health without storing a sample
    pub fn note_ok(&mut self, channel: SignalId) {
        self.health[channel.index()].record_ok();
    }

    /// Count a failed read; crossing the ceiling raises one Critical
    pub fn note_failure(&mut self, channel: SignalId, now: Timestamp) {
        if self.health[channel.index()].record_err(self.failure_ceiling) {
            let mut message: heapless::String<MAX_MESSAGE_LEN> = heapless::String::new();
            let _ = write!(
                message,
                "Extended sensor failure - {} unavailable",
                channel.name()
            );
            self.pending.push(Alert::net(
                AnomalyGrade::Critical,
                SENSOR_FAILURE_CODE,
                &message,
                now,
            ));
        }
    }

    /// Mean loop interval over the recent window (ms)
    pub fn mean_loop_interval(&self) -> Option<f64> {
        stats::linear_mean(&self.loop_intervals)
    }
}

impl LoopMonitor for EngineState {
    fn record_loop_interval(&mut self, interval_ms: u64, now: Timestamp) {
        self.loop_intervals.push_value(interval_ms as f64, now);
        self.latest[SignalId::LoopInterval.index()] =
            Some(Sample::new(SignalId::LoopInterval, interval_ms as f64, now));
    }
}

/// Critical task: watches the Geiger pulse line
///
/// Runs every tick; a pulse missed between ticks is simply gone, which
/// is why this task is critical and the loop-timing ladder exists.
pub struct PulseTask<L: PulseLine> {
    line: L,
}

impl<L: PulseLine> PulseTask<L> {
    pub fn new(line: L) -> Self {
        Self { line }
    }
}

impl<L: PulseLine> Task<EngineState> for PulseTask<L> {
    fn name(&self) -> &'static str {
        "geiger"
    }

    fn step(&mut self, now: Timestamp, cx: &mut EngineState) -> Result<(), ReadError> {
        let asserted = match self.line.is_asserted() {
            Ok(level) => level,
            Err(e) => {
                cx.note_failure(SignalId::RadiationCpm, now);
                return Err(e);
            }
        };
        cx.note_ok(SignalId::RadiationCpm);
        cx.counter.observe_level(asserted, now);

        if let Some(window) = cx.counter.poll_window(now) {
            cx.accept(Sample::new(
                SignalId::RadiationCpm,
                window.cpm as f64,
                window.closed_at,
            ));
            if let Some(dose) = window.dose_rate {
                cx.accept(Sample::new(SignalId::DoseRate, dose, window.closed_at));
            }
        }
        Ok(())
    }
}

/// Normal task: polls one scalar channel through its source
///
/// `WouldBlock` means the sensor has no fresh conversion yet; the last
/// stored sample stands and nothing counts against the channel.
pub struct PollTask<S: SampleSource> {
    source: S,
}

impl<S: SampleSource> PollTask<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: SampleSource> Task<EngineState> for PollTask<S> {
    fn name(&self) -> &'static str {
        self.source.channel().name()
    }

    fn step(&mut self, now: Timestamp, cx: &mut EngineState) -> Result<(), ReadError> {
        let channel = self.source.channel();
        match self.source.read() {
            Ok(value) => match Sample::admitted(channel, value, now) {
                Ok(sample) => {
                    cx.accept(sample);
                    Ok(())
                }
                // The sensor answered with garbage; that is a failure
                Err(e) => {
                    cx.note_failure(channel, now);
                    Err(e)
                }
            },
            Err(nb::Error::WouldBlock) => Ok(()),
            Err(nb::Error::Other(e)) => {
                cx.note_failure(channel, now);
                Err(e)
            }
        }
    }
}

/// Normal task: classification and alert fan-out
///
/// Each pass classifies dose (or pushes the warm-up notice), the fresh
/// ladder channels, the mean loop interval and the storm outlook, then
/// emits the batch to every attached sink: summary line first, then
/// each finding in insertion order. Findings other tasks pushed since
/// the last pass (sensor failures) ride along in the same batch.
pub struct AlertTask {
    classifier: Classifier,
    sinks: Vec<Box<dyn AlertSink>, MAX_SINKS>,
    stale_after_ms: u64,
}

impl AlertTask {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier,
            sinks: Vec::new(),
            stale_after_ms: STALE_SAMPLE_MS,
        }
    }

    /// Alert task with the stock instrument ladders
    pub fn with_defaults() -> ConfigResult<Self> {
        Ok(Self::new(Classifier::with_defaults()?))
    }

    /// Attach a sink; alerts fan out to every sink in attach order
    pub fn add_sink<S>(&mut self, sink: S) -> ConfigResult<()>
    where
        S: AlertSink + 'static,
    {
        self.sinks
            .push(Box::new(sink))
            .map_err(|_| ConfigError::CapacityExceeded {
                what: "alert sinks",
            })?;
        Ok(())
    }

    /// Override the staleness bound for ladder channels
    pub fn set_stale_after_ms(&mut self, stale_after_ms: u64) {
        self.stale_after_ms = stale_after_ms;
    }

    fn classify_radiation(&self, now: Timestamp, cx: &mut EngineState) {
        if !cx.counter.is_warmed_up(now) {
            cx.pending.push(Alert::net(
                AnomalyGrade::Info,
                DOSE_WARMUP_CODE,
                DOSE_WARMUP_MESSAGE,
                now,
            ));
            return;
        }
        if let Some(dose) = cx.counter.dose_rate() {
            if let Some(alert) = self.classifier.alert_for(SignalId::DoseRate, dose, now) {
                cx.pending.push(alert);
            }
        }
    }

    fn classify_ladders(&self, now: Timestamp, cx: &mut EngineState) {
        for channel in [SignalId::Co2, SignalId::Tvoc, SignalId::Lux] {
            let Some(sample) = cx.latest(channel).copied() else {
                continue;
            };
            if delta_ms(sample.timestamp, now) > self.stale_after_ms {
                continue;
            }
            if let Some(alert) = self.classifier.alert_for(channel, sample.value, now) {
                cx.pending.push(alert);
            }
        }

        if let Some(mean) = cx.mean_loop_interval() {
            if let Some(alert) = self.classifier.alert_for(SignalId::LoopInterval, mean, now) {
                cx.pending.push(alert);
            }
        }
    }

    fn classify_storm(&self, now: Timestamp, cx: &mut EngineState) {
        let outlook = *cx.pressure.outlook();
        let graded = match outlook.risk {
            StormRisk::Severe => Some((Severity::Danger, STORM_SEVERE_CODE)),
            StormRisk::High => Some((Severity::Caution, STORM_WARNING_CODE)),
            StormRisk::Moderate => Some((Severity::Caution, STORM_WATCH_CODE)),
            _ => None,
        };
        let Some((severity, code)) = graded else {
            return;
        };

        let mut message: heapless::String<MAX_MESSAGE_LEN> = heapless::String::new();
        if outlook.extreme == Some(PressureExtreme::DeepLow) {
            let _ = write!(message, "LOW PRESSURE SYSTEM - {}", outlook.forecast);
        } else {
            let _ = message.push_str(outlook.forecast);
        }
        cx.pending.push(Alert::practical(severity, code, &message, now));
    }
}

impl Task<EngineState> for AlertTask {
    fn name(&self) -> &'static str {
        "alerts"
    }

    fn step(&mut self, now: Timestamp, cx: &mut EngineState) -> Result<(), ReadError> {
        self.classify_radiation(now, cx);
        self.classify_ladders(now, cx);
        self.classify_storm(now, cx);

        cx.last_summary = cx.pending.summary(now);
        if let Some(ref summary) = cx.last_summary {
            for sink in self.sinks.iter_mut() {
                sink.emit(summary);
            }
        }
        for alert in cx.pending.iter() {
            for sink in self.sinks.iter_mut() {
                sink.emit(alert);
            }
        }
        cx.pending.clear();
        Ok(())
    }
}
