//! Scripted hardware seams and a fully wired patrol-loop rig
//!
//! The rig owns the scheduler, the engine state and the capture sink.
//! Tests register scripted sources against it, run simulated time
//! forward and assert on the alerts that come out the far end - the
//! same wiring production uses, minus the silicon.

use std::cell::RefCell;
use std::rc::Rc;

use fieldwarden_core::{
    Alert, AlertSink, AlertTask, EngineState, PollTask, Profile, PulseLine, PulseTask,
    ReadError, SampleSource, Scheduler, SignalId, Timestamp,
};

/// Scalar source that replays a fixed script, wrapping at the end
pub struct ScriptedSource {
    channel: SignalId,
    script: Vec<nb::Result<f64, ReadError>>,
    at: usize,
}

impl ScriptedSource {
    pub fn new(channel: SignalId, script: Vec<nb::Result<f64, ReadError>>) -> Self {
        assert!(!script.is_empty(), "script must have at least one entry");
        Self {
            channel,
            script,
            at: 0,
        }
    }

    /// Source that returns the same value forever
    pub fn steady(channel: SignalId, value: f64) -> Self {
        Self::new(channel, vec![Ok(value)])
    }

    /// Source that walks a value trace, repeating from the start
    pub fn trace(channel: SignalId, values: &[f64]) -> Self {
        Self::new(channel, values.iter().map(|v| Ok(*v)).collect())
    }

    /// Source that fails every read with a bus error
    pub fn broken(channel: SignalId) -> Self {
        Self::new(
            channel,
            vec![Err(nb::Error::Other(ReadError::Bus { reason: "nack" }))],
        )
    }
}

impl SampleSource for ScriptedSource {
    fn channel(&self) -> SignalId {
        self.channel
    }

    fn read(&mut self) -> nb::Result<f64, ReadError> {
        let out = self.script[self.at % self.script.len()];
        self.at += 1;
        out
    }
}

/// Pulse line that replays a fixed level script, wrapping at the end
pub struct ScriptedLine {
    levels: Vec<bool>,
    at: usize,
}

impl ScriptedLine {
    pub fn new(levels: Vec<bool>) -> Self {
        assert!(!levels.is_empty(), "script must have at least one entry");
        Self { levels, at: 0 }
    }

    /// Line that stays deasserted
    pub fn quiet() -> Self {
        Self::new(vec![false])
    }

    /// Line asserting for exactly one call out of every `calls`
    ///
    /// The geiger task reads the line once per tick, so with a 20 ms
    /// tick `pulse_every(10)` produces one counted edge per 200 ms -
    /// 600 pulses per standard count window.
    pub fn pulse_every(calls: usize) -> Self {
        assert!(calls >= 2, "need at least one deasserted call per cycle");
        let mut levels = vec![false; calls];
        levels[0] = true;
        Self::new(levels)
    }
}

impl PulseLine for ScriptedLine {
    fn is_asserted(&mut self) -> Result<bool, ReadError> {
        let out = self.levels[self.at % self.levels.len()];
        self.at += 1;
        Ok(out)
    }
}

/// Cloneable capture sink; all clones share one unbounded buffer
///
/// Long simulations emit more alerts than the fixed-capacity in-crate
/// capture sink holds, and a capture that silently drops would make
/// assertion failures misleading.
#[derive(Clone, Default)]
pub struct CaptureSink(Rc<RefCell<Vec<Alert>>>);

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Codes of captured alerts, in emission order
    pub fn codes(&self) -> Vec<&'static str> {
        self.0.borrow().iter().map(|a| a.code).collect()
    }

    /// All captured alerts, cloned out
    pub fn alerts(&self) -> Vec<Alert> {
        self.0.borrow().clone()
    }

    /// Highest rank captured so far
    pub fn max_rank(&self) -> Option<u8> {
        self.0.borrow().iter().map(|a| a.level.rank()).max()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any captured alert carries `code`
    pub fn saw(&self, code: &str) -> bool {
        self.0.borrow().iter().any(|a| a.code == code)
    }

    /// How many captured alerts carry `code`
    pub fn count_of(&self, code: &str) -> usize {
        self.0.borrow().iter().filter(|a| a.code == code).count()
    }

    /// Messages of every captured alert with `code`
    pub fn messages_for(&self, code: &str) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter(|a| a.code == code)
            .map(|a| a.message.as_str().to_string())
            .collect()
    }

    /// Forget everything captured so far
    pub fn reset(&self) {
        self.0.borrow_mut().clear();
    }
}

impl AlertSink for CaptureSink {
    fn emit(&mut self, alert: &Alert) {
        self.0.borrow_mut().push(alert.clone());
    }
}

/// Patrol loop under simulated time
///
/// `new` wires state, scheduler and capture sink but registers no
/// tasks; tests add exactly the hardware the scenario needs.
pub struct PatrolRig {
    pub scheduler: Scheduler<EngineState>,
    pub state: EngineState,
    pub sink: CaptureSink,
    pub now: Timestamp,
    profile: Profile,
}

impl PatrolRig {
    /// Simulated loop period; fast enough that every task period in
    /// the default profile is a whole number of ticks
    pub const TICK_MS: u64 = 20;

    pub fn new(profile: Profile) -> Self {
        profile.validate().expect("profile must validate");
        let mut state = EngineState::new(profile.counter, 0).expect("counter config");
        state.set_failure_ceiling(profile.failure_ceiling);
        Self {
            scheduler: Scheduler::new(),
            state,
            sink: CaptureSink::new(),
            now: 0,
            profile,
        }
    }

    /// Register the geiger line as the critical task
    pub fn add_line(&mut self, line: ScriptedLine) {
        self.scheduler
            .add_critical(PulseTask::new(line))
            .expect("scheduler slot");
    }

    /// Register a scalar source at `period_ms`
    pub fn add_source(&mut self, source: ScriptedSource, period_ms: u64) {
        self.scheduler
            .add_periodic(PollTask::new(source), period_ms)
            .expect("scheduler slot");
    }

    /// Register the alert pass at the profile's alert period
    ///
    /// Call this after the sensor tasks so the pass sees the tick's
    /// samples, the way production wires it.
    pub fn add_alert_task(&mut self) {
        let classifier = self.profile.classifier().expect("profile classifier");
        let mut task = AlertTask::new(classifier);
        task.add_sink(self.sink.clone()).expect("sink slot");
        self.scheduler
            .add_periodic(task, self.profile.periods.alert_ms)
            .expect("scheduler slot");
    }

    /// Advance simulated time by `ms`, ticking the scheduler
    pub fn run_for(&mut self, ms: u64) {
        let end = self.now + ms;
        while self.now < end {
            self.scheduler.tick(self.now, &mut self.state);
            self.now += Self::TICK_MS;
        }
    }
}
