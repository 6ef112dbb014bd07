//! Simulated Patrol Loop Example
//!
//! This example wires the whole engine together the way firmware
//! would: a scheduler, the Geiger pulse task, sensor poll tasks, the
//! alert task, and a console sink - then drives five simulated minutes
//! of a patrol in which the air quality degrades and radiation climbs.
//!
//! ## What You'll Learn
//!
//! - Building an `EngineState` and registering tasks by priority
//! - How the critical pulse task coexists with periodic sensor polls
//! - Where alerts surface as conditions cross the ladders
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_patrol_loop
//! ```

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use fieldwarden_core::{
    engine::{AlertTask, EngineState, PollTask, PulseTask},
    traits::PulseLine,
    Alert, AlertSink, CounterConfig, Profile, ReadError, SampleSource, Scheduler, SignalId,
};

/// Tick length of the simulated loop (ms)
const TICK_MS: u64 = 20;

/// Simulated patrol length (ms)
const PATROL_MS: u64 = 300_000;

/// Simulated milliseconds, shared by the loop and every simulated part
type SimTime = Rc<Cell<u64>>;

/// CO2 source that drifts from fresh air into a stuffy cellar
struct DriftingCo2 {
    time: SimTime,
}

impl SampleSource for DriftingCo2 {
    fn channel(&self) -> SignalId {
        SignalId::Co2
    }

    fn read(&mut self) -> nb::Result<f64, ReadError> {
        // 450 ppm at the door, +8 ppm per simulated second inside
        let seconds = self.time.get() as f64 / 1_000.0;
        Ok(450.0 + 8.0 * seconds)
    }
}

/// TVOC source that stays comfortably quiet
struct QuietTvoc;

impl SampleSource for QuietTvoc {
    fn channel(&self) -> SignalId {
        SignalId::Tvoc
    }

    fn read(&mut self) -> nb::Result<f64, ReadError> {
        Ok(0.12)
    }
}

/// Pulse line firing a clean pulse at a fixed rate
///
/// One pulse per 343 ms is ~350 per count window: ~6.6 uSv/h, danger
/// tier once the warm-up has passed.
struct HotSpot {
    time: SimTime,
    pulse_every_ms: u64,
}

impl PulseLine for HotSpot {
    fn is_asserted(&mut self) -> Result<bool, ReadError> {
        // High for one tick of each pulse interval
        Ok(self.time.get() % self.pulse_every_ms < TICK_MS)
    }
}

/// Sink that prints each new condition once
///
/// A sustained condition re-emits every alert pass; the console only
/// cares when something changes.
struct ConsoleSink {
    time: SimTime,
    seen: HashSet<&'static str>,
    last_summary: String,
}

impl ConsoleSink {
    fn new(time: SimTime) -> Self {
        Self {
            time,
            seen: HashSet::new(),
            last_summary: String::new(),
        }
    }

    fn stamp(&self) -> f64 {
        self.time.get() as f64 / 1_000.0
    }
}

impl AlertSink for ConsoleSink {
    fn emit(&mut self, alert: &Alert) {
        if alert.code == "SUMMARY" {
            if alert.message.as_str() != self.last_summary {
                self.last_summary = alert.message.as_str().to_string();
                println!("\n  t={:>6.1}s  {}", self.stamp(), alert.message);
            }
            return;
        }
        if self.seen.insert(alert.code) {
            println!(
                "  t={:>6.1}s    [{:<8}] {:<13} {}",
                self.stamp(),
                alert.level.label(),
                alert.code,
                alert.message
            );
        }
    }
}

fn main() {
    println!("FieldWarden Simulated Patrol");
    println!("============================\n");

    let profile = Profile::default();
    profile.validate().unwrap();

    let time: SimTime = Rc::new(Cell::new(0));

    let mut state = EngineState::new(CounterConfig::default(), time.get()).unwrap();
    state.set_failure_ceiling(profile.failure_ceiling);

    let mut alert_task = AlertTask::new(profile.classifier().unwrap());
    alert_task.add_sink(ConsoleSink::new(Rc::clone(&time))).unwrap();

    let mut scheduler: Scheduler<EngineState> = Scheduler::new();
    scheduler
        .add_critical(PulseTask::new(HotSpot {
            time: Rc::clone(&time),
            pulse_every_ms: 343,
        }))
        .unwrap();
    scheduler
        .add_periodic(
            PollTask::new(DriftingCo2 {
                time: Rc::clone(&time),
            }),
            profile.periods.air_quality_ms,
        )
        .unwrap();
    scheduler
        .add_periodic(PollTask::new(QuietTvoc), profile.periods.air_quality_ms)
        .unwrap();
    scheduler
        .add_periodic(alert_task, profile.periods.alert_ms)
        .unwrap();

    println!(
        "Running {} simulated seconds at a {} ms tick.",
        PATROL_MS / 1_000,
        TICK_MS
    );
    println!("New conditions as they surface:");

    while time.get() < PATROL_MS {
        scheduler.tick(time.get(), &mut state);
        time.set(time.get() + TICK_MS);
    }

    println!("\nPatrol complete.");
    println!("  Ticks:        {}", scheduler.ticks());
    println!("  Total pulses: {}", state.counter.total_pulses());
    if let Some(cpm) = state.counter.cpm() {
        println!("  Last window:  {} cpm", cpm);
    }
    if let Some(dose) = state.counter.dose_rate() {
        println!("  Dose rate:    {:.2} uSv/h", dose);
    }
    if let Some(sample) = state.latest(SignalId::Co2) {
        println!("  Final CO2:    {:.0} ppm", sample.value);
    }

    println!("\n{}", "=".repeat(60));
    println!("Key Insights:");
    println!("- The pulse task runs every tick; sensor polls run at their periods");
    println!("- Dose alerts wait out the warm-up; CO2 alerts appear as the cuts pass");
    println!("- One alert pass per second: a summary line, then each finding");
}
