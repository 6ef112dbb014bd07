//! Simulated Bench Sweep Example
//!
//! This example puts the full net battery through a scripted bench
//! session: a calm instrument, one magnetometer spike, fifteen seconds
//! of compass creep, a flip over and back, and finally a frozen fusion.
//! The IMU task runs inside the real scheduler next to the alert task,
//! so findings surface exactly the way practical alerts do.
//!
//! ## What You'll Learn
//!
//! - Wiring `ImuTask` and `NetSuite` into the engine loop
//! - How the smoother and the coherence net split a heading spike
//! - Drift escalation, flip debounce and the stuck-sensor run
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 03_anomaly_sweep
//! ```

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use fieldwarden_anomaly::{ImuTask, NetSuite};
use fieldwarden_core::{
    engine::{AlertTask, EngineState},
    Alert, AlertSink, CalibrationReporting, CalibrationStatus, CounterConfig, Profile, ReadError,
    Scheduler, SignalId, VectorSource,
};

/// Tick length of the simulated loop (ms)
const TICK_MS: u64 = 20;

/// Simulated session length (ms)
const SWEEP_MS: u64 = 36_000;

/// One rejected magnetometer spike lands here
const SPIKE_AT_MS: u64 = 5_000;

/// Compass creep starts here, 1.2 deg/s
const DRIFT_FROM_MS: u64 = 10_000;

/// The operator flips the unit here...
const FLIP_AT_MS: u64 = 25_000;

/// ...rights it here (outside the flip debounce)...
const RIGHT_AT_MS: u64 = 27_500;

/// ...and the fusion freezes solid here
const FREEZE_FROM_MS: u64 = 30_000;

/// Simulated milliseconds, shared by the loop and every simulated part
type SimTime = Rc<Cell<u64>>;

/// Square-wave dither, one frame period per phase
fn wobble(t: u64) -> f64 {
    if (t / 100) % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

fn euler_at(t: u64) -> [f64; 3] {
    if t >= FREEZE_FROM_MS {
        return [150.0, 0.0, 0.0]; // bit-identical frames from here on
    }
    if t >= FLIP_AT_MS {
        let pitch = if t < RIGHT_AT_MS { 180.0 } else { 0.3 * wobble(t) };
        return [150.0 + 0.2 * wobble(t), pitch, 0.2 * wobble(t)];
    }
    let heading = if t >= DRIFT_FROM_MS {
        132.0 + (t - DRIFT_FROM_MS) as f64 / 1_000.0 * 1.2
    } else if t >= SPIKE_AT_MS && t < SPIKE_AT_MS + 100 {
        320.0 // one glitched fusion frame
    } else {
        132.0
    };
    [heading + 0.2 * wobble(t), 0.3 * wobble(t), 0.2 * wobble(t)]
}

fn accel_at(t: u64) -> [f64; 3] {
    if t >= FREEZE_FROM_MS {
        [0.0; 3]
    } else {
        [0.015 + 0.005 * wobble(t), 0.0, 0.0]
    }
}

fn gravity_at(t: u64) -> [f64; 3] {
    let g = fieldwarden_core::constants::STANDARD_GRAVITY_MS2;
    if t >= FREEZE_FROM_MS {
        [0.0, 0.0, g]
    } else if (FLIP_AT_MS..RIGHT_AT_MS).contains(&t) {
        [0.0, 0.0, -(g + 0.01 * wobble(t))]
    } else {
        [0.0, 0.0, g + 0.01 * wobble(t)]
    }
}

fn gyro_at(t: u64) -> [f64; 3] {
    if t >= FREEZE_FROM_MS {
        [0.0; 3]
    } else {
        [0.002 * wobble(t), 0.0, 0.005]
    }
}

/// One scripted vector channel of the simulated bench
struct BenchChannel {
    time: SimTime,
    script: fn(u64) -> [f64; 3],
}

impl BenchChannel {
    fn new(time: &SimTime, script: fn(u64) -> [f64; 3]) -> Self {
        Self {
            time: Rc::clone(time),
            script,
        }
    }
}

impl VectorSource for BenchChannel {
    fn read(&mut self) -> nb::Result<[f64; 3], ReadError> {
        Ok((self.script)(self.time.get()))
    }
}

impl CalibrationReporting for BenchChannel {
    fn calibration(&self) -> CalibrationStatus {
        CalibrationStatus::Reported {
            sys: 3,
            gyro: 3,
            accel: 3,
            mag: 3,
        }
    }
}

/// Sink that prints each new finding once per (code, grade)
///
/// Nets are already edge-triggered, but an escalation reuses its code;
/// keying on the grade as well keeps Warning-to-Critical climbs visible.
struct ConsoleSink {
    time: SimTime,
    seen: HashSet<(&'static str, u8)>,
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
        if alert.level.rank() == 0 {
            return; // warm-up notices and the like
        }
        if self.seen.insert((alert.code, alert.level.rank())) {
            println!(
                "  t={:>6.1}s    [{:<8}] {:<17} {}",
                self.stamp(),
                alert.level.label(),
                alert.code,
                alert.message
            );
        }
    }
}

fn main() {
    println!("FieldWarden Bench Sweep");
    println!("=======================\n");

    let profile = Profile::default();
    profile.validate().unwrap();

    let time: SimTime = Rc::new(Cell::new(0));

    let mut state = EngineState::new(CounterConfig::default(), time.get()).unwrap();
    state.set_failure_ceiling(profile.failure_ceiling);

    let imu_task = ImuTask::new(
        BenchChannel::new(&time, euler_at),
        BenchChannel::new(&time, accel_at),
        BenchChannel::new(&time, gravity_at),
        BenchChannel::new(&time, gyro_at),
        NetSuite::with_defaults().unwrap(),
    );
    println!(
        "IMU calibration at power-on: fully calibrated = {}",
        imu_task.calibration().is_fully_calibrated()
    );
    println!("Net battery: {} nets, no magnetometer fitted\n", imu_task.suite().len());

    let mut alert_task = AlertTask::new(profile.classifier().unwrap());
    alert_task.add_sink(ConsoleSink::new(Rc::clone(&time))).unwrap();

    let mut scheduler: Scheduler<EngineState> = Scheduler::new();
    scheduler
        .add_periodic(imu_task, profile.periods.imu_ms)
        .unwrap();
    scheduler
        .add_periodic(alert_task, profile.periods.alert_ms)
        .unwrap();

    println!(
        "Running {} simulated seconds at a {} ms tick.",
        SWEEP_MS / 1_000,
        TICK_MS
    );
    println!("New findings as they surface:");

    while time.get() < SWEEP_MS {
        scheduler.tick(time.get(), &mut state);
        time.set(time.get() + TICK_MS);
    }

    println!("\nSweep complete.");
    println!("  Ticks:     {}", scheduler.ticks());
    if let Some(stats) = scheduler.task_stats("imu") {
        println!("  IMU runs:  {} ({} errors)", stats.runs, stats.errors);
    }
    if let Some(sample) = state.latest(SignalId::HeadingDeg) {
        println!("  Heading:   {:.1} deg", sample.value);
    }
    if let Some(sample) = state.latest(SignalId::GravityMag) {
        println!("  Gravity:   {:.3} m/s2", sample.value);
    }

    println!("\n{}", "=".repeat(60));
    println!("Key Insights:");
    println!("- The t=5s spike never reaches stored state - the smoother holds the");
    println!("  last good heading - but the coherence net flags the raw yaw jump");
    println!("- Drift climbs through Warning into Critical as the spread widens;");
    println!("  each grade prints once, not once per frame");
    println!("- The flip back at t=27.5s is outside the debounce and fires again,");
    println!("  though the console has already seen that (code, grade)");
    println!("- Five seconds of bit-identical frames end in SENSOR-STUCK");
}
