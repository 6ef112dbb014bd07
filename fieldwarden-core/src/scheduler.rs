//! Cooperative Sampling Scheduler
//!
//! ## Overview
//!
//! One single-threaded loop drives the whole instrument. Each pass the
//! caller reads the clock once and calls [`Scheduler::tick`]; the
//! scheduler then dispatches its task slots by priority:
//!
//! - **Critical** tasks run unconditionally, every tick, before
//!   anything else. The Geiger poll lives here - a pulse is gone if the
//!   loop is not watching the line.
//! - **Normal** tasks run when their period has elapsed since the last
//!   invocation. Sensor reads, classification and logging are all
//!   normal tasks with periods from the profile.
//!
//! ## Failure policy
//!
//! `last_run` is stamped on invocation, success or not - a failing
//! sensor retries at its period, never in a tight loop. A step error is
//! logged, counted against the slot, and the tick continues with the
//! next task. The loop itself never stops on a task error; degraded
//! channels are an alert, not a halt.
//!
//! ## Self-monitoring
//!
//! The interval between consecutive ticks is reported to the context
//! through [`LoopMonitor`] before any task runs. The engine records it
//! into the loop-interval window, and the loop-timing ladder turns a
//! slow loop into an operator-visible alert, because a slow loop
//! undercounts pulses.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

#[cfg(feature = "std")]
use std::boxed::Box;

use heapless::Vec;

use crate::constants::windows::MAX_TASKS;
use crate::errors::{ConfigError, ConfigResult, ReadError};
use crate::time::{delta_ms, Timestamp};

/// Context hook for loop-interval self-measurement
pub trait LoopMonitor {
    /// Called once per tick (after the first) with the time since the
    /// previous tick
    fn record_loop_interval(&mut self, interval_ms: u64, now: Timestamp);
}

/// Dispatch class of a task slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPriority {
    /// Runs every tick, before all normal tasks
    Critical,
    /// Runs when its period has elapsed
    Normal,
}

/// One schedulable unit of work
///
/// Tasks own their sensor handles and talk to the rest of the engine
/// through the context `C` (the engine state in production, something
/// smaller in tests).
pub trait Task<C> {
    /// Stable name for logs and stats
    fn name(&self) -> &'static str;

    /// Run one step at `now`
    ///
    /// Returning an error marks the step failed; the scheduler logs it
    /// and moves on. Tasks whose source has no fresh data this tick
    /// should return `Ok(())`, not an error.
    fn step(&mut self, now: Timestamp, cx: &mut C) -> Result<(), ReadError>;
}

/// Run/error counters for one slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    /// Invocations, successful or not
    pub runs: u32,
    /// Steps that returned an error
    pub errors: u32,
    /// Last invocation time
    pub last_run: Option<Timestamp>,
}

struct TaskSlot<C> {
    task: Box<dyn Task<C>>,
    priority: TaskPriority,
    period_ms: u64,
    stats: TaskStats,
}

impl<C> TaskSlot<C> {
    fn due(&self, now: Timestamp) -> bool {
        match self.stats.last_run {
            None => true,
            Some(last) => delta_ms(last, now) >= self.period_ms,
        }
    }

    fn run(&mut self, now: Timestamp, cx: &mut C) {
        self.stats.last_run = Some(now);
        self.stats.runs += 1;
        if let Err(_err) = self.task.step(now, cx) {
            self.stats.errors += 1;
            log_warn!("task {} failed: {}", self.task.name(), _err);
        }
    }
}

/// Priority dispatcher over a fixed set of task slots
pub struct Scheduler<C> {
    slots: Vec<TaskSlot<C>, MAX_TASKS>,
    last_tick: Option<Timestamp>,
    ticks: u64,
}

impl<C> Scheduler<C> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            last_tick: None,
            ticks: 0,
        }
    }

    /// Add a task that runs every tick
    pub fn add_critical<T>(&mut self, task: T) -> ConfigResult<()>
    where
        T: Task<C> + 'static,
    {
        self.push_slot(TaskSlot {
            task: Box::new(task),
            priority: TaskPriority::Critical,
            period_ms: 0,
            stats: TaskStats::default(),
        })
    }

    /// Add a task that runs at `period_ms`
    ///
    /// The first invocation happens on the next tick; after that the
    /// period gates re-invocation.
    pub fn add_periodic<T>(&mut self, task: T, period_ms: u64) -> ConfigResult<()>
    where
        T: Task<C> + 'static,
    {
        if period_ms == 0 {
            return Err(ConfigError::ZeroPeriod { task: task.name() });
        }
        self.push_slot(TaskSlot {
            task: Box::new(task),
            priority: TaskPriority::Normal,
            period_ms,
            stats: TaskStats::default(),
        })
    }

    fn push_slot(&mut self, slot: TaskSlot<C>) -> ConfigResult<()> {
        self.slots
            .push(slot)
            .map_err(|_| ConfigError::CapacityExceeded { what: "scheduler tasks" })?;
        Ok(())
    }

    /// Run one scheduler pass at `now`
    ///
    /// Records the loop interval, then dispatches every critical slot,
    /// then every due normal slot, in registration order within each
    /// class.
    pub fn tick(&mut self, now: Timestamp, cx: &mut C)
    where
        C: LoopMonitor,
    {
        if let Some(prev) = self.last_tick {
            cx.record_loop_interval(delta_ms(prev, now), now);
        }
        self.last_tick = Some(now);
        self.ticks += 1;

        for slot in self
            .slots
            .iter_mut()
            .filter(|s| s.priority == TaskPriority::Critical)
        {
            slot.run(now, cx);
        }

        for slot in self
            .slots
            .iter_mut()
            .filter(|s| s.priority == TaskPriority::Normal)
        {
            if slot.due(now) {
                slot.run(now, cx);
            }
        }
    }

    /// Total ticks dispatched
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of registered slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Stats for the named task, if registered
    pub fn task_stats(&self, name: &str) -> Option<TaskStats> {
        self.slots
            .iter()
            .find(|s| s.task.name() == name)
            .map(|s| s.stats)
    }
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}
