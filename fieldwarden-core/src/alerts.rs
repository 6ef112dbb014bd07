//! Alert Records, Severity Vocabularies and Sinks
//!
//! ## Two vocabularies, one ranking
//!
//! The instrument grades findings in two parallel vocabularies:
//!
//! - **Practical** tiers ([`Severity`]): `Normal`/`Caution`/`Danger`,
//!   produced by threshold ladders over measured values. These mean
//!   "the environment is like this, act accordingly".
//! - **Net** grades ([`AnomalyGrade`]): `Info`/`Warning`/`Critical`,
//!   produced by the anomaly detectors. These mean "the data is
//!   behaving strangely, trust accordingly".
//!
//! The vocabularies are deliberately not merged into one enum - a
//! `Danger` CO2 reading and a `Critical` gravity flip are different
//! kinds of statement. [`AlertLevel`] wraps either and ranks parallel
//! tiers equal (0/1/2) so max-severity aggregation works across both.
//!
//! ## Sinks
//!
//! The engine emits [`Alert`] records through [`AlertSink`]; what
//! happens next (console, LED, radio) is the integrator's business.
//! [`MemorySink`] captures alerts for tests, [`LogSink`] routes them to
//! the `log` facade by rank.

use heapless::String;

use crate::constants::windows::MAX_MESSAGE_LEN;
use crate::time::Timestamp;

/// Practical severity tier from a threshold ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Severity {
    /// Within the comfortable band
    Normal = 0,
    /// Elevated; watch it
    Caution = 1,
    /// Act now
    Danger = 2,
}

impl Severity {
    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            Severity::Normal => "NORMAL",
            Severity::Caution => "CAUTION",
            Severity::Danger => "DANGER",
        }
    }

    /// Index into per-tier code/message tables
    pub const fn tier(&self) -> usize {
        *self as usize
    }
}

/// Anomaly grade from a detector net
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum AnomalyGrade {
    /// Noteworthy pattern, no action implied
    Info = 0,
    /// Data quality or environment is off
    Warning = 1,
    /// Sensor or environment cannot be trusted
    Critical = 2,
}

impl AnomalyGrade {
    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            AnomalyGrade::Info => "INFO",
            AnomalyGrade::Warning => "WARNING",
            AnomalyGrade::Critical => "CRITICAL",
        }
    }
}

/// Either vocabulary, ranked on a shared 0-2 scale
///
/// `Normal` ranks with `Info`, `Caution` with `Warning`, `Danger` with
/// `Critical`. Ordering is total (rank first, practical before net on
/// ties) so aggregation is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    /// Ladder-derived tier
    Practical(Severity),
    /// Detector-derived grade
    Net(AnomalyGrade),
}

impl AlertLevel {
    /// Shared 0-2 rank across both vocabularies
    pub const fn rank(&self) -> u8 {
        match self {
            AlertLevel::Practical(s) => *s as u8,
            AlertLevel::Net(g) => *g as u8,
        }
    }

    /// The vocabulary's own label for this tier
    pub const fn label(&self) -> &'static str {
        match self {
            AlertLevel::Practical(s) => s.name(),
            AlertLevel::Net(g) => g.name(),
        }
    }

    /// Anything above the quiet tier wants attention
    pub const fn is_actionable(&self) -> bool {
        self.rank() > 0
    }

    const fn tie_break(&self) -> u8 {
        match self {
            AlertLevel::Practical(_) => 0,
            AlertLevel::Net(_) => 1,
        }
    }
}

impl PartialOrd for AlertLevel {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AlertLevel {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.rank()
            .cmp(&other.rank())
            .then(self.tie_break().cmp(&other.tie_break()))
    }
}

/// One finding, ready for a sink
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// Graded level in its originating vocabulary
    pub level: AlertLevel,
    /// Stable machine-readable code ("CO2-DANGER", "GRAVITY-FLIP")
    pub code: &'static str,
    /// Operator-facing message, clipped to fit
    pub message: String<MAX_MESSAGE_LEN>,
    /// Engine time when the finding was made
    pub emitted_at: Timestamp,
}

impl Alert {
    /// Build a practical (ladder) alert
    pub fn practical(
        severity: Severity,
        code: &'static str,
        message: &str,
        emitted_at: Timestamp,
    ) -> Self {
        Self {
            level: AlertLevel::Practical(severity),
            code,
            message: clip(message),
            emitted_at,
        }
    }

    /// Build a net (detector) alert
    pub fn net(
        grade: AnomalyGrade,
        code: &'static str,
        message: &str,
        emitted_at: Timestamp,
    ) -> Self {
        Self {
            level: AlertLevel::Net(grade),
            code,
            message: clip(message),
            emitted_at,
        }
    }
}

/// Copy a message into fixed storage, truncating on a char boundary
fn clip(message: &str) -> String<MAX_MESSAGE_LEN> {
    let mut s = String::new();
    for ch in message.chars() {
        if s.push(ch).is_err() {
            break;
        }
    }
    s
}

/// Consumer of alert records
///
/// Sinks must not block: the scheduler calls them from the loop.
pub trait AlertSink {
    /// Take one alert; delivery failures are the sink's problem
    fn emit(&mut self, alert: &Alert);
}

/// Capturing sink for tests and demos
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Captured alerts, oldest first
    pub alerts: heapless::Vec<Alert, 64>,
    /// Alerts discarded because the capture buffer was full
    pub dropped: u32,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Codes of captured alerts, in emission order
    pub fn codes(&self) -> heapless::Vec<&'static str, 64> {
        self.alerts.iter().map(|a| a.code).collect()
    }

    /// Highest rank seen so far
    pub fn max_rank(&self) -> Option<u8> {
        self.alerts.iter().map(|a| a.level.rank()).max()
    }

    /// Forget everything captured
    pub fn clear(&mut self) {
        self.alerts.clear();
        self.dropped = 0;
    }
}

impl AlertSink for MemorySink {
    fn emit(&mut self, alert: &Alert) {
        if self.alerts.push(alert.clone()).is_err() {
            self.dropped += 1;
        }
    }
}

/// Sink that forwards alerts to the `log` facade by rank
#[cfg(feature = "log")]
#[derive(Debug, Default)]
pub struct LogSink;

#[cfg(feature = "log")]
impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "log")]
impl AlertSink for LogSink {
    fn emit(&mut self, alert: &Alert) {
        match alert.level.rank() {
            0 => log::info!("[{}] {}", alert.code, alert.message),
            1 => log::warn!("[{}] {}", alert.code, alert.message),
            _ => log::error!("[{}] {}", alert.code, alert.message),
        }
    }
}
