//! The net trait and the per-pass finding buffer
//!
//! Nets are small state machines sharing one shape: feed frames in
//! through [`AnomalyNet::observe`], findings come out through a
//! fixed-capacity [`NetOutput`]. The buffer mirrors how the engine's
//! alert batch works: overflow is counted, never silently lost.

use fieldwarden_core::Alert;
use heapless::Vec;

use crate::constants::MAX_NET_FINDINGS;
use crate::snapshot::ImuSnapshot;

/// One anomaly detector
///
/// Implementations are edge-triggered: a finding is pushed when a
/// pattern is entered or escalates, not on every frame the pattern
/// persists. State lives inside the net; the suite drives every net
/// with the same frames in the same order.
pub trait AnomalyNet {
    /// Stable name for logs and suite bookkeeping
    fn name(&self) -> &'static str;

    /// Judge one frame, pushing any new findings
    fn observe(&mut self, frame: &ImuSnapshot, out: &mut NetOutput);

    /// Drop all learned state, as after a sensor power cycle
    fn reset(&mut self);
}

/// Fixed-capacity buffer findings accumulate into during a pass
///
/// Eight slots cover every net in the standard battery firing on the
/// same frame. A full buffer drops further findings and counts them.
#[derive(Debug, Default)]
pub struct NetOutput {
    findings: Vec<Alert, MAX_NET_FINDINGS>,
    dropped: u32,
}

impl NetOutput {
    /// An empty buffer
    pub const fn new() -> Self {
        Self {
            findings: Vec::new(),
            dropped: 0,
        }
    }

    /// Add a finding, counting it as dropped if the buffer is full
    pub fn push(&mut self, finding: Alert) {
        if self.findings.push(finding).is_err() {
            self.dropped = self.dropped.saturating_add(1);
        }
    }

    /// Findings buffered so far this pass
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// Whether the pass produced nothing
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings lost to overflow since the last [`clear`](Self::clear)
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Iterate findings in push order
    pub fn iter(&self) -> core::slice::Iter<'_, Alert> {
        self.findings.iter()
    }

    /// Take every buffered finding, leaving the buffer empty
    ///
    /// The drop count survives; it tracks losses across passes until
    /// explicitly cleared.
    pub fn take(&mut self) -> Vec<Alert, MAX_NET_FINDINGS> {
        let mut taken = Vec::new();
        core::mem::swap(&mut self.findings, &mut taken);
        taken
    }

    /// Discard all findings and zero the drop count
    pub fn clear(&mut self) {
        self.findings.clear();
        self.dropped = 0;
    }
}
