//! Fixed-Size History Windows for Per-Channel Sample Tracking
//!
//! ## Overview
//!
//! Every windowed feature of the instrument (circular heading statistics,
//! gravity micro-variation, loop-interval health, pressure trend) reads
//! from a [`HistoryWindow`]: a ring of timestamped values with capacity
//! fixed at compile time through const generics. When full, a push
//! overwrites the oldest reading; recent data always wins.
//!
//! ## Design Rationale
//!
//! ### Why not `heapless::Vec`?
//!
//! A window wants automatic overwrite when full, not a push error, and
//! chronological iteration without shuffling elements. A ring with a head
//! index gives O(1) push, O(1) newest/oldest access and O(n) ordered
//! iteration with zero heap use.
//!
//! ### Head index instead of a bare write position
//!
//! Windows with a time horizon drop readings from the *front* as they age
//! out ([`HistoryWindow::expire`]). Tracking the oldest slot directly
//! makes front-removal a head increment; a write-position-only ring would
//! have to shift or tombstone.
//!
//! ### Memory layout
//!
//! Storage is `[Option<Reading>; N]`; `Option` keeps slot initialization
//! safe without `MaybeUninit`. Each slot is 24 bytes (8 value + 8
//! timestamp + discriminant and padding), so even the 128-slot heading
//! window is 3 KiB of plain stack or static memory.
//!
//! ## Usage Example
//!
//! ```rust
//! use fieldwarden_core::window::{HistoryWindow, Reading};
//!
//! // 10 s horizon, up to 64 readings
//! let mut heading: HistoryWindow<64> = HistoryWindow::with_horizon(10_000);
//!
//! heading.push(Reading { value: 181.5, timestamp: 1_000 });
//! heading.push(Reading { value: 182.0, timestamp: 2_000 });
//!
//! heading.expire(11_500);
//! assert_eq!(heading.len(), 1); // the t=1000 reading aged out
//! ```

use crate::time::{delta_ms, Timestamp};

/// One windowed value: what was measured and when
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Measured value in the owning channel's unit
    pub value: f64,
    /// Milliseconds since boot
    pub timestamp: Timestamp,
}

/// Fixed-size ring of timestamped readings
///
/// ## Type Parameter
///
/// - `N`: maximum number of readings. Compile-time constant; powers of 2
///   let the wrap-around modulo compile to a mask.
///
/// ## Internal Invariants
///
/// - `head < N` (oldest slot index always valid)
/// - `len <= N`
/// - Logical index `i` lives at physical slot `(head + i) % N`,
///   so iteration is always oldest to newest
#[derive(Debug, Clone)]
pub struct HistoryWindow<const N: usize> {
    /// Slot storage; `None` only for never-written slots
    data: [Option<Reading>; N],
    /// Physical index of the oldest reading
    head: usize,
    /// Current number of valid readings
    len: usize,
    /// Age limit for readings, `None` = keep until overwritten
    horizon_ms: Option<u64>,
}

impl<const N: usize> HistoryWindow<N> {
    /// Creates an empty window with no time horizon
    ///
    /// Const so windows can live in statics:
    /// ```rust
    /// use fieldwarden_core::window::HistoryWindow;
    /// static LOOP_HEALTH: HistoryWindow<20> = HistoryWindow::new();
    /// ```
    pub const fn new() -> Self {
        Self {
            data: [None; N],
            head: 0,
            len: 0,
            horizon_ms: None,
        }
    }

    /// Creates an empty window whose readings age out after `horizon_ms`
    ///
    /// Expiry is pull-based: call [`expire`](Self::expire) with the
    /// current time before reading statistics from the window.
    pub const fn with_horizon(horizon_ms: u64) -> Self {
        Self {
            data: [None; N],
            head: 0,
            len: 0,
            horizon_ms: Some(horizon_ms),
        }
    }

    /// Capacity fixed at compile time
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Adds a reading, overwriting the oldest when full
    pub fn push(&mut self, reading: Reading) {
        if self.len == N {
            self.data[self.head] = Some(reading);
            self.head = (self.head + 1) % N;
        } else {
            let tail = (self.head + self.len) % N;
            self.data[tail] = Some(reading);
            self.len += 1;
        }
    }

    /// Convenience push from raw parts
    pub fn push_value(&mut self, value: f64, timestamp: Timestamp) {
        self.push(Reading { value, timestamp });
    }

    /// Drops readings older than the horizon, front first
    ///
    /// No-op for windows built with [`new`](Self::new). Readings exactly
    /// at the horizon age are kept.
    pub fn expire(&mut self, now: Timestamp) {
        let Some(horizon) = self.horizon_ms else {
            return;
        };
        while let Some(oldest) = self.oldest() {
            if delta_ms(oldest.timestamp, now) > horizon {
                self.pop_front();
            } else {
                break;
            }
        }
    }

    /// Get number of stored readings
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if window is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if window is full
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Get the most recent reading
    pub fn newest(&self) -> Option<&Reading> {
        if self.is_empty() {
            return None;
        }
        let idx = (self.head + self.len - 1) % N;
        self.data[idx].as_ref()
    }

    /// Get the oldest surviving reading
    pub fn oldest(&self) -> Option<&Reading> {
        if self.is_empty() {
            return None;
        }
        self.data[self.head].as_ref()
    }

    /// Milliseconds covered from oldest to newest reading
    pub fn span_ms(&self) -> Option<u64> {
        match (self.oldest(), self.newest()) {
            (Some(a), Some(b)) => Some(delta_ms(a.timestamp, b.timestamp)),
            _ => None,
        }
    }

    /// Iterate over readings from oldest to newest
    pub fn iter(&self) -> HistoryWindowIter<N> {
        HistoryWindowIter {
            window: self,
            index: 0,
        }
    }

    /// Clear all readings; the horizon setting survives
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Remove and discard the oldest reading
    fn pop_front(&mut self) {
        if self.len == 0 {
            return;
        }
        self.data[self.head] = None;
        self.head = (self.head + 1) % N;
        self.len -= 1;
    }

    /// Reading by logical index (0 = oldest, len-1 = newest)
    fn get(&self, index: usize) -> Option<&Reading> {
        if index >= self.len {
            return None;
        }
        self.data[(self.head + index) % N].as_ref()
    }
}

/// Iterator over window contents, oldest to newest
pub struct HistoryWindowIter<'a, const N: usize> {
    window: &'a HistoryWindow<N>,
    index: usize,
}

impl<'a, const N: usize> Iterator for HistoryWindowIter<'a, N> {
    type Item = &'a Reading;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.window.get(self.index)?;
        self.index += 1;
        Some(item)
    }
}

impl<const N: usize> Default for HistoryWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}
