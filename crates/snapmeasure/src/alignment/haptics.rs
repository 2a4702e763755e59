//! Deferred, cancellable haptic pulses.
//!
//! The classifier never touches a vibration motor. It schedules pulses on a
//! [`HapticTimeline`] and the host polls [`HapticTimeline::due`] from its own
//! timer or frame callback, playing whatever comes back.

use serde::{Deserialize, Serialize};

/// Intensity of a single pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PulseKind {
    Light,
    Medium,
    /// Success notification pattern.
    Success,
}

/// One pulse of a burst, relative to the transition that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HapticPulse {
    pub offset_ms: u64,
    pub kind: PulseKind,
}

/// A pulse waiting on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledPulse {
    pub due_ms: u64,
    pub kind: PulseKind,
}

/// Pending pulses of the most recent burst.
#[derive(Debug, Clone, Default)]
pub struct HapticTimeline {
    pending: Vec<ScheduledPulse>,
    bursts_scheduled: u64,
    pulses_cancelled: u64,
}

impl HapticTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any pending pulses with `burst`, anchored at `now_ms`.
    ///
    /// Returns the number of pulses cancelled.
    pub fn schedule(&mut self, now_ms: u64, burst: &[HapticPulse]) -> usize {
        let cancelled = self.cancel_all();
        self.pending = burst
            .iter()
            .map(|p| ScheduledPulse {
                due_ms: now_ms.saturating_add(p.offset_ms),
                kind: p.kind,
            })
            .collect();
        self.pending.sort_by_key(|p| p.due_ms);
        self.bursts_scheduled += 1;
        cancelled
    }

    /// Drop every pending pulse; returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.pending.len();
        self.pulses_cancelled += n as u64;
        self.pending.clear();
        n
    }

    /// Remove and return the pulses due at or before `now_ms`, in order.
    pub fn due(&mut self, now_ms: u64) -> Vec<PulseKind> {
        let split = self.pending.partition_point(|p| p.due_ms <= now_ms);
        self.pending.drain(..split).map(|p| p.kind).collect()
    }

    /// When the host should poll next, if anything is pending.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.pending.first().map(|p| p.due_ms)
    }

    pub fn pending(&self) -> &[ScheduledPulse] {
        &self.pending
    }

    /// Total bursts scheduled since construction.
    pub fn bursts_scheduled(&self) -> u64 {
        self.bursts_scheduled
    }

    /// Total pulses cancelled before they became due.
    pub fn pulses_cancelled(&self) -> u64 {
        self.pulses_cancelled
    }
}
