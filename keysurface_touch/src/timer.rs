// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timer identities and the scheduler capability.
//!
//! The tracker never sleeps. It asks a [`Scheduler`] to post an
//! [`InputEvent::Timer`](crate::InputEvent::Timer) back once a deadline passes, and checks
//! on arrival whether the timer is still the one its press is waiting for.

/// Generational handle to a press owned by the dispatcher.
///
/// Slots are reused after release; the generation makes stale handles (and any timers
/// carrying them) distinguishable from the press that reused the slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PressHandle(pub(crate) u32, pub(crate) u32);

impl PressHandle {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// A scheduled long-press or repeat deadline.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimerId {
    /// Press the timer belongs to.
    pub press: PressHandle,
    /// Monotonic sequence number, unique per dispatcher.
    pub seq: u64,
}

/// Deferred-callback capability.
///
/// Implementations post `InputEvent::Timer { timer, .. }` to the tracker at or after
/// `deadline_ms`. Posting a cancelled timer is harmless: the tracker ignores timers that no
/// longer match their press.
pub trait Scheduler {
    /// Request a callback for `timer` at `deadline_ms`.
    fn schedule(&mut self, timer: TimerId, deadline_ms: u64);

    /// Withdraw a previously scheduled timer. Unknown timers are ignored.
    fn cancel(&mut self, timer: TimerId);
}

/// A virtual clock for tests, replays, and hosts that poll.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    pending: Vec<(u64, TimerId)>,
}

impl ManualScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every timer due at `now_ms`, earliest deadline first.
    pub fn take_due(&mut self, now_ms: u64) -> Vec<TimerId> {
        let mut due: Vec<(u64, TimerId)> = Vec::new();
        self.pending.retain(|&(deadline, timer)| {
            if deadline <= now_ms {
                due.push((deadline, timer));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(deadline, timer)| (deadline, timer.seq));
        due.into_iter().map(|(_, timer)| timer).collect()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.iter().map(|&(deadline, _)| deadline).min()
    }

    /// Number of timers still waiting.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, timer: TimerId, deadline_ms: u64) {
        self.pending.push((deadline_ms, timer));
    }

    fn cancel(&mut self, timer: TimerId) {
        self.pending.retain(|&(_, t)| t != timer);
    }
}
