// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input dispatcher: the key-event sink with long-press and repeat timers.
//!
//! ## Balance
//!
//! Every `Down` the dispatcher emits is matched by exactly one `Up` or `Cancel`:
//! - [`send_down`](InputDispatcher::send_down) emits `Down` (unless deferred) and returns a
//!   [`PressHandle`].
//! - [`send_up`](InputDispatcher::send_up) emits the terminal `Up`, flushing a deferred
//!   `Down` first.
//! - [`send_cancel`](InputDispatcher::send_cancel) emits `Cancel` only if `Down` went out.
//! - [`send_down_up`](InputDispatcher::send_down_up) and repeats emit self-contained pairs.
//!
//! Handles are generational. Using a stale handle is a no-op, and so is a timer that fires
//! after its press ended.

use keysurface_layout::KeyId;

use crate::event::{KeyInputEvent, Output};
use crate::timer::{PressHandle, Scheduler, TimerId};

/// What a press does once its long-press timer fires.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum LongPress {
    /// No timer.
    #[default]
    None,
    /// Auto-repeat the key's code while held.
    Repeat,
    /// Promote shift to caps lock.
    CapsLock,
    /// Open the extended popup.
    Popup,
    /// Resolve a bound long-press action.
    Action,
}

/// A long-press timer that fired for a live press.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TimerFired {
    /// Press that owns the timer.
    pub press: PressHandle,
    /// Pressed key.
    pub key: KeyId,
    /// Pressed code.
    pub code: i32,
    /// Long-press behavior. `Repeat` has already been handled by the dispatcher.
    pub kind: LongPress,
}

#[derive(Clone, Debug)]
struct Press {
    key: KeyId,
    code: i32,
    long_press: LongPress,
    down_sent: bool,
    interrupted: bool,
    repeated: bool,
    timer: Option<TimerId>,
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    press: Option<Press>,
}

/// Key-event sink.
pub struct InputDispatcher<S> {
    scheduler: S,
    long_press_delay_ms: u64,
    repeat_interval_ms: u64,
    slots: Vec<Slot>,
    free_list: Vec<usize>,
    next_seq: u64,
    output: Vec<Output>,
}

impl<S> core::fmt::Debug for InputDispatcher<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let live = self.slots.iter().filter(|s| s.press.is_some()).count();
        let armed = self
            .slots
            .iter()
            .filter(|s| s.press.as_ref().is_some_and(|p| p.timer.is_some()))
            .count();
        f.debug_struct("InputDispatcher")
            .field("long_press_delay_ms", &self.long_press_delay_ms)
            .field("repeat_interval_ms", &self.repeat_interval_ms)
            .field("live_presses", &live)
            .field("pending_timers", &armed)
            .field("next_seq", &self.next_seq)
            .field("queued_output", &self.output.len())
            .finish_non_exhaustive()
    }
}

impl<S: Scheduler> InputDispatcher<S> {
    /// Create a dispatcher that schedules through `scheduler`.
    pub fn new(scheduler: S, long_press_delay_ms: u64, repeat_interval_ms: u64) -> Self {
        Self {
            scheduler,
            long_press_delay_ms,
            repeat_interval_ms,
            slots: Vec::new(),
            free_list: Vec::new(),
            next_seq: 0,
            output: Vec::new(),
        }
    }

    /// Scheduler in use.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Scheduler in use, mutably.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Start a press.
    ///
    /// Every other live press is marked interrupted. With `defer`, the `Down` is held back
    /// until [`commit_down`](Self::commit_down) or [`send_up`](Self::send_up).
    pub fn send_down(
        &mut self,
        key: KeyId,
        code: i32,
        long_press: LongPress,
        defer: bool,
        now_ms: u64,
    ) -> PressHandle {
        self.interrupt_all();
        let handle = self.alloc(Press {
            key,
            code,
            long_press,
            down_sent: !defer,
            interrupted: false,
            repeated: false,
            timer: None,
        });
        if !defer {
            self.emit(Output::Key(KeyInputEvent::down(code)));
        }
        if long_press != LongPress::None {
            self.arm(handle, now_ms.saturating_add(self.long_press_delay_ms));
        }
        tracing::debug!(code, ?handle, ?long_press, defer, "key down");
        handle
    }

    /// Flush a deferred `Down`. No-op if it was already sent or the handle is stale.
    pub fn commit_down(&mut self, handle: PressHandle) {
        let Some(press) = self.press_mut(handle) else {
            return;
        };
        if press.down_sent {
            return;
        }
        press.down_sent = true;
        let code = press.code;
        self.emit(Output::Key(KeyInputEvent::down(code)));
    }

    /// End a press with effect. A press that auto-repeated ends with `Cancel` instead, since
    /// the repeats already delivered its effect.
    pub fn send_up(&mut self, handle: PressHandle) {
        let Some(press) = self.release(handle) else {
            return;
        };
        if !press.down_sent {
            self.emit(Output::Key(KeyInputEvent::down(press.code)));
        }
        let terminal = if press.repeated {
            KeyInputEvent::cancel(press.code)
        } else {
            KeyInputEvent::up(press.code)
        };
        self.emit(Output::Key(terminal));
        tracing::debug!(code = press.code, ?handle, "key up");
    }

    /// End a press without effect. Nothing is emitted for a deferred press.
    pub fn send_cancel(&mut self, handle: PressHandle) {
        let Some(press) = self.release(handle) else {
            return;
        };
        if press.down_sent {
            self.emit(Output::Key(KeyInputEvent::cancel(press.code)));
        }
        tracing::debug!(code = press.code, ?handle, "key cancel");
    }

    /// Emit a self-contained `Down`+`Up` pair. Live presses are marked interrupted.
    pub fn send_down_up(&mut self, code: i32) {
        self.interrupt_all();
        self.emit(Output::Key(KeyInputEvent::down(code)));
        self.emit(Output::Key(KeyInputEvent::up(code)));
    }

    /// Whether the press is live and no other key went down since it started.
    pub fn is_uninterrupted_event_sequence(&self, handle: PressHandle) -> bool {
        self.press(handle).is_some_and(|p| !p.interrupted)
    }

    /// Code of a live press.
    pub fn press_code(&self, handle: PressHandle) -> Option<i32> {
        self.press(handle).map(|p| p.code)
    }

    /// Withdraw the pending timer of a press, keeping the press itself.
    pub fn cancel_timer(&mut self, handle: PressHandle) {
        let timer = self.press_mut(handle).and_then(|p| p.timer.take());
        if let Some(timer) = timer {
            self.scheduler.cancel(timer);
        }
    }

    /// Handle a delivered timer.
    ///
    /// Stale timers return `None`. A repeat timer emits one `Down`+`Up` of the key's code,
    /// re-arms itself, and is reported so the caller can record the long press.
    pub fn on_timer(&mut self, timer: TimerId, now_ms: u64) -> Option<TimerFired> {
        let interval = self.repeat_interval_ms;
        let Some(press) = self.press_mut(timer.press) else {
            tracing::trace!(?timer, "stale timer, press gone");
            return None;
        };
        if press.timer != Some(timer) {
            tracing::trace!(?timer, "stale timer, superseded");
            return None;
        }
        press.timer = None;
        let fired = TimerFired {
            press: timer.press,
            key: press.key,
            code: press.code,
            kind: press.long_press,
        };

        if press.long_press == LongPress::Repeat {
            let flush_down = !press.down_sent;
            press.down_sent = true;
            press.repeated = true;
            if flush_down {
                self.emit(Output::Key(KeyInputEvent::down(fired.code)));
            }
            self.emit(Output::Key(KeyInputEvent::down(fired.code)));
            self.emit(Output::Key(KeyInputEvent::up(fired.code)));
            self.arm(timer.press, now_ms.saturating_add(interval));
            tracing::trace!(code = fired.code, "key repeat");
        } else {
            tracing::debug!(code = fired.code, kind = ?fired.kind, "long press fired");
        }
        Some(fired)
    }

    /// Cancel every live press and timer.
    pub fn cancel_all(&mut self) {
        let live: Vec<PressHandle> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.press.is_some())
            .map(|(idx, s)| Self::handle_for(idx, s.generation))
            .collect();
        for handle in live {
            self.send_cancel(handle);
        }
    }

    /// Timers still armed.
    pub fn pending_timers(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.press.as_ref().is_some_and(|p| p.timer.is_some()))
            .count()
    }

    /// Number of live presses.
    pub fn live_presses(&self) -> usize {
        self.slots.iter().filter(|s| s.press.is_some()).count()
    }

    /// Queue an output.
    pub fn emit(&mut self, output: Output) {
        tracing::trace!(?output, "emit");
        self.output.push(output);
    }

    /// Outputs emitted since the last drain.
    pub fn output(&self) -> &[Output] {
        &self.output
    }

    /// Drain outputs in emission order.
    pub fn take_output(&mut self) -> Vec<Output> {
        core::mem::take(&mut self.output)
    }

    fn interrupt_all(&mut self) {
        for press in self.slots.iter_mut().filter_map(|s| s.press.as_mut()) {
            press.interrupted = true;
        }
    }

    fn arm(&mut self, handle: PressHandle, deadline_ms: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let timer = TimerId { press: handle, seq };
        let Some(press) = self.press_mut(handle) else {
            return;
        };
        if let Some(old) = press.timer.replace(timer) {
            self.scheduler.cancel(old);
        }
        self.scheduler.schedule(timer, deadline_ms);
    }

    fn press(&self, handle: PressHandle) -> Option<&Press> {
        self.slots
            .get(handle.idx())
            .filter(|s| s.generation == handle.generation())
            .and_then(|s| s.press.as_ref())
    }

    fn press_mut(&mut self, handle: PressHandle) -> Option<&mut Press> {
        self.slots
            .get_mut(handle.idx())
            .filter(|s| s.generation == handle.generation())
            .and_then(|s| s.press.as_mut())
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "PressHandle uses 32-bit indices; live presses are bounded by pointer count"
    )]
    fn handle_for(idx: usize, generation: u32) -> PressHandle {
        PressHandle::new(idx as u32, generation)
    }

    fn alloc(&mut self, press: Press) -> PressHandle {
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx];
            slot.generation = slot.generation.wrapping_add(1);
            slot.press = Some(press);
            Self::handle_for(idx, slot.generation)
        } else {
            self.slots.push(Slot {
                generation: 1,
                press: Some(press),
            });
            Self::handle_for(self.slots.len() - 1, 1)
        }
    }

    fn release(&mut self, handle: PressHandle) -> Option<Press> {
        let slot = self
            .slots
            .get_mut(handle.idx())
            .filter(|s| s.generation == handle.generation())?;
        let press = slot.press.take()?;
        self.free_list.push(handle.idx());
        if let Some(timer) = press.timer {
            self.scheduler.cancel(timer);
        }
        Some(press)
    }
}
