// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer tracker: routes raw pointer events through hit testing, swipe classification,
//! glide capture, and popups into the dispatcher.
//!
//! ## Routing order for a move
//!
//! 1) A gliding pointer feeds the glide detector and nothing else.
//! 2) A pointer with an extended popup open moves the highlight.
//! 3) A glide candidate is checked for engagement.
//! 4) The swipe classifier runs; a consumed swipe ends here.
//! 5) The hysteresis check may slide the press onto another key.
//!
//! Processing is single-threaded and run to completion per event.

use keysurface_gesture::{
    GestureEvent, GestureKind, GlideTrail, GlideTypingDetector, PointerId, SwipeDetector,
    SwipeDirection,
};
use keysurface_layout::{
    ComputingEvaluator, Key, KeyId, KeyType, Keyboard, LayoutConfig, LayoutEngine, code,
};
use kurbo::{Point, Size};

use crate::action::SwipeAction;
use crate::config::TouchConfig;
use crate::dispatcher::{InputDispatcher, LongPress, TimerFired};
use crate::error::{ConfigError, QueueFull};
use crate::event::{InputEvent, Output, PointerEvent, PointerEventKind};
use crate::pointer::{ActivePress, Pointer, PointerArena, PointerFlags, PointerMode};
use crate::popup::{PopupController, PopupMove};
use crate::queue::EventQueue;
use crate::timer::{ManualScheduler, Scheduler, TimerId};

/// Multi-pointer touch engine for one keyboard.
pub struct PointerTracker<S> {
    config: TouchConfig,
    keyboard: Keyboard,
    engine: LayoutEngine,
    dispatcher: InputDispatcher<S>,
    pointers: PointerArena,
    swipe: SwipeDetector,
    glide: GlideTypingDetector,
    popup: PopupController,
    queue: EventQueue,
    password_field: bool,
    now_ms: u64,
}

impl<S> core::fmt::Debug for PointerTracker<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PointerTracker")
            .field("mode", &self.keyboard.mode())
            .field("pointers", &self.pointers)
            .field("dispatcher", &self.dispatcher)
            .field("popup", &self.popup.state())
            .field("queued", &self.queue.len())
            .field("password_field", &self.password_field)
            .field("now_ms", &self.now_ms)
            .finish_non_exhaustive()
    }
}

impl<S: Scheduler> PointerTracker<S> {
    /// Create a tracker. The configuration is validated once here.
    ///
    /// Call [`layout`](Self::layout) before feeding events; an unlaid keyboard hits nothing.
    pub fn new(keyboard: Keyboard, config: TouchConfig, scheduler: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            dispatcher: InputDispatcher::new(
                scheduler,
                config.long_press_delay_ms,
                config.repeat_interval_ms,
            ),
            pointers: PointerArena::new(config.max_pointers),
            swipe: SwipeDetector::new(config.swipe, Size::ZERO),
            glide: GlideTypingDetector::new(config.glide, 0.0),
            popup: PopupController::new(config.popup, config.hysteresis),
            queue: EventQueue::new(config.queue_capacity),
            engine: LayoutEngine::new(LayoutConfig::default()),
            keyboard,
            config,
            password_field: false,
            now_ms: 0,
        })
    }

    /// Replace the layout engine (for non-default margins or compact clamping).
    #[must_use]
    pub fn with_layout_config(mut self, layout: LayoutConfig) -> Self {
        self.engine = LayoutEngine::new(layout);
        self
    }

    /// Run a computing pass and a layout pass.
    ///
    /// Tracked pointers are cancelled first since their keys move underneath them.
    pub fn layout<E: ComputingEvaluator + ?Sized>(
        &mut self,
        viewport: Size,
        reference: Size,
        evaluator: &E,
    ) {
        self.cancel_all_pointers();
        self.engine.compute(&mut self.keyboard, evaluator);
        self.engine.layout(&mut self.keyboard, viewport, reference);
        let unit = self.engine.reference_key_size();
        self.swipe.set_unit_size(unit);
        self.glide.set_key_width(unit.width);
    }

    /// Mark the focused field as a password field (disables glide typing).
    pub fn set_password_field(&mut self, password: bool) {
        self.password_field = password;
    }

    /// Keyboard with its current layout and pressed flags.
    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    /// Configuration in use.
    pub fn config(&self) -> &TouchConfig {
        &self.config
    }

    /// Popup state.
    pub fn popup(&self) -> &PopupController {
        &self.popup
    }

    /// Tracked pointer with `id`.
    pub fn pointer(&self, id: PointerId) -> Option<&Pointer> {
        self.pointers.get(id)
    }

    /// Number of tracked pointers.
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Fading trail of the last glide, if still visible at `now_ms`.
    pub fn glide_trail(&self, now_ms: u64) -> Option<&GlideTrail> {
        self.glide.trail(now_ms)
    }

    /// Timers still armed by live presses.
    pub fn pending_timers(&self) -> usize {
        self.dispatcher.pending_timers()
    }

    /// Scheduler in use.
    pub fn scheduler(&self) -> &S {
        self.dispatcher.scheduler()
    }

    /// Scheduler in use, mutably.
    pub fn scheduler_mut(&mut self) -> &mut S {
        self.dispatcher.scheduler_mut()
    }

    /// Queue an event for [`process_pending`](Self::process_pending). Never blocks.
    pub fn enqueue(&mut self, event: impl Into<InputEvent>) -> Result<(), QueueFull> {
        self.queue.push(event.into())
    }

    /// Process every queued event in order.
    pub fn process_pending(&mut self) {
        while let Some(event) = self.queue.pop() {
            self.handle(event);
        }
    }

    /// Drain outputs in emission order.
    pub fn take_output(&mut self) -> Vec<Output> {
        self.dispatcher.take_output()
    }

    /// Process one event to completion.
    pub fn handle(&mut self, event: impl Into<InputEvent>) {
        let event = event.into();
        tracing::trace!(?event, "input");
        match event {
            InputEvent::Pointer(pe) => {
                self.now_ms = self.now_ms.max(pe.time_ms);
                match pe.kind {
                    PointerEventKind::Down => self.on_down(pe),
                    PointerEventKind::Move => self.on_move(pe),
                    PointerEventKind::Up => self.on_up(pe),
                    PointerEventKind::Cancel => self.on_cancel(pe.id),
                }
            }
            InputEvent::Timer { timer, time_ms } => {
                self.now_ms = self.now_ms.max(time_ms);
                self.on_timer(timer, time_ms);
            }
            InputEvent::Pause { time_ms } => {
                self.now_ms = self.now_ms.max(time_ms);
                self.pause();
            }
        }
    }

    fn on_down(&mut self, pe: PointerEvent) {
        if self.pointers.get(pe.id).is_some() {
            tracing::warn!(pointer = ?pe.id, "duplicate down for tracked pointer, cancelling stale state");
            self.on_cancel(pe.id);
        }

        // A second finger ends glide candidacy of the first.
        let candidates: Vec<PointerId> = self
            .pointers
            .iter()
            .filter(|p| p.flags.contains(PointerFlags::GLIDE_CANDIDATE))
            .map(|p| p.id)
            .collect();
        for id in candidates {
            self.drop_glide_candidacy(id, true);
        }

        let gliding = self.glide.is_engaged();
        let capacity = self.pointers.capacity();
        let Some(ptr) = self.pointers.acquire(pe.id, pe.index, pe.position) else {
            tracing::warn!(pointer = ?pe.id, capacity, "pointer arena full, ignoring pointer");
            return;
        };
        if gliding {
            tracing::debug!(pointer = ?pe.id, "pointer down during glide stays inert");
            return;
        }

        let key = self.keyboard.key_at(pe.position);
        ptr.initial_key = key;
        self.swipe.on_down(pe.id, pe.position, pe.time_ms);
        let Some(key_id) = key else {
            tracing::trace!(pointer = ?pe.id, "down outside every key");
            return;
        };

        let candidate = self.is_glide_eligible(key_id) && self.pointers.len() == 1;
        self.press_key(pe.id, key_id, candidate);
        if candidate {
            if let Some(center) = self.keyboard.key(key_id).map(|k| k.visible_bounds.center()) {
                self.glide.begin(pe.id, center, pe.position, pe.time_ms);
                self.set_flag(pe.id, PointerFlags::GLIDE_CANDIDATE, true);
            }
        }
    }

    fn on_move(&mut self, pe: PointerEvent) {
        let Some(ptr) = self.pointers.get_mut(pe.id) else {
            tracing::trace!(pointer = ?pe.id, "move for untracked pointer");
            return;
        };
        ptr.index = pe.index;
        let ptr = *ptr;

        match ptr.mode {
            PointerMode::Glide => {
                self.glide.on_move(pe.id, pe.position, pe.time_ms);
                return;
            }
            PointerMode::Popup(press) => {
                if self.popup.on_move(pe.id, pe.position) == Some(PopupMove::Left) {
                    self.end_press(pe.id, press, false);
                    self.slide_to(pe.id, pe.position);
                }
                return;
            }
            PointerMode::Consumed(_) => return,
            _ => {}
        }

        if ptr.flags.contains(PointerFlags::GLIDE_CANDIDATE)
            && self.glide.on_move(pe.id, pe.position, pe.time_ms)
        {
            self.engage_glide(pe.id);
            return;
        }

        if let Some(event) = self.swipe.on_move(pe.id, pe.position, pe.time_ms) {
            if !ptr.flags.contains(PointerFlags::GESTURE_MOVE) {
                self.set_flag(pe.id, PointerFlags::GESTURE_MOVE, true);
                if let Some(press) = ptr.active_press() {
                    self.dispatcher.cancel_timer(press.handle);
                }
            }
            if self.handle_swipe(pe.id, event) {
                return;
            }
        }

        let Some(ptr) = self.pointers.get(pe.id).copied() else {
            return;
        };
        match ptr.mode {
            PointerMode::Press(press) => {
                if !self.within_tolerance(press.key, pe.position) {
                    self.end_press(pe.id, press, false);
                    self.slide_to(pe.id, pe.position);
                }
            }
            PointerMode::Inert if ptr.initial_key.is_some() => {
                self.slide_to(pe.id, pe.position);
            }
            _ => {}
        }
    }

    fn on_up(&mut self, pe: PointerEvent) {
        let Some(ptr) = self.pointers.get(pe.id).copied() else {
            tracing::trace!(pointer = ?pe.id, "up for untracked pointer");
            return;
        };
        let gesture = self.swipe.on_up(pe.id, pe.position, pe.time_ms);

        match ptr.mode {
            PointerMode::Glide => {
                self.finalize_glide(pe.id, true);
                self.release_pointer(pe.id);
                return;
            }
            PointerMode::Popup(press) => {
                let original = self.dispatcher.press_code(press.handle);
                match self.popup.resolve(pe.id) {
                    Some(chosen) if Some(chosen) != original => {
                        self.end_press(pe.id, press, false);
                        self.dispatcher.send_down_up(chosen);
                    }
                    _ => self.end_press(pe.id, press, true),
                }
                self.release_pointer(pe.id);
                return;
            }
            PointerMode::Consumed(press) => {
                self.end_press(pe.id, press, false);
                self.release_pointer(pe.id);
                return;
            }
            _ => {}
        }

        let consumed = match gesture {
            Some(event) => self.handle_swipe(pe.id, event),
            None => false,
        };

        match self.pointers.get(pe.id).map(|p| p.mode) {
            Some(PointerMode::Swipe {
                press: Some(press), ..
            }) => self.end_press(pe.id, press, false),
            Some(PointerMode::Press(press)) if consumed => self.end_press(pe.id, press, false),
            Some(PointerMode::Press(press)) => {
                self.glide.abandon(pe.id);
                if self.within_tolerance(press.key, pe.position) {
                    self.end_press(pe.id, press, true);
                } else {
                    // The key changed since the last move: cancel it and tap the new one.
                    self.end_press(pe.id, press, false);
                    if let Some(code) =
                        self.keyboard.key_at(pe.position).and_then(|k| self.code_of(k))
                    {
                        self.dispatcher.send_down_up(code);
                    }
                }
            }
            _ => {}
        }
        self.release_pointer(pe.id);
    }

    /// Cancel one pointer. Safe for untracked ids.
    fn on_cancel(&mut self, id: PointerId) {
        let Some(ptr) = self.pointers.get(id).copied() else {
            tracing::trace!(pointer = ?id, "cancel for untracked pointer");
            return;
        };
        self.swipe.on_cancel(id);
        if ptr.mode == PointerMode::Glide {
            self.finalize_glide(id, false);
        } else if let Some(press) = ptr.active_press() {
            self.end_press(id, press, false);
        }
        self.glide.abandon(id);
        self.popup.hide(id);
        self.release_pointer(id);
    }

    fn on_timer(&mut self, timer: TimerId, time_ms: u64) {
        let Some(fired) = self.dispatcher.on_timer(timer, time_ms) else {
            return;
        };
        let owner = self
            .pointers
            .iter()
            .find(|p| p.active_press().is_some_and(|a| a.handle == fired.press))
            .map(|p| (p.id, p.active_press()));
        let Some((id, Some(press))) = owner else {
            tracing::trace!(?timer, "timer for press without pointer");
            return;
        };
        self.set_flag(id, PointerFlags::LONG_PRESS, true);
        self.on_long_press(id, press, fired);
    }

    fn on_long_press(&mut self, id: PointerId, press: ActivePress, fired: TimerFired) {
        let was_candidate = self.drop_glide_candidacy(id, false);
        match fired.kind {
            LongPress::None | LongPress::Repeat => {}
            LongPress::CapsLock => {
                if self.dispatcher.is_uninterrupted_event_sequence(press.handle) {
                    self.dispatcher.send_down_up(code::CAPS_LOCK);
                    self.popup.hide(id);
                    self.set_mode(id, PointerMode::Consumed(press));
                }
            }
            LongPress::Popup => {
                let width = self.keyboard.size().width;
                let shown = match self.keyboard.key(press.key) {
                    Some(key) => self.popup.show_extended(id, key, width),
                    None => false,
                };
                if shown {
                    self.set_mode(id, PointerMode::Popup(press));
                    return;
                }
            }
            LongPress::Action => {
                let action = self.config.swipe_bindings.space_long_press;
                self.dispatcher.emit(Output::LongPressResolved {
                    pointer: id,
                    code: fired.code,
                    action,
                });
                self.popup.hide(id);
                self.set_mode(id, PointerMode::Consumed(press));
            }
        }
        if was_candidate {
            self.dispatcher.commit_down(press.handle);
        }
    }

    fn pause(&mut self) {
        tracing::debug!(pointers = self.pointers.len(), "pause, cancelling all input");
        self.cancel_all_pointers();
        self.dispatcher.cancel_all();
        self.popup.close();
        self.glide.reset();
        self.swipe.clear();
    }

    fn cancel_all_pointers(&mut self) {
        for id in self.pointers.ids() {
            self.on_cancel(id);
        }
    }

    /// Swipe handling keyed on the initial key. Returns `true` when the swipe was consumed.
    fn handle_swipe(&mut self, id: PointerId, event: GestureEvent) -> bool {
        let Some(ptr) = self.pointers.get(id).copied() else {
            return false;
        };
        let Some(initial) = ptr.initial_key.and_then(|k| self.code_of(k)) else {
            return false;
        };
        let active = ptr.active_key().and_then(|k| self.code_of(k));
        let effective = if initial == code::SHIFT && active == Some(code::SPACE) {
            code::SPACE
        } else {
            initial
        };
        let bindings = self.config.swipe_bindings;

        match (effective, event.kind) {
            (code::SPACE, GestureKind::TouchMove) => {
                if !event.direction.is_horizontal() || event.rel_units_x == 0 {
                    return matches!(ptr.mode, PointerMode::Swipe { .. });
                }
                let direction = if event.rel_units_x < 0 {
                    SwipeDirection::Left
                } else {
                    SwipeDirection::Right
                };
                let action = bindings.space(direction);
                if action == SwipeAction::NoAction {
                    return false;
                }
                if self.shift_held_by_other(id) && action.is_horizontal_cursor_move() {
                    self.resolve_swipe(id, SwipeAction::SelectCharactersPrecisely, event.rel_units_x);
                } else {
                    self.resolve_swipe(id, action, event.rel_units_x.abs());
                }
                true
            }
            (code::SPACE, GestureKind::TouchUp) => {
                if matches!(ptr.mode, PointerMode::Swipe { .. }) {
                    return true;
                }
                if !event.direction.is_vertical() {
                    return false;
                }
                let action = bindings.space(event.direction);
                if action == SwipeAction::NoAction {
                    return false;
                }
                self.resolve_swipe(id, action, event.abs_units_y.abs());
                true
            }
            (code::DELETE, GestureKind::TouchMove) => {
                if !bindings.delete_left.is_precise_delete() {
                    return false;
                }
                let select = if bindings.delete_left == SwipeAction::DeleteWordsPrecisely {
                    SwipeAction::SelectWordsPrecisely
                } else {
                    SwipeAction::SelectCharactersPrecisely
                };
                if !event.direction.is_horizontal() || event.rel_units_x == 0 {
                    return matches!(ptr.mode, PointerMode::Swipe { .. });
                }
                if let Some(p) = self.pointers.get_mut(id) {
                    p.selection += event.rel_units_x;
                    p.flags.insert(PointerFlags::MASS_SELECTION);
                }
                self.resolve_swipe(id, select, event.rel_units_x);
                true
            }
            (code::DELETE, GestureKind::TouchUp) => {
                if ptr.flags.contains(PointerFlags::MASS_SELECTION) {
                    let selected = self.pointers.get(id).map_or(0, |p| p.selection);
                    if selected != 0 {
                        self.resolve_swipe(id, bindings.delete_left, selected.abs());
                    }
                    return true;
                }
                if bindings.delete_left == SwipeAction::DeleteWord
                    && event.direction == SwipeDirection::Left
                {
                    self.resolve_swipe(id, SwipeAction::DeleteWord, 1);
                    return true;
                }
                false
            }
            (_, GestureKind::TouchMove) => false,
            (_, GestureKind::TouchUp) => {
                let action = bindings.general(event.direction);
                if action == SwipeAction::NoAction {
                    return false;
                }
                let units = event.abs_units_x.abs().max(event.abs_units_y.abs()).max(1);
                self.resolve_swipe(id, action, units);
                true
            }
        }
    }

    /// Emit a swipe action. A held press loses its timer and stays live until the pointer
    /// ends, so it is cancelled exactly once.
    fn resolve_swipe(&mut self, id: PointerId, action: SwipeAction, units: i32) {
        self.dispatcher.emit(Output::SwipeResolved {
            pointer: id,
            action,
            units,
        });
        let Some(ptr) = self.pointers.get(id).copied() else {
            return;
        };
        match ptr.mode {
            PointerMode::Press(press) => {
                self.dispatcher.cancel_timer(press.handle);
                self.popup.hide(id);
                self.set_mode(
                    id,
                    PointerMode::Swipe {
                        key: press.key,
                        press: Some(press),
                    },
                );
            }
            PointerMode::Inert => {
                if let Some(key) = ptr.initial_key {
                    self.set_mode(id, PointerMode::Swipe { key, press: None });
                }
            }
            _ => {}
        }
        self.glide.abandon(id);
        self.set_flag(id, PointerFlags::GLIDE_CANDIDATE, false);
    }

    fn engage_glide(&mut self, id: PointerId) {
        if let Some(press) = self.pointers.get(id).and_then(Pointer::active_press) {
            self.end_press(id, press, false);
        }
        self.swipe.on_cancel(id);
        self.set_flag(id, PointerFlags::GLIDE_CANDIDATE, false);
        self.set_mode(id, PointerMode::Glide);
    }

    fn finalize_glide(&mut self, id: PointerId, completed: bool) {
        if let Some(trajectory) = self.glide.finish(id, completed) {
            self.dispatcher.emit(Output::GlideTrajectoryFinalized {
                pointer: trajectory.pointer,
                points: trajectory.points,
                completed: trajectory.completed,
            });
        }
    }

    /// Drop glide candidacy. With `flush`, a deferred `Down` goes out now.
    /// Returns whether the pointer was a candidate.
    fn drop_glide_candidacy(&mut self, id: PointerId, flush: bool) -> bool {
        let Some(ptr) = self.pointers.get(id).copied() else {
            return false;
        };
        if !ptr.flags.contains(PointerFlags::GLIDE_CANDIDATE) {
            return false;
        }
        self.glide.abandon(id);
        self.set_flag(id, PointerFlags::GLIDE_CANDIDATE, false);
        if flush {
            if let Some(press) = ptr.active_press() {
                self.dispatcher.commit_down(press.handle);
            }
        }
        true
    }

    fn is_glide_eligible(&self, key: KeyId) -> bool {
        self.config.glide.enabled
            && !self.password_field
            && self.keyboard.mode().supports_glide()
            && self
                .keyboard
                .key(key)
                .is_some_and(|k| k.kind() == KeyType::Character)
    }

    /// Hit-test at `pos` and press whatever is there, leaving the pointer inert otherwise.
    fn slide_to(&mut self, id: PointerId, pos: Point) {
        self.drop_glide_candidacy(id, false);
        self.set_mode(id, PointerMode::Inert);
        if let Some(key) = self.keyboard.key_at(pos) {
            tracing::debug!(pointer = ?id, ?key, "key slide");
            self.press_key(id, key, false);
        }
    }

    fn press_key(&mut self, id: PointerId, key_id: KeyId, defer: bool) {
        let Some(key) = self.keyboard.key(key_id) else {
            return;
        };
        let code = key.code();
        let long_press = self.long_press_kind(key);
        self.popup.show_basic(id, key);
        let handle = self
            .dispatcher
            .send_down(key_id, code, long_press, defer, self.now_ms);
        self.keyboard.set_pressed(key_id, true);
        self.set_mode(id, PointerMode::Press(ActivePress { key: key_id, handle }));
    }

    /// End a press with (`commit`) or without effect, clearing its pressed flag and preview.
    fn end_press(&mut self, id: PointerId, press: ActivePress, commit: bool) {
        if commit {
            self.dispatcher.send_up(press.handle);
        } else {
            self.dispatcher.send_cancel(press.handle);
        }
        let still_held = self
            .pointers
            .iter()
            .any(|p| p.id != id && p.active_key() == Some(press.key));
        if !still_held {
            self.keyboard.set_pressed(press.key, false);
        }
        self.popup.hide(id);
        self.set_mode(id, PointerMode::Inert);
    }

    fn long_press_kind(&self, key: &Key) -> LongPress {
        let c = key.code();
        if code::is_repeatable(c) {
            LongPress::Repeat
        } else if c == code::SHIFT {
            LongPress::CapsLock
        } else if c == code::SPACE {
            if self.config.swipe_bindings.space_long_press == SwipeAction::NoAction {
                LongPress::None
            } else {
                LongPress::Action
            }
        } else if PopupController::has_extended(key) {
            LongPress::Popup
        } else {
            LongPress::None
        }
    }

    fn within_tolerance(&self, key: KeyId, pos: Point) -> bool {
        let Some(key) = self.keyboard.key(key) else {
            return false;
        };
        let b = key.visible_bounds;
        let h = &self.config.hysteresis;
        b.inflate(b.width() * h.horizontal, b.height() * h.vertical)
            .contains(pos)
    }

    /// A shift promoted to caps lock no longer counts as held.
    fn shift_held_by_other(&self, id: PointerId) -> bool {
        self.pointers.iter().any(|p| match p.mode {
            PointerMode::Press(press) => p.id != id && self.code_of(press.key) == Some(code::SHIFT),
            _ => false,
        })
    }

    fn code_of(&self, key: KeyId) -> Option<i32> {
        self.keyboard.key(key).map(Key::code)
    }

    fn set_mode(&mut self, id: PointerId, mode: PointerMode) {
        if let Some(p) = self.pointers.get_mut(id) {
            p.mode = mode;
        }
    }

    fn set_flag(&mut self, id: PointerId, flag: PointerFlags, on: bool) {
        if let Some(p) = self.pointers.get_mut(id) {
            p.flags.set(flag, on);
        }
    }

    fn release_pointer(&mut self, id: PointerId) {
        self.popup.hide(id);
        if let Some(p) = self.pointers.release(id) {
            tracing::trace!(pointer = ?id, flags = ?p.flags, "pointer released");
        }
    }
}

impl PointerTracker<ManualScheduler> {
    /// Deliver every timer due at `now_ms` from the virtual clock.
    pub fn advance_to(&mut self, now_ms: u64) {
        loop {
            let due = self.dispatcher.scheduler_mut().take_due(now_ms);
            if due.is_empty() {
                break;
            }
            for timer in due {
                self.handle(InputEvent::Timer {
                    timer,
                    time_ms: now_ms,
                });
            }
            // Saturated deadlines re-arm at `now_ms` itself.
            if now_ms == u64::MAX {
                break;
            }
        }
        self.glide.prune_trail(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KeyEventKind, KeyInputEvent};
    use keysurface_layout::{DefaultEvaluator, KeyData, KeyboardMode};

    // 1000×300 keyboard of 100×100 cells:
    // row 0: q w e r t y u i o p        ('e' has alternates é è)
    // row 1: SHIFT a s d f g h j k DELETE
    // row 2: VIEW_SYMBOLS SPACE(800 wide) ENTER
    fn keyboard() -> Keyboard {
        let top: Vec<KeyData> = "qwertyuiop"
            .chars()
            .map(|c| {
                let k = KeyData::character(c);
                if c == 'e' { k.with_alternates(['é', 'è']) } else { k }
            })
            .collect();
        let mut middle = vec![KeyData::functional(code::SHIFT)];
        middle.extend("asdfghjk".chars().map(KeyData::character));
        middle.push(KeyData::functional(code::DELETE));
        let bottom = vec![
            KeyData::functional(code::VIEW_SYMBOLS),
            KeyData::functional(code::SPACE).grow(1.0),
            KeyData::functional(code::ENTER),
        ];
        Keyboard::new(KeyboardMode::Characters, [top, middle, bottom])
    }

    fn tracker_with(config: TouchConfig) -> PointerTracker<ManualScheduler> {
        let mut t = PointerTracker::new(keyboard(), config, ManualScheduler::new()).unwrap();
        t.layout(Size::new(1000.0, 300.0), Size::new(100.0, 100.0), &DefaultEvaluator);
        t
    }

    fn tracker() -> PointerTracker<ManualScheduler> {
        tracker_with(TouchConfig::default())
    }

    fn no_glide() -> TouchConfig {
        let mut config = TouchConfig::default();
        config.glide.enabled = false;
        config
    }

    fn keys(t: &mut PointerTracker<ManualScheduler>) -> Vec<KeyInputEvent> {
        t.take_output().iter().filter_map(Output::as_key).collect()
    }

    fn down(c: char) -> Output {
        Output::Key(KeyInputEvent::down(c as i32))
    }

    fn up(c: char) -> Output {
        Output::Key(KeyInputEvent::up(c as i32))
    }

    fn assert_balanced(events: &[KeyInputEvent]) {
        let downs = events.iter().filter(|e| e.kind == KeyEventKind::Down).count();
        assert_eq!(downs, events.len() - downs, "unbalanced: {events:?}");
    }

    #[test]
    fn plain_tap_on_glide_key() {
        let mut t = tracker();
        t.handle(PointerEvent::down(1, (150.0, 50.0), 0));
        // Down is held back while the pointer might still start a glide.
        assert!(t.take_output().is_empty());
        assert!(t.keyboard().key_by_code('w' as i32).unwrap().is_pressed());
        t.handle(PointerEvent::up(1, (151.0, 50.0), 50));
        assert_eq!(t.take_output(), vec![down('w'), up('w')]);
        assert!(!t.keyboard().key_by_code('w' as i32).unwrap().is_pressed());
        assert_eq!(t.pointer_count(), 0);
        assert_eq!(t.pending_timers(), 0);
    }

    #[test]
    fn glide_emits_only_the_trajectory() {
        let mut t = tracker();
        t.handle(PointerEvent::down(1, (550.0, 150.0), 0));
        t.handle(PointerEvent::moved(1, (560.0, 150.0), 20));
        t.handle(PointerEvent::moved(1, (600.0, 150.0), 60));
        assert_eq!(t.pointer(PointerId(1)).unwrap().mode, PointerMode::Glide);
        t.handle(PointerEvent::moved(1, (700.0, 120.0), 100));
        t.handle(PointerEvent::up(1, (750.0, 120.0), 140));

        let out = t.take_output();
        assert_eq!(out.len(), 1);
        let Output::GlideTrajectoryFinalized {
            pointer,
            points,
            completed,
        } = &out[0]
        else {
            panic!("expected a glide, got {out:?}");
        };
        assert_eq!(*pointer, PointerId(1));
        assert!(*completed);
        assert_eq!(points.len(), 4);
        assert_eq!(points[0].position, Point::new(550.0, 150.0));
        assert!(t.glide_trail(150).is_some());
        assert!(t.glide_trail(10_000).is_none());
        assert!(!t.keyboard().keys().iter().any(Key::is_pressed));
    }

    #[test]
    fn password_field_disables_glide() {
        let mut t = tracker();
        t.set_password_field(true);
        t.handle(PointerEvent::down(1, (550.0, 150.0), 0));
        t.handle(PointerEvent::moved(1, (700.0, 150.0), 100));
        t.handle(PointerEvent::up(1, (700.0, 150.0), 150));
        let out = t.take_output();
        assert_eq!(out[0], down('g'));
        assert!(
            !out.iter()
                .any(|o| matches!(o, Output::GlideTrajectoryFinalized { .. }))
        );
        assert_balanced(&out.iter().filter_map(Output::as_key).collect::<Vec<_>>());
    }

    #[test]
    fn pause_cancels_every_pointer_and_timer() {
        let mut t = tracker();
        t.handle(PointerEvent::down(1, (950.0, 150.0), 0));
        t.handle(PointerEvent::down(2, (150.0, 150.0), 10));
        t.advance_to(400);
        let before = keys(&mut t);
        assert_eq!(
            before,
            vec![
                KeyInputEvent::down(code::DELETE),
                KeyInputEvent::down('a' as i32),
                KeyInputEvent::down(code::DELETE),
                KeyInputEvent::up(code::DELETE),
            ]
        );
        assert_eq!(t.pending_timers(), 1);

        t.handle(InputEvent::Pause { time_ms: 410 });
        assert_eq!(
            keys(&mut t),
            vec![
                KeyInputEvent::cancel(code::DELETE),
                KeyInputEvent::cancel('a' as i32),
            ]
        );
        assert_eq!(t.pending_timers(), 0);
        assert_eq!(t.scheduler().pending(), 0);
        assert_eq!(t.pointer_count(), 0);
        assert_eq!(t.popup().state(), &crate::popup::PopupState::Closed);

        // Stray events for the cancelled pointers are ignored.
        t.handle(PointerEvent::up(1, (950.0, 150.0), 420));
        t.advance_to(1000);
        assert!(t.take_output().is_empty());
    }

    #[test]
    fn pause_cancels_swiping_and_repeating_pointers() {
        let mut t = tracker();
        t.handle(PointerEvent::down(1, (500.0, 250.0), 0));
        t.handle(PointerEvent::moved(1, (620.0, 250.0), 100));
        t.handle(PointerEvent::down(2, (950.0, 150.0), 110));
        t.advance_to(450);
        assert_eq!(
            t.pointer(PointerId(1)).unwrap().active_key(),
            t.keyboard().key_by_code(code::SPACE).map(|k| k.id)
        );
        assert_eq!(
            keys(&mut t),
            vec![
                KeyInputEvent::down(code::SPACE),
                KeyInputEvent::down(code::DELETE),
                KeyInputEvent::down(code::DELETE),
                KeyInputEvent::up(code::DELETE),
            ]
        );

        t.handle(InputEvent::Pause { time_ms: 450 });
        assert_eq!(
            keys(&mut t),
            vec![
                KeyInputEvent::cancel(code::SPACE),
                KeyInputEvent::cancel(code::DELETE),
            ]
        );
        assert_eq!(t.pending_timers(), 0);
        assert_eq!(t.scheduler().pending(), 0);
        assert!(!t.keyboard().keys().iter().any(Key::is_pressed));
    }

    #[test]
    fn pause_after_caps_lock_cancels_shift() {
        let mut t = tracker();
        t.handle(PointerEvent::down(1, (50.0, 150.0), 0));
        t.advance_to(300);
        t.handle(PointerEvent::down(2, (500.0, 250.0), 310));
        t.handle(PointerEvent::moved(2, (620.0, 250.0), 410));
        let out = t.take_output();
        // Caps lock does not count as a held shift for the space swipe.
        assert!(out.contains(&Output::SwipeResolved {
            pointer: PointerId(2),
            action: SwipeAction::MoveCursorRight,
            units: 1,
        }));

        t.handle(InputEvent::Pause { time_ms: 420 });
        assert_eq!(
            keys(&mut t),
            vec![
                KeyInputEvent::cancel(code::SHIFT),
                KeyInputEvent::cancel(code::SPACE),
            ]
        );
        assert_eq!(t.pending_timers(), 0);
    }

    #[test]
    fn late_timestamps_do_not_overflow() {
        let mut t = tracker();
        let start = u64::MAX - 10;
        t.handle(PointerEvent::down(1, (950.0, 150.0), start));
        t.advance_to(u64::MAX);
        t.handle(PointerEvent::up(1, (950.0, 150.0), u64::MAX));
        let events = keys(&mut t);
        assert_eq!(
            events,
            vec![
                KeyInputEvent::down(code::DELETE),
                KeyInputEvent::down(code::DELETE),
                KeyInputEvent::up(code::DELETE),
                KeyInputEvent::cancel(code::DELETE),
            ]
        );
        assert_eq!(t.pending_timers(), 0);
    }

    #[test]
    fn lift_off_on_another_key_without_a_move() {
        let mut t = tracker_with(no_glide());
        t.handle(PointerEvent::down(1, (150.0, 50.0), 0));
        t.handle(PointerEvent::up(1, (350.0, 50.0), 50));
        assert_eq!(
            keys(&mut t),
            vec![
                KeyInputEvent::down('w' as i32),
                KeyInputEvent::cancel('w' as i32),
                KeyInputEvent::down('r' as i32),
                KeyInputEvent::up('r' as i32),
            ]
        );
        assert!(!t.keyboard().keys().iter().any(Key::is_pressed));
    }

    #[test]
    fn pointer_down_during_glide_stays_inert() {
        let mut t = tracker();
        t.handle(PointerEvent::down(1, (550.0, 150.0), 0));
        t.handle(PointerEvent::moved(1, (560.0, 150.0), 20));
        t.handle(PointerEvent::moved(1, (600.0, 150.0), 60));
        assert_eq!(t.pointer(PointerId(1)).unwrap().mode, PointerMode::Glide);

        t.handle(PointerEvent::down(2, (150.0, 50.0), 70));
        t.handle(PointerEvent::moved(2, (350.0, 50.0), 80));
        assert_eq!(t.pointer(PointerId(2)).unwrap().mode, PointerMode::Inert);
        t.advance_to(600);
        t.handle(PointerEvent::up(2, (350.0, 50.0), 610));
        assert!(t.take_output().is_empty());
        assert!(!t.keyboard().keys().iter().any(Key::is_pressed));

        t.handle(PointerEvent::up(1, (700.0, 150.0), 620));
        let out = t.take_output();
        assert_eq!(out.len(), 1);
        assert!(matches!(
            out[0],
            Output::GlideTrajectoryFinalized {
                pointer: PointerId(1),
                completed: true,
                ..
            }
        ));
    }

    #[test]
    fn glide_never_engages_with_a_second_finger_down() {
        let mut t = tracker();
        t.handle(PointerEvent::down(1, (550.0, 150.0), 0));
        t.handle(PointerEvent::down(2, (150.0, 50.0), 10));
        t.handle(PointerEvent::moved(1, (560.0, 150.0), 20));
        t.handle(PointerEvent::moved(1, (600.0, 150.0), 60));
        assert_ne!(t.pointer(PointerId(1)).unwrap().mode, PointerMode::Glide);
        t.handle(PointerEvent::up(1, (600.0, 150.0), 80));
        t.handle(PointerEvent::up(2, (150.0, 50.0), 90));
        let out = t.take_output();
        assert!(
            !out.iter()
                .any(|o| matches!(o, Output::GlideTrajectoryFinalized { .. }))
        );
        assert_eq!(out[..2], [down('g'), down('w')]);
        assert!(out.contains(&up('w')));
        assert_balanced(&out.iter().filter_map(Output::as_key).collect::<Vec<_>>());
    }

    #[test]
    fn shift_slid_onto_space_moves_the_cursor() {
        let mut t = tracker();
        let p = PointerId(1);
        t.handle(PointerEvent::down(1, (50.0, 150.0), 0));
        t.handle(PointerEvent::moved(1, (300.0, 250.0), 100));
        t.handle(PointerEvent::moved(1, (450.0, 250.0), 200));
        t.handle(PointerEvent::up(1, (450.0, 250.0), 250));
        assert_eq!(
            t.take_output(),
            vec![
                Output::Key(KeyInputEvent::down(code::SHIFT)),
                Output::Key(KeyInputEvent::cancel(code::SHIFT)),
                Output::Key(KeyInputEvent::down(code::SPACE)),
                Output::SwipeResolved {
                    pointer: p,
                    action: SwipeAction::MoveCursorRight,
                    units: 2,
                },
                Output::Key(KeyInputEvent::cancel(code::SPACE)),
            ]
        );
        assert_eq!(t.pending_timers(), 0);
    }

    #[test]
    fn leaving_a_key_slides_to_the_next() {
        let mut t = tracker_with(no_glide());
        t.handle(PointerEvent::down(1, (150.0, 50.0), 0));
        // Inside the tolerance band of 'w'.
        t.handle(PointerEvent::moved(1, (205.0, 50.0), 200));
        t.handle(PointerEvent::moved(1, (210.0, 50.0), 400));
        t.handle(PointerEvent::up(1, (250.0, 50.0), 450));
        assert_eq!(
            keys(&mut t),
            vec![
                KeyInputEvent::down('w' as i32),
                KeyInputEvent::cancel('w' as i32),
                KeyInputEvent::down('e' as i32),
                KeyInputEvent::up('e' as i32),
            ]
        );
        assert_eq!(t.pending_timers(), 0);
    }

    #[test]
    fn long_press_popup_selects_alternate() {
        let mut t = tracker();
        t.handle(PointerEvent::down(1, (250.0, 50.0), 0));
        t.advance_to(300);
        assert!(t.popup().is_extended_for(PointerId(1)));
        assert!(
            t.pointer(PointerId(1))
                .unwrap()
                .flags
                .contains(PointerFlags::LONG_PRESS)
        );
        t.handle(PointerEvent::moved(1, (346.0, -40.0), 350));
        t.handle(PointerEvent::up(1, (346.0, -40.0), 400));
        assert_eq!(t.take_output(), vec![down('é'), up('é')]);
        assert!(!t.popup().is_extended_for(PointerId(1)));
    }

    #[test]
    fn long_press_popup_keeps_own_code() {
        let mut t = tracker_with(no_glide());
        t.handle(PointerEvent::down(1, (250.0, 50.0), 0));
        t.advance_to(300);
        t.handle(PointerEvent::up(1, (250.0, 50.0), 400));
        assert_eq!(t.take_output(), vec![down('e'), up('e')]);
    }

    #[test]
    fn leaving_the_popup_cancels_and_slides() {
        let mut t = tracker_with(no_glide());
        t.handle(PointerEvent::down(1, (250.0, 50.0), 0));
        t.advance_to(300);
        // Far below the grid, over 'f'.
        t.handle(PointerEvent::moved(1, (450.0, 150.0), 350));
        assert!(!t.popup().is_extended_for(PointerId(1)));
        t.handle(PointerEvent::up(1, (450.0, 150.0), 400));
        assert_eq!(
            keys(&mut t),
            vec![
                KeyInputEvent::down('e' as i32),
                KeyInputEvent::cancel('e' as i32),
                KeyInputEvent::down('f' as i32),
                KeyInputEvent::up('f' as i32),
            ]
        );
    }

    #[test]
    fn shift_long_press_toggles_caps_lock() {
        let mut t = tracker();
        t.handle(PointerEvent::down(1, (50.0, 150.0), 0));
        t.advance_to(300);
        t.handle(PointerEvent::up(1, (50.0, 150.0), 400));
        assert_eq!(
            keys(&mut t),
            vec![
                KeyInputEvent::down(code::SHIFT),
                KeyInputEvent::down(code::CAPS_LOCK),
                KeyInputEvent::up(code::CAPS_LOCK),
                KeyInputEvent::cancel(code::SHIFT),
            ]
        );
        assert!(!t.keyboard().key_by_code(code::SHIFT).unwrap().is_pressed());
    }

    #[test]
    fn interrupted_shift_stays_shift() {
        let mut t = tracker();
        t.handle(PointerEvent::down(1, (50.0, 150.0), 0));
        t.handle(PointerEvent::down(2, (150.0, 150.0), 100));
        t.handle(PointerEvent::up(2, (150.0, 150.0), 150));
        t.advance_to(300);
        t.handle(PointerEvent::up(1, (50.0, 150.0), 400));
        assert_eq!(
            keys(&mut t),
            vec![
                KeyInputEvent::down(code::SHIFT),
                KeyInputEvent::down('a' as i32),
                KeyInputEvent::up('a' as i32),
                KeyInputEvent::up(code::SHIFT),
            ]
        );
    }

    #[test]
    fn space_swipe_moves_cursor() {
        let mut t = tracker();
        let p = PointerId(1);
        t.handle(PointerEvent::down(1, (500.0, 250.0), 0));
        t.handle(PointerEvent::moved(1, (540.0, 250.0), 100));
        t.handle(PointerEvent::moved(1, (620.0, 250.0), 200));
        t.handle(PointerEvent::moved(1, (720.0, 250.0), 300));
        t.handle(PointerEvent::up(1, (720.0, 250.0), 400));
        t.advance_to(1000);
        assert_eq!(
            t.take_output(),
            vec![
                Output::Key(KeyInputEvent::down(code::SPACE)),
                Output::SwipeResolved {
                    pointer: p,
                    action: SwipeAction::MoveCursorRight,
                    units: 1,
                },
                Output::SwipeResolved {
                    pointer: p,
                    action: SwipeAction::MoveCursorRight,
                    units: 1,
                },
                Output::Key(KeyInputEvent::cancel(code::SPACE)),
            ]
        );
    }

    #[test]
    fn space_swipe_with_shift_selects() {
        let mut t = tracker();
        let p = PointerId(2);
        t.handle(PointerEvent::down(1, (50.0, 150.0), 0));
        t.handle(PointerEvent::down(2, (500.0, 250.0), 10));
        t.handle(PointerEvent::moved(2, (620.0, 250.0), 110));
        t.handle(PointerEvent::moved(2, (380.0, 250.0), 210));
        let swipes: Vec<(SwipeAction, i32)> = t
            .take_output()
            .into_iter()
            .filter_map(|o| match o {
                Output::SwipeResolved {
                    pointer,
                    action,
                    units,
                } if pointer == p => Some((action, units)),
                _ => None,
            })
            .collect();
        assert_eq!(
            swipes,
            vec![
                (SwipeAction::SelectCharactersPrecisely, 1),
                (SwipeAction::SelectCharactersPrecisely, -2),
            ]
        );
    }

    #[test]
    fn space_long_press_resolves_action() {
        let mut t = tracker();
        t.handle(PointerEvent::down(1, (500.0, 250.0), 0));
        t.advance_to(300);
        t.handle(PointerEvent::up(1, (500.0, 250.0), 350));
        assert_eq!(
            t.take_output(),
            vec![
                Output::Key(KeyInputEvent::down(code::SPACE)),
                Output::LongPressResolved {
                    pointer: PointerId(1),
                    code: code::SPACE,
                    action: SwipeAction::ShowInputMethodPicker,
                },
                Output::Key(KeyInputEvent::cancel(code::SPACE)),
            ]
        );
    }

    #[test]
    fn delete_drag_selects_then_deletes() {
        let mut t = tracker();
        let p = PointerId(1);
        t.handle(PointerEvent::down(1, (950.0, 150.0), 0));
        t.handle(PointerEvent::moved(1, (840.0, 150.0), 100));
        t.handle(PointerEvent::moved(1, (730.0, 150.0), 200));
        t.handle(PointerEvent::up(1, (730.0, 150.0), 300));
        t.advance_to(1000);
        assert_eq!(
            t.take_output(),
            vec![
                Output::Key(KeyInputEvent::down(code::DELETE)),
                Output::SwipeResolved {
                    pointer: p,
                    action: SwipeAction::SelectCharactersPrecisely,
                    units: -1,
                },
                Output::SwipeResolved {
                    pointer: p,
                    action: SwipeAction::SelectCharactersPrecisely,
                    units: -1,
                },
                Output::SwipeResolved {
                    pointer: p,
                    action: SwipeAction::DeleteCharactersPrecisely,
                    units: 2,
                },
                Output::Key(KeyInputEvent::cancel(code::DELETE)),
            ]
        );
        assert_eq!(t.pending_timers(), 0);
    }

    #[test]
    fn swipe_up_on_letter_shifts() {
        let mut t = tracker_with(no_glide());
        t.handle(PointerEvent::down(1, (550.0, 150.0), 0));
        t.handle(PointerEvent::moved(1, (550.0, 100.0), 30));
        t.handle(PointerEvent::up(1, (550.0, 20.0), 60));
        let out = t.take_output();
        assert!(out.contains(&Output::SwipeResolved {
            pointer: PointerId(1),
            action: SwipeAction::ShiftKey,
            units: 1,
        }));
        assert!(!out.contains(&up('g')));
        assert_balanced(&out.iter().filter_map(Output::as_key).collect::<Vec<_>>());
    }

    #[test]
    fn queue_rejects_when_full() {
        let mut config = TouchConfig::default();
        config.queue_capacity = 2;
        let mut t = tracker_with(config);
        t.enqueue(PointerEvent::down(1, (150.0, 50.0), 0)).unwrap();
        t.enqueue(PointerEvent::up(1, (150.0, 50.0), 40)).unwrap();
        let rejected = t.enqueue(PointerEvent::down(2, (250.0, 50.0), 50));
        assert!(rejected.is_err());
        t.process_pending();
        assert_eq!(t.take_output(), vec![down('w'), up('w')]);
    }

    #[test]
    fn untracked_pointers_are_ignored() {
        let mut t = tracker();
        t.handle(PointerEvent::moved(9, (150.0, 50.0), 0));
        t.handle(PointerEvent::up(9, (150.0, 50.0), 10));
        t.handle(PointerEvent::cancel(9, (150.0, 50.0), 20));
        assert!(t.take_output().is_empty());
        // Outside every key.
        t.handle(PointerEvent::down(3, (500.0, 400.0), 30));
        t.handle(PointerEvent::up(3, (500.0, 400.0), 40));
        assert!(t.take_output().is_empty());
    }

    #[test]
    fn duplicate_down_cancels_stale_pointer() {
        let mut t = tracker_with(no_glide());
        t.handle(PointerEvent::down(1, (150.0, 50.0), 0));
        t.handle(PointerEvent::down(1, (350.0, 50.0), 10));
        assert_eq!(t.pointer_count(), 1);
        t.handle(PointerEvent::up(1, (350.0, 50.0), 20));
        assert_eq!(
            keys(&mut t),
            vec![
                KeyInputEvent::down('w' as i32),
                KeyInputEvent::cancel('w' as i32),
                KeyInputEvent::down('r' as i32),
                KeyInputEvent::up('r' as i32),
            ]
        );
    }

    #[test]
    fn full_arena_ignores_extra_pointers() {
        let mut config = TouchConfig::default();
        config.max_pointers = 1;
        let mut t = tracker_with(config);
        t.handle(PointerEvent::down(1, (50.0, 150.0), 0));
        t.handle(PointerEvent::down(2, (150.0, 150.0), 10));
        t.handle(PointerEvent::up(2, (150.0, 150.0), 20));
        assert_eq!(t.pointer_count(), 1);
        assert_eq!(keys(&mut t), vec![KeyInputEvent::down(code::SHIFT)]);
    }

    #[test]
    fn second_finger_flushes_glide_candidate() {
        let mut t = tracker();
        t.handle(PointerEvent::down(1, (150.0, 50.0), 0));
        assert!(t.take_output().is_empty());
        t.handle(PointerEvent::down(2, (350.0, 50.0), 30));
        assert_eq!(t.take_output(), vec![down('w'), down('r')]);
        assert!(
            !t.pointer(PointerId(1))
                .unwrap()
                .flags
                .contains(PointerFlags::GLIDE_CANDIDATE)
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = TouchConfig::default();
        config.queue_capacity = 0;
        let err = PointerTracker::new(keyboard(), config, ManualScheduler::new()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ZeroCapacity {
                field: "queue_capacity"
            }
        ));
    }

    #[test]
    fn relayout_cancels_live_pointers() {
        let mut t = tracker_with(no_glide());
        t.handle(PointerEvent::down(1, (150.0, 50.0), 0));
        t.layout(Size::new(500.0, 150.0), Size::ZERO, &DefaultEvaluator);
        assert_eq!(t.pointer_count(), 0);
        assert_eq!(
            keys(&mut t),
            vec![
                KeyInputEvent::down('w' as i32),
                KeyInputEvent::cancel('w' as i32),
            ]
        );
        assert_eq!(t.keyboard().size(), Size::new(500.0, 150.0));
    }

    #[test]
    fn key_events_stay_balanced_under_interleaving() {
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move |bound: u64| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed % bound
        };
        for config in [TouchConfig::default(), no_glide()] {
            let mut t = tracker_with(config);
            let mut held = [false; 4];
            let mut now = 0_u64;
            let mut events = Vec::new();
            for _ in 0..400 {
                now += next(120);
                t.advance_to(now);
                #[allow(clippy::cast_possible_truncation, reason = "bounded by 4")]
                let id = next(4) as usize;
                #[allow(clippy::cast_precision_loss, reason = "small test coordinates")]
                let pos = (next(1000) as f64, next(360) as f64 - 60.0);
                #[allow(clippy::cast_possible_truncation, reason = "bounded by 4")]
                let pid = id as u32;
                let event = if !held[id] {
                    held[id] = true;
                    PointerEvent::down(pid, pos, now)
                } else {
                    match next(6) {
                        0 => {
                            held[id] = false;
                            PointerEvent::up(pid, pos, now)
                        }
                        1 => {
                            held[id] = false;
                            PointerEvent::cancel(pid, pos, now)
                        }
                        _ => PointerEvent::moved(pid, pos, now),
                    }
                };
                t.handle(event);
                events.extend(t.take_output().iter().filter_map(Output::as_key));
            }
            t.handle(InputEvent::Pause { time_ms: now + 1 });
            events.extend(t.take_output().iter().filter_map(Output::as_key));
            assert_balanced(&events);
            assert_eq!(t.pending_timers(), 0);
            assert_eq!(t.pointer_count(), 0);
        }
    }
}
