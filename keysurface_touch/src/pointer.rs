// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pointer state and the fixed-capacity arena that pools it.

use keysurface_gesture::PointerId;
use keysurface_layout::KeyId;
use kurbo::Point;

use crate::timer::PressHandle;

bitflags::bitflags! {
    /// Sticky facts about a pointer's gesture so far.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PointerFlags: u8 {
        /// A swipe `TouchMove` was classified.
        const GESTURE_MOVE    = 0b0000_0001;
        /// A long-press timer fired.
        const LONG_PRESS      = 0b0000_0010;
        /// A delete drag is selecting text.
        const MASS_SELECTION  = 0b0000_0100;
        /// The pointer may still turn into a glide.
        const GLIDE_CANDIDATE = 0b0000_1000;
    }
}

/// A key held by a pointer, with its dispatcher press.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ActivePress {
    /// Held key.
    pub key: KeyId,
    /// Dispatcher handle.
    pub handle: PressHandle,
}

/// What a pointer is doing. Exactly one mode at a time.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum PointerMode {
    /// Holding nothing.
    #[default]
    Inert,
    /// Holding a key.
    Press(ActivePress),
    /// A swipe consumed the gesture; waiting for lift-off.
    ///
    /// A held press stays live without its timer and ends with `Cancel`.
    Swipe {
        /// Key the swipe started on.
        key: KeyId,
        /// Press held when the swipe resolved.
        press: Option<ActivePress>,
    },
    /// Tracing a glide.
    Glide,
    /// Selecting from an extended popup.
    Popup(ActivePress),
    /// A long press resolved the gesture; the press ends with `Cancel` at lift-off.
    Consumed(ActivePress),
}

/// One tracked finger.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pointer {
    /// Platform id.
    pub id: PointerId,
    /// Slot in the last multi-touch event.
    pub index: usize,
    /// Key under first contact. Never reassigned.
    pub initial_key: Option<KeyId>,
    /// Current mode.
    pub mode: PointerMode,
    /// Sticky flags.
    pub flags: PointerFlags,
    /// Contact position.
    pub down_position: Point,
    /// Signed unit count selected by a delete drag.
    pub selection: i32,
    live: bool,
}

impl Pointer {
    const IDLE: Self = Self {
        id: PointerId(0),
        index: 0,
        initial_key: None,
        mode: PointerMode::Inert,
        flags: PointerFlags::empty(),
        down_position: Point::ZERO,
        selection: 0,
        live: false,
    };

    /// Key currently held, if any.
    pub fn active_key(&self) -> Option<KeyId> {
        self.active_press().map(|p| p.key)
    }

    /// Press currently held, if any, including one kept alive by a swipe or long press.
    pub fn active_press(&self) -> Option<ActivePress> {
        match self.mode {
            PointerMode::Press(p)
            | PointerMode::Popup(p)
            | PointerMode::Consumed(p)
            | PointerMode::Swipe { press: Some(p), .. } => Some(p),
            _ => None,
        }
    }
}

/// Fixed-capacity pool of [`Pointer`]s keyed by platform id.
///
/// Slots are reset in place on acquire and release, so a gesture never allocates.
#[derive(Clone, Debug)]
pub struct PointerArena {
    slots: Vec<Pointer>,
}

impl PointerArena {
    /// Create an arena with room for `capacity` pointers.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Pointer::IDLE; capacity],
        }
    }

    /// Claim a slot for `id`. Returns `None` when every slot is taken.
    ///
    /// Callers must release any existing pointer with the same id first.
    pub fn acquire(&mut self, id: PointerId, index: usize, position: Point) -> Option<&mut Pointer> {
        let slot = self.slots.iter_mut().find(|p| !p.live)?;
        *slot = Pointer {
            id,
            index,
            down_position: position,
            live: true,
            ..Pointer::IDLE
        };
        Some(slot)
    }

    /// Live pointer with `id`.
    pub fn get(&self, id: PointerId) -> Option<&Pointer> {
        self.slots.iter().find(|p| p.live && p.id == id)
    }

    /// Live pointer with `id`, mutably.
    pub fn get_mut(&mut self, id: PointerId) -> Option<&mut Pointer> {
        self.slots.iter_mut().find(|p| p.live && p.id == id)
    }

    /// Free the slot for `id`, returning its last state.
    pub fn release(&mut self, id: PointerId) -> Option<Pointer> {
        let slot = self.get_mut(id)?;
        let last = *slot;
        *slot = Pointer::IDLE;
        Some(last)
    }

    /// Ids of live pointers, in slot order.
    pub fn ids(&self) -> Vec<PointerId> {
        self.iter().map(|p| p.id).collect()
    }

    /// Live pointers, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Pointer> {
        self.slots.iter().filter(|p| p.live)
    }

    /// Number of live pointers.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether no pointer is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of live pointers.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Free every slot.
    pub fn reset(&mut self) {
        self.slots.fill(Pointer::IDLE);
    }
}
