// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input events consumed by the tracker and outputs it produces.

use keysurface_gesture::{GlidePoint, PointerId};
use kurbo::Point;

use crate::action::SwipeAction;
use crate::timer::TimerId;

/// Phase of a raw pointer event.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerEventKind {
    /// First contact.
    Down,
    /// Motion while in contact.
    Move,
    /// Lift-off.
    Up,
    /// The platform withdrew the pointer.
    Cancel,
}

/// One raw pointer sample.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerEvent {
    /// Platform pointer id.
    pub id: PointerId,
    /// Slot of this pointer within the platform's multi-touch event.
    pub index: usize,
    /// Phase.
    pub kind: PointerEventKind,
    /// Position in keyboard coordinates.
    pub position: Point,
    /// Event time in milliseconds.
    pub time_ms: u64,
}

impl PointerEvent {
    /// Create an event with `index` 0.
    pub fn new(id: u32, kind: PointerEventKind, position: impl Into<Point>, time_ms: u64) -> Self {
        Self {
            id: PointerId(id),
            index: 0,
            kind,
            position: position.into(),
            time_ms,
        }
    }

    /// Shorthand for a `Down`.
    pub fn down(id: u32, position: impl Into<Point>, time_ms: u64) -> Self {
        Self::new(id, PointerEventKind::Down, position, time_ms)
    }

    /// Shorthand for a `Move`.
    pub fn moved(id: u32, position: impl Into<Point>, time_ms: u64) -> Self {
        Self::new(id, PointerEventKind::Move, position, time_ms)
    }

    /// Shorthand for an `Up`.
    pub fn up(id: u32, position: impl Into<Point>, time_ms: u64) -> Self {
        Self::new(id, PointerEventKind::Up, position, time_ms)
    }

    /// Shorthand for a `Cancel`.
    pub fn cancel(id: u32, position: impl Into<Point>, time_ms: u64) -> Self {
        Self::new(id, PointerEventKind::Cancel, position, time_ms)
    }

    /// Set the multi-touch slot.
    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }
}

/// Everything the tracker's event loop consumes.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputEvent {
    /// A raw pointer sample.
    Pointer(PointerEvent),
    /// A scheduled deadline has passed.
    Timer {
        /// Timer that fired.
        timer: TimerId,
        /// Time of delivery.
        time_ms: u64,
    },
    /// The host suspended the keyboard.
    Pause {
        /// Time of suspension.
        time_ms: u64,
    },
}

impl From<PointerEvent> for InputEvent {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}

/// Phase of a dispatched key event.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyEventKind {
    /// Key went down.
    Down,
    /// Key was released and should take effect.
    Up,
    /// Key was released without effect.
    Cancel,
}

/// A key event for the editing consumer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyInputEvent {
    /// Phase.
    pub kind: KeyEventKind,
    /// Key code.
    pub code: i32,
}

impl KeyInputEvent {
    /// A `Down` for `code`.
    pub const fn down(code: i32) -> Self {
        Self {
            kind: KeyEventKind::Down,
            code,
        }
    }

    /// An `Up` for `code`.
    pub const fn up(code: i32) -> Self {
        Self {
            kind: KeyEventKind::Up,
            code,
        }
    }

    /// A `Cancel` for `code`.
    pub const fn cancel(code: i32) -> Self {
        Self {
            kind: KeyEventKind::Cancel,
            code,
        }
    }
}

/// Something the tracker decided, in emission order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Output {
    /// Key event for the editor.
    Key(KeyInputEvent),
    /// A swipe resolved to an action.
    SwipeResolved {
        /// Pointer that swiped.
        pointer: PointerId,
        /// Bound action.
        action: SwipeAction,
        /// Unit count; signed for selections, magnitude otherwise.
        units: i32,
    },
    /// A long press resolved to a bound action.
    LongPressResolved {
        /// Pointer that held the key.
        pointer: PointerId,
        /// Code of the held key.
        code: i32,
        /// Bound action.
        action: SwipeAction,
    },
    /// A glide ended; the points go to the word matcher.
    GlideTrajectoryFinalized {
        /// Pointer that glided.
        pointer: PointerId,
        /// Samples in arrival order.
        points: Vec<GlidePoint>,
        /// `false` when the glide was cancelled.
        completed: bool,
    },
}

impl Output {
    /// The key event, if this is one.
    pub fn as_key(&self) -> Option<KeyInputEvent> {
        match self {
            Self::Key(ev) => Some(*ev),
            _ => None,
        }
    }
}
