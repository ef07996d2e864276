// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared gesture types.

use kurbo::{Point, Vec2};

/// Platform pointer id, stable for the lifetime of one touch.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerId(pub u32);

/// Compass direction of a swipe.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwipeDirection {
    /// Towards smaller y.
    Up,
    /// Towards larger y.
    Down,
    /// Towards smaller x.
    Left,
    /// Towards larger x.
    Right,
    /// No displacement.
    None,
}

impl SwipeDirection {
    /// Dominant axis of `delta`, with ties going to the horizontal axis.
    ///
    /// Screen coordinates: y grows downward.
    pub fn from_delta(delta: Vec2) -> Self {
        if delta.x == 0.0 && delta.y == 0.0 {
            return Self::None;
        }
        if delta.x.abs() >= delta.y.abs() {
            if delta.x < 0.0 { Self::Left } else { Self::Right }
        } else if delta.y < 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }

    /// Left or right.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Up or down.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// Phase of a classified swipe sample.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GestureKind {
    /// A motion sample that crossed a threshold.
    TouchMove,
    /// The terminal sample of a swipe.
    TouchUp,
}

/// A classified swipe sample.
///
/// Unit counts are quantized to the reference key size and rounded toward zero.
/// `abs_*` is measured from the gesture start, `rel_*` is the change in `abs_*` since the
/// previous emitted event for the same pointer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GestureEvent {
    /// Pointer that produced the sample.
    pub pointer: PointerId,
    /// Move or terminal up.
    pub kind: GestureKind,
    /// Dominant direction since gesture start.
    pub direction: SwipeDirection,
    /// Horizontal units since the previous event.
    pub rel_units_x: i32,
    /// Vertical units since the previous event.
    pub rel_units_y: i32,
    /// Horizontal units since gesture start.
    pub abs_units_x: i32,
    /// Vertical units since gesture start.
    pub abs_units_y: i32,
}

/// A timestamped trajectory sample.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlidePoint {
    /// Position in keyboard coordinates.
    pub position: Point,
    /// Sample time in milliseconds.
    pub time_ms: u64,
}
