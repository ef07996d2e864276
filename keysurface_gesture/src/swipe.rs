// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swipe classifier: turns per-pointer motion samples into [`GestureEvent`]s.
//!
//! ## Thresholds
//!
//! A move sample is classified when either condition holds:
//! - the distance from the last classified sample exceeds [`SwipeThresholds::distance`], or
//! - the instantaneous velocity (distance from the previous raw sample over the elapsed
//!   time, with a 1 ms floor) exceeds [`SwipeThresholds::velocity`].
//!
//! The first catches slow deliberate drags, the second catches short flicks.

use kurbo::{Point, Size, Vec2};

use crate::types::{GestureEvent, GestureKind, PointerId, SwipeDirection};

/// Classification thresholds.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwipeThresholds {
    /// Minimum travel in pixels since the last classified sample.
    pub distance: f64,
    /// Minimum velocity in pixels per millisecond.
    pub velocity: f64,
}

impl Default for SwipeThresholds {
    fn default() -> Self {
        Self {
            distance: 32.0,
            velocity: 1.9,
        }
    }
}

#[derive(Clone, Debug)]
struct Track {
    pointer: PointerId,
    start: Point,
    anchor: Point,
    prev: Point,
    prev_time: u64,
    abs_x: i32,
    abs_y: i32,
    moved: bool,
}

/// Per-pointer swipe classifier.
#[derive(Clone, Debug)]
pub struct SwipeDetector {
    thresholds: SwipeThresholds,
    unit: Size,
    tracks: Vec<Track>,
}

impl SwipeDetector {
    /// Create a detector. `unit` is the reference key size used for unit counts.
    pub fn new(thresholds: SwipeThresholds, unit: Size) -> Self {
        Self {
            thresholds,
            unit,
            tracks: Vec::new(),
        }
    }

    /// Thresholds in use.
    pub fn thresholds(&self) -> SwipeThresholds {
        self.thresholds
    }

    /// Update the quantization unit after a layout pass.
    pub fn set_unit_size(&mut self, unit: Size) {
        self.unit = unit;
    }

    /// Whether `pointer` has an open track.
    pub fn is_tracking(&self, pointer: PointerId) -> bool {
        self.tracks.iter().any(|t| t.pointer == pointer)
    }

    /// Whether `pointer` has produced at least one `TouchMove`.
    pub fn has_moved(&self, pointer: PointerId) -> bool {
        self.tracks.iter().any(|t| t.pointer == pointer && t.moved)
    }

    /// Start tracking `pointer`. An existing track for the same id is replaced.
    pub fn on_down(&mut self, pointer: PointerId, pos: Point, time_ms: u64) {
        self.tracks.retain(|t| t.pointer != pointer);
        self.tracks.push(Track {
            pointer,
            start: pos,
            anchor: pos,
            prev: pos,
            prev_time: time_ms,
            abs_x: 0,
            abs_y: 0,
            moved: false,
        });
    }

    /// Feed a motion sample. Returns a `TouchMove` event when a threshold is crossed.
    pub fn on_move(&mut self, pointer: PointerId, pos: Point, time_ms: u64) -> Option<GestureEvent> {
        let thresholds = self.thresholds;
        let unit = self.unit;
        let track = self.tracks.iter_mut().find(|t| t.pointer == pointer)?;

        let travelled = (pos - track.anchor).hypot();
        let step = (pos - track.prev).hypot();
        let dt = time_ms.saturating_sub(track.prev_time).max(1);
        #[allow(
            clippy::cast_precision_loss,
            reason = "millisecond deltas are far below 2^52"
        )]
        let velocity = step / dt as f64;
        track.prev = pos;
        track.prev_time = time_ms;

        if travelled <= thresholds.distance && velocity <= thresholds.velocity {
            return None;
        }
        track.anchor = pos;
        track.moved = true;
        let event = classify(track, pos, unit, GestureKind::TouchMove);
        tracing::trace!(?event, travelled, velocity, "swipe sample");
        Some(event)
    }

    /// End tracking. Returns a `TouchUp` event, or `None` when no `TouchMove` was ever
    /// classified for this pointer (a plain tap).
    pub fn on_up(&mut self, pointer: PointerId, pos: Point, _time_ms: u64) -> Option<GestureEvent> {
        let idx = self.tracks.iter().position(|t| t.pointer == pointer)?;
        let mut track = self.tracks.swap_remove(idx);
        if !track.moved {
            return None;
        }
        let event = classify(&mut track, pos, self.unit, GestureKind::TouchUp);
        tracing::trace!(?event, "swipe end");
        Some(event)
    }

    /// Drop the track for `pointer` without emitting anything.
    pub fn on_cancel(&mut self, pointer: PointerId) {
        self.tracks.retain(|t| t.pointer != pointer);
    }

    /// Drop every track.
    pub fn clear(&mut self) {
        self.tracks.clear();
    }
}

fn classify(track: &mut Track, pos: Point, unit: Size, kind: GestureKind) -> GestureEvent {
    let delta: Vec2 = pos - track.start;
    let abs_x = units(delta.x, unit.width);
    let abs_y = units(delta.y, unit.height);
    let event = GestureEvent {
        pointer: track.pointer,
        kind,
        direction: SwipeDirection::from_delta(delta),
        rel_units_x: abs_x - track.abs_x,
        rel_units_y: abs_y - track.abs_y,
        abs_units_x: abs_x,
        abs_units_y: abs_y,
    };
    track.abs_x = abs_x;
    track.abs_y = abs_y;
    event
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "unit counts are bounded by screen size over key size"
)]
fn units(delta: f64, unit: f64) -> i32 {
    if unit > 0.0 {
        (delta / unit).trunc() as i32
    } else {
        0
    }
}
