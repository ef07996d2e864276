// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keysurface Gesture: swipe classification and glide trajectories.
//!
//! ## Overview
//!
//! Two independent detectors consume raw per-pointer motion:
//!
//! - [`SwipeDetector`]: classifies motion into directional [`GestureEvent`]s with quantized
//!   unit counts. A pointer that never crosses a threshold resolves as a plain tap.
//! - [`GlideTypingDetector`]: records one finger's trajectory and reports when it has moved
//!   far enough from its initial key to count as glide typing.
//!
//! [`GlideTrail`] is a fading snapshot of the last glide, meant for rendering only.
//!
//! Neither detector knows about keys or dispatch. Deciding which one sees a pointer is the
//! caller's job; `keysurface_touch` does that for a full keyboard.
//!
//! ## Example
//!
//! ```
//! use keysurface_gesture::{GestureKind, PointerId, SwipeDetector, SwipeDirection, SwipeThresholds};
//! use kurbo::{Point, Size};
//!
//! let mut swipe = SwipeDetector::new(SwipeThresholds::default(), Size::new(40.0, 60.0));
//! let p = PointerId(0);
//! swipe.on_down(p, Point::new(200.0, 30.0), 0);
//! let ev = swipe.on_move(p, Point::new(110.0, 35.0), 120).unwrap();
//! assert_eq!(ev.kind, GestureKind::TouchMove);
//! assert_eq!(ev.direction, SwipeDirection::Left);
//! assert_eq!(ev.abs_units_x, -2);
//! ```

mod glide;
mod swipe;
mod trail;
mod types;

pub use glide::{GlideConfig, GlideTrajectory, GlideTypingDetector};
pub use swipe::{SwipeDetector, SwipeThresholds};
pub use trail::{GlideTrail, TrailStyle};
pub use types::{GestureEvent, GestureKind, GlidePoint, PointerId, SwipeDirection};
