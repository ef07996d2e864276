// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keysurface Touch: the multi-pointer touch engine of an on-screen keyboard.
//!
//! ## Overview
//!
//! [`PointerTracker`] turns raw pointer samples into a balanced stream of key events and
//! resolved gestures:
//!
//! - Hit testing against a laid-out [`Keyboard`](keysurface_layout::Keyboard).
//! - Long presses: auto-repeat, shift to caps lock, the alternates popup, or a bound action.
//! - Swipes on space and delete (cursor movement, precise selection) and on ordinary keys.
//! - Glide typing: a single finger tracing across letters yields one trajectory and no keys.
//! - Key sliding with hysteresis, so a finger drifting slightly off a key keeps it.
//!
//! Every `Down` the tracker emits is followed by exactly one `Up` or `Cancel`, including when
//! the host pauses the keyboard mid-gesture.
//!
//! Time never advances on its own. Long-press and repeat deadlines go through a
//! [`Scheduler`], which posts [`InputEvent::Timer`] back. [`ManualScheduler`] is a virtual
//! clock for tests and replays.
//!
//! ## Example
//!
//! ```
//! use keysurface_layout::{DefaultEvaluator, KeyData, Keyboard, KeyboardMode, code};
//! use keysurface_touch::{
//!     KeyInputEvent, ManualScheduler, Output, PointerEvent, PointerTracker, TouchConfig,
//! };
//! use kurbo::Size;
//!
//! let keyboard = Keyboard::new(
//!     KeyboardMode::Characters,
//!     [
//!         vec![KeyData::character('q'), KeyData::character('w'), KeyData::character('e')],
//!         vec![KeyData::functional(code::DELETE).grow(1.0)],
//!     ],
//! );
//! let mut tracker =
//!     PointerTracker::new(keyboard, TouchConfig::default(), ManualScheduler::new()).unwrap();
//! tracker.layout(Size::new(300.0, 200.0), Size::new(100.0, 100.0), &DefaultEvaluator);
//!
//! // Tap 'w'.
//! tracker.handle(PointerEvent::down(0, (150.0, 50.0), 0));
//! tracker.handle(PointerEvent::up(0, (150.0, 50.0), 60));
//!
//! // Hold delete past the long-press delay and one repeat interval.
//! tracker.handle(PointerEvent::down(1, (150.0, 150.0), 100));
//! tracker.advance_to(450);
//! tracker.handle(PointerEvent::up(1, (150.0, 150.0), 460));
//!
//! let keys: Vec<KeyInputEvent> = tracker.take_output().iter().filter_map(Output::as_key).collect();
//! assert_eq!(keys[..2], [KeyInputEvent::down('w' as i32), KeyInputEvent::up('w' as i32)]);
//! assert_eq!(keys.last(), Some(&KeyInputEvent::cancel(code::DELETE)));
//! ```

mod action;
mod config;
mod dispatcher;
mod error;
mod event;
mod pointer;
mod popup;
mod queue;
mod timer;
mod tracker;

pub use action::{SwipeAction, SwipeBindings};
pub use config::{Hysteresis, PopupConfig, TouchConfig};
pub use dispatcher::{InputDispatcher, LongPress, TimerFired};
pub use error::{ConfigError, QueueFull};
pub use event::{InputEvent, KeyEventKind, KeyInputEvent, Output, PointerEvent, PointerEventKind};
pub use pointer::{ActivePress, Pointer, PointerArena, PointerFlags, PointerMode};
pub use popup::{ExtendedPopup, PopupCell, PopupController, PopupMove, PopupState};
pub use queue::EventQueue;
pub use timer::{ManualScheduler, PressHandle, Scheduler, TimerId};
pub use tracker::PointerTracker;

pub use keysurface_gesture::PointerId;
