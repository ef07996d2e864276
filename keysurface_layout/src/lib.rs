// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keysurface Layout: key geometry for on-screen keyboards.
//!
//! ## Overview
//!
//! This crate turns a keyboard definition (rows of [`KeyData`]) into laid-out [`Key`]s with
//! touch and visible bounds, and answers "which key is under this point?".
//!
//! - [`Keyboard`]: owns all keys in definition order, grouped into rows.
//! - [`ComputingEvaluator`]: external policy deciding enablement, visibility and slot contents.
//! - [`LayoutEngine`]: runs the computing pass and the flex-like layout pass.
//! - [`Keyboard::hit_test`]: half-open point queries against touch bounds.
//!
//! It does not draw keys, resolve themes, or decide which keys are visible; those decisions
//! are fed in through [`ComputingEvaluator`].
//!
//! ## Flex distribution
//!
//! Each key claims `width_factor × reference width` as its base size.
//! Positive slack in a row is handed out in proportion to `grow`, negative slack is taken back
//! in proportion to `shrink`. Rows without any `grow` are centered.
//! Numeric and phone modes skip the distribution and use fixed width factors instead.
//!
//! `visible_bounds` is the touch rectangle deflated by the configured margins, so neighbouring
//! keys never overlap visually while their touch regions abut.
//!
//! ## Minimal usage
//!
//! ```
//! use keysurface_layout::{
//!     DefaultEvaluator, KeyData, Keyboard, KeyboardMode, LayoutConfig, LayoutEngine, code,
//! };
//! use kurbo::{Point, Size};
//!
//! let mut keyboard = Keyboard::new(
//!     KeyboardMode::Characters,
//!     [
//!         vec![KeyData::character('q'), KeyData::character('w'), KeyData::character('e')],
//!         vec![KeyData::functional(code::SPACE).grow(1.0)],
//!     ],
//! );
//!
//! let mut engine = LayoutEngine::new(LayoutConfig::default());
//! engine.compute(&mut keyboard, &DefaultEvaluator);
//! engine.layout(&mut keyboard, Size::new(300.0, 200.0), Size::new(100.0, 100.0));
//!
//! let hit = keyboard.key_at(Point::new(150.0, 50.0)).unwrap();
//! assert_eq!(keyboard.key(hit).unwrap().code(), 'w' as i32);
//! ```

pub mod code;
mod engine;
mod evaluator;
mod key;
mod keyboard;
mod types;

pub use engine::{LayoutConfig, LayoutEngine};
pub use evaluator::{ComputingEvaluator, DefaultEvaluator};
pub use key::{Key, KeyData, PopupSet};
pub use keyboard::{HitFilter, Keyboard};
pub use types::{Flex, KeyFlags, KeyId, KeyType, KeyboardMode};
