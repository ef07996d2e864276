// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout engine: the computing pass and the flex-like geometry pass.

use kurbo::{Rect, Size};

use crate::evaluator::ComputingEvaluator;
use crate::keyboard::Keyboard;
use crate::types::{Flex, KeyFlags};

/// Geometry parameters for [`LayoutEngine`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutConfig {
    /// Inset applied to the left and right of each key's visible bounds.
    pub key_margin_h: f64,
    /// Inset applied to the top and bottom of each key's visible bounds.
    pub key_margin_v: f64,
    /// Base row height for compact modes; `0.0` disables clamping.
    pub base_row_height: f64,
    /// Maximum row height in compact modes, as a multiple of `base_row_height`.
    pub compact_row_factor: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            key_margin_h: 2.0,
            key_margin_v: 5.0,
            base_row_height: 0.0,
            compact_row_factor: 1.2,
        }
    }
}

/// Runs computing and layout passes over a [`Keyboard`].
#[derive(Clone, Debug)]
pub struct LayoutEngine {
    config: LayoutConfig,
    reference: Size,
}

impl LayoutEngine {
    /// Create an engine.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            reference: Size::ZERO,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Reference key size used by the last layout pass (after derivation and clamping).
    pub fn reference_key_size(&self) -> Size {
        self.reference
    }

    /// Recompute enablement, visibility, and slot contents for every key.
    ///
    /// The pressed flag survives the pass. Keys that end up hidden get [`Flex::HIDDEN`] so the
    /// layout pass gives them zero size.
    pub fn compute<E: ComputingEvaluator + ?Sized>(&self, keyboard: &mut Keyboard, evaluator: &E) {
        for key in keyboard.keys_mut() {
            let pressed = key.flags.contains(KeyFlags::PRESSED);
            key.slot = None;
            let is_slot = evaluator.is_slot(key);
            if is_slot {
                key.slot = evaluator.slot_data(key);
            }
            let enabled = evaluator.evaluate_enabled(key);
            let visible = evaluator.evaluate_visible(key) && (!is_slot || key.slot.is_some());

            let mut flags = KeyFlags::empty();
            flags.set(KeyFlags::ENABLED, enabled);
            flags.set(KeyFlags::VISIBLE, visible);
            flags.set(KeyFlags::SLOT, is_slot);
            flags.set(KeyFlags::PRESSED, pressed && visible);
            key.flags = flags;
            key.flex = if visible { key.data.flex } else { Flex::HIDDEN };
        }
    }

    /// Lay out every key for a viewport.
    ///
    /// A zero `reference` dimension is derived from the viewport: width / 10 and
    /// height / visible row count. Rows are stacked top to bottom from `y = 0`.
    pub fn layout(&mut self, keyboard: &mut Keyboard, viewport: Size, reference: Size) {
        let rows = keyboard.rows().to_vec();
        let width = viewport.width.max(0.0);
        let live_rows = rows
            .iter()
            .filter(|r| keyboard.keys()[(*r).clone()].iter().any(|k| !k.flex.is_hidden()))
            .count();

        if live_rows == 0 || width == 0.0 || viewport.height <= 0.0 {
            for key in keyboard.keys_mut() {
                key.touch_bounds = Rect::ZERO;
                key.visible_bounds = Rect::ZERO;
            }
            self.reference = Size::ZERO;
            keyboard.set_size(Size::new(width, 0.0));
            return;
        }

        let derived_height = viewport.height / live_rows as f64;
        let ref_width = if reference.width > 0.0 {
            reference.width
        } else {
            width / 10.0
        };
        let mut row_height = if reference.height > 0.0 {
            reference.height
        } else {
            derived_height
        };
        let mode = keyboard.mode();
        if mode.is_compact() && self.config.base_row_height > 0.0 {
            row_height = row_height.min(self.config.base_row_height * self.config.compact_row_factor);
        }
        self.reference = Size::new(ref_width, row_height);

        // Fixed-width modes share one column unit across all rows.
        let fixed_unit = mode.is_fixed_width().then(|| {
            let widest = rows
                .iter()
                .map(|r| {
                    keyboard.keys()[r.clone()]
                        .iter()
                        .map(|k| k.flex.width_factor)
                        .sum::<f64>()
                })
                .fold(0.0_f64, f64::max);
            if widest > 0.0 { width / widest } else { 0.0 }
        });

        let mut widths = Vec::new();
        let mut y = 0.0;
        for range in rows {
            let keys = &mut keyboard.keys_mut()[range];
            if keys.iter().all(|k| k.flex.is_hidden()) {
                for key in keys.iter_mut() {
                    key.touch_bounds = Rect::new(0.0, y, 0.0, y);
                    key.visible_bounds = key.touch_bounds;
                }
                continue;
            }

            widths.clear();
            let offset = match fixed_unit {
                Some(unit) => fixed_row(keys.iter().map(|k| k.flex), unit, width, &mut widths),
                None => flex_row(keys.iter().map(|k| k.flex), ref_width, width, &mut widths),
            };

            let mut x = offset;
            for (key, w) in keys.iter_mut().zip(widths.iter().copied()) {
                key.touch_bounds = Rect::new(x, y, x + w, y + row_height);
                key.visible_bounds = deflate(
                    key.touch_bounds,
                    self.config.key_margin_h,
                    self.config.key_margin_v,
                );
                x += w;
            }

            // Edge keys reach the keyboard border so touches near the bezel still land.
            if let Some(first) = keys.iter_mut().find(|k| k.touch_bounds.width() > 0.0) {
                first.touch_bounds.x0 = 0.0;
            }
            if let Some(last) = keys.iter_mut().rev().find(|k| k.touch_bounds.width() > 0.0) {
                last.touch_bounds.x1 = width;
            }
            y += row_height;
        }

        keyboard.set_size(Size::new(width, y));
        tracing::debug!(
            ?mode,
            width,
            height = y,
            ref_width,
            row_height,
            "keyboard laid out"
        );
    }
}

/// Flex distribution for one row. Returns the x offset of the first key.
fn flex_row(
    flexes: impl Iterator<Item = Flex> + Clone,
    ref_width: f64,
    row_width: f64,
    out: &mut Vec<f64>,
) -> f64 {
    let mut used = 0.0;
    let mut total_grow = 0.0;
    let mut total_shrink = 0.0;
    for f in flexes.clone() {
        used += f.width_factor * ref_width;
        total_grow += f.grow;
        total_shrink += f.shrink;
    }
    let free_space = row_width - used;

    if free_space >= 0.0 {
        if total_grow > 0.0 {
            out.extend(
                flexes.map(|f| f.width_factor * ref_width + f.grow / total_grow * free_space),
            );
            0.0
        } else {
            out.extend(flexes.map(|f| f.width_factor * ref_width));
            free_space / 2.0
        }
    } else if total_shrink > 0.0 {
        let deficit = -free_space;
        out.extend(flexes.map(|f| {
            (f.width_factor * ref_width - f.shrink / total_shrink * deficit).max(0.0)
        }));
        0.0
    } else {
        let scale = row_width / used;
        out.extend(flexes.map(|f| f.width_factor * ref_width * scale));
        0.0
    }
}

/// Fixed column layout for numeric and phone rows. Short rows are centered.
fn fixed_row(
    flexes: impl Iterator<Item = Flex>,
    unit: f64,
    row_width: f64,
    out: &mut Vec<f64>,
) -> f64 {
    out.extend(flexes.map(|f| f.width_factor * unit));
    let used: f64 = out.iter().sum();
    ((row_width - used) / 2.0).max(0.0)
}

fn deflate(r: Rect, margin_h: f64, margin_v: f64) -> Rect {
    let center = r.center();
    let (x0, x1) = if r.width() > 2.0 * margin_h {
        (r.x0 + margin_h, r.x1 - margin_h)
    } else {
        (center.x, center.x)
    };
    let (y0, y1) = if r.height() > 2.0 * margin_v {
        (r.y0 + margin_v, r.y1 - margin_v)
    } else {
        (center.y, center.y)
    };
    Rect::new(x0, y0, x1, y1)
}
