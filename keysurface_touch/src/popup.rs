// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popup controller: the key preview and the extended alternates grid.
//!
//! ## States
//!
//! `Closed → BasicShown → ExtendedShown → Closed`
//!
//! - `BasicShown` previews the pressed key and never changes what gets dispatched.
//! - `ExtendedShown` takes over hit testing for its owner pointer until lift-off or until
//!   the pointer leaves the popup region.
//!
//! ## Grid
//!
//! Cells share the anchor key's visible size. Row 0 sits directly above the key, further
//! rows stack upward. Inside a row, cells fill center, right, left, right+1, left+1, and so
//! on. The key's own code is always the first (center) cell.

use core::ops::Range;

use keysurface_gesture::PointerId;
use keysurface_layout::{Key, KeyId, code};
use kurbo::{Point, Rect};

use crate::config::{Hysteresis, PopupConfig};

/// One alternate in the extended grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PopupCell {
    /// Code dispatched when this cell is chosen.
    pub code: i32,
    /// Cell rectangle in keyboard coordinates.
    pub bounds: Rect,
}

/// An open extended popup.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtendedPopup {
    /// Pointer that owns the popup.
    pub owner: PointerId,
    /// Anchor key.
    pub key: KeyId,
    /// Anchor key's visible bounds.
    pub anchor: Rect,
    /// Cells; index 0 is the key's own code.
    pub cells: Vec<PopupCell>,
    /// Cell index ranges per row, nearest row first.
    pub rows: Vec<Range<usize>>,
    /// Index of the highlighted cell.
    pub highlighted: usize,
    /// Region inside which motion stays in the popup.
    pub hit_region: Rect,
}

impl ExtendedPopup {
    /// Code of the highlighted cell.
    pub fn highlighted_code(&self) -> i32 {
        self.cells[self.highlighted].code
    }

    /// Bounds covering every cell.
    pub fn grid_bounds(&self) -> Rect {
        self.cells
            .iter()
            .map(|c| c.bounds)
            .reduce(|a, b| a.union(b))
            .unwrap_or(self.anchor)
    }
}

/// Popup state.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PopupState {
    /// Nothing shown.
    #[default]
    Closed,
    /// Preview of a pressed key.
    BasicShown {
        /// Pointer pressing the key.
        owner: PointerId,
        /// Previewed key.
        key: KeyId,
    },
    /// Alternates grid.
    ExtendedShown(ExtendedPopup),
}

/// Result of routing motion into an extended popup.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PopupMove {
    /// The pointer is over the popup; this code is highlighted.
    Highlight(i32),
    /// The pointer left the popup region; the popup closed.
    Left,
}

/// Drives [`PopupState`].
#[derive(Clone, Debug)]
pub struct PopupController {
    config: PopupConfig,
    hysteresis: Hysteresis,
    state: PopupState,
}

impl PopupController {
    /// Create a closed controller. A grid always has at least one column.
    pub fn new(mut config: PopupConfig, hysteresis: Hysteresis) -> Self {
        config.columns = config.columns.max(1);
        Self {
            config,
            hysteresis,
            state: PopupState::Closed,
        }
    }

    /// Current state.
    pub fn state(&self) -> &PopupState {
        &self.state
    }

    /// Codes the extended grid for `key` would hold, own code first, without duplicates.
    pub fn grid_codes(key: &Key) -> Vec<i32> {
        let popups = key.popups();
        let mut codes = vec![key.code()];
        let extra = popups
            .number_hint
            .into_iter()
            .chain(popups.symbol_hint)
            .chain(popups.alternates.iter().copied());
        for c in extra {
            if !codes.contains(&c) {
                codes.push(c);
            }
        }
        codes
    }

    /// Whether a long press on `key` would open an extended popup.
    pub fn has_extended(key: &Key) -> bool {
        Self::grid_codes(key).len() > 1
    }

    /// Show the preview for a pressed key. Returns `false` when the key is not previewable.
    pub fn show_basic(&mut self, owner: PointerId, key: &Key) -> bool {
        if !self.config.preview || key.code() <= code::VISIBLE_CHAR_THRESHOLD {
            return false;
        }
        if matches!(self.state, PopupState::ExtendedShown(_)) {
            return false;
        }
        self.state = PopupState::BasicShown { owner, key: key.id };
        tracing::trace!(?owner, code = key.code(), "preview shown");
        true
    }

    /// Open the alternates grid for `key`, clamped to `keyboard_width`.
    ///
    /// Returns `false` (and leaves the state alone) when the key has no alternates or another
    /// pointer already has an extended popup open.
    pub fn show_extended(&mut self, owner: PointerId, key: &Key, keyboard_width: f64) -> bool {
        if matches!(&self.state, PopupState::ExtendedShown(p) if p.owner != owner) {
            return false;
        }
        let codes = Self::grid_codes(key);
        let anchor = key.visible_bounds;
        let (w, h) = (anchor.width(), anchor.height());
        if codes.len() < 2 || w <= 0.0 || h <= 0.0 {
            return false;
        }

        let mut cells = Vec::with_capacity(codes.len());
        let mut rows = Vec::new();
        for (r, chunk) in codes.chunks(self.config.columns).enumerate() {
            let start = cells.len();
            #[allow(
                clippy::cast_precision_loss,
                reason = "popup rows and columns are tiny"
            )]
            let y1 = anchor.y0 - r as f64 * h;
            for (k, &code) in chunk.iter().enumerate() {
                let x0 = anchor.x0 + column_offset(k) * w;
                cells.push(PopupCell {
                    code,
                    bounds: Rect::new(x0, y1 - h, x0 + w, y1),
                });
            }
            rows.push(start..cells.len());
        }

        let (min_x, max_x) = cells.iter().fold((f64::MAX, f64::MIN), |(lo, hi), c| {
            (lo.min(c.bounds.x0), hi.max(c.bounds.x1))
        });
        let shift = if min_x < 0.0 {
            -min_x
        } else if max_x > keyboard_width {
            (keyboard_width - max_x).max(-min_x)
        } else {
            0.0
        };
        for cell in &mut cells {
            cell.bounds = cell.bounds + kurbo::Vec2::new(shift, 0.0);
        }

        let grid = cells
            .iter()
            .map(|c| c.bounds)
            .fold(anchor, |acc, b| acc.union(b));
        let hit_region = grid.inflate(self.hysteresis.horizontal * w, self.hysteresis.vertical * h);

        tracing::debug!(?owner, code = key.code(), cells = cells.len(), "extended popup shown");
        self.state = PopupState::ExtendedShown(ExtendedPopup {
            owner,
            key: key.id,
            anchor,
            cells,
            rows,
            highlighted: 0,
            hit_region,
        });
        true
    }

    /// Whether `owner` has the extended popup open.
    pub fn is_extended_for(&self, owner: PointerId) -> bool {
        matches!(&self.state, PopupState::ExtendedShown(p) if p.owner == owner)
    }

    /// Route motion into the extended popup. `None` when `owner` has no extended popup.
    pub fn on_move(&mut self, owner: PointerId, pos: Point) -> Option<PopupMove> {
        let PopupState::ExtendedShown(popup) = &mut self.state else {
            return None;
        };
        if popup.owner != owner {
            return None;
        }
        if !popup.hit_region.contains(pos) {
            tracing::debug!(?owner, "pointer left extended popup");
            self.state = PopupState::Closed;
            return Some(PopupMove::Left);
        }
        if popup.anchor.contains(pos) {
            popup.highlighted = 0;
            return Some(PopupMove::Highlight(popup.highlighted_code()));
        }

        let h = popup.anchor.height();
        #[allow(
            clippy::cast_possible_truncation,
            reason = "row index is bounded by the row count"
        )]
        let row = ((popup.anchor.y0 - pos.y) / h).floor().max(0.0) as usize;
        let row = row.min(popup.rows.len() - 1);
        let range = popup.rows[row].clone();
        let nearest = range.min_by(|&a, &b| {
            let da = (popup.cells[a].bounds.center().x - pos.x).abs();
            let db = (popup.cells[b].bounds.center().x - pos.x).abs();
            da.total_cmp(&db)
        });
        if let Some(idx) = nearest {
            popup.highlighted = idx;
        }
        Some(PopupMove::Highlight(popup.highlighted_code()))
    }

    /// Close the extended popup of `owner` and return the chosen code.
    pub fn resolve(&mut self, owner: PointerId) -> Option<i32> {
        if !self.is_extended_for(owner) {
            return None;
        }
        let PopupState::ExtendedShown(popup) = core::mem::take(&mut self.state) else {
            return None;
        };
        let code = popup.highlighted_code();
        tracing::debug!(?owner, code, "extended popup resolved");
        Some(code)
    }

    /// Close whatever `owner` has open.
    pub fn hide(&mut self, owner: PointerId) {
        let owned = match &self.state {
            PopupState::Closed => false,
            PopupState::BasicShown { owner: o, .. } => *o == owner,
            PopupState::ExtendedShown(p) => p.owner == owner,
        };
        if owned {
            self.state = PopupState::Closed;
        }
    }

    /// Close unconditionally.
    pub fn close(&mut self) {
        self.state = PopupState::Closed;
    }
}

/// Horizontal offset, in cells, of the `k`-th item in a row: 0, +1, -1, +2, -2, ...
#[allow(clippy::cast_precision_loss, reason = "popup columns are tiny")]
fn column_offset(k: usize) -> f64 {
    if k == 0 {
        0.0
    } else if k % 2 == 1 {
        k.div_ceil(2) as f64
    } else {
        -((k / 2) as f64)
    }
}
