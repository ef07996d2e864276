// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard: keys in definition order, grouped into rows, with hit testing.

use core::ops::Range;

use kurbo::{Point, Size};

use crate::key::{Key, KeyData};
use crate::types::{KeyFlags, KeyId, KeyboardMode};

/// Filters applied during hit testing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HitFilter {
    /// Skip keys without [`KeyFlags::ENABLED`].
    pub enabled_only: bool,
}

/// A keyboard definition plus its laid-out keys.
#[derive(Clone, Debug)]
pub struct Keyboard {
    mode: KeyboardMode,
    keys: Vec<Key>,
    rows: Vec<Range<usize>>,
    size: Size,
}

impl Keyboard {
    /// Build a keyboard from rows of key definitions.
    ///
    /// Keys get ids in row-major definition order. Bounds stay zero until
    /// [`LayoutEngine::layout`](crate::LayoutEngine::layout) runs.
    pub fn new<R, I>(mode: KeyboardMode, rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = KeyData>,
    {
        let mut keys = Vec::new();
        let mut ranges = Vec::new();
        for row in rows {
            let start = keys.len();
            for data in row {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "keyboards never hold more than u32::MAX keys"
                )]
                let id = KeyId::new(keys.len() as u32);
                keys.push(Key::new(id, data));
            }
            ranges.push(start..keys.len());
        }
        Self {
            mode,
            keys,
            rows: ranges,
            size: Size::ZERO,
        }
    }

    /// Layout mode.
    pub fn mode(&self) -> KeyboardMode {
        self.mode
    }

    /// Index ranges into [`keys`](Self::keys), one per row, top to bottom.
    pub fn rows(&self) -> &[Range<usize>] {
        &self.rows
    }

    /// All keys in definition order.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub(crate) fn keys_mut(&mut self) -> &mut [Key] {
        &mut self.keys
    }

    /// Look up a key.
    pub fn key(&self, id: KeyId) -> Option<&Key> {
        self.keys.get(id.index())
    }

    /// First visible key with the given code.
    pub fn key_by_code(&self, code: i32) -> Option<&Key> {
        self.keys
            .iter()
            .find(|k| k.is_visible() && k.code() == code)
    }

    /// Size from the last layout pass; zero before any layout.
    pub fn size(&self) -> Size {
        self.size
    }

    pub(crate) fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Set or clear the pressed flag on a key. Unknown ids are ignored.
    pub fn set_pressed(&mut self, id: KeyId, pressed: bool) {
        if let Some(key) = self.keys.get_mut(id.index()) {
            key.flags.set(KeyFlags::PRESSED, pressed);
        }
    }

    /// Hit test a point against touch bounds.
    ///
    /// Returns the first matching key in definition order. Hidden and zero-size keys never
    /// match. Containment is half-open, so a point on the shared edge of two abutting keys
    /// belongs to the right/lower one only.
    pub fn hit_test(&self, pt: Point, filter: HitFilter) -> Option<KeyId> {
        self.keys
            .iter()
            .filter(|k| k.is_hittable())
            .filter(|k| !filter.enabled_only || k.is_enabled())
            .find(|k| k.touch_bounds.contains(pt))
            .map(|k| k.id)
    }

    /// Hit test against enabled keys only.
    pub fn key_at(&self, pt: Point) -> Option<KeyId> {
        self.hit_test(pt, HitFilter { enabled_only: true })
    }
}
