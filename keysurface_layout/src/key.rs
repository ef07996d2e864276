// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key definitions and laid-out keys.

use kurbo::Rect;

use crate::code;
use crate::types::{Flex, KeyFlags, KeyId, KeyType};

/// Alternates and hints shown in a key's extended popup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopupSet {
    /// Alternate codes, in display order.
    pub alternates: Vec<i32>,
    /// Symbol printed in the key corner, if any.
    pub symbol_hint: Option<i32>,
    /// Digit printed in the key corner, if any.
    pub number_hint: Option<i32>,
}

impl PopupSet {
    /// Whether there is anything to show beyond the key itself.
    pub fn is_empty(&self) -> bool {
        self.alternates.is_empty() && self.symbol_hint.is_none() && self.number_hint.is_none()
    }
}

/// Definition of a key, as supplied by the layout source.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyData {
    /// Logical code; negative for functional keys.
    pub code: i32,
    /// Classification.
    pub kind: KeyType,
    /// Layout weights.
    pub flex: Flex,
    /// Popup contents.
    pub popups: PopupSet,
}

impl KeyData {
    /// Create a key with explicit code and kind and default flex.
    pub fn new(code: i32, kind: KeyType) -> Self {
        Self {
            code,
            kind,
            flex: Flex::default(),
            popups: PopupSet::default(),
        }
    }

    /// A printable character key.
    pub fn character(c: char) -> Self {
        Self::new(c as i32, KeyType::Character)
    }

    /// A digit key for numeric layouts.
    pub fn numeric(c: char) -> Self {
        Self::new(c as i32, KeyType::Numeric)
    }

    /// A functional key. Shift is classified as a modifier and arrows as navigation.
    pub fn functional(code: i32) -> Self {
        let kind = match code {
            code::SHIFT | code::CAPS_LOCK => KeyType::Modifier,
            code::ARROW_LEFT | code::ARROW_RIGHT | code::ARROW_UP | code::ARROW_DOWN => {
                KeyType::Navigation
            }
            _ => KeyType::Functional,
        };
        Self::new(code, kind)
    }

    /// Set the grow weight.
    #[must_use]
    pub fn grow(mut self, grow: f64) -> Self {
        self.flex.grow = grow;
        self
    }

    /// Set the shrink weight.
    #[must_use]
    pub fn shrink(mut self, shrink: f64) -> Self {
        self.flex.shrink = shrink;
        self
    }

    /// Set the width factor.
    #[must_use]
    pub fn width(mut self, width_factor: f64) -> Self {
        self.flex.width_factor = width_factor;
        self
    }

    /// Set the alternates shown on long press.
    #[must_use]
    pub fn with_alternates(mut self, alternates: impl IntoIterator<Item = char>) -> Self {
        self.popups.alternates = alternates.into_iter().map(|c| c as i32).collect();
        self
    }

    /// Set the symbol hint.
    #[must_use]
    pub fn with_symbol_hint(mut self, c: char) -> Self {
        self.popups.symbol_hint = Some(c as i32);
        self
    }

    /// Set the number hint.
    #[must_use]
    pub fn with_number_hint(mut self, c: char) -> Self {
        self.popups.number_hint = Some(c as i32);
        self
    }
}

/// A key inside a [`Keyboard`](crate::Keyboard), with computed state and bounds.
///
/// `touch_bounds` is used for hit testing and may extend past `visible_bounds`
/// (edge keys reach the keyboard border). `visible_bounds` is what gets drawn and where
/// popups anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct Key {
    /// Stable id.
    pub id: KeyId,
    /// Definition.
    pub data: KeyData,
    /// Contents supplied by the evaluator when this key is a slot.
    pub slot: Option<KeyData>,
    /// Hit-test rectangle.
    pub touch_bounds: Rect,
    /// Render rectangle.
    pub visible_bounds: Rect,
    /// Flex weights in effect after the computing pass.
    pub flex: Flex,
    /// State flags.
    pub flags: KeyFlags,
}

impl Key {
    pub(crate) fn new(id: KeyId, data: KeyData) -> Self {
        let flex = data.flex;
        Self {
            id,
            data,
            slot: None,
            touch_bounds: Rect::ZERO,
            visible_bounds: Rect::ZERO,
            flex,
            flags: KeyFlags::default(),
        }
    }

    fn effective(&self) -> &KeyData {
        self.slot.as_ref().unwrap_or(&self.data)
    }

    /// Code in effect (slot contents win over the definition).
    pub fn code(&self) -> i32 {
        self.effective().code
    }

    /// Kind in effect.
    pub fn kind(&self) -> KeyType {
        self.effective().kind
    }

    /// Popup set in effect.
    pub fn popups(&self) -> &PopupSet {
        &self.effective().popups
    }

    /// Whether the key reacts to touches.
    pub fn is_enabled(&self) -> bool {
        self.flags.contains(KeyFlags::ENABLED)
    }

    /// Whether the key is laid out.
    pub fn is_visible(&self) -> bool {
        self.flags.contains(KeyFlags::VISIBLE)
    }

    /// Whether a pointer currently holds this key.
    pub fn is_pressed(&self) -> bool {
        self.flags.contains(KeyFlags::PRESSED)
    }

    /// Whether the key can be hit at all.
    pub fn is_hittable(&self) -> bool {
        self.is_visible() && self.touch_bounds.area() > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn functional_kinds() {
        assert_eq!(KeyData::functional(code::SHIFT).kind, KeyType::Modifier);
        assert_eq!(
            KeyData::functional(code::ARROW_UP).kind,
            KeyType::Navigation
        );
        assert_eq!(KeyData::functional(code::DELETE).kind, KeyType::Functional);
    }

    #[test]
    fn slot_overrides_definition() {
        let mut key = Key::new(KeyId::new(0), KeyData::character('a'));
        assert_eq!(key.code(), 'a' as i32);
        key.slot = Some(KeyData::character('.').with_alternates([',', '!']));
        assert_eq!(key.code(), '.' as i32);
        assert_eq!(key.popups().alternates, vec![',' as i32, '!' as i32]);
    }

    #[test]
    fn empty_popup_set() {
        assert!(PopupSet::default().is_empty());
        assert!(!KeyData::character('e').with_number_hint('3').popups.is_empty());
    }
}
