// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for keys: identifiers, flags, flex weights, and keyboard modes.

/// Identifier for a key inside a [`Keyboard`](crate::Keyboard).
///
/// Ids are assigned in definition order (row by row, left to right) and stay stable for the
/// lifetime of the keyboard. Layout passes never reassign them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct KeyId(pub(crate) u32);

impl KeyId {
    pub(crate) const fn new(idx: u32) -> Self {
        Self(idx)
    }

    /// Position of the key in definition order.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Broad classification of a key.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyType {
    /// Produces a printable character.
    #[default]
    Character,
    /// Digit or numeric-pad key.
    Numeric,
    /// Performs an editor function (delete, enter, space, layout switches).
    Functional,
    /// Changes the meaning of other keys (shift).
    Modifier,
    /// Moves the cursor (arrows).
    Navigation,
}

bitflags::bitflags! {
    /// Per-key state recomputed on every computing pass.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyFlags: u8 {
        /// Key reacts to touches.
        const ENABLED = 0b0000_0001;
        /// Key takes part in layout and hit testing.
        const VISIBLE = 0b0000_0010;
        /// Key is currently held by a pointer.
        const PRESSED = 0b0000_0100;
        /// Key is a placeholder filled by the evaluator.
        const SLOT    = 0b0000_1000;
    }
}

impl Default for KeyFlags {
    fn default() -> Self {
        Self::ENABLED | Self::VISIBLE
    }
}

/// Flex weights used to distribute a row's width.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flex {
    /// Share of positive slack this key absorbs.
    pub grow: f64,
    /// Share of negative slack this key gives back.
    pub shrink: f64,
    /// Base width as a multiple of the reference key width.
    pub width_factor: f64,
}

impl Flex {
    /// Zero weights: the key is laid out with zero size and never hit.
    pub const HIDDEN: Self = Self::new(0.0, 0.0, 0.0);

    /// Create flex weights.
    pub const fn new(grow: f64, shrink: f64, width_factor: f64) -> Self {
        Self {
            grow,
            shrink,
            width_factor,
        }
    }

    /// Whether all weights are zero.
    pub fn is_hidden(&self) -> bool {
        self.grow == 0.0 && self.shrink == 0.0 && self.width_factor == 0.0
    }
}

impl Default for Flex {
    fn default() -> Self {
        Self::new(0.0, 1.0, 1.0)
    }
}

/// Which layout a keyboard shows.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyboardMode {
    /// Primary alphabetic layout.
    #[default]
    Characters,
    /// First symbols page.
    Symbols,
    /// Second symbols page.
    Symbols2,
    /// Plain number pad.
    Numeric,
    /// Number pad with operators and navigation.
    NumericAdvanced,
    /// Phone dial pad.
    Phone,
    /// Phone pad symbols page.
    Phone2,
}

impl KeyboardMode {
    /// Modes that lay keys out on a fixed column grid instead of distributing slack.
    pub const fn is_fixed_width(self) -> bool {
        matches!(
            self,
            Self::Numeric | Self::NumericAdvanced | Self::Phone | Self::Phone2
        )
    }

    /// Modes whose row height is clamped to a multiple of the base row height.
    pub const fn is_compact(self) -> bool {
        self.is_fixed_width()
    }

    /// Whether glide typing may run in this mode.
    pub const fn supports_glide(self) -> bool {
        matches!(self, Self::Characters)
    }
}
