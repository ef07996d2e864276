// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logical key codes.
//!
//! Positive codes are Unicode scalar values. Negative codes are reserved for functional keys.

/// Codes at or below this value never get a preview popup.
pub const VISIBLE_CHAR_THRESHOLD: i32 = 32;

/// Shift modifier.
pub const SHIFT: i32 = -1;
/// Caps lock, emitted when shift is long-pressed.
pub const CAPS_LOCK: i32 = -2;
/// Delete the character before the cursor.
pub const DELETE: i32 = -3;
/// Enter / action key.
pub const ENTER: i32 = -4;
/// Space bar.
pub const SPACE: i32 = -5;
/// Cursor left.
pub const ARROW_LEFT: i32 = -6;
/// Cursor right.
pub const ARROW_RIGHT: i32 = -7;
/// Cursor up.
pub const ARROW_UP: i32 = -8;
/// Cursor down.
pub const ARROW_DOWN: i32 = -9;
/// Switch to the symbols layout.
pub const VIEW_SYMBOLS: i32 = -10;
/// Switch back to the characters layout.
pub const VIEW_CHARACTERS: i32 = -11;
/// Cycle the input language.
pub const LANGUAGE_SWITCH: i32 = -12;

/// Whether `code` auto-repeats while held.
pub fn is_repeatable(code: i32) -> bool {
    matches!(
        code,
        DELETE | ARROW_LEFT | ARROW_RIGHT | ARROW_UP | ARROW_DOWN
    )
}
