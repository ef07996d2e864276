// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Abstract actions bound to swipes and long presses.

use keysurface_gesture::SwipeDirection;

/// What a swipe or long press asks the editor to do.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwipeAction {
    /// Nothing; the gesture falls back to normal key dispatch.
    #[default]
    NoAction,
    /// Move the cursor one line up.
    MoveCursorUp,
    /// Move the cursor one line down.
    MoveCursorDown,
    /// Move the cursor left by the swiped unit count.
    MoveCursorLeft,
    /// Move the cursor right by the swiped unit count.
    MoveCursorRight,
    /// Jump to the start of the line.
    MoveCursorStartOfLine,
    /// Jump to the end of the line.
    MoveCursorEndOfLine,
    /// Delete the characters selected by a delete drag.
    DeleteCharactersPrecisely,
    /// Delete the words selected by a delete drag.
    DeleteWordsPrecisely,
    /// Delete the word before the cursor.
    DeleteWord,
    /// Extend the selection by a signed number of characters.
    SelectCharactersPrecisely,
    /// Extend the selection by a signed number of words.
    SelectWordsPrecisely,
    /// Dismiss the keyboard.
    HideKeyboard,
    /// Insert a space.
    InsertSpace,
    /// Act as a tap on shift.
    ShiftKey,
    /// Undo the last edit.
    Undo,
    /// Redo the last undone edit.
    Redo,
    /// Open the clipboard view.
    SwitchToClipboardContext,
    /// Switch to the previous input subtype.
    SwitchToPrevSubtype,
    /// Switch to the next input subtype.
    SwitchToNextSubtype,
    /// Show the system input method picker.
    ShowInputMethodPicker,
}

impl SwipeAction {
    /// Horizontal cursor moves, the ones a held shift turns into a selection.
    pub fn is_horizontal_cursor_move(self) -> bool {
        matches!(self, Self::MoveCursorLeft | Self::MoveCursorRight)
    }

    /// Precise deletes that select while the finger moves.
    pub fn is_precise_delete(self) -> bool {
        matches!(
            self,
            Self::DeleteCharactersPrecisely | Self::DeleteWordsPrecisely
        )
    }
}

/// Action bindings per gesture and key.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwipeBindings {
    /// Swipe up from any ordinary key.
    pub up: SwipeAction,
    /// Swipe down from any ordinary key.
    pub down: SwipeAction,
    /// Swipe left from any ordinary key.
    pub left: SwipeAction,
    /// Swipe right from any ordinary key.
    pub right: SwipeAction,
    /// Horizontal drag on space, leftward.
    pub space_left: SwipeAction,
    /// Horizontal drag on space, rightward.
    pub space_right: SwipeAction,
    /// Swipe up from space.
    pub space_up: SwipeAction,
    /// Swipe down from space.
    pub space_down: SwipeAction,
    /// Long press on space.
    pub space_long_press: SwipeAction,
    /// Leftward drag on delete.
    pub delete_left: SwipeAction,
}

impl Default for SwipeBindings {
    fn default() -> Self {
        Self {
            up: SwipeAction::ShiftKey,
            down: SwipeAction::HideKeyboard,
            left: SwipeAction::NoAction,
            right: SwipeAction::NoAction,
            space_left: SwipeAction::MoveCursorLeft,
            space_right: SwipeAction::MoveCursorRight,
            space_up: SwipeAction::NoAction,
            space_down: SwipeAction::NoAction,
            space_long_press: SwipeAction::ShowInputMethodPicker,
            delete_left: SwipeAction::DeleteCharactersPrecisely,
        }
    }
}

impl SwipeBindings {
    /// Binding for a swipe starting on an ordinary key.
    pub fn general(&self, direction: SwipeDirection) -> SwipeAction {
        match direction {
            SwipeDirection::Up => self.up,
            SwipeDirection::Down => self.down,
            SwipeDirection::Left => self.left,
            SwipeDirection::Right => self.right,
            SwipeDirection::None => SwipeAction::NoAction,
        }
    }

    /// Binding for a swipe starting on space.
    pub fn space(&self, direction: SwipeDirection) -> SwipeAction {
        match direction {
            SwipeDirection::Up => self.space_up,
            SwipeDirection::Down => self.space_down,
            SwipeDirection::Left => self.space_left,
            SwipeDirection::Right => self.space_right,
            SwipeDirection::None => SwipeAction::NoAction,
        }
    }
}
