// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typing basics.
//!
//! Builds a small QWERTY keyboard and drives a few gestures through the tracker: a tap, a
//! long press that opens the alternates popup, shift held into caps lock, and a cursor swipe
//! on the space bar.
//!
//! Run:
//! - `cargo run -p keysurface_demos --example typing_basics`

use keysurface_layout::{DefaultEvaluator, KeyData, Keyboard, KeyboardMode, code};
use keysurface_touch::{ManualScheduler, Output, PointerEvent, PointerTracker, TouchConfig};
use kurbo::Size;

fn keyboard() -> Keyboard {
    let top: Vec<KeyData> = "qwertyuiop"
        .chars()
        .map(|c| match c {
            'e' => KeyData::character(c)
                .with_number_hint('3')
                .with_alternates(['é', 'è', 'ê', 'ë']),
            'o' => KeyData::character(c).with_alternates(['ö', 'ó', 'ô']),
            _ => KeyData::character(c),
        })
        .collect();
    let mut middle = vec![KeyData::functional(code::SHIFT)];
    middle.extend("asdfghjk".chars().map(KeyData::character));
    middle.push(KeyData::functional(code::DELETE));
    let bottom = vec![
        KeyData::functional(code::VIEW_SYMBOLS),
        KeyData::functional(code::SPACE).grow(1.0),
        KeyData::functional(code::ENTER),
    ];
    Keyboard::new(KeyboardMode::Characters, [top, middle, bottom])
}

fn print(title: &str, tracker: &mut PointerTracker<ManualScheduler>) {
    println!("== {title} ==");
    for out in tracker.take_output() {
        match out {
            Output::Key(ev) => println!("  key {:?} {}", ev.kind, describe(ev.code)),
            other => println!("  {other:?}"),
        }
    }
}

fn describe(code: i32) -> String {
    match code {
        code::SHIFT => "SHIFT".into(),
        code::CAPS_LOCK => "CAPS_LOCK".into(),
        code::SPACE => "SPACE".into(),
        code::DELETE => "DELETE".into(),
        c => u32::try_from(c)
            .ok()
            .and_then(char::from_u32)
            .map_or_else(|| c.to_string(), |ch| format!("'{ch}'")),
    }
}

fn main() {
    let mut tracker =
        PointerTracker::new(keyboard(), TouchConfig::default(), ManualScheduler::new()).unwrap();
    tracker.layout(
        Size::new(1000.0, 300.0),
        Size::new(100.0, 100.0),
        &DefaultEvaluator,
    );

    tracker.handle(PointerEvent::down(0, (150.0, 50.0), 0));
    tracker.handle(PointerEvent::up(0, (152.0, 48.0), 70));
    print("Tap 'w'", &mut tracker);

    // Hold 'e' until the popup opens, then slide one cell right.
    tracker.handle(PointerEvent::down(0, (250.0, 50.0), 1000));
    tracker.advance_to(1300);
    if let keysurface_touch::PopupState::ExtendedShown(popup) = tracker.popup().state() {
        let codes: Vec<String> = popup.cells.iter().map(|c| describe(c.code)).collect();
        println!("popup cells: {}", codes.join(" "));
    }
    tracker.handle(PointerEvent::moved(0, (346.0, -40.0), 1350));
    tracker.handle(PointerEvent::up(0, (346.0, -40.0), 1400));
    print("Long press 'e', pick an alternate", &mut tracker);

    tracker.handle(PointerEvent::down(0, (50.0, 150.0), 2000));
    tracker.advance_to(2300);
    tracker.handle(PointerEvent::up(0, (50.0, 150.0), 2400));
    print("Hold shift", &mut tracker);

    tracker.handle(PointerEvent::down(0, (500.0, 250.0), 3000));
    for (i, x) in [560.0, 640.0, 740.0, 840.0].into_iter().enumerate() {
        tracker.handle(PointerEvent::moved(0, (x, 250.0), 3040 + 40 * i as u64));
    }
    tracker.handle(PointerEvent::up(0, (840.0, 250.0), 3300));
    print("Swipe right on space", &mut tracker);
}
