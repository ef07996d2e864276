// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Replay a recorded touch session from JSON.
//!
//! The script carries the tracker configuration and a list of pointer samples. Timers are
//! delivered from a virtual clock between samples, and every output is printed back as JSON.
//!
//! Run:
//! - `cargo run -p keysurface_demos --example replay_json`

use keysurface_layout::{DefaultEvaluator, KeyData, Keyboard, KeyboardMode, code};
use keysurface_touch::{ManualScheduler, PointerEvent, PointerTracker, TouchConfig};
use kurbo::Size;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Script {
    viewport: Size,
    #[serde(default)]
    config: Option<TouchConfig>,
    events: Vec<PointerEvent>,
}

const SCRIPT: &str = r#"{
  "viewport": { "width": 1000.0, "height": 200.0 },
  "events": [
    { "id": 0, "index": 0, "kind": "Down", "position": { "x": 950.0, "y": 50.0 }, "time_ms": 0 },
    { "id": 0, "index": 0, "kind": "Up",   "position": { "x": 950.0, "y": 50.0 }, "time_ms": 420 },
    { "id": 1, "index": 0, "kind": "Down", "position": { "x": 950.0, "y": 150.0 }, "time_ms": 500 },
    { "id": 1, "index": 0, "kind": "Move", "position": { "x": 830.0, "y": 150.0 }, "time_ms": 560 },
    { "id": 1, "index": 0, "kind": "Move", "position": { "x": 700.0, "y": 150.0 }, "time_ms": 620 },
    { "id": 1, "index": 0, "kind": "Up",   "position": { "x": 700.0, "y": 150.0 }, "time_ms": 680 }
  ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let script: Script = serde_json::from_str(SCRIPT)?;
    let config = script.config.unwrap_or_default();
    println!("config: {}", serde_json::to_string(&config)?);

    let top = "qwertyuio"
        .chars()
        .map(KeyData::character)
        .chain([KeyData::functional(code::DELETE)]);
    let bottom = [
        KeyData::functional(code::VIEW_SYMBOLS),
        KeyData::functional(code::SPACE).grow(1.0),
        KeyData::functional(code::DELETE),
    ];
    let keyboard = Keyboard::new(
        KeyboardMode::Characters,
        [top.collect::<Vec<_>>(), Vec::from(bottom)],
    );

    let mut tracker = PointerTracker::new(keyboard, config, ManualScheduler::new())?;
    tracker.layout(script.viewport, Size::ZERO, &DefaultEvaluator);

    for event in script.events {
        tracker.advance_to(event.time_ms);
        tracker.enqueue(event)?;
        tracker.process_pending();
        for out in tracker.take_output() {
            println!("{:>4}ms {}", event.time_ms, serde_json::to_string(&out)?);
        }
    }
    Ok(())
}
