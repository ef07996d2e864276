// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glide basics.
//!
//! Traces "gh" → "j" → "u" across a keyboard and prints the finalized trajectory and the
//! fading trail a renderer would draw afterwards.
//!
//! Run:
//! - `cargo run -p keysurface_demos --example glide_basics`

use keysurface_layout::{DefaultEvaluator, KeyData, Keyboard, KeyboardMode};
use keysurface_touch::{ManualScheduler, Output, PointerEvent, PointerTracker, TouchConfig};
use kurbo::{Point, Size};

fn main() {
    let rows = ["qwertyuiop", "asdfghjkl", "zxcvbnm"]
        .map(|row| row.chars().map(KeyData::character).collect::<Vec<_>>());
    let keyboard = Keyboard::new(KeyboardMode::Characters, rows);
    let mut tracker =
        PointerTracker::new(keyboard, TouchConfig::default(), ManualScheduler::new()).unwrap();
    tracker.layout(Size::new(1000.0, 300.0), Size::ZERO, &DefaultEvaluator);

    let path = [
        Point::new(550.0, 150.0),
        Point::new(580.0, 152.0),
        Point::new(640.0, 150.0),
        Point::new(700.0, 140.0),
        Point::new(690.0, 90.0),
        Point::new(660.0, 50.0),
    ];
    let mut t = 0;
    tracker.handle(PointerEvent::down(0, path[0], t));
    for &p in &path[1..] {
        t += 16;
        tracker.handle(PointerEvent::moved(0, p, t));
    }
    tracker.handle(PointerEvent::up(0, path[path.len() - 1], t + 16));

    for out in tracker.take_output() {
        match out {
            Output::GlideTrajectoryFinalized {
                pointer,
                points,
                completed,
            } => {
                println!("glide from {pointer:?}, completed = {completed}");
                for p in points {
                    println!("  t={:>3}ms ({:.0}, {:.0})", p.time_ms, p.position.x, p.position.y);
                }
            }
            other => println!("unexpected output: {other:?}"),
        }
    }

    for now in [t + 16, t + 100, t + 200] {
        match tracker.glide_trail(now) {
            Some(trail) => {
                println!("trail at {now}ms:");
                for (line, radius) in trail.segments(now) {
                    println!(
                        "  ({:.0}, {:.0}) -> ({:.0}, {:.0}) r={radius:.2}",
                        line.p0.x, line.p0.y, line.p1.x, line.p1.y
                    );
                }
            }
            None => println!("trail at {now}ms: gone"),
        }
    }
}
