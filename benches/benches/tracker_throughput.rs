// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use keysurface_layout::{DefaultEvaluator, KeyData, Keyboard, KeyboardMode, code};
use keysurface_touch::{ManualScheduler, PointerEvent, PointerTracker, TouchConfig};
use kurbo::{Point, Size};

fn tracker(glide: bool) -> PointerTracker<ManualScheduler> {
    let mut rows: Vec<Vec<KeyData>> = ["qwertyuiop", "asdfghjkl", "zxcvbnm"]
        .iter()
        .map(|r| r.chars().map(KeyData::character).collect())
        .collect();
    rows.push(vec![
        KeyData::functional(code::VIEW_SYMBOLS),
        KeyData::functional(code::SPACE).grow(1.0),
        KeyData::functional(code::DELETE),
    ]);
    let mut config = TouchConfig::default();
    config.glide.enabled = glide;
    let mut t = PointerTracker::new(
        Keyboard::new(KeyboardMode::Characters, rows),
        config,
        ManualScheduler::new(),
    )
    .unwrap();
    t.layout(Size::new(1000.0, 400.0), Size::ZERO, &DefaultEvaluator);
    t
}

/// Taps across the home row, two fingers overlapping.
fn rolling_taps(count: u32) -> Vec<PointerEvent> {
    let mut events = Vec::new();
    for i in 0..count {
        let x = 50.0 + f64::from(i % 9) * 100.0;
        let t = u64::from(i) * 40;
        let id = i % 2;
        events.push(PointerEvent::down(id, (x, 150.0), t));
        events.push(PointerEvent::moved(id, (x + 3.0, 151.0), t + 20));
        events.push(PointerEvent::up(id, (x + 3.0, 151.0), t + 60));
    }
    events
}

fn glide_path(samples: u32) -> Vec<PointerEvent> {
    let mut events = vec![PointerEvent::down(0, (50.0, 150.0), 0)];
    for i in 1..samples {
        let s = f64::from(i) / f64::from(samples);
        let p = Point::new(50.0 + 850.0 * s, 150.0 - 80.0 * (s * 6.0).sin());
        events.push(PointerEvent::moved(0, p, u64::from(i) * 8));
    }
    events.push(PointerEvent::up(0, (900.0, 150.0), u64::from(samples) * 8));
    events
}

fn bench_tracker(c: &mut Criterion) {
    let mut group = c.benchmark_group("tracker");

    let taps = rolling_taps(200);
    group.throughput(Throughput::Elements(taps.len() as u64));
    group.bench_function("rolling_taps", |b| {
        b.iter_batched(
            || tracker(false),
            |mut t| {
                for &ev in &taps {
                    t.advance_to(ev.time_ms);
                    t.handle(ev);
                }
                black_box(t.take_output())
            },
            BatchSize::SmallInput,
        );
    });

    let glide = glide_path(240);
    group.throughput(Throughput::Elements(glide.len() as u64));
    group.bench_function("glide_240_samples", |b| {
        b.iter_batched(
            || tracker(true),
            |mut t| {
                for &ev in &glide {
                    t.handle(ev);
                }
                black_box(t.take_output())
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_tracker);
criterion_main!(benches);
