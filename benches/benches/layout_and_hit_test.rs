// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use keysurface_layout::{
    DefaultEvaluator, KeyData, Keyboard, KeyboardMode, LayoutConfig, LayoutEngine, code,
};
use kurbo::{Point, Size};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn qwerty() -> Keyboard {
    let [top, home] =
        ["qwertyuiop", "asdfghjkl"].map(|r| r.chars().map(KeyData::character).collect::<Vec<_>>());
    let mut third = vec![KeyData::functional(code::SHIFT).width(1.5)];
    third.extend("zxcvbnm".chars().map(KeyData::character));
    third.push(KeyData::functional(code::DELETE).width(1.5));
    let bottom = vec![
        KeyData::functional(code::VIEW_SYMBOLS).width(1.5),
        KeyData::character(','),
        KeyData::functional(code::SPACE).grow(1.0),
        KeyData::character('.'),
        KeyData::functional(code::ENTER).width(1.5),
    ];
    Keyboard::new(KeyboardMode::Characters, [top, home, third, bottom])
}

fn random_points(count: usize, size: Size) -> Vec<Point> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| Point::new(rng.next_f64() * size.width, rng.next_f64() * size.height))
        .collect()
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for width in [360.0, 1080.0, 2400.0] {
        group.bench_function(format!("compute_layout_w{width}"), |b| {
            b.iter_batched(
                qwerty,
                |mut kb| {
                    let mut engine = LayoutEngine::new(LayoutConfig::default());
                    engine.compute(&mut kb, &DefaultEvaluator);
                    engine.layout(&mut kb, Size::new(width, width * 0.6), Size::ZERO);
                    black_box(kb)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_hit_test(c: &mut Criterion) {
    let viewport = Size::new(1080.0, 720.0);
    let mut kb = qwerty();
    let mut engine = LayoutEngine::new(LayoutConfig::default());
    engine.compute(&mut kb, &DefaultEvaluator);
    engine.layout(&mut kb, viewport, Size::ZERO);

    let mut group = c.benchmark_group("hit_test");
    for count in [64_usize, 1024] {
        let points = random_points(count, viewport);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("key_at_n{count}"), |b| {
            b.iter(|| {
                let mut hits = 0_usize;
                for &p in &points {
                    if kb.key_at(black_box(p)).is_some() {
                        hits += 1;
                    }
                }
                black_box(hits)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout, bench_hit_test);
criterion_main!(benches);
