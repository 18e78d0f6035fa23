// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use understory_fling::InertialScroller;

fn bench_fling(c: &mut Criterion) {
    c.bench_function("fling/arm", |b| {
        let mut scroller = InertialScroller::default();
        b.iter(|| scroller.fling(0, black_box(4200.0), 0, 1_000_000, 0));
    });

    c.bench_function("fling/run_to_rest", |b| {
        let mut scroller = InertialScroller::default();
        b.iter(|| {
            scroller.fling(0, black_box(6000.0), 0, 1_000_000, 0);
            let mut now = 0;
            let mut last = 0;
            while let Some(offset) = scroller.tick(now) {
                last = offset;
                now += 16;
            }
            last
        });
    });
}

criterion_group!(benches, bench_fling);
criterion_main!(benches);
