// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, criterion_group, criterion_main};
use overstory_long_image::{LongImageView, ViewConfig};
use understory_region_decode::{RasterDecoder, RasterSource};

fn bench_fling_frames(c: &mut Criterion) {
    let image = RasterSource::from_fn(720, 12_000, |_, y| [(y & 0xff) as u8, 0, 0, 255]);
    let mut view: LongImageView<RasterDecoder> = LongImageView::new(ViewConfig::default());
    view.on_measure(360, 640);
    view.set_image(image).unwrap();

    c.bench_function("long_image/fling_frame", |b| {
        let mut now = 0_u64;
        b.iter(|| {
            if !view.is_animating() {
                // Throw upward from the middle of the viewport.
                view.on_pointer_down(180.0, 600.0, now);
                for i in 1..=10_u32 {
                    view.on_pointer_move(180.0, 600.0 - f64::from(i) * 40.0, now + u64::from(i) * 8);
                }
                now += 80;
                view.on_pointer_up(180.0, 200.0, now);
                if !view.is_animating() {
                    view.on_measure(360, 641);
                    view.on_measure(360, 640);
                }
            }
            now += 16;
            view.draw(now).map(|frame| frame.region.top)
        });
    });
}

criterion_group!(benches, bench_fling_frames);
criterion_main!(benches);
