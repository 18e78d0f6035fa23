// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use understory_decode_window::{DecodeWindow, ImageMeta, ViewportSize, WindowGeometry};
use understory_region_decode::{
    DecodePolicy, ImageSource, PipelineConfig, PixelFormat, RasterDecoder, RasterSource,
    RegionDecodePipeline,
};

const IMAGE_WIDTH: u32 = 1080;
const IMAGE_HEIGHT: u32 = 8000;

fn source() -> RasterSource {
    RasterSource::from_fn(IMAGE_WIDTH, IMAGE_HEIGHT, |x, y| {
        [(x & 0xff) as u8, (y & 0xff) as u8, ((x ^ y) & 0xff) as u8, 255]
    })
}

fn window() -> DecodeWindow {
    let meta = ImageMeta::new(IMAGE_WIDTH, IMAGE_HEIGHT).unwrap();
    let geometry = WindowGeometry::compute(meta, ViewportSize::new(1080, 1920)).unwrap();
    DecodeWindow::new(&geometry)
}

fn pipeline(config: PipelineConfig) -> RegionDecodePipeline<RasterDecoder> {
    RegionDecodePipeline::new(source().open_decoder().unwrap(), config)
}

fn bench_scrolling(c: &mut Criterion) {
    let mut group = c.benchmark_group("region_decode/scroll");
    for format in [PixelFormat::Rgb565, PixelFormat::Rgba8888] {
        let mut p = pipeline(PipelineConfig::default().with_format(format));
        let mut w = window();
        group.bench_function(format!("{format:?}"), |b| {
            b.iter(|| {
                if w.offset_vertically(37) != understory_decode_window::WindowClamp::Unclamped {
                    w.set_top(0);
                }
                p.decode(black_box(w.decode_rect())).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_unchanged(c: &mut Criterion) {
    let mut group = c.benchmark_group("region_decode/unchanged");
    for policy in [DecodePolicy::EveryFrame, DecodePolicy::SkipUnchanged] {
        let mut p = pipeline(PipelineConfig::default().with_policy(policy));
        let rect = window().decode_rect();
        group.bench_function(format!("{policy:?}"), |b| {
            b.iter(|| p.decode(black_box(rect)).unwrap());
        });
    }
    group.finish();
}

fn bench_fresh_buffer(c: &mut Criterion) {
    // Baseline: a pipeline that starts from an empty buffer every frame.
    let rect = window().decode_rect();
    let decoder = source().open_decoder().unwrap();
    c.bench_function("region_decode/fresh_buffer", |b| {
        b.iter_batched(
            || RegionDecodePipeline::new(decoder.clone(), PipelineConfig::default()),
            |mut p| p.decode(black_box(rect)).unwrap(),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_scrolling, bench_unchanged, bench_fresh_buffer);
criterion_main!(benches);
