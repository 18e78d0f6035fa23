// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless tall-image scrolling.
//!
//! Loads a tall image (or synthesizes one), scripts a drag followed by a
//! fling, and writes a few of the resulting frames as PNG files.
//!
//! Run:
//! - `cargo run -p understory_demos --example headless_scroll`
//! - `cargo run -p understory_demos --example headless_scroll -- path/to/tall.png`
//!
//! Set `RUST_LOG=debug` to see layout, fling and decode events.

use std::path::Path;

use overstory_long_image::{LongImageView, ViewConfig};
use tracing::info;
use understory_demos::{rasterize, synthetic_png};
use understory_region_decode::{EncodedImageSource, EncodedRegionDecoder};

const VIEWPORT: (u32, u32) = (360, 640);
const FRAME_MS: u64 = 16;

fn save(view: &mut LongImageView<EncodedRegionDecoder>, now: u64, out: &Path, name: &str) {
    let Some(frame) = view.draw(now) else {
        info!(name, "nothing to draw");
        return;
    };
    let region = frame.region;
    let path = out.join(format!("{name}.png"));
    rasterize(&frame, VIEWPORT.0, VIEWPORT.1)
        .save(&path)
        .expect("writing frame");
    info!(?region, stale = frame.stale, path = %path.display(), "wrote frame");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let source = match std::env::args().nth(1) {
        // JPEG files have no row stream; accept a full decode for them.
        Some(path) => EncodedImageSource::open(&path)
            .expect("reading image file")
            .with_full_decode(true),
        None => EncodedImageSource::from_bytes(synthetic_png(720, 9000)),
    };
    let mut view = LongImageView::new(ViewConfig::for_density(2.0));
    view.on_measure(VIEWPORT.0 as i32, VIEWPORT.1 as i32);
    let status = view.set_image(source).expect("opening image");
    info!(?status, meta = ?view.image_meta(), "image opened");

    let out = std::env::temp_dir().join("understory_headless_scroll");
    std::fs::create_dir_all(&out).expect("creating output directory");

    let mut now = 0;
    save(&mut view, now, &out, "00_initial");

    // Drag up by 300 px over 300 ms.
    view.on_pointer_down(180.0, 500.0, now);
    for i in 1..=30 {
        now += 10;
        view.on_pointer_move(180.0, 500.0 - f64::from(i) * 10.0, now);
    }
    save(&mut view, now, &out, "01_dragged");

    // Speed up and let go.
    for i in 1..=5 {
        now += 8;
        view.on_pointer_move(180.0, 200.0 - f64::from(i) * 40.0, now);
    }
    view.on_pointer_up(180.0, 0.0, now);
    info!(animating = view.is_animating(), "released");

    let mut frames = 0;
    while view.is_animating() {
        now += FRAME_MS;
        view.draw(now);
        frames += 1;
        if frames == 10 {
            save(&mut view, now, &out, "02_flinging");
        }
    }
    save(&mut view, now, &out, "03_settled");

    if let Some(pipeline) = view.pipeline() {
        info!(frames, stats = ?pipeline.stats(), "done");
    }
}
