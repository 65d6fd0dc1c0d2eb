// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the CPU-side stages of the facemood-vision
// pipeline: payload decoding, grayscale conversion, and face preprocessing.
// Model execution is not covered here since it depends on external model
// files.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;

use facemood_core::types::FaceRegion;
use facemood_vision::{ColorImage, decode, preprocess};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// 640x480 webcam-sized frame: grey background with a light "face" disc and
/// two dark "eyes", roughly where a frontal face would sit.
fn synthetic_frame() -> RgbImage {
    let mut img = RgbImage::from_pixel(640, 480, Rgb([90, 100, 110]));
    draw_filled_rect_mut(&mut img, Rect::at(0, 400).of_size(640, 80), Rgb([40, 40, 40]));
    draw_filled_circle_mut(&mut img, (320, 220), 110, Rgb([220, 190, 170]));
    draw_filled_circle_mut(&mut img, (280, 190), 14, Rgb([30, 30, 30]));
    draw_filled_circle_mut(&mut img, (360, 190), 14, Rgb([30, 30, 30]));
    img
}

fn encoded_frame(format: ImageFormat) -> String {
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(synthetic_frame())
        .write_to(&mut std::io::Cursor::new(&mut buffer), format)
        .unwrap_or_else(|err| panic!("failed to encode fixture: {err}"));
    format!("data:{};base64,{}", format.to_mime_type(), BASE64.encode(buffer))
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_decode(c: &mut Criterion) {
    let png = encoded_frame(ImageFormat::Png);
    let jpeg = encoded_frame(ImageFormat::Jpeg);

    c.bench_function("decode png (640x480)", |b| {
        b.iter(|| black_box(decode(black_box(&png)).ok()));
    });
    c.bench_function("decode jpeg (640x480)", |b| {
        b.iter(|| black_box(decode(black_box(&jpeg)).ok()));
    });
}

fn bench_grayscale(c: &mut Criterion) {
    let color = ColorImage::from_dynamic(DynamicImage::ImageRgb8(synthetic_frame()));

    c.bench_function("to_gray (640x480)", |b| {
        b.iter(|| black_box(black_box(&color).to_gray()));
    });
}

fn bench_preprocess(c: &mut Criterion) {
    let gray = ColorImage::from_dynamic(DynamicImage::ImageRgb8(synthetic_frame())).to_gray();
    let region = FaceRegion::new(210, 110, 220, 220);

    c.bench_function("preprocess 220x220 region", |b| {
        b.iter(|| black_box(preprocess(black_box(&gray), region).ok()));
    });
}

criterion_group!(benches, bench_decode, bench_grayscale, bench_preprocess);
criterion_main!(benches);
