//! Benchmarks for the webpify conversion pipeline.
//!
//! Run with: cargo bench -p webpify-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, Rgba, RgbaImage};
use webpify_core::pipeline::{clamp_resize, find_content_bounds, thumbnail, trim};
use webpify_core::pipeline::{OutputEncoder, WebpEncoder};

/// 1920x1080 canvas with a transparent 200px border around opaque content.
fn framed_image() -> DynamicImage {
    let mut img = RgbaImage::from_pixel(1920, 1080, Rgba([0, 0, 0, 0]));
    for y in 200..880 {
        for x in 200..1720 {
            img.put_pixel(x, y, Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255]));
        }
    }
    DynamicImage::ImageRgba8(img)
}

fn benchmark_content_bounds(c: &mut Criterion) {
    let img = framed_image();

    c.bench_function("find_content_bounds_1080p", |b| {
        b.iter(|| find_content_bounds(black_box(&img), 0))
    });
}

fn benchmark_trim(c: &mut Criterion) {
    let img = framed_image();

    c.bench_function("trim_1080p", |b| {
        b.iter(|| trim(black_box(img.clone()), 0))
    });
}

fn benchmark_clamp(c: &mut Criterion) {
    let img = DynamicImage::new_rgba8(1920, 1080);

    c.bench_function("clamp_resize_to_800w", |b| {
        b.iter(|| clamp_resize(black_box(img.clone()), 800, 0))
    });
}

fn benchmark_thumbnail(c: &mut Criterion) {
    let img = DynamicImage::new_rgba8(1920, 1080);

    c.bench_function("thumbnail_10_percent", |b| {
        b.iter(|| thumbnail(black_box(&img), 10))
    });
}

fn benchmark_encode(c: &mut Criterion) {
    let img = DynamicImage::new_rgba8(512, 512);

    c.bench_function("encode_webp_q80", |b| {
        b.iter(|| WebpEncoder.encode(black_box(&img), 80.0, false))
    });
}

criterion_group!(
    benches,
    benchmark_content_bounds,
    benchmark_trim,
    benchmark_clamp,
    benchmark_thumbnail,
    benchmark_encode,
);
criterion_main!(benches);
