//! Benchmarks for the sheetcut pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgba, RgbaImage};

use sheetcut::{
    build_mask, detect_regions, filter_overlaps, process_sheet, MaskParams, RegionFilters,
    SliceConfig,
};

/// Build a white sheet with a grid of solid sprite blocks.
fn synthetic_sheet(rows: u32, cols: u32, cell: u32, inset: u32) -> RgbaImage {
    let mut sheet = RgbaImage::from_pixel(cols * cell, rows * cell, Rgba([255, 255, 255, 255]));

    for row in 0..rows {
        for col in 0..cols {
            let colour = Rgba([
                40 + (row * 50) as u8,
                40 + (col * 50) as u8,
                120,
                255,
            ]);
            for y in row * cell + inset..(row + 1) * cell - inset {
                for x in col * cell + inset..(col + 1) * cell - inset {
                    sheet.put_pixel(x, y, colour);
                }
            }
        }
    }

    sheet
}

// -- Mask benchmarks --

fn bench_mask(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask");

    let small = synthetic_sheet(2, 2, 200, 10);
    let large = synthetic_sheet(4, 4, 200, 10);
    let params = MaskParams::default();

    group.bench_function("build_mask_400", |b| {
        b.iter(|| build_mask(black_box(&small), black_box(&params)))
    });

    group.bench_function("build_mask_800", |b| {
        b.iter(|| build_mask(black_box(&large), black_box(&params)))
    });

    group.finish();
}

// -- Region benchmarks --

fn bench_regions(c: &mut Criterion) {
    let mut group = c.benchmark_group("regions");

    let sheet = synthetic_sheet(4, 4, 200, 10);
    let mask = build_mask(&sheet, &MaskParams::default());
    let filters = RegionFilters::default();

    group.bench_function("detect_regions_800", |b| {
        b.iter(|| detect_regions(black_box(&mask), black_box(&filters)))
    });

    let candidates = detect_regions(&mask, &filters);
    group.bench_function("filter_overlaps_16", |b| {
        b.iter(|| filter_overlaps(black_box(candidates.clone())))
    });

    group.finish();
}

// -- End-to-end benchmark --

fn bench_sheet(c: &mut Criterion) {
    let mut group = c.benchmark_group("sheet");
    group.sample_size(20);

    let sheet = synthetic_sheet(4, 4, 200, 10);
    let mut config = SliceConfig::default();
    config.background.tolerance = 10;

    group.bench_function("process_sheet_4x4", |b| {
        b.iter(|| process_sheet(black_box(&sheet), black_box("hero"), black_box(&config)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_mask, bench_regions, bench_sheet);
criterion_main!(benches);
