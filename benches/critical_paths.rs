//! Criterion benchmarks for worldmap critical paths
//!
//! Benchmarks the core performance-critical operations:
//! - Raster: per-tile layer scans, sequential and parallel
//! - Background: band fills
//! - Composition: merging a full layer stack
//! - Color: palette hex parsing

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{Rgba, RgbaImage};
use worldmap::color::parse_hex_color;
use worldmap::composition::composite;
use worldmap::palette::ColorTable;
use worldmap::progress::NullProgress;
use worldmap::raster::{rasterize_layer, LayerKind, LayerRaster, RasterOptions};
use worldmap::region::Region;
use worldmap::world::{Block, LiquidType, Tile, Wall, Wiring, World, WorldSize};

// =============================================================================
// Test Data Generators
// =============================================================================

/// Square world with a deterministic mix of tile content
fn make_world(size: u32) -> World {
    let mut world = World::new(WorldSize::new(size, size), size / 4, size / 2);
    for x in 0..size {
        for y in 0..size {
            let n = x.wrapping_mul(31).wrapping_add(y.wrapping_mul(17));
            let mut tile = Tile::default();
            if n % 3 != 0 {
                tile = tile.with_wall(Wall::new((n % 20) as u16));
            }
            if n % 4 == 0 {
                tile = tile.with_block(if n % 8 == 0 {
                    Block::painted((n % 40) as u16, (n % 30 + 1) as u8)
                } else {
                    Block::new((n % 40) as u16)
                });
            }
            if n % 7 == 0 {
                tile = tile.with_liquid(LiquidType::Water);
            }
            if n % 11 == 0 {
                tile = tile.with_wiring(Wiring::red());
            }
            world.set_tile(x, y, tile);
        }
    }
    world
}

fn full_region(size: u32) -> Region {
    Region { min_x: 0, min_y: 0, max_x: size, max_y: size }
}

// =============================================================================
// Raster Benchmarks
// =============================================================================

fn bench_raster(c: &mut Criterion) {
    let mut group = c.benchmark_group("raster");
    let palette = ColorTable::builtin();

    for size in [64u32, 256, 512].iter() {
        let world = make_world(*size);
        let region = full_region(*size);
        group.throughput(Throughput::Elements((*size as u64) * (*size as u64)));

        for kind in [LayerKind::Walls, LayerKind::Blocks, LayerKind::Wires] {
            group.bench_with_input(BenchmarkId::new(kind.name(), size), &world, |b, world| {
                b.iter(|| {
                    rasterize_layer(
                        kind,
                        black_box(world),
                        &region,
                        &palette,
                        &RasterOptions::default(),
                        &NullProgress,
                    )
                })
            });
        }

        let parallel = RasterOptions { parallel: true, ..RasterOptions::default() };
        group.bench_with_input(BenchmarkId::new("blocks_parallel", size), &world, |b, world| {
            b.iter(|| rasterize_layer(LayerKind::Blocks, black_box(world), &region, &palette, &parallel, &NullProgress))
        });

        group.bench_with_input(BenchmarkId::new("background", size), &world, |b, world| {
            b.iter(|| {
                rasterize_layer(
                    LayerKind::Background,
                    black_box(world),
                    &region,
                    &palette,
                    &RasterOptions::default(),
                    &NullProgress,
                )
            })
        });
    }

    group.finish();
}

// =============================================================================
// Composition Benchmarks
// =============================================================================

fn make_layers(size: u32) -> Vec<LayerRaster> {
    LayerKind::DRAW_ORDER
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let image = RgbaImage::from_fn(size, size, |x, y| {
                // Leave holes so lower layers show through
                if (x + y + i as u32) % 3 == 0 {
                    Rgba([0, 0, 0, 0])
                } else {
                    Rgba([(i * 50) as u8, (x % 256) as u8, (y % 256) as u8, 255])
                }
            });
            LayerRaster { kind: *kind, image }
        })
        .collect()
}

fn bench_composition(c: &mut Criterion) {
    let mut group = c.benchmark_group("composition");

    for size in [64u32, 256, 512].iter() {
        let layers = make_layers(*size);
        group.throughput(Throughput::Elements((*size as u64) * (*size as u64)));
        group.bench_with_input(BenchmarkId::new("five_layers", size), &layers, |b, layers| {
            b.iter(|| composite(*size, *size, black_box(layers.clone())))
        });
    }

    group.finish();
}

// =============================================================================
// Color Benchmarks
// =============================================================================

fn bench_color(c: &mut Criterion) {
    let mut group = c.benchmark_group("color");

    group.bench_function("parse_hex_3", |b| b.iter(|| parse_hex_color(black_box("#F00"))));
    group.bench_function("parse_hex_6", |b| b.iter(|| parse_hex_color(black_box("#FF0000"))));
    group.bench_function("parse_hex_8", |b| b.iter(|| parse_hex_color(black_box("#FF0000FF"))));
    group.bench_function("builtin_palette", |b| b.iter(ColorTable::builtin));

    group.finish();
}

criterion_group!(benches, bench_raster, bench_composition, bench_color);
criterion_main!(benches);
