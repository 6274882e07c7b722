//! Per-tile layers: walls, liquids, blocks and wires.

use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use super::{LayerKind, LayerRaster, RasterOptions};
use crate::palette::{ColorKey, ColorTable, GlobalColor};
use crate::progress::{ProgressEvent, ProgressReporter};
use crate::region::Region;
use crate::world::{LiquidType, Tile, World};

/// Columns between two `ColumnsDone` progress events.
pub const PROGRESS_INTERVAL: u32 = 100;

/// Color a tile contributes to `kind`, or `None` if the layer leaves the
/// pixel transparent.
///
/// Paint replaces the block or wall type color when `draw_paint` is set.
/// Wires are not blended: the first set channel in red, blue, green,
/// yellow order decides the color.
pub fn tile_color(kind: LayerKind, tile: &Tile, palette: &ColorTable, draw_paint: bool) -> Option<Rgba<u8>> {
    let key = match kind {
        LayerKind::Background => return None,
        LayerKind::Walls => {
            let wall = tile.wall?;
            match wall.paint_id() {
                Some(paint) if draw_paint => ColorKey::Paint(paint),
                _ => ColorKey::Wall(wall.type_id),
            }
        }
        LayerKind::Blocks => {
            let block = tile.block?;
            match block.paint_id() {
                Some(paint) if draw_paint => ColorKey::Paint(paint),
                _ => ColorKey::Block(block.type_id),
            }
        }
        LayerKind::Liquids => match tile.liquid?.kind {
            LiquidType::Water => ColorKey::Global(GlobalColor::Water),
            LiquidType::Lava => ColorKey::Global(GlobalColor::Lava),
            LiquidType::Honey => ColorKey::Global(GlobalColor::Honey),
            LiquidType::None => return None,
        },
        LayerKind::Wires => {
            let wiring = tile.wiring?;
            if wiring.red {
                ColorKey::Global(GlobalColor::Wire)
            } else if wiring.blue {
                ColorKey::Global(GlobalColor::Wire1)
            } else if wiring.green {
                ColorKey::Global(GlobalColor::Wire2)
            } else if wiring.yellow {
                ColorKey::Global(GlobalColor::Wire3)
            } else {
                return None;
            }
        }
    };
    Some(palette.resolve(key))
}

/// Column-by-column scan, reporting every [`PROGRESS_INTERVAL`] columns.
pub(super) fn rasterize_tiles(
    kind: LayerKind,
    world: &World,
    region: &Region,
    palette: &ColorTable,
    options: &RasterOptions,
    reporter: &dyn ProgressReporter,
) -> LayerRaster {
    let mut image = RgbaImage::new(region.width(), region.height());
    if region.is_empty() {
        return LayerRaster { kind, image };
    }

    let total = region.width();
    for x in region.min_x..region.max_x {
        for y in region.min_y..region.max_y {
            let Some(tile) = world.tile(x, y) else {
                continue;
            };
            if let Some(color) = tile_color(kind, tile, palette, options.draw_paint) {
                image.put_pixel(x - region.min_x, y - region.min_y, color);
            }
        }

        let done = x - region.min_x + 1;
        if done % PROGRESS_INTERVAL == 0 || done == total {
            reporter.report(ProgressEvent::ColumnsDone { layer: kind, done, total });
        }
    }

    LayerRaster { kind, image }
}

/// Row-parallel scan on the rayon pool.
///
/// Each worker owns one raster row, so no two workers touch the same
/// pixels. Output is identical to [`rasterize_tiles`].
pub(super) fn rasterize_tiles_parallel(
    kind: LayerKind,
    world: &World,
    region: &Region,
    palette: &ColorTable,
    options: &RasterOptions,
    reporter: &dyn ProgressReporter,
) -> LayerRaster {
    let mut image = RgbaImage::new(region.width(), region.height());
    if region.is_empty() {
        return LayerRaster { kind, image };
    }

    let stride = region.width() as usize * 4;
    let buffer: &mut [u8] = &mut image;
    buffer.par_chunks_mut(stride).enumerate().for_each(|(row, pixels)| {
        let y = region.min_y + row as u32;
        for (col, pixel) in pixels.chunks_exact_mut(4).enumerate() {
            let x = region.min_x + col as u32;
            let color = world.tile(x, y).and_then(|tile| tile_color(kind, tile, palette, options.draw_paint));
            if let Some(color) = color {
                pixel.copy_from_slice(&color.0);
            }
        }
    });

    let total = region.width();
    reporter.report(ProgressEvent::ColumnsDone { layer: kind, done: total, total });
    LayerRaster { kind, image }
}
