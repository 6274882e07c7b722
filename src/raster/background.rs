//! Background bands: sky, earth, rock and hell.

use image::{Rgba, RgbaImage};

use super::{LayerKind, LayerRaster};
use crate::palette::{ColorTable, GlobalColor};
use crate::region::Region;
use crate::world::World;

/// Hell starts this many tiles above the bottom of the world.
pub const EDGE_OF_ROCK_OFFSET: i64 = 192;

/// A horizontal background band in raster rows `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub color: GlobalColor,
    pub start: u32,
    pub end: u32,
}

/// Compute the background bands visible in `region`.
///
/// Bands are contiguous and top-to-bottom. A band is only emitted when its
/// world-space range intersects the region; rows are raster-relative.
pub fn background_bands(world: &World, region: &Region) -> Vec<Band> {
    let height = region.height() as i64;
    let min_y = region.min_y as i64;
    let max_y = region.max_y as i64;
    let underground = world.underground_level() as i64;
    let cavern = world.cavern_level() as i64;
    let edge_of_rock = world.height() as i64 - EDGE_OF_ROCK_OFFSET;

    let mut bands = Vec::with_capacity(4);
    let mut cursor = 0i64;
    let mut push = |color: GlobalColor, end: i64, cursor: &mut i64| {
        let end = end.clamp(*cursor, height);
        bands.push(Band { color, start: *cursor as u32, end: end as u32 });
        *cursor = end;
    };

    if min_y <= underground {
        push(GlobalColor::Sky, underground - min_y, &mut cursor);
    }
    if max_y > underground && min_y <= cavern {
        push(GlobalColor::Earth, cavern - min_y, &mut cursor);
    }
    if max_y > cavern && min_y <= edge_of_rock {
        push(GlobalColor::Rock, edge_of_rock - min_y, &mut cursor);
    }
    if max_y > edge_of_rock {
        push(GlobalColor::Hell, height, &mut cursor);
    }

    bands
}

pub(super) fn rasterize_background(world: &World, region: &Region, palette: &ColorTable) -> LayerRaster {
    let mut image = RgbaImage::new(region.width(), region.height());
    if region.is_empty() {
        return LayerRaster { kind: LayerKind::Background, image };
    }

    for band in background_bands(world, region) {
        fill_rows(&mut image, band.start, band.end, palette.global(band.color));
    }

    LayerRaster { kind: LayerKind::Background, image }
}

fn fill_rows(image: &mut RgbaImage, start: u32, end: u32, color: Rgba<u8>) {
    let width = image.width();
    for y in start..end {
        for x in 0..width {
            image.put_pixel(x, y, color);
        }
    }
}
