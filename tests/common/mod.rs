//! Shared fixtures for integration tests.
#![allow(dead_code)]

use image::RgbaImage;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use worldmap::world::{Block, LiquidType, Tile, Wall, WorldDump, Wiring, World, WorldSize};

/// 48x40 world with every kind of tile content.
///
/// Levels: underground at 10, cavern at 20. The world is shallower than
/// the hell offset, so every row below the cavern level is hell.
pub fn sample_world() -> World {
    let mut world = World::new(WorldSize::new(48, 40), 10, 20);
    for x in 0..48 {
        for y in 0..40 {
            let mut tile = Tile::default();
            if y >= 12 {
                tile = tile.with_wall(Wall::new(2));
            }
            if y >= 15 && (x + y) % 5 != 0 {
                tile = tile.with_block(Block::new(if y > 30 { 1 } else { 0 }));
            }
            if (20..24).contains(&y) && (x / 6) % 2 == 0 {
                tile = tile.with_liquid(LiquidType::Water);
            }
            if x == 17 && y == 25 {
                tile = tile.with_block(Block::painted(0, 1));
            }
            if y == 8 {
                tile = tile.with_wiring(if x % 2 == 0 { Wiring::red() } else { Wiring::blue() });
            }
            world.set_tile(x, y, tile);
        }
    }
    world
}

/// Write `world` as a JSON dump and return its path.
pub fn write_world(dir: &Path, name: &str, world: &World) -> PathBuf {
    let path = dir.join(name);
    let json = serde_json::to_string(&WorldDump::from_world(world)).unwrap();
    std::fs::write(&path, json).unwrap();
    path
}

/// SHA256 of the raw pixel buffer, independent of PNG encoder settings.
pub fn pixel_hash(image: &RgbaImage) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image.width().to_le_bytes());
    hasher.update(image.height().to_le_bytes());
    hasher.update(image.as_raw());
    format!("{:x}", hasher.finalize())
}
