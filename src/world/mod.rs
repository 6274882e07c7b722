//! World model consumed by the renderer.
//!
//! A [`World`] is an immutable grid of [`Tile`]s plus the two depth markers
//! (`underground_level`, `cavern_level`) the background layer needs. Parsing
//! of native save files lives outside this crate; anything that can produce
//! a `World` plugs in through the [`WorldSource`] trait.

pub mod json;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use json::{JsonWorldSource, WorldDump};

/// Error returned when a world cannot be loaded.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WorldLoadError {
    /// The world file does not exist
    #[error("World file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The world file exists but could not be read
    #[error("Failed to read world file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file ended before the world was complete
    #[error("World file {} is truncated: {message}", path.display())]
    Truncated { path: PathBuf, message: String },
    /// The file is not a recognized world dump
    #[error("World file {} is corrupt: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },
    /// The file declares a format version this build cannot read
    #[error("World file {} has unsupported format version {version}", path.display())]
    UnsupportedVersion { path: PathBuf, version: u32 },
}

/// Anything that can turn a path into a [`World`].
pub trait WorldSource {
    /// Load the world stored at `path`.
    fn load(&self, path: &Path) -> Result<World, WorldLoadError>;
}

/// World dimensions in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldSize {
    pub width: u32,
    pub height: u32,
}

impl WorldSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of tiles in a full grid of this size.
    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// A solid block occupying a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block type identifier
    #[serde(rename = "type")]
    pub type_id: u16,
    /// Paint applied to the block; 0 means unpainted
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub paint: Option<u8>,
}

impl Block {
    pub fn new(type_id: u16) -> Self {
        Self { type_id, paint: None }
    }

    pub fn painted(type_id: u16, paint: u8) -> Self {
        Self { type_id, paint: Some(paint) }
    }

    /// Paint id if the block carries a real paint.
    pub fn paint_id(&self) -> Option<u8> {
        self.paint.filter(|&p| p != 0)
    }
}

/// A background wall behind a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wall {
    /// Wall type identifier
    #[serde(rename = "type")]
    pub type_id: u16,
    /// Paint applied to the wall; 0 means unpainted
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub paint: Option<u8>,
}

impl Wall {
    pub fn new(type_id: u16) -> Self {
        Self { type_id, paint: None }
    }

    pub fn painted(type_id: u16, paint: u8) -> Self {
        Self { type_id, paint: Some(paint) }
    }

    /// Paint id if the wall carries a real paint.
    pub fn paint_id(&self) -> Option<u8> {
        self.paint.filter(|&p| p != 0)
    }
}

/// Kind of liquid in a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiquidType {
    #[default]
    None,
    Water,
    Lava,
    Honey,
}

/// Liquid content of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Liquid {
    #[serde(rename = "type")]
    pub kind: LiquidType,
    /// Fill level; carried through but not rendered
    #[serde(default)]
    pub amount: u8,
}

impl Liquid {
    pub fn new(kind: LiquidType) -> Self {
        Self { kind, amount: 255 }
    }
}

/// The four wire channels a tile can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Wiring {
    #[serde(default)]
    pub red: bool,
    #[serde(default)]
    pub blue: bool,
    #[serde(default)]
    pub green: bool,
    #[serde(default)]
    pub yellow: bool,
}

impl Wiring {
    pub fn red() -> Self {
        Self { red: true, ..Self::default() }
    }

    pub fn blue() -> Self {
        Self { blue: true, ..Self::default() }
    }

    pub fn green() -> Self {
        Self { green: true, ..Self::default() }
    }

    pub fn yellow() -> Self {
        Self { yellow: true, ..Self::default() }
    }

    pub fn any(&self) -> bool {
        self.red || self.blue || self.green || self.yellow
    }
}

/// One cell of the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub block: Option<Block>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub wall: Option<Wall>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub liquid: Option<Liquid>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub wiring: Option<Wiring>,
}

impl Tile {
    pub fn with_block(mut self, block: Block) -> Self {
        self.block = Some(block);
        self
    }

    pub fn with_wall(mut self, wall: Wall) -> Self {
        self.wall = Some(wall);
        self
    }

    pub fn with_liquid(mut self, kind: LiquidType) -> Self {
        self.liquid = Some(Liquid::new(kind));
        self
    }

    pub fn with_wiring(mut self, wiring: Wiring) -> Self {
        self.wiring = Some(wiring);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.block.is_none() && self.wall.is_none() && self.liquid.is_none() && self.wiring.is_none()
    }
}

/// A loaded world: dimensions, depth markers and the tile grid.
///
/// Tiles are stored column-major (`x * height + y`), matching the column-wise
/// scans the layer rasterizers perform.
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    size: WorldSize,
    underground_level: u32,
    cavern_level: u32,
    tiles: Vec<Tile>,
}

impl World {
    /// Create an empty world (every tile blank).
    pub fn new(size: WorldSize, underground_level: u32, cavern_level: u32) -> Self {
        Self { size, underground_level, cavern_level, tiles: vec![Tile::default(); size.tile_count()] }
    }

    /// Build a world from a column-major tile vector.
    ///
    /// Returns `None` if the tile count does not match `size`.
    pub fn from_tiles(
        size: WorldSize,
        underground_level: u32,
        cavern_level: u32,
        tiles: Vec<Tile>,
    ) -> Option<Self> {
        if tiles.len() != size.tile_count() {
            return None;
        }
        Some(Self { size, underground_level, cavern_level, tiles })
    }

    pub fn size(&self) -> WorldSize {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Y coordinate where the underground layer starts.
    pub fn underground_level(&self) -> u32 {
        self.underground_level
    }

    /// Y coordinate where the cavern layer starts.
    pub fn cavern_level(&self) -> u32 {
        self.cavern_level
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.size.width && y < self.size.height {
            Some(x as usize * self.size.height as usize + y as usize)
        } else {
            None
        }
    }

    /// Tile at `(x, y)`, or `None` outside the grid.
    pub fn tile(&self, x: u32, y: u32) -> Option<&Tile> {
        self.index(x, y).map(|i| &self.tiles[i])
    }

    /// Replace the tile at `(x, y)`. Out-of-range writes are ignored.
    pub fn set_tile(&mut self, x: u32, y: u32, tile: Tile) {
        if let Some(i) = self.index(x, y) {
            self.tiles[i] = tile;
        }
    }

    /// All tiles in column-major order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_is_blank() {
        let world = World::new(WorldSize::new(4, 3), 1, 2);
        assert_eq!(world.tiles().len(), 12);
        assert!(world.tiles().iter().all(Tile::is_empty));
    }

    #[test]
    fn test_tile_lookup_out_of_range() {
        let world = World::new(WorldSize::new(4, 3), 1, 2);
        assert!(world.tile(3, 2).is_some());
        assert!(world.tile(4, 0).is_none());
        assert!(world.tile(0, 3).is_none());
    }

    #[test]
    fn test_set_tile_column_major() {
        let mut world = World::new(WorldSize::new(3, 2), 0, 1);
        let tile = Tile::default().with_block(Block::new(7));
        world.set_tile(1, 1, tile);
        assert_eq!(world.tile(1, 1), Some(&tile));
        assert_eq!(world.tiles()[3], tile);
    }

    #[test]
    fn test_from_tiles_rejects_wrong_count() {
        let size = WorldSize::new(2, 2);
        assert!(World::from_tiles(size, 0, 1, vec![Tile::default(); 3]).is_none());
        assert!(World::from_tiles(size, 0, 1, vec![Tile::default(); 4]).is_some());
    }

    #[test]
    fn test_zero_paint_is_unpainted() {
        assert_eq!(Block::painted(1, 0).paint_id(), None);
        assert_eq!(Block::painted(1, 3).paint_id(), Some(3));
        assert_eq!(Wall::painted(1, 0).paint_id(), None);
        assert_eq!(Wall::new(1).paint_id(), None);
    }

    #[test]
    fn test_tile_deserialize_sparse() {
        let tile: Tile = serde_json::from_str(r#"{"block":{"type":1,"paint":2}}"#).unwrap();
        assert_eq!(tile.block, Some(Block::painted(1, 2)));
        assert!(tile.wall.is_none());

        let tile: Tile = serde_json::from_str(r#"{"liquid":{"type":"lava"},"wiring":{"red":true}}"#).unwrap();
        assert_eq!(tile.liquid.map(|l| l.kind), Some(LiquidType::Lava));
        assert_eq!(tile.wiring, Some(Wiring::red()));
    }
}
