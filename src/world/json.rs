//! JSON world dumps.
//!
//! Reads a world exported as a single JSON document:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "width": 2, "height": 2,
//!   "underground_level": 1, "cavern_level": 1,
//!   "tiles": [{}, {"block": {"type": 0}}, {}, {"wall": {"type": 2, "paint": 5}}]
//! }
//! ```
//!
//! `tiles` is column-major and must hold exactly `width * height` entries.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::{Tile, World, WorldLoadError, WorldSize, WorldSource};

/// Newest dump format this reader understands.
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// On-disk layout of a JSON world dump.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldDump {
    pub format_version: u32,
    pub width: u32,
    pub height: u32,
    pub underground_level: u32,
    pub cavern_level: u32,
    pub tiles: Vec<Tile>,
}

impl WorldDump {
    /// Snapshot a world into dump form.
    pub fn from_world(world: &World) -> Self {
        Self {
            format_version: SUPPORTED_FORMAT_VERSION,
            width: world.width(),
            height: world.height(),
            underground_level: world.underground_level(),
            cavern_level: world.cavern_level(),
            tiles: world.tiles().to_vec(),
        }
    }
}

/// Just enough of a dump to learn its version before trusting the tile layout.
#[derive(Deserialize)]
struct DumpHeader {
    format_version: u32,
}

/// [`WorldSource`] reading JSON world dumps.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonWorldSource;

impl JsonWorldSource {
    pub fn new() -> Self {
        Self
    }

    /// Parse a dump already held in memory. `path` is only used for error messages.
    ///
    /// The version is checked first, so a newer dump with a different tile
    /// layout is reported as unsupported rather than corrupt.
    pub fn parse_str(&self, contents: &str, path: &Path) -> Result<World, WorldLoadError> {
        parse_dump(contents.as_bytes(), path)
    }
}

impl WorldSource for JsonWorldSource {
    fn load(&self, path: &Path) -> Result<World, WorldLoadError> {
        if !path.exists() {
            return Err(WorldLoadError::NotFound(path.to_path_buf()));
        }
        let contents =
            fs::read(path).map_err(|source| WorldLoadError::Io { path: path.to_path_buf(), source })?;
        parse_dump(&contents, path)
    }
}

fn classify_json_error(e: serde_json::Error, path: &Path) -> WorldLoadError {
    if e.is_eof() {
        WorldLoadError::Truncated { path: path.to_path_buf(), message: e.to_string() }
    } else if e.is_io() {
        WorldLoadError::Io { path: path.to_path_buf(), source: e.into() }
    } else {
        WorldLoadError::Corrupt { path: path.to_path_buf(), message: e.to_string() }
    }
}

fn parse_dump(contents: &[u8], path: &Path) -> Result<World, WorldLoadError> {
    let header: DumpHeader =
        serde_json::from_slice(contents).map_err(|e| classify_json_error(e, path))?;
    check_version(header.format_version, path)?;

    let dump: WorldDump = serde_json::from_slice(contents).map_err(|e| classify_json_error(e, path))?;
    into_world(dump, path)
}

fn check_version(version: u32, path: &Path) -> Result<(), WorldLoadError> {
    if version == 0 || version > SUPPORTED_FORMAT_VERSION {
        return Err(WorldLoadError::UnsupportedVersion { path: path.to_path_buf(), version });
    }
    Ok(())
}

fn into_world(dump: WorldDump, path: &Path) -> Result<World, WorldLoadError> {
    check_version(dump.format_version, path)?;

    let size = WorldSize::new(dump.width, dump.height);
    let expected = size.tile_count();
    let actual = dump.tiles.len();
    if actual < expected {
        return Err(WorldLoadError::Truncated {
            path: path.to_path_buf(),
            message: format!("expected {} tiles, found {}", expected, actual),
        });
    }
    if actual > expected {
        return Err(WorldLoadError::Corrupt {
            path: path.to_path_buf(),
            message: format!("expected {} tiles, found {}", expected, actual),
        });
    }

    World::from_tiles(size, dump.underground_level, dump.cavern_level, dump.tiles).ok_or_else(
        || WorldLoadError::Corrupt {
            path: path.to_path_buf(),
            message: "tile grid does not match world size".to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Block, Wall};
    use tempfile::TempDir;

    fn sample_json() -> &'static str {
        r#"{
            "format_version": 1,
            "width": 2, "height": 2,
            "underground_level": 1, "cavern_level": 1,
            "tiles": [{}, {"block": {"type": 0}}, {}, {"wall": {"type": 2, "paint": 5}}]
        }"#
    }

    #[test]
    fn test_parse_valid_dump() {
        let world = JsonWorldSource::new().parse_str(sample_json(), Path::new("w.json")).unwrap();
        assert_eq!(world.size(), WorldSize::new(2, 2));
        assert_eq!(world.tile(0, 1).and_then(|t| t.block), Some(Block::new(0)));
        assert_eq!(world.tile(1, 1).and_then(|t| t.wall), Some(Wall::painted(2, 5)));
        assert!(world.tile(1, 0).map(Tile::is_empty).unwrap_or(false));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = JsonWorldSource::new().load(&temp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, WorldLoadError::NotFound(_)));
    }

    #[test]
    fn test_load_truncated_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cut.json");
        let text = sample_json();
        std::fs::write(&path, &text[..text.len() / 2]).unwrap();
        let err = JsonWorldSource::new().load(&path).unwrap_err();
        assert!(matches!(err, WorldLoadError::Truncated { .. }), "got {:?}", err);
    }

    #[test]
    fn test_load_garbage_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("junk.wld");
        std::fs::write(&path, b"\x00relogic\x01binary").unwrap();
        let err = JsonWorldSource::new().load(&path).unwrap_err();
        assert!(matches!(err, WorldLoadError::Corrupt { .. }), "got {:?}", err);
    }

    #[test]
    fn test_unsupported_version() {
        let json = sample_json().replace("\"format_version\": 1", "\"format_version\": 9");
        let err = JsonWorldSource::new().parse_str(&json, Path::new("w.json")).unwrap_err();
        assert!(matches!(err, WorldLoadError::UnsupportedVersion { version: 9, .. }));
    }

    #[test]
    fn test_newer_version_with_changed_layout_is_unsupported() {
        let json = r#"{"format_version":2,"width":1,"height":1,"underground_level":0,"cavern_level":0,"tiles":[[7, 0, 3]]}"#;
        let err = JsonWorldSource::new().parse_str(json, Path::new("w.json")).unwrap_err();
        assert!(matches!(err, WorldLoadError::UnsupportedVersion { version: 2, .. }), "got {:?}", err);
    }

    #[test]
    fn test_short_tile_list_is_truncated() {
        let json = r#"{"format_version":1,"width":2,"height":2,"underground_level":0,"cavern_level":1,"tiles":[{}]}"#;
        let err = JsonWorldSource::new().parse_str(json, Path::new("w.json")).unwrap_err();
        assert!(matches!(err, WorldLoadError::Truncated { .. }));
    }

    #[test]
    fn test_dump_round_trip_through_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("world.json");
        let mut world = World::new(WorldSize::new(3, 2), 0, 1);
        world.set_tile(2, 1, Tile::default().with_block(Block::painted(4, 1)));
        std::fs::write(&path, serde_json::to_string(&WorldDump::from_world(&world)).unwrap())
            .unwrap();

        let loaded = JsonWorldSource::new().load(&path).unwrap();
        assert_eq!(loaded, world);
    }
}
