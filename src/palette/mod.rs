//! Palette lookup for map rendering.
//!
//! A [`ColorTable`] maps typed keys to RGBA colors in four categories:
//! `Globals` (background bands, liquids, wires), `Blocks`, `Walls` and
//! `Paints`. The table is built once and passed by reference to every
//! rasterizer; it is never mutated during a render.
//!
//! Lookups never fail. A key with no entry resolves to fully transparent
//! black, so an unknown block simply does not show up on the map. Palette
//! *files* are validated strictly when loaded: an unrecognized global name
//! or a non-numeric id is reported as a [`PaletteError`] instead of being
//! silently ignored.
//!
//! # Palette file format
//!
//! TOML or JSON, one table per category. Colors are hex strings or
//! `[r, g, b]` / `[r, g, b, a]` arrays:
//!
//! ```toml
//! [Globals]
//! Sky = "#84AAF8"
//! Water = [9, 61, 191, 192]
//!
//! [Blocks]
//! 0 = "#976B4B"
//!
//! [Paints]
//! 1 = "#FF0000"
//! ```

mod builtin;

use image::Rgba;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::color::{parse_hex_color, ColorError, TRANSPARENT};

/// Palette loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PaletteError {
    /// File I/O error
    #[error("Failed to read palette {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML parsing error
    #[error("Failed to parse palette TOML: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON parsing error
    #[error("Failed to parse palette JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Palette file extension is neither .toml nor .json
    #[error("Unsupported palette file type: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    /// A `Globals` entry names something the renderer never draws
    #[error("Unknown global color '{0}'")]
    UnknownGlobal(String),
    /// A numeric category has a key that is not a valid id
    #[error("Invalid {category} id '{key}'")]
    InvalidId { category: Category, key: String },
    /// A color value could not be parsed
    #[error("Invalid color for {category} '{key}': {source}")]
    InvalidColor {
        category: Category,
        key: String,
        #[source]
        source: ColorError,
    },
}

/// Palette category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Globals,
    Blocks,
    Walls,
    Paints,
}

impl Category {
    pub const ALL: [Category; 4] =
        [Category::Globals, Category::Blocks, Category::Walls, Category::Paints];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Globals => "Globals",
            Category::Blocks => "Blocks",
            Category::Walls => "Walls",
            Category::Paints => "Paints",
        }
    }

    /// Parse a category name as it appears in palette files.
    pub fn from_name(s: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Named colors in the `Globals` category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GlobalColor {
    Sky,
    Earth,
    Rock,
    Hell,
    Water,
    Lava,
    Honey,
    /// Red wire
    Wire,
    /// Blue wire
    Wire1,
    /// Green wire
    Wire2,
    /// Yellow wire
    Wire3,
}

impl GlobalColor {
    pub const ALL: [GlobalColor; 11] = [
        GlobalColor::Sky,
        GlobalColor::Earth,
        GlobalColor::Rock,
        GlobalColor::Hell,
        GlobalColor::Water,
        GlobalColor::Lava,
        GlobalColor::Honey,
        GlobalColor::Wire,
        GlobalColor::Wire1,
        GlobalColor::Wire2,
        GlobalColor::Wire3,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GlobalColor::Sky => "Sky",
            GlobalColor::Earth => "Earth",
            GlobalColor::Rock => "Rock",
            GlobalColor::Hell => "Hell",
            GlobalColor::Water => "Water",
            GlobalColor::Lava => "Lava",
            GlobalColor::Honey => "Honey",
            GlobalColor::Wire => "Wire",
            GlobalColor::Wire1 => "Wire1",
            GlobalColor::Wire2 => "Wire2",
            GlobalColor::Wire3 => "Wire3",
        }
    }

    pub fn from_name(s: &str) -> Option<GlobalColor> {
        GlobalColor::ALL.into_iter().find(|g| g.name() == s)
    }
}

/// A typed palette key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorKey {
    Global(GlobalColor),
    Block(u16),
    Wall(u16),
    Paint(u8),
}

impl ColorKey {
    pub fn category(&self) -> Category {
        match self {
            ColorKey::Global(_) => Category::Globals,
            ColorKey::Block(_) => Category::Blocks,
            ColorKey::Wall(_) => Category::Walls,
            ColorKey::Paint(_) => Category::Paints,
        }
    }

    /// Build a key from a category and its textual form (`"Sky"`, `"42"`).
    pub fn parse(category: Category, key: &str) -> Option<ColorKey> {
        match category {
            Category::Globals => GlobalColor::from_name(key).map(ColorKey::Global),
            Category::Blocks => key.parse().ok().map(ColorKey::Block),
            Category::Walls => key.parse().ok().map(ColorKey::Wall),
            Category::Paints => key.parse().ok().map(ColorKey::Paint),
        }
    }
}

/// Immutable color lookup shared by all rasterizers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorTable {
    globals: HashMap<GlobalColor, Rgba<u8>>,
    blocks: HashMap<u16, Rgba<u8>>,
    walls: HashMap<u16, Rgba<u8>>,
    paints: HashMap<u8, Rgba<u8>>,
}

impl ColorTable {
    /// An empty table; every lookup resolves to transparent.
    pub fn new() -> Self {
        Self::default()
    }

    /// The default palette shipped with the crate.
    pub fn builtin() -> Self {
        builtin::builtin_table()
    }

    /// Resolve a key, falling back to transparent on a miss.
    pub fn resolve(&self, key: ColorKey) -> Rgba<u8> {
        let hit = match key {
            ColorKey::Global(g) => self.globals.get(&g),
            ColorKey::Block(id) => self.blocks.get(&id),
            ColorKey::Wall(id) => self.walls.get(&id),
            ColorKey::Paint(id) => self.paints.get(&id),
        };
        hit.copied().unwrap_or(TRANSPARENT)
    }

    /// Resolve by category and textual key.
    ///
    /// Keys that do not parse for the category are misses, not errors.
    pub fn resolve_named(&self, category: Category, key: &str) -> Rgba<u8> {
        ColorKey::parse(category, key).map(|k| self.resolve(k)).unwrap_or(TRANSPARENT)
    }

    pub fn global(&self, global: GlobalColor) -> Rgba<u8> {
        self.resolve(ColorKey::Global(global))
    }

    pub fn set(&mut self, key: ColorKey, color: Rgba<u8>) {
        match key {
            ColorKey::Global(g) => self.set_global(g, color),
            ColorKey::Block(id) => self.set_block(id, color),
            ColorKey::Wall(id) => self.set_wall(id, color),
            ColorKey::Paint(id) => self.set_paint(id, color),
        }
    }

    /// Builder-style [`ColorTable::set`].
    pub fn with(mut self, key: ColorKey, color: Rgba<u8>) -> Self {
        self.set(key, color);
        self
    }

    pub fn set_global(&mut self, global: GlobalColor, color: Rgba<u8>) {
        self.globals.insert(global, color);
    }

    pub fn set_block(&mut self, id: u16, color: Rgba<u8>) {
        self.blocks.insert(id, color);
    }

    pub fn set_wall(&mut self, id: u16, color: Rgba<u8>) {
        self.walls.insert(id, color);
    }

    pub fn set_paint(&mut self, id: u8, color: Rgba<u8>) {
        self.paints.insert(id, color);
    }

    /// Number of entries in a category.
    pub fn len(&self, category: Category) -> usize {
        match category {
            Category::Globals => self.globals.len(),
            Category::Blocks => self.blocks.len(),
            Category::Walls => self.walls.len(),
            Category::Paints => self.paints.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.len(*c) == 0)
    }

    /// Global colors with no entry in this table.
    pub fn missing_globals(&self) -> Vec<GlobalColor> {
        GlobalColor::ALL.into_iter().filter(|g| !self.globals.contains_key(g)).collect()
    }

    /// Load a palette file, choosing the parser by extension.
    pub fn load(path: &Path) -> Result<Self, PaletteError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| PaletteError::Io { path: path.to_path_buf(), source })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            _ => Err(PaletteError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, PaletteError> {
        let raw: RawPalette = toml::from_str(s)?;
        raw.validate()
    }

    pub fn from_json_str(s: &str) -> Result<Self, PaletteError> {
        let raw: RawPalette = serde_json::from_str(s)?;
        raw.validate()
    }
}

/// A color value as written in a palette file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawColor {
    Hex(String),
    Rgba([u8; 4]),
    Rgb([u8; 3]),
}

impl RawColor {
    fn to_rgba(&self) -> Result<Rgba<u8>, ColorError> {
        match self {
            RawColor::Hex(s) => parse_hex_color(s),
            RawColor::Rgba(c) => Ok(Rgba(*c)),
            RawColor::Rgb([r, g, b]) => Ok(Rgba([*r, *g, *b, 255])),
        }
    }
}

/// Unvalidated palette file contents.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPalette {
    #[serde(default, rename = "Globals")]
    globals: BTreeMap<String, RawColor>,
    #[serde(default, rename = "Blocks")]
    blocks: BTreeMap<String, RawColor>,
    #[serde(default, rename = "Walls")]
    walls: BTreeMap<String, RawColor>,
    #[serde(default, rename = "Paints")]
    paints: BTreeMap<String, RawColor>,
}

impl RawPalette {
    fn validate(self) -> Result<ColorTable, PaletteError> {
        let mut table = ColorTable::new();
        let sections = [
            (Category::Globals, &self.globals),
            (Category::Blocks, &self.blocks),
            (Category::Walls, &self.walls),
            (Category::Paints, &self.paints),
        ];

        for (category, entries) in sections {
            for (key, value) in entries {
                let color_key = ColorKey::parse(category, key).ok_or_else(|| match category {
                    Category::Globals => PaletteError::UnknownGlobal(key.clone()),
                    _ => PaletteError::InvalidId { category, key: key.clone() },
                })?;
                let color = value.to_rgba().map_err(|source| PaletteError::InvalidColor {
                    category,
                    key: key.clone(),
                    source,
                })?;
                table.set(color_key, color);
            }
        }

        Ok(table)
    }
}
