//! Configuration schema types for map render files
//!
//! A render config is a TOML document:
//!
//! ```toml
//! [draw]
//! background = true
//! blocks = true
//! walls = true
//! liquids = true
//! wires = true
//! paint = true
//! min_x = 1000
//! region_width = 800
//!
//! [world]
//! file_path = "worlds/forest.json"
//!
//! [output]
//! file_path = "out/forest.png"
//!
//! [deep_zoom]
//! enabled = true
//! tile_size = 128
//! tile_overlap = 2
//! tile_format = "png"
//! image_quality = 1.0
//! resize_filter = "bicubic"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::pyramid::{ResizeFilter, TileFormat, TileSettings};
use crate::raster::{LayerSelection, RasterOptions};
use crate::region::RegionRequest;

/// Layer toggles and region bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawConfig {
    #[serde(default = "default_true")]
    pub background: bool,
    #[serde(default = "default_true")]
    pub blocks: bool,
    #[serde(default = "default_true")]
    pub walls: bool,
    #[serde(default = "default_true")]
    pub liquids: bool,
    #[serde(default = "default_true")]
    pub wires: bool,
    /// Draw paint colors over block and wall types
    #[serde(default = "default_true")]
    pub paint: bool,
    /// Left edge of the render region, in tiles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_x: Option<i64>,
    /// Top edge of the render region, in tiles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_y: Option<i64>,
    /// Region width in tiles; missing or 0 reaches the world edge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_width: Option<u32>,
    /// Region height in tiles; missing or 0 reaches the world edge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_height: Option<u32>,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            background: true,
            blocks: true,
            walls: true,
            liquids: true,
            wires: true,
            paint: true,
            min_x: None,
            min_y: None,
            region_width: None,
            region_height: None,
        }
    }
}

impl DrawConfig {
    /// Layers switched on.
    pub fn layers(&self) -> LayerSelection {
        LayerSelection {
            background: self.background,
            walls: self.walls,
            liquids: self.liquids,
            blocks: self.blocks,
            wires: self.wires,
        }
    }

    /// Region bounds as given, before clamping to a world.
    pub fn region(&self) -> RegionRequest {
        RegionRequest {
            min_x: self.min_x,
            min_y: self.min_y,
            width: self.region_width,
            height: self.region_height,
        }
    }
}

/// World file section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub file_path: PathBuf,
}

/// Output image section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Destination PNG
    pub file_path: PathBuf,
}

/// Deep Zoom pyramid section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepZoomConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    #[serde(default = "default_tile_overlap")]
    pub tile_overlap: u32,
    #[serde(default)]
    pub tile_format: TileFormat,
    #[serde(default = "default_image_quality")]
    pub image_quality: f32,
    #[serde(default)]
    pub resize_filter: ResizeFilter,
}

impl Default for DeepZoomConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tile_size: default_tile_size(),
            tile_overlap: default_tile_overlap(),
            tile_format: TileFormat::default(),
            image_quality: default_image_quality(),
            resize_filter: ResizeFilter::default(),
        }
    }
}

impl DeepZoomConfig {
    pub fn settings(&self) -> TileSettings {
        TileSettings {
            tile_size: self.tile_size,
            overlap: self.tile_overlap,
            format: self.tile_format,
            quality: self.image_quality,
            filter: self.resize_filter,
        }
    }
}

/// Palette override section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// TOML or JSON palette; the built-in palette is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
}

/// Rendering strategy section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Scan tile layers on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,
}

fn default_true() -> bool {
    true
}

fn default_tile_size() -> u32 {
    128
}

fn default_tile_overlap() -> u32 {
    2
}

fn default_image_quality() -> f32 {
    1.0
}

/// Complete render configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default)]
    pub draw: DrawConfig,
    pub world: WorldConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub deep_zoom: DeepZoomConfig,
    #[serde(default)]
    pub palette: PaletteConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Config validation error with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Dotted path to the invalid field (e.g., "deep_zoom.tile_size")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' {}", self.field, self.message)
    }
}

impl MapConfig {
    /// Minimal config rendering every layer of `world` into `output`.
    pub fn new(world: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            world: WorldConfig { file_path: world.into() },
            output: OutputConfig { file_path: output.into() },
            ..Self::default()
        }
    }

    pub fn raster_options(&self) -> RasterOptions {
        RasterOptions { draw_paint: self.draw.paint, parallel: self.render.parallel }
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigValidationError { field: field.to_string(), message })
        };

        if self.draw.layers().is_empty() {
            push("draw", "must enable at least one layer".to_string());
        }
        if self.world.file_path.as_os_str().is_empty() {
            push("world.file_path", "must be a non-empty path".to_string());
        }
        if self.output.file_path.as_os_str().is_empty() {
            push("output.file_path", "must be a non-empty path".to_string());
        }

        // Tiling parameters only matter when a pyramid will be built
        if self.deep_zoom.enabled {
            let dz = &self.deep_zoom;
            if dz.tile_size == 0 {
                push("deep_zoom.tile_size", "must be a positive integer".to_string());
            } else if dz.tile_overlap >= dz.tile_size {
                push(
                    "deep_zoom.tile_overlap",
                    format!("must be smaller than tile_size ({})", dz.tile_size),
                );
            }
            if !(0.0..=1.0).contains(&dz.image_quality) {
                push("deep_zoom.image_quality", "must be between 0.0 and 1.0".to_string());
            }
        }

        errors
    }
}
