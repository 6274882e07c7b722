//! Zoomable tile pyramids.
//!
//! After the map PNG is written, a [`PyramidGenerator`] can cut it into a
//! multi-resolution tile set for progressive viewers. The crate ships a
//! Deep Zoom implementation ([`DeepZoomGenerator`]).

mod deepzoom;

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use deepzoom::{level_count, level_dimensions, tile_bounds, DeepZoomGenerator};

/// Error type for pyramid generation
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PyramidError {
    /// Settings that cannot produce a pyramid
    #[error("Invalid tile settings: {0}")]
    InvalidSettings(String),
    /// Source image has no pixels
    #[error("Cannot tile an empty image")]
    EmptyImage,
    /// Source image could not be read or a tile could not be encoded
    #[error("Image error for {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// Filesystem error
    #[error("IO error for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Tile image format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TileFormat {
    #[default]
    Png,
    #[serde(alias = "jpeg")]
    #[value(alias = "jpeg")]
    Jpg,
}

impl TileFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TileFormat::Png => "png",
            TileFormat::Jpg => "jpg",
        }
    }
}

/// Resampling filter used when shrinking levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFilter {
    Nearest,
    Bilinear,
    #[default]
    Bicubic,
    #[serde(alias = "antialias")]
    Lanczos,
}

impl ResizeFilter {
    pub fn filter_type(&self) -> FilterType {
        match self {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Bilinear => FilterType::Triangle,
            ResizeFilter::Bicubic => FilterType::CatmullRom,
            ResizeFilter::Lanczos => FilterType::Lanczos3,
        }
    }
}

/// Deterministic tiling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileSettings {
    /// Tile edge length in pixels
    pub tile_size: u32,
    /// Pixels shared with each neighbouring tile
    pub overlap: u32,
    pub format: TileFormat,
    /// Encoder quality in `[0.0, 1.0]`; only affects JPEG tiles
    pub quality: f32,
    pub filter: ResizeFilter,
}

impl Default for TileSettings {
    fn default() -> Self {
        Self {
            tile_size: 128,
            overlap: 2,
            format: TileFormat::Png,
            quality: 1.0,
            filter: ResizeFilter::Bicubic,
        }
    }
}

impl TileSettings {
    /// Reject settings no pyramid can be built from.
    pub fn validate(&self) -> Result<(), PyramidError> {
        if self.tile_size == 0 {
            return Err(PyramidError::InvalidSettings("tile_size must be positive".to_string()));
        }
        if self.overlap >= self.tile_size {
            return Err(PyramidError::InvalidSettings(format!(
                "overlap {} must be smaller than tile_size {}",
                self.overlap, self.tile_size
            )));
        }
        if !(0.0..=1.0).contains(&self.quality) {
            return Err(PyramidError::InvalidSettings(format!(
                "quality {} must be between 0.0 and 1.0",
                self.quality
            )));
        }
        Ok(())
    }
}

/// What a pyramid run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyramidSummary {
    /// Descriptor file (`.dzi`)
    pub descriptor: PathBuf,
    /// Directory holding one subdirectory per level
    pub tiles_dir: PathBuf,
    pub levels: u32,
    pub tiles: usize,
    pub width: u32,
    pub height: u32,
}

/// Anything that can turn a finished image into a tile pyramid.
pub trait PyramidGenerator {
    /// Tile the image at `image_path`, writing the descriptor to
    /// `descriptor_path` and tiles next to it.
    fn generate(
        &self,
        image_path: &Path,
        descriptor_path: &Path,
        settings: &TileSettings,
    ) -> Result<PyramidSummary, PyramidError>;
}

/// Default descriptor path for a map image: `map.png` becomes `map.dzi`.
pub fn descriptor_path_for(image_path: &Path) -> PathBuf {
    image_path.with_extension("dzi")
}

/// Tile directory for a descriptor: `map.dzi` becomes `map_files/`.
pub fn tiles_dir_for(descriptor_path: &Path) -> PathBuf {
    let stem = descriptor_path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    descriptor_path.with_file_name(format!("{}_files", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = TileSettings::default();
        assert_eq!(settings.tile_size, 128);
        assert_eq!(settings.overlap, 2);
        assert_eq!(settings.format, TileFormat::Png);
        assert_eq!(settings.quality, 1.0);
        assert_eq!(settings.filter, ResizeFilter::Bicubic);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_settings() {
        let zero = TileSettings { tile_size: 0, ..TileSettings::default() };
        assert!(matches!(zero.validate(), Err(PyramidError::InvalidSettings(_))));

        let overlap = TileSettings { tile_size: 4, overlap: 4, ..TileSettings::default() };
        assert!(matches!(overlap.validate(), Err(PyramidError::InvalidSettings(_))));

        let quality = TileSettings { quality: 1.5, ..TileSettings::default() };
        assert!(matches!(quality.validate(), Err(PyramidError::InvalidSettings(_))));
    }

    #[test]
    fn test_paths() {
        assert_eq!(descriptor_path_for(Path::new("out/map.png")), PathBuf::from("out/map.dzi"));
        assert_eq!(tiles_dir_for(Path::new("out/map.dzi")), PathBuf::from("out/map_files"));
    }

    #[test]
    fn test_settings_deserialize() {
        let settings: TileSettings = toml::from_str(
            r#"
            tile_size = 256
            overlap = 1
            format = "jpeg"
            quality = 0.8
            filter = "antialias"
            "#,
        )
        .unwrap();
        assert_eq!(settings.format, TileFormat::Jpg);
        assert_eq!(settings.filter, ResizeFilter::Lanczos);
        assert_eq!(settings.tile_size, 256);
    }
}
