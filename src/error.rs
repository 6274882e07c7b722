//! Top-level error for a map render

use thiserror::Error;

use crate::composition::CompositionError;
use crate::config::ConfigError;
use crate::output::OutputError;
use crate::palette::PaletteError;
use crate::pyramid::PyramidError;
use crate::world::WorldLoadError;

/// Any failure that aborts a render.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to load world: {0}")]
    WorldLoad(#[from] WorldLoadError),
    #[error("Failed to load palette: {0}")]
    Palette(#[from] PaletteError),
    #[error("Failed to composite layers: {0}")]
    Composition(#[from] CompositionError),
    #[error("Failed to write map: {0}")]
    Output(#[from] OutputError),
    #[error("Failed to build tile pyramid: {0}")]
    Pyramid(#[from] PyramidError),
}

impl MapError {
    /// True for problems with the request itself rather than with the
    /// files it points at.
    pub fn is_config(&self) -> bool {
        matches!(self, MapError::Config(_))
    }
}
