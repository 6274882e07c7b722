//! worldmap - Library for rendering sandbox world saves to map images
//!
//! This library provides functionality to:
//! - Load world dumps through a pluggable [`world::WorldSource`]
//! - Rasterize background, wall, liquid, block and wire layers
//! - Composite the layers into a single RGBA map and write it as PNG
//! - Cut the finished map into a Deep Zoom tile pyramid

pub mod cli;
pub mod color;
pub mod composition;
pub mod config;
pub mod error;
pub mod output;
pub mod palette;
pub mod pipeline;
pub mod progress;
pub mod pyramid;
pub mod raster;
pub mod region;
pub mod world;

pub use error::MapError;
pub use pipeline::{render_world, MapPipeline, RenderSummary};
