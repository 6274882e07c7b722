//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod palette;
mod render;
mod tile;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::pyramid::{ResizeFilter, TileFormat};

/// Process exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// worldmap - Render sandbox world saves to PNG maps and Deep Zoom pyramids
#[derive(Parser)]
#[command(name = "worldmap")]
#[command(about = "Render sandbox world saves to PNG maps and Deep Zoom tile pyramids")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a world to a PNG map
    ///
    /// Configuration comes from either a TOML file (--config) or from
    /// --world and --output on the command line, never both.
    Render(RenderArgs),

    /// Cut an existing image into a Deep Zoom tile pyramid
    Tile(TileArgs),

    /// Validate and summarize a color palette
    Palette {
        /// Palette file (.toml or .json); the built-in palette when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct RenderArgs {
    /// Render config file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// World file to render (JSON world dump)
    #[arg(short, long)]
    pub world: Option<PathBuf>,

    /// Destination PNG
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip the sky/earth/rock/hell background bands
    #[arg(long)]
    pub no_background: bool,

    /// Skip the walls layer
    #[arg(long)]
    pub no_walls: bool,

    /// Skip the liquids layer
    #[arg(long)]
    pub no_liquids: bool,

    /// Skip the blocks layer
    #[arg(long)]
    pub no_blocks: bool,

    /// Skip the wires layer
    #[arg(long)]
    pub no_wires: bool,

    /// Ignore paint and use base block and wall colors
    #[arg(long)]
    pub no_paint: bool,

    /// Left edge of the region, in tiles
    #[arg(long, allow_hyphen_values = true)]
    pub min_x: Option<i64>,

    /// Top edge of the region, in tiles
    #[arg(long, allow_hyphen_values = true)]
    pub min_y: Option<i64>,

    /// Region width in tiles (0 = to the world edge)
    #[arg(long)]
    pub width: Option<u32>,

    /// Region height in tiles (0 = to the world edge)
    #[arg(long)]
    pub height: Option<u32>,

    /// Also build a Deep Zoom pyramid next to the PNG
    #[arg(long)]
    pub deep_zoom: bool,

    /// Scan tile layers on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Palette file (.toml or .json) replacing the built-in colors
    #[arg(long)]
    pub palette: Option<PathBuf>,

    /// Emit progress as JSON lines on stderr
    #[arg(long, conflicts_with = "quiet")]
    pub json_progress: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Show per-column progress
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct TileArgs {
    /// Image to tile
    pub input: PathBuf,

    /// Descriptor path (default: input with a .dzi extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Tile edge length in pixels
    #[arg(long, default_value = "128")]
    pub tile_size: u32,

    /// Pixels shared with neighbouring tiles
    #[arg(long, default_value = "2")]
    pub overlap: u32,

    /// Tile image format
    #[arg(long, value_enum, default_value = "png")]
    pub format: TileFormat,

    /// Encoder quality between 0.0 and 1.0 (JPEG only)
    #[arg(long, default_value = "1.0")]
    pub quality: f32,

    /// Filter used to shrink each level
    #[arg(long, value_enum, default_value = "bicubic")]
    pub filter: ResizeFilter,
}

/// Entry point for the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => render::run_render(&args),
        Commands::Tile(args) => tile::run_tile(&args),
        Commands::Palette { file } => palette::run_palette(file.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render_flags() {
        let cli = Cli::try_parse_from([
            "worldmap",
            "render",
            "--world",
            "w.json",
            "--output",
            "w.png",
            "--no-walls",
            "--min-x",
            "-5",
            "--width",
            "40",
            "--deep-zoom",
        ])
        .unwrap();

        let Commands::Render(args) = cli.command else {
            panic!("expected render command");
        };
        assert_eq!(args.world, Some(PathBuf::from("w.json")));
        assert!(args.no_walls);
        assert!(!args.no_blocks);
        assert_eq!(args.min_x, Some(-5));
        assert_eq!(args.width, Some(40));
        assert!(args.deep_zoom);
    }

    #[test]
    fn test_parse_tile_defaults() {
        let cli = Cli::try_parse_from(["worldmap", "tile", "map.png", "--format", "jpeg"]).unwrap();
        let Commands::Tile(args) = cli.command else {
            panic!("expected tile command");
        };
        assert_eq!(args.tile_size, 128);
        assert_eq!(args.overlap, 2);
        assert_eq!(args.format, TileFormat::Jpg);
        assert_eq!(args.filter, ResizeFilter::Bicubic);
    }

    #[test]
    fn test_json_progress_conflicts_with_quiet() {
        let result =
            Cli::try_parse_from(["worldmap", "render", "--config", "m.toml", "--json-progress", "--quiet"]);
        assert!(result.is_err());
    }
}
