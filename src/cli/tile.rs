//! Tile command implementation

use std::process::ExitCode;

use crate::pyramid::{descriptor_path_for, DeepZoomGenerator, PyramidError, PyramidGenerator, TileSettings};

use super::{TileArgs, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the tile command
pub fn run_tile(args: &TileArgs) -> ExitCode {
    let settings = TileSettings {
        tile_size: args.tile_size,
        overlap: args.overlap,
        format: args.format,
        quality: args.quality,
        filter: args.filter,
    };
    let descriptor = args.output.clone().unwrap_or_else(|| descriptor_path_for(&args.input));

    match DeepZoomGenerator::new().generate(&args.input, &descriptor, &settings) {
        Ok(summary) => {
            println!(
                "Wrote {} ({}x{}, {} levels, {} tiles in {})",
                summary.descriptor.display(),
                summary.width,
                summary.height,
                summary.levels,
                summary.tiles,
                summary.tiles_dir.display()
            );
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e @ PyramidError::InvalidSettings(_)) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_INVALID_ARGS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
