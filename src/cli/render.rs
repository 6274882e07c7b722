//! Render command implementation and helpers

use std::process::ExitCode;

use crate::config::{ConfigError, ConfigSource, MapConfig};
use crate::error::MapError;
use crate::pipeline::MapPipeline;
use crate::progress::{ConsoleProgress, JsonProgress, NullProgress, ProgressEvent, ProgressReporter};

use super::{RenderArgs, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the render command
pub fn run_render(args: &RenderArgs) -> ExitCode {
    let config = match config_from_args(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let pipeline = match MapPipeline::for_config(&config) {
        Ok(pipeline) => pipeline.with_reporter(reporter_for(args)),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(exit_code_for(&e));
        }
    };

    match pipeline.render(&config) {
        Ok(_) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            if args.quiet {
                eprintln!("Error: {}", e);
            } else {
                pipeline.reporter().report(ProgressEvent::Error { message: e.to_string() });
            }
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn exit_code_for(error: &MapError) -> u8 {
    if error.is_config() {
        EXIT_INVALID_ARGS
    } else {
        EXIT_ERROR
    }
}

fn reporter_for(args: &RenderArgs) -> Box<dyn ProgressReporter> {
    if args.quiet {
        Box::new(NullProgress::new())
    } else if args.json_progress {
        Box::new(JsonProgress::new())
    } else {
        Box::new(ConsoleProgress::new().with_verbose(args.verbose))
    }
}

/// Build the render config from the command line.
///
/// `--config` and `--world`/`--output` are the two configuration sources;
/// exactly one must be given. Layer, region and tiling flags apply on top
/// of whichever source was chosen.
pub(crate) fn config_from_args(args: &RenderArgs) -> Result<MapConfig, ConfigError> {
    let inline = match (&args.world, &args.output) {
        (None, None) => None,
        (Some(world), Some(output)) => Some(MapConfig::new(world, output)),
        (Some(_), None) => {
            return Err(ConfigError::Validation(vec!["'--output' is required with '--world'".to_string()]))
        }
        (None, Some(_)) => {
            return Err(ConfigError::Validation(vec!["'--world' is required with '--output'".to_string()]))
        }
    };

    let mut config = match ConfigSource::resolve(inline, args.config.as_deref())? {
        ConfigSource::Inline(config) => config,
        ConfigSource::File(path) => ConfigSource::File(path).load()?,
    };
    apply_overrides(&mut config, args);
    Ok(config)
}

fn apply_overrides(config: &mut MapConfig, args: &RenderArgs) {
    let draw = &mut config.draw;
    if args.no_background {
        draw.background = false;
    }
    if args.no_walls {
        draw.walls = false;
    }
    if args.no_liquids {
        draw.liquids = false;
    }
    if args.no_blocks {
        draw.blocks = false;
    }
    if args.no_wires {
        draw.wires = false;
    }
    if args.no_paint {
        draw.paint = false;
    }
    if args.min_x.is_some() {
        draw.min_x = args.min_x;
    }
    if args.min_y.is_some() {
        draw.min_y = args.min_y;
    }
    if args.width.is_some() {
        draw.region_width = args.width;
    }
    if args.height.is_some() {
        draw.region_height = args.height;
    }

    if args.deep_zoom {
        config.deep_zoom.enabled = true;
    }
    if args.parallel {
        config.render.parallel = true;
    }
    if let Some(palette) = &args.palette {
        config.palette.file_path = Some(palette.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn inline_args() -> RenderArgs {
        RenderArgs {
            world: Some(PathBuf::from("w.json")),
            output: Some(PathBuf::from("w.png")),
            ..RenderArgs::default()
        }
    }

    #[test]
    fn test_inline_config() {
        let args = RenderArgs { no_walls: true, no_paint: true, width: Some(10), ..inline_args() };
        let config = config_from_args(&args).unwrap();
        assert_eq!(config.world.file_path, PathBuf::from("w.json"));
        assert!(!config.draw.walls);
        assert!(config.draw.blocks);
        assert!(!config.draw.paint);
        assert_eq!(config.draw.region_width, Some(10));
        assert_eq!(config.draw.region_height, None);
    }

    #[test]
    fn test_config_and_inline_conflict() {
        let args = RenderArgs { config: Some(PathBuf::from("m.toml")), ..inline_args() };
        assert!(matches!(config_from_args(&args), Err(ConfigError::SourceConflict)));
    }

    #[test]
    fn test_no_source() {
        assert!(matches!(config_from_args(&RenderArgs::default()), Err(ConfigError::NoSource)));
    }

    #[test]
    fn test_world_without_output() {
        let args = RenderArgs { world: Some(PathBuf::from("w.json")), ..RenderArgs::default() };
        assert!(matches!(config_from_args(&args), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_flags_override_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("map.toml");
        fs::write(
            &path,
            "[draw]\nmin_x = 5\n\n[world]\nfile_path = \"w.json\"\n\n[output]\nfile_path = \"w.png\"\n",
        )
        .unwrap();

        let args = RenderArgs {
            config: Some(path),
            min_y: Some(7),
            deep_zoom: true,
            parallel: true,
            ..RenderArgs::default()
        };
        let config = config_from_args(&args).unwrap();
        assert_eq!(config.draw.min_x, Some(5));
        assert_eq!(config.draw.min_y, Some(7));
        assert!(config.deep_zoom.enabled);
        assert!(config.render.parallel);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&MapError::Config(ConfigError::AllLayersDisabled)), EXIT_INVALID_ARGS);
        assert_eq!(
            exit_code_for(&MapError::WorldLoad(crate::world::WorldLoadError::NotFound(PathBuf::from("x")))),
            EXIT_ERROR
        );
    }
}
