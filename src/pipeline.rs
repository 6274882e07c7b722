//! Render pipeline: world file in, map PNG (and optional tile pyramid) out.
//!
//! Stages run in a fixed order:
//!
//! 1. report the requested layer toggles, then reject configs that would
//!    draw nothing, before the world is touched
//! 2. load the world through the [`WorldSource`]
//! 3. clamp the requested region to the world
//! 4. rasterize each enabled layer and composite them bottom to top
//! 5. hand the image to the [`ImageSink`]
//! 6. if enabled, build the tile pyramid from the written file
//!
//! Any failure aborts the run; nothing is retried.

use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::composition::{CompositionError, LayerStack};
use crate::config::{check_config, MapConfig};
use crate::error::MapError;
use crate::output::{ImageSink, PngSink};
use crate::palette::ColorTable;
use crate::progress::{NullProgress, ProgressEvent, ProgressReporter};
use crate::pyramid::{descriptor_path_for, DeepZoomGenerator, PyramidGenerator, PyramidSummary};
use crate::raster::{rasterize_layers, LayerSelection, RasterOptions};
use crate::region::{resolve_region, Region, RegionRequest};
use crate::world::{JsonWorldSource, World, WorldSource};

/// What a finished render produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    /// World tiles that were drawn
    pub region: Region,
    /// Where the PNG was written
    pub output: PathBuf,
    /// Pyramid details when tiling was enabled
    pub pyramid: Option<PyramidSummary>,
    pub duration: Duration,
}

/// Render `region` of an already loaded world into a single image.
///
/// Only the layers in `selection` are drawn. The result is
/// `region.width()` x `region.height()` pixels, one per tile.
pub fn render_world(
    world: &World,
    region: &Region,
    selection: &LayerSelection,
    palette: &ColorTable,
    options: &RasterOptions,
    reporter: &dyn ProgressReporter,
) -> Result<RgbaImage, CompositionError> {
    let mut stack = LayerStack::new(region.width(), region.height());
    for raster in rasterize_layers(selection, world, region, palette, options, reporter) {
        stack.push(raster)?;
    }
    reporter.report(ProgressEvent::Compositing { layers: stack.len() });
    Ok(stack.composite())
}

/// Map renderer with injectable collaborators.
///
/// Defaults: JSON world dumps, the built-in palette, PNG output, Deep Zoom
/// tiling and no progress output.
pub struct MapPipeline {
    world_source: Box<dyn WorldSource>,
    palette: ColorTable,
    sink: Box<dyn ImageSink>,
    pyramid: Box<dyn PyramidGenerator>,
    reporter: Box<dyn ProgressReporter>,
}

impl Default for MapPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl MapPipeline {
    pub fn new() -> Self {
        Self {
            world_source: Box::new(JsonWorldSource::new()),
            palette: ColorTable::builtin(),
            sink: Box::new(PngSink::new()),
            pyramid: Box::new(DeepZoomGenerator::new()),
            reporter: Box::new(NullProgress::new()),
        }
    }

    /// Pipeline using the palette named by `config`, or the built-in one.
    ///
    /// The config is checked before the palette file is read.
    pub fn for_config(config: &MapConfig) -> Result<Self, MapError> {
        check_config(config)?;
        let pipeline = Self::new();
        match &config.palette.file_path {
            Some(path) => Ok(pipeline.with_palette(ColorTable::load(path)?)),
            None => Ok(pipeline),
        }
    }

    pub fn with_world_source(mut self, source: impl WorldSource + 'static) -> Self {
        self.world_source = Box::new(source);
        self
    }

    pub fn with_palette(mut self, palette: ColorTable) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_sink(mut self, sink: impl ImageSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn with_pyramid(mut self, pyramid: impl PyramidGenerator + 'static) -> Self {
        self.pyramid = Box::new(pyramid);
        self
    }

    pub fn with_reporter(mut self, reporter: impl ProgressReporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn palette(&self) -> &ColorTable {
        &self.palette
    }

    pub fn reporter(&self) -> &dyn ProgressReporter {
        self.reporter.as_ref()
    }

    /// Run a full render for `config`.
    pub fn render(&self, config: &MapConfig) -> Result<RenderSummary, MapError> {
        let start = Instant::now();
        let reporter = self.reporter.as_ref();
        let selection = config.draw.layers();

        reporter.report(ProgressEvent::RenderStarted { layers: selection, paint: config.draw.paint });
        check_config(config)?;

        let world_path = &config.world.file_path;
        reporter.report(ProgressEvent::WorldLoading { path: world_path.display().to_string() });
        let world = self.world_source.load(world_path)?;
        reporter.report(ProgressEvent::WorldLoaded { width: world.width(), height: world.height() });

        let region = self.resolve(&world, &config.draw.region());
        let image = render_world(&world, &region, &selection, &self.palette, &config.raster_options(), reporter)?;

        let output = config.output.file_path.clone();
        self.sink.write(&image, &output)?;
        reporter.report(ProgressEvent::ImageWritten { path: output.display().to_string() });

        let pyramid = if config.deep_zoom.enabled {
            Some(self.build_pyramid(&output, config)?)
        } else {
            None
        };

        let duration = start.elapsed();
        reporter.report(ProgressEvent::Done { duration_ms: duration.as_millis() as u64 });
        Ok(RenderSummary { region, output, pyramid, duration })
    }

    fn resolve(&self, world: &World, request: &RegionRequest) -> Region {
        let region = resolve_region(world.size(), request);
        self.reporter.report(ProgressEvent::RegionResolved { region });
        if region.is_empty() {
            self.reporter.report(ProgressEvent::Warning {
                message: format!(
                    "Region {} of a {}x{} world is empty; nothing will be drawn",
                    region,
                    world.width(),
                    world.height()
                ),
            });
        }
        region
    }

    fn build_pyramid(&self, image_path: &Path, config: &MapConfig) -> Result<PyramidSummary, MapError> {
        let descriptor = descriptor_path_for(image_path);
        let summary = self.pyramid.generate(image_path, &descriptor, &config.deep_zoom.settings())?;
        self.reporter.report(ProgressEvent::PyramidWritten {
            path: summary.descriptor.display().to_string(),
            levels: summary.levels,
            tiles: summary.tiles,
        });
        Ok(summary)
    }
}
