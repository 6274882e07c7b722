//! Layer rasterization.
//!
//! Each [`LayerKind`] is rasterized independently into a [`LayerRaster`]
//! the size of the render region, with pixel `(0, 0)` at world tile
//! `(region.min_x, region.min_y)`. Pixels a layer has nothing to say about
//! stay fully transparent so lower layers show through when compositing.

mod background;
mod tiles;

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::palette::ColorTable;
use crate::progress::{ProgressEvent, ProgressReporter};
use crate::region::Region;
use crate::world::World;

pub use background::{background_bands, Band, EDGE_OF_ROCK_OFFSET};
pub use tiles::{tile_color, PROGRESS_INTERVAL};

/// The renderable layer categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Background,
    Walls,
    Liquids,
    Blocks,
    Wires,
}

impl LayerKind {
    /// Bottom-to-top compositing order.
    pub const DRAW_ORDER: [LayerKind; 5] =
        [LayerKind::Background, LayerKind::Walls, LayerKind::Liquids, LayerKind::Blocks, LayerKind::Wires];

    pub fn name(&self) -> &'static str {
        match self {
            LayerKind::Background => "background",
            LayerKind::Walls => "walls",
            LayerKind::Liquids => "liquids",
            LayerKind::Blocks => "blocks",
            LayerKind::Wires => "wires",
        }
    }

    /// Position in [`LayerKind::DRAW_ORDER`]; lower draws first.
    pub fn depth(&self) -> usize {
        match self {
            LayerKind::Background => 0,
            LayerKind::Walls => 1,
            LayerKind::Liquids => 2,
            LayerKind::Blocks => 3,
            LayerKind::Wires => 4,
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which layers a render draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSelection {
    pub background: bool,
    pub walls: bool,
    pub liquids: bool,
    pub blocks: bool,
    pub wires: bool,
}

impl LayerSelection {
    pub fn all() -> Self {
        Self { background: true, walls: true, liquids: true, blocks: true, wires: true }
    }

    pub fn none() -> Self {
        Self { background: false, walls: false, liquids: false, blocks: false, wires: false }
    }

    /// Selection containing exactly the given layers.
    pub fn only(kinds: &[LayerKind]) -> Self {
        let mut selection = Self::none();
        for &kind in kinds {
            selection.set(kind, true);
        }
        selection
    }

    pub fn contains(&self, kind: LayerKind) -> bool {
        match kind {
            LayerKind::Background => self.background,
            LayerKind::Walls => self.walls,
            LayerKind::Liquids => self.liquids,
            LayerKind::Blocks => self.blocks,
            LayerKind::Wires => self.wires,
        }
    }

    pub fn set(&mut self, kind: LayerKind, enabled: bool) {
        match kind {
            LayerKind::Background => self.background = enabled,
            LayerKind::Walls => self.walls = enabled,
            LayerKind::Liquids => self.liquids = enabled,
            LayerKind::Blocks => self.blocks = enabled,
            LayerKind::Wires => self.wires = enabled,
        }
    }

    pub fn is_empty(&self) -> bool {
        !LayerKind::DRAW_ORDER.iter().any(|k| self.contains(*k))
    }

    /// Enabled layers in draw order.
    pub fn enabled(&self) -> Vec<LayerKind> {
        LayerKind::DRAW_ORDER.into_iter().filter(|k| self.contains(*k)).collect()
    }
}

impl Default for LayerSelection {
    fn default() -> Self {
        Self::all()
    }
}

/// Options shared by all rasterizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterOptions {
    /// Paint overrides block and wall type colors
    pub draw_paint: bool,
    /// Scan tile layers on the rayon thread pool
    pub parallel: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self { draw_paint: true, parallel: false }
    }
}

/// One rasterized layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRaster {
    pub kind: LayerKind,
    pub image: RgbaImage,
}

impl LayerRaster {
    /// Fully transparent raster for `region`.
    pub fn blank(kind: LayerKind, region: &Region) -> Self {
        Self { kind, image: RgbaImage::new(region.width(), region.height()) }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Rasterize one layer of `world` inside `region`.
pub fn rasterize_layer(
    kind: LayerKind,
    world: &World,
    region: &Region,
    palette: &ColorTable,
    options: &RasterOptions,
    reporter: &dyn ProgressReporter,
) -> LayerRaster {
    let start = Instant::now();
    reporter.report(ProgressEvent::LayerStarted { layer: kind });

    let raster = match kind {
        LayerKind::Background => background::rasterize_background(world, region, palette),
        _ if options.parallel => tiles::rasterize_tiles_parallel(kind, world, region, palette, options, reporter),
        _ => tiles::rasterize_tiles(kind, world, region, palette, options, reporter),
    };

    reporter.report(ProgressEvent::LayerCompleted {
        layer: kind,
        duration_ms: start.elapsed().as_millis() as u64,
    });
    raster
}

/// Rasterize every selected layer, in draw order.
pub fn rasterize_layers(
    selection: &LayerSelection,
    world: &World,
    region: &Region,
    palette: &ColorTable,
    options: &RasterOptions,
    reporter: &dyn ProgressReporter,
) -> Vec<LayerRaster> {
    selection
        .enabled()
        .into_iter()
        .map(|kind| rasterize_layer(kind, world, region, palette, options, reporter))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::RecordingProgress;
    use crate::world::{Tile, Wall, WorldSize};

    #[test]
    fn test_draw_order() {
        assert_eq!(
            LayerKind::DRAW_ORDER.map(|k| k.name()),
            ["background", "walls", "liquids", "blocks", "wires"]
        );
        for (i, kind) in LayerKind::DRAW_ORDER.iter().enumerate() {
            assert_eq!(kind.depth(), i);
        }
    }

    #[test]
    fn test_selection_enabled_is_ordered() {
        let selection = LayerSelection::only(&[LayerKind::Wires, LayerKind::Background, LayerKind::Blocks]);
        assert_eq!(selection.enabled(), vec![LayerKind::Background, LayerKind::Blocks, LayerKind::Wires]);
        assert!(!selection.is_empty());
        assert!(LayerSelection::none().is_empty());
        assert_eq!(LayerSelection::all().enabled().len(), 5);
    }

    #[test]
    fn test_rasterize_layers_reports_each_layer() {
        let world = World::new(WorldSize::new(4, 4), 1, 2);
        let region = Region { min_x: 0, min_y: 0, max_x: 4, max_y: 4 };
        let reporter = RecordingProgress::new();
        let selection = LayerSelection::only(&[LayerKind::Walls, LayerKind::Wires]);

        let rasters = rasterize_layers(
            &selection,
            &world,
            &region,
            &ColorTable::new(),
            &RasterOptions::default(),
            &reporter,
        );

        assert_eq!(rasters.iter().map(|r| r.kind).collect::<Vec<_>>(), vec![LayerKind::Walls, LayerKind::Wires]);
        let events = reporter.events();
        assert!(events.contains(&ProgressEvent::LayerStarted { layer: LayerKind::Walls }));
        assert!(events.contains(&ProgressEvent::LayerStarted { layer: LayerKind::Wires }));
        assert_eq!(
            events.iter().filter(|e| matches!(e, ProgressEvent::LayerCompleted { .. })).count(),
            2
        );
    }

    #[test]
    fn test_inverted_region_is_a_zero_area_no_op() {
        let mut world = World::new(WorldSize::new(12, 12), 2, 6);
        world.set_tile(5, 5, Tile::default().with_wall(Wall::new(1)));
        let region = Region { min_x: 8, min_y: 0, max_x: 3, max_y: 10 };
        let reporter = RecordingProgress::new();

        for parallel in [false, true] {
            let options = RasterOptions { parallel, ..RasterOptions::default() };
            let rasters =
                rasterize_layers(&LayerSelection::all(), &world, &region, &ColorTable::builtin(), &options, &reporter);
            assert_eq!(rasters.len(), 5);
            for raster in rasters {
                assert_eq!((raster.width(), raster.height()), (0, 10), "{}", raster.kind.name());
            }
        }
    }

    #[test]
    fn test_blank_raster_matches_region() {
        let region = Region { min_x: 3, min_y: 4, max_x: 10, max_y: 6 };
        let raster = LayerRaster::blank(LayerKind::Blocks, &region);
        assert_eq!((raster.width(), raster.height()), (7, 2));
        assert!(raster.image.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }
}
