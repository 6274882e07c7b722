//! Layer compositing - merging layer rasters into the final map image
//!
//! Layers always merge bottom-to-top in [`LayerKind::DRAW_ORDER`]:
//! background, walls, liquids, blocks, wires. The order layers are handed
//! to a [`LayerStack`] does not matter; blocks always cover liquids and
//! walls, and wires always end up on top.

mod blend;
mod error;

use image::RgbaImage;

use crate::raster::{LayerKind, LayerRaster};

pub use error::CompositionError;

/// Result type alias for composition operations.
pub type Result<T> = std::result::Result<T, CompositionError>;

/// Layer rasters waiting to be merged, keyed by draw depth.
#[derive(Debug, Clone)]
pub struct LayerStack {
    width: u32,
    height: u32,
    slots: [Option<LayerRaster>; 5],
}

impl LayerStack {
    /// Empty stack for a `width` x `height` canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, slots: Default::default() }
    }

    /// Add a layer. Fails if its size differs from the canvas or its kind
    /// is already present.
    pub fn push(&mut self, raster: LayerRaster) -> Result<()> {
        let actual = (raster.width(), raster.height());
        if actual != (self.width, self.height) {
            return Err(CompositionError::SizeMismatch {
                layer: raster.kind,
                actual,
                expected: (self.width, self.height),
            });
        }
        let slot = &mut self.slots[raster.kind.depth()];
        if slot.is_some() {
            return Err(CompositionError::DuplicateLayer(raster.kind));
        }
        *slot = Some(raster);
        Ok(())
    }

    /// Kinds present, bottom to top.
    pub fn kinds(&self) -> Vec<LayerKind> {
        self.layers().map(|l| l.kind).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Present layers, bottom to top.
    pub fn layers(&self) -> impl Iterator<Item = &LayerRaster> {
        self.slots.iter().flatten()
    }

    /// Merge every layer over a transparent canvas.
    pub fn composite(&self) -> RgbaImage {
        let mut canvas = RgbaImage::new(self.width, self.height);
        for layer in self.layers() {
            blend::blit_over(&mut canvas, &layer.image);
        }
        canvas
    }
}

/// Composite `layers` onto a transparent `width` x `height` canvas.
///
/// # Examples
///
/// ```
/// use image::{Rgba, RgbaImage};
/// use worldmap::composition::composite;
/// use worldmap::raster::{LayerKind, LayerRaster};
///
/// let blocks = LayerRaster { kind: LayerKind::Blocks, image: RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 255])) };
/// let walls = LayerRaster { kind: LayerKind::Walls, image: RgbaImage::from_pixel(1, 1, Rgba([9, 9, 9, 255])) };
///
/// // Walls are drawn first even though they were passed last
/// let image = composite(1, 1, vec![blocks, walls]).unwrap();
/// assert_eq!(image.get_pixel(0, 0), &Rgba([1, 2, 3, 255]));
/// ```
pub fn composite(width: u32, height: u32, layers: Vec<LayerRaster>) -> Result<RgbaImage> {
    let mut stack = LayerStack::new(width, height);
    for layer in layers {
        stack.push(layer)?;
    }
    Ok(stack.composite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(kind: LayerKind, color: [u8; 4]) -> LayerRaster {
        LayerRaster { kind, image: RgbaImage::from_pixel(2, 2, Rgba(color)) }
    }

    #[test]
    fn test_empty_stack_is_transparent() {
        let image = LayerStack::new(3, 2).composite();
        assert_eq!(image.dimensions(), (3, 2));
        assert!(image.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_order_independent_of_push_order() {
        let wall = [10, 10, 10, 255];
        let liquid = [0, 0, 200, 255];
        let block = [120, 80, 40, 255];
        let wire = [255, 0, 0, 255];

        let forward = composite(
            2,
            2,
            vec![solid(LayerKind::Walls, wall), solid(LayerKind::Liquids, liquid), solid(LayerKind::Blocks, block)],
        )
        .unwrap();
        let reverse = composite(
            2,
            2,
            vec![solid(LayerKind::Blocks, block), solid(LayerKind::Liquids, liquid), solid(LayerKind::Walls, wall)],
        )
        .unwrap();
        assert_eq!(forward, reverse);
        assert_eq!(forward.get_pixel(0, 0), &Rgba(block));

        let with_wire = composite(
            2,
            2,
            vec![solid(LayerKind::Wires, wire), solid(LayerKind::Blocks, block), solid(LayerKind::Walls, wall)],
        )
        .unwrap();
        assert_eq!(with_wire.get_pixel(1, 1), &Rgba(wire));
    }

    #[test]
    fn test_liquid_over_wall() {
        let image = composite(
            2,
            2,
            vec![solid(LayerKind::Liquids, [9, 61, 191, 255]), solid(LayerKind::Walls, [52, 52, 52, 255])],
        )
        .unwrap();
        assert_eq!(image.get_pixel(0, 1), &Rgba([9, 61, 191, 255]));
    }

    #[test]
    fn test_transparent_pixels_show_lower_layers() {
        let background = solid(LayerKind::Background, [132, 170, 248, 255]);
        let mut blocks = LayerRaster::blank(LayerKind::Blocks, &crate::region::Region {
            min_x: 0,
            min_y: 0,
            max_x: 2,
            max_y: 2,
        });
        blocks.image.put_pixel(0, 0, Rgba([151, 107, 75, 255]));

        let image = composite(2, 2, vec![blocks, background]).unwrap();
        assert_eq!(image.get_pixel(0, 0), &Rgba([151, 107, 75, 255]));
        assert_eq!(image.get_pixel(1, 0), &Rgba([132, 170, 248, 255]));
    }

    #[test]
    fn test_size_mismatch() {
        let mut stack = LayerStack::new(3, 3);
        let err = stack.push(solid(LayerKind::Walls, [1, 1, 1, 255])).unwrap_err();
        assert_eq!(
            err,
            CompositionError::SizeMismatch { layer: LayerKind::Walls, actual: (2, 2), expected: (3, 3) }
        );
        assert!(err.to_string().contains("2x2"));
    }

    #[test]
    fn test_duplicate_layer() {
        let mut stack = LayerStack::new(2, 2);
        stack.push(solid(LayerKind::Wires, [1, 1, 1, 255])).unwrap();
        let err = stack.push(solid(LayerKind::Wires, [2, 2, 2, 255])).unwrap_err();
        assert_eq!(err, CompositionError::DuplicateLayer(LayerKind::Wires));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_kinds_bottom_to_top() {
        let mut stack = LayerStack::new(2, 2);
        stack.push(solid(LayerKind::Wires, [1, 1, 1, 255])).unwrap();
        stack.push(solid(LayerKind::Background, [1, 1, 1, 255])).unwrap();
        stack.push(solid(LayerKind::Liquids, [1, 1, 1, 255])).unwrap();
        assert_eq!(stack.kinds(), vec![LayerKind::Background, LayerKind::Liquids, LayerKind::Wires]);
    }

    #[test]
    fn test_zero_area_canvas() {
        let image = composite(0, 5, vec![LayerRaster { kind: LayerKind::Blocks, image: RgbaImage::new(0, 5) }])
            .unwrap();
        assert_eq!(image.dimensions(), (0, 5));
    }
}
