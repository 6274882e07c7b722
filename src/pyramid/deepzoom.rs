//! Deep Zoom (`.dzi`) pyramid writer.
//!
//! Layout for a `W` x `H` image:
//!
//! - levels `0..=ceil(log2(max(W, H)))`; the last level is full resolution
//!   and each level below it is half the size (rounded up)
//! - level `L` is cut into `tile_size` squares; interior edges carry
//!   `overlap` extra pixels from the neighbouring tile
//! - tiles land in `<stem>_files/<level>/<col>_<row>.<format>`
//! - `<stem>.dzi` is an XML descriptor with the format, overlap, tile size
//!   and full image size

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageFormat, RgbaImage};
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use super::{tiles_dir_for, PyramidError, PyramidGenerator, PyramidSummary, TileFormat, TileSettings};

/// Number of pyramid levels for an image.
pub fn level_count(width: u32, height: u32) -> u32 {
    let max = width.max(height).max(1);
    max.next_power_of_two().trailing_zeros() + 1
}

/// Dimensions of `level` for a `width` x `height` image.
pub fn level_dimensions(width: u32, height: u32, level: u32) -> (u32, u32) {
    let max_level = level_count(width, height) - 1;
    let shift = max_level.saturating_sub(level).min(63);
    let scale = |v: u32| -> u32 {
        let divisor = 1u64 << shift;
        ((v as u64 + divisor - 1) / divisor).max(1) as u32
    };
    (scale(width), scale(height))
}

/// Pixel rectangle `(x, y, w, h)` of tile `(col, row)` within a level.
pub fn tile_bounds(
    level_width: u32,
    level_height: u32,
    col: u32,
    row: u32,
    settings: &TileSettings,
) -> (u32, u32, u32, u32) {
    let size = settings.tile_size;
    let overlap = settings.overlap;

    let offset_x = if col == 0 { 0 } else { overlap };
    let offset_y = if row == 0 { 0 } else { overlap };
    let x = col * size - offset_x;
    let y = row * size - offset_y;

    let w = size + if col == 0 { 1 } else { 2 } * overlap;
    let h = size + if row == 0 { 1 } else { 2 } * overlap;
    (x, y, w.min(level_width - x), h.min(level_height - y))
}

fn tile_grid(level_width: u32, level_height: u32, tile_size: u32) -> (u32, u32) {
    (level_width.div_ceil(tile_size), level_height.div_ceil(tile_size))
}

/// Deep Zoom pyramid generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeepZoomGenerator;

impl DeepZoomGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Tile an image already in memory.
    pub fn generate_from_image(
        &self,
        image: &RgbaImage,
        descriptor_path: &Path,
        settings: &TileSettings,
    ) -> Result<PyramidSummary, PyramidError> {
        settings.validate()?;
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PyramidError::EmptyImage);
        }

        let tiles_dir = tiles_dir_for(descriptor_path);
        let levels = level_count(width, height);
        let filter = settings.filter.filter_type();
        let mut tiles = 0;

        // Every level is scaled straight from the full-resolution image
        for level in (0..levels).rev() {
            let (level_width, level_height) = level_dimensions(width, height, level);
            let current = if (level_width, level_height) == (width, height) {
                Cow::Borrowed(image)
            } else {
                Cow::Owned(image::imageops::resize(image, level_width, level_height, filter))
            };

            let level_dir = tiles_dir.join(level.to_string());
            fs::create_dir_all(&level_dir)
                .map_err(|source| PyramidError::Io { path: level_dir.clone(), source })?;

            let (cols, rows) = tile_grid(level_width, level_height, settings.tile_size);
            for col in 0..cols {
                for row in 0..rows {
                    let (x, y, w, h) = tile_bounds(level_width, level_height, col, row, settings);
                    let tile = image::imageops::crop_imm(&*current, x, y, w, h).to_image();
                    let path = level_dir.join(format!("{}_{}.{}", col, row, settings.format.extension()));
                    write_tile(&tile, &path, settings)?;
                    tiles += 1;
                }
            }
        }

        write_descriptor(descriptor_path, width, height, settings)?;

        Ok(PyramidSummary {
            descriptor: descriptor_path.to_path_buf(),
            tiles_dir,
            levels,
            tiles,
            width,
            height,
        })
    }
}

impl PyramidGenerator for DeepZoomGenerator {
    fn generate(
        &self,
        image_path: &Path,
        descriptor_path: &Path,
        settings: &TileSettings,
    ) -> Result<PyramidSummary, PyramidError> {
        settings.validate()?;
        let image = image::open(image_path)
            .map_err(|source| PyramidError::Image { path: image_path.to_path_buf(), source })?
            .to_rgba8();
        self.generate_from_image(&image, descriptor_path, settings)
    }
}

fn write_tile(tile: &RgbaImage, path: &Path, settings: &TileSettings) -> Result<(), PyramidError> {
    let image_err = |source| PyramidError::Image { path: path.to_path_buf(), source };
    match settings.format {
        TileFormat::Png => tile.save_with_format(path, ImageFormat::Png).map_err(image_err),
        TileFormat::Jpg => {
            let file = File::create(path).map_err(|source| PyramidError::Io { path: path.to_path_buf(), source })?;
            let quality = (settings.quality * 100.0).round().clamp(1.0, 100.0) as u8;
            let rgb = DynamicImage::ImageRgba8(tile.clone()).to_rgb8();
            JpegEncoder::new_with_quality(BufWriter::new(file), quality)
                .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
                .map_err(image_err)
        }
    }
}

/// Render the `.dzi` XML descriptor.
pub(crate) fn descriptor_xml(width: u32, height: u32, settings: &TileSettings) -> String {
    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<Image xmlns=\"http://schemas.microsoft.com/deepzoom/2008\" Format=\"{}\" Overlap=\"{}\" TileSize=\"{}\">\n",
            "  <Size Width=\"{}\" Height=\"{}\"/>\n",
            "</Image>\n"
        ),
        settings.format.extension(),
        settings.overlap,
        settings.tile_size,
        width,
        height
    )
}

fn write_descriptor(path: &Path, width: u32, height: u32, settings: &TileSettings) -> Result<(), PyramidError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| PyramidError::Io { path: parent.to_path_buf(), source })?;
        }
    }
    fs::write(path, descriptor_xml(width, height, settings))
        .map_err(|source| PyramidError::Io { path: path.to_path_buf(), source })
}
