//! PNG output for the final map image

use image::{ImageFormat, RgbaImage};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Image encoding error
    #[error("Image error writing {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// Nothing to encode: the image has no pixels
    #[error("Refusing to write empty {width}x{height} image to {}", path.display())]
    EmptyImage { path: PathBuf, width: u32, height: u32 },
}

/// Destination for the finished map.
pub trait ImageSink {
    /// Write `image` to `path`. On error no file is left at `path`.
    fn write(&self, image: &RgbaImage, path: &Path) -> Result<(), OutputError>;
}

/// Writes lossless RGBA PNG files.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngSink;

impl PngSink {
    pub fn new() -> Self {
        Self
    }
}

impl ImageSink for PngSink {
    fn write(&self, image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
        save_png(image, path)
    }
}

/// Save an RGBA image to a PNG file.
///
/// The image is encoded to a hidden sibling file and renamed into place, so
/// a failed write never leaves a partial PNG at `path`. Parent directories
/// are created as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(OutputError::EmptyImage {
            path: path.to_path_buf(),
            width: image.width(),
            height: image.height(),
        });
    }

    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|source| OutputError::Io { path: path.to_path_buf(), source })?;
        }
    }

    let partial = partial_path(path);
    if let Err(source) = image.save_with_format(&partial, ImageFormat::Png) {
        let _ = fs::remove_file(&partial);
        return Err(OutputError::Image { path: path.to_path_buf(), source });
    }
    if let Err(source) = fs::rename(&partial, path) {
        let _ = fs::remove_file(&partial);
        return Err(OutputError::Io { path: path.to_path_buf(), source });
    }
    Ok(())
}

/// Hidden sibling used while encoding: `dir/.name.png.partial`.
fn partial_path(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{}.partial", name))
}
