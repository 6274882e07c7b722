//! Error types for layer compositing

use thiserror::Error;

use crate::raster::LayerKind;

/// Error when assembling a layer stack.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    /// Layer raster does not match the canvas
    #[error("Layer '{layer}' is {actual_w}x{actual_h} but the canvas is {expected_w}x{expected_h}", actual_w = actual.0, actual_h = actual.1, expected_w = expected.0, expected_h = expected.1)]
    SizeMismatch { layer: LayerKind, actual: (u32, u32), expected: (u32, u32) },
    /// The same layer kind was added twice
    #[error("Layer '{0}' was added more than once")]
    DuplicateLayer(LayerKind),
}
