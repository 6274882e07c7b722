//! Render-region resolution.
//!
//! Turns the optional `min_x`/`min_y`/`width`/`height` request into a
//! [`Region`] clamped to the world. A width or height of `None` or `0`
//! means "to the edge of the world". Origins past the edge produce an
//! empty region, which every rasterizer renders as a zero-area no-op.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::world::WorldSize;

/// Optional region bounds, in tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRequest {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min_x: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min_y: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub height: Option<u32>,
}

impl RegionRequest {
    /// The whole world.
    pub fn full() -> Self {
        Self::default()
    }

    pub fn new(min_x: i64, min_y: i64, width: u32, height: u32) -> Self {
        Self { min_x: Some(min_x), min_y: Some(min_y), width: Some(width), height: Some(height) }
    }
}

/// Half-open tile rectangle `[min_x, max_x) x [min_y, max_y)`.
///
/// Regions from [`resolve_region`] always satisfy `min_x <= max_x <= world.width`
/// and `min_y <= max_y <= world.height`. A hand-built inverted region has zero
/// width or height and renders as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Region {
    pub fn width(&self) -> u32 {
        self.max_x.saturating_sub(self.min_x)
    }

    pub fn height(&self) -> u32 {
        self.max_y.saturating_sub(self.min_y)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Whether the world tile `(x, y)` lies inside the region.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }

    /// Split at world column `x` into a left and right region.
    ///
    /// `x` is clamped into the region so both halves stay valid.
    pub fn split_at_x(&self, x: u32) -> (Region, Region) {
        let x = x.clamp(self.min_x, self.max_x.max(self.min_x));
        (Region { max_x: x, ..*self }, Region { min_x: x, ..*self })
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) to ({}, {})", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

/// Resolve a region request against the world size.
///
/// # Examples
///
/// ```
/// use worldmap::region::{resolve_region, RegionRequest};
/// use worldmap::world::WorldSize;
///
/// let size = WorldSize::new(4200, 1200);
/// let region = resolve_region(size, &RegionRequest::new(100, 50, 500, 0));
/// assert_eq!((region.min_x, region.min_y, region.max_x, region.max_y), (100, 50, 600, 1200));
/// ```
pub fn resolve_region(size: WorldSize, request: &RegionRequest) -> Region {
    let (min_x, max_x) = resolve_axis(size.width, request.min_x, request.width);
    let (min_y, max_y) = resolve_axis(size.height, request.min_y, request.height);
    Region { min_x, min_y, max_x, max_y }
}

fn resolve_axis(limit: u32, start: Option<i64>, extent: Option<u32>) -> (u32, u32) {
    let min = start.unwrap_or(0).clamp(0, limit as i64) as u32;
    let max = match extent {
        Some(extent) if extent > 0 => (min as u64 + extent as u64).min(limit as u64) as u32,
        _ => limit,
    };
    (min, max)
}
