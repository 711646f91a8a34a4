use crate::renderer::color::{Color, GRAY};
use crate::world::SectorId;

/// Constants that depend on the *frame-buffer*, not on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Screen {
    pub w: u32,
    pub h: u32,
}

impl Screen {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

/// Rows of one column still open for drawing, `min ..= max`.
/// Starts at the full height and only ever shrinks during a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnBound {
    pub min: u32,
    pub max: u32,
}

impl ColumnBound {
    #[inline]
    pub fn contains(&self, other: &ColumnBound) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.max <= self.min
    }
}

/// Pending work: columns `x_begin ..= x_end` rasterized against `sector`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderArea {
    pub sector: SectorId,
    pub x_begin: u32,
    pub x_end: u32,
}

impl RenderArea {
    pub fn columns(&self) -> std::ops::RangeInclusive<u32> {
        self.x_begin..=self.x_end
    }
}

/// Knobs of the rasterizer that are not part of the camera.
#[derive(Clone, Copy, Debug)]
pub struct RasterOptions {
    /// Mark span tips with a 3×3 square.
    pub edge_markers: bool,
    pub marker_color: Color,
    /// Fill a portal's open window until the neighbor gets drawn.
    pub portal_placeholder: Option<Color>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            edge_markers: true,
            marker_color: GRAY,
            portal_placeholder: None,
        }
    }
}
