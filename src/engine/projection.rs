use glam::{Vec2, vec2};

use crate::{
    engine::types::{ColumnBound, Screen},
    world::Camera,
};

/// Keeps the height finite when a hit lands on the eye.
const MIN_DEPTH: f32 = 1e-3;

/// Screen-space result for one column of one wall hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnExtent {
    pub top: Vec2,
    pub bottom: Vec2,
    /// Hit distance clamped to `[0, far]`.
    pub depth: f32,
    /// `depth / far`, drives the fade to black.
    pub normalized_depth: f32,
}

impl ColumnExtent {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bottom.y <= self.top.y
    }
}

/// Per-frame projection constants.
#[derive(Clone, Copy, Debug)]
pub struct Projector {
    camera: Camera,
    screen: Screen,
    pitch_offset: f32,
}

/// Vertical shift of the horizon caused by pitch.
///
/// ```text
/// offset = round(½·h · tan(pitch) / tan(½·fov_v))
/// ```
pub fn pitch_offset(camera: &Camera, screen_h: u32) -> f32 {
    (0.5 * screen_h as f32 * camera.pitch.tan() / (0.5 * camera.fov_vertical).tan()).round()
}

impl Projector {
    pub fn new(camera: &Camera, screen: Screen) -> Self {
        Self {
            camera: *camera,
            screen,
            pitch_offset: pitch_offset(camera, screen.h),
        }
    }

    #[inline]
    pub fn pitch_offset(&self) -> f32 {
        self.pitch_offset
    }

    /// Project a wall hit in column `x`, then carve off `top_cut` / `bottom_cut`
    /// (fractions of the full wall height) and clamp into `window`.
    pub fn column(
        &self,
        x: u32,
        hit_distance: f32,
        window: ColumnBound,
        top_cut: f32,
        bottom_cut: f32,
    ) -> ColumnExtent {
        let cam = &self.camera;
        let h = self.screen.h as f32;

        let depth = hit_distance.clamp(0.0, cam.far);
        let normalized_depth = if cam.far > 0.0 { depth / cam.far } else { 1.0 };

        // angular column mapping → undo the fisheye with cos(off-axis)
        let off_axis = cam.ray_angle_for_column(x, self.screen.w);
        let object_h = (h * cam.near / (depth.max(MIN_DEPTH) * off_axis.cos())).round();

        let full_top = (h - object_h) * 0.5 - self.pitch_offset;
        let top = full_top + object_h * top_cut;
        let bottom = full_top + object_h - object_h * bottom_cut;

        let (lo, hi) = (window.min as f32, window.max as f32);
        ColumnExtent {
            top: vec2(x as f32, top.clamp(lo, hi)),
            bottom: vec2(x as f32, bottom.clamp(lo, hi)),
            depth,
            normalized_depth,
        }
    }

    /// Span between two heights given as fractions from the wall bottom.
    #[inline]
    pub fn between_heights(
        &self,
        x: u32,
        hit_distance: f32,
        window: ColumnBound,
        upper: f32,
        lower: f32,
    ) -> ColumnExtent {
        self.column(x, hit_distance, window, 1.0 - upper, lower)
    }
}
