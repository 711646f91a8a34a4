use std::f32::consts::{FRAC_PI_6, TAU};

use bitflags::bitflags;
use glam::Vec2;

use super::geometry::SectorId;
use super::math::{angle_of, direction_from_angle};

/// Pitch is kept inside ±30° to bound the shear of the pitch offset.
pub const MAX_PITCH: f32 = FRAC_PI_6;

bitflags! {
    /// Movement keys held during a frame.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MoveButtons: u8 {
        const FORWARD = 0x01;
        const BACK    = 0x02;
        const LEFT    = 0x04;
        const RIGHT   = 0x08;
        const UP      = 0x10;
        const DOWN    = 0x20;
    }
}

/// One frame of viewer input.
///
/// `look_delta` is frame-relative (pointer movement since the last frame);
/// the presentation layer re-centres or differences the pointer itself.
#[derive(Default, Clone, Copy, Debug)]
pub struct CameraInput {
    pub buttons: MoveButtons,
    pub look_delta: Vec2,
}

/// Viewer pose plus projection and controller settings.
///
/// * Angles are radians; yaw 0 = +X, counter-clockwise positive.
/// * `current_sector` is written back by the caller after point location.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub current_sector: SectorId,

    pub pos: Vec2,
    pub elevation: f32,
    pub yaw: f32,
    pub pitch: f32,

    pub fov: f32,
    pub fov_vertical: f32,
    pub near: f32,
    pub far: f32,

    /// Upper bound on render areas processed per frame.
    pub max_iterations: u32,

    pub move_speed: f32,
    pub z_move_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            current_sector: 0,
            pos: Vec2::ZERO,
            elevation: 0.0,
            yaw: 0.0,
            pitch: 0.0,
            fov: 60_f32.to_radians(),
            fov_vertical: 120_f32.to_radians(),
            near: 100.0,
            far: 900.0,
            max_iterations: 25,
            move_speed: 100.0,
            z_move_speed: 500.0,
            mouse_sensitivity: 0.2,
        }
    }
}

impl Camera {
    pub fn new(pos: Vec2, yaw: f32, current_sector: SectorId) -> Self {
        Self {
            pos,
            yaw: yaw.rem_euclid(TAU),
            current_sector,
            ..Self::default()
        }
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        direction_from_angle(self.yaw)
    }

    /// Unit vector towards the last screen column: forward turned by +90°
    /// in map coordinates (clockwise on a y-down map view).
    #[inline(always)]
    pub fn right(&self) -> Vec2 {
        self.forward().perp()
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Move by `forward` units and `side` (strafe).
    pub fn step(&mut self, forward: f32, side: f32) {
        self.pos += self.forward() * forward + self.right() * side;
    }

    /// Rotate around Z, keeping yaw in `[0, 2π)`.
    pub fn turn(&mut self, delta_yaw: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(TAU);
    }

    pub fn look_at(&mut self, target: Vec2) {
        let dir = target - self.pos;
        if dir != Vec2::ZERO {
            self.yaw = angle_of(dir).rem_euclid(TAU);
        }
    }

    /// Integrate one frame of controller input.
    pub fn update(&mut self, dt: f32, input: &CameraInput) {
        let b = input.buttons;

        let mut wish = Vec2::ZERO;
        if b.contains(MoveButtons::RIGHT) {
            wish += self.right();
        }
        if b.contains(MoveButtons::LEFT) {
            wish -= self.right();
        }
        if b.contains(MoveButtons::FORWARD) {
            wish += self.forward();
        }
        if b.contains(MoveButtons::BACK) {
            wish -= self.forward();
        }
        self.pos += wish.normalize_or_zero() * self.move_speed * dt;

        if b.contains(MoveButtons::UP) {
            self.elevation += self.z_move_speed * dt;
        }
        if b.contains(MoveButtons::DOWN) {
            self.elevation -= self.z_move_speed * dt;
        }

        let look = input.look_delta * self.mouse_sensitivity * dt;
        self.turn(look.x);
        self.pitch = (self.pitch + look.y).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /*───────────────── projection helpers ─────────────────*/

    /// Angular offset of column `x` from the view axis.
    ///
    /// Linear in `x` (not a tangent mapping), hence the `cos` correction
    /// applied to projected heights.
    #[inline]
    pub fn ray_angle_for_column(&self, x: u32, width: u32) -> f32 {
        -(self.fov * 0.5) + (self.fov / width.max(1) as f32) * x as f32
    }

    /// World-space direction of the ray cast through column `x`.
    #[inline]
    pub fn ray_dir_for_column(&self, x: u32, width: u32) -> Vec2 {
        direction_from_angle(self.yaw + self.ray_angle_for_column(x, width))
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
