// Small three-room demo map: a triangular hub (1) opening onto a raised,
// low-ceilinged alcove (2) and a slightly raised side room (3).

use glam::{Vec2, vec2};

use super::{Camera, Level, LevelError, Sector, SectorId, Segment, Wall};
use crate::renderer::color::{MAGENTA, WHITE};

fn seg(ax: f32, ay: f32, bx: f32, by: f32) -> Segment {
    Segment::new(vec2(ax, ay), vec2(bx, by))
}

pub fn sample_level() -> Result<Level, LevelError> {
    let hub: SectorId = 1;
    let alcove: SectorId = 2;
    let side_room: SectorId = 3;

    let sectors = [
        (
            hub,
            Sector::new(vec![
                Wall::solid(seg(500.0, 500.0, 500.0, 600.0), WHITE),
                Wall {
                    color: MAGENTA,
                    ..Wall::portal(seg(500.0, 700.0, 500.0, 600.0), side_room)
                },
                Wall::solid(seg(500.0, 700.0, 700.0, 700.0), WHITE),
                Wall::portal(seg(500.0, 500.0, 700.0, 700.0), alcove),
            ]),
        ),
        (
            alcove,
            Sector::new(vec![
                Wall::solid(seg(700.0, 700.0, 700.0, 500.0), WHITE),
                Wall::solid(seg(700.0, 500.0, 500.0, 500.0), WHITE),
                Wall::portal(seg(700.0, 700.0, 500.0, 500.0), hub),
            ])
            .with_heights(0.25, 0.6),
        ),
        (
            side_room,
            Sector::new(vec![
                Wall::portal(seg(500.0, 600.0, 500.0, 700.0), hub),
                Wall::solid(seg(500.0, 600.0, 300.0, 600.0), WHITE),
                Wall::solid(seg(300.0, 600.0, 300.0, 700.0), WHITE),
                Wall::solid(seg(300.0, 700.0, 500.0, 700.0), WHITE),
            ])
            .with_heights(0.05, 1.0),
        ),
    ];

    Level::new(sectors)
}

/// Viewer standing in the hub.
pub fn sample_camera() -> Camera {
    Camera::new(Vec2::new(550.0, 600.0), 0.0, 1)
}
