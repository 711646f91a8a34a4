pub mod camera;
pub mod geometry;
mod helpers;
pub mod math;
mod sample;

pub use geometry::{Level, LevelError, Sector, SectorId, Wall, WallId};

pub use camera::{Camera, CameraInput, MAX_PITCH, MoveButtons};

pub use math::{Hit, Ray, Segment};

pub use sample::{sample_camera, sample_level};
