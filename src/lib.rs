//! Sector/portal column raycaster.
//!
//! * [`world`]    – map data (sectors, walls, portals), 2-D geometry, camera.
//! * [`engine`]   – the portal rasterizer and the per-frame driver.
//! * [`renderer`] – drawing sinks: CPU frame-buffer and draw-call recorder.

pub mod engine;
pub mod renderer;
pub mod world;
