use log::warn;

use crate::{
    engine::{
        rasterizer::Rasterizer,
        types::{RasterOptions, Screen},
    },
    renderer::{Renderer, Rgba},
    world::{Camera, Level},
};

/// Frame driver: renderer + borrowed level + camera.
///
/// The level is borrowed rather than owned so a step-by-step pass
/// (see [`Engine::begin_pass`]) can outlive a single call.
pub struct Engine<'a, R: Renderer> {
    pub renderer: R,
    pub level: &'a Level,
    pub camera: Camera,
    pub screen: Screen,
    pub options: RasterOptions,
}

impl<'a, R: Renderer> Engine<'a, R> {
    pub fn new(renderer: R, level: &'a Level, camera: Camera, screen: Screen) -> Self {
        Self {
            renderer,
            level,
            camera,
            screen,
            options: RasterOptions::default(),
        }
    }

    /// Refresh `camera.current_sector` from its position.
    ///
    /// Returns `false` (and keeps the previous sector) when the position is
    /// outside every sector polygon.
    pub fn locate_camera(&mut self) -> bool {
        match self.level.find_sector_containing(self.camera.pos) {
            Some(id) => {
                self.camera.current_sector = id;
                true
            }
            None => {
                warn!(
                    "camera at ({:.1}, {:.1}) is outside every sector, keeping sector {}",
                    self.camera.pos.x, self.camera.pos.y, self.camera.current_sector
                );
                false
            }
        }
    }

    /// Fresh pass for the current camera; the caller drives it.
    pub fn begin_pass(&self) -> Rasterizer<'a> {
        Rasterizer::new(self.screen, self.level, &self.camera, self.options)
    }

    /// Locate, rasterize the whole frame and hand the result to `submit`.
    /// Returns the number of render areas processed.
    pub fn render_frame<F>(&mut self, submit: F) -> u32
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.renderer
            .begin_frame(self.screen.w as usize, self.screen.h as usize);

        self.locate_camera();

        let mut pass = self.begin_pass();
        pass.run_to_completion(&mut self.renderer);
        let iterations = pass.iteration();

        self.renderer.end_frame(submit);
        iterations
    }
}
