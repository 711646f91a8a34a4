//! ---------------------------------------------------------------------------
//! CPU frame-buffer back-end
//!
//! * Fills a `Vec<u32>` in **0xAARRGGBB** format.
//! * The rasterizer clips every column against its own occlusion table, so
//!   this back-end only guards the buffer edges.
//! * `begin_frame` clears; calling the primitives without a new
//!   `begin_frame` keeps drawing on top (used by step-by-step rendering).
//! ---------------------------------------------------------------------------

use crate::renderer::{Color, Renderer, Rgba, color::CHARCOAL};

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

pub struct Software {
    scratch: Vec<Rgba>,
    clear: Rgba,
    width: usize,
    height: usize,
}

impl Default for Software {
    fn default() -> Self {
        Self::with_clear_color(CHARCOAL)
    }
}

impl Software {
    pub fn with_clear_color(clear: Color) -> Self {
        Self {
            scratch: Vec::new(),
            clear: clear.to_rgba(),
            width: 0,
            height: 0,
        }
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.scratch
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.scratch[y * self.width + x])
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
        }
        self.scratch.fill(self.clear);
    }

    fn draw_column(&mut self, x: u32, y_top: f32, y_bottom: f32, color: Color) {
        let col = x as usize;
        if col >= self.width || self.height == 0 {
            return;
        }
        let (y_top, y_bottom) = if y_top <= y_bottom {
            (y_top, y_bottom)
        } else {
            (y_bottom, y_top)
        };

        /* clip to integer pixel rows */
        let y0 = y_top.max(0.0) as usize;
        let y1 = y_bottom.min(self.height as f32 - 1.0);
        if y1 < 0.0 || y0 > y1 as usize {
            return;
        }

        let px = color.to_rgba();
        let mut idx = y0 * self.width + col;
        for _ in y0..=y1 as usize {
            self.scratch[idx] = px;
            idx += self.width;
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let px = color.to_rgba();
        for row in y0..y1 {
            let start = row as usize * self.width;
            self.scratch[start + x0 as usize..start + x1 as usize].fill(px);
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
