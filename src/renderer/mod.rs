//! Rendering abstraction layer.
//!
//! *The rasterizer never touches a pixel buffer directly.*
//! It emits two primitives, a vertical colored line in one screen column
//! and a small filled rectangle, through a type implementing [`Renderer`].
//!
//! * [`Software`] writes them into a CPU frame-buffer.
//! * [`DrawList`] just records them as [`DrawCall`]s; a recorded list can be
//!   replayed into any other back-end with [`RendererExt::draw_frame`].

pub mod color;
pub mod software;

pub use color::Color;
pub use software::Software;

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// One recorded drawing primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCall {
    /// Vertical line in column `x`, rows `y_top ..= y_bottom`.
    Column {
        x: u32,
        y_top: f32,
        y_bottom: f32,
        color: Color,
    },
    /// Filled rectangle with its top-left corner at `(x, y)`.
    Rect {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: Color,
    },
}

/// A drawing target for one frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window-manager;
/// recording back-ends simply call the closure with an empty slice.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Vertical line in column `x`. The caller has already clamped the rows;
    /// implementations only guard against the buffer edges.
    fn draw_column(&mut self, x: u32, y_top: f32, y_bottom: f32, color: Color);

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_call(&mut self, call: &DrawCall) {
        match *call {
            DrawCall::Column {
                x,
                y_top,
                y_bottom,
                color,
            } => self.draw_column(x, y_top, y_bottom, color),
            DrawCall::Rect { x, y, w, h, color } => self.fill_rect(x, y, w, h, color),
        }
    }

    fn draw_frame<F>(&mut self, width: usize, height: usize, calls: &[DrawCall], submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        for c in calls {
            self.draw_call(c);
        }
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

/// Recording back-end: keeps every primitive of the current frame.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    pub calls: Vec<DrawCall>,
    pub width: usize,
    pub height: usize,
}

impl DrawList {
    pub fn columns(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Column { .. }))
    }
}

impl Renderer for DrawList {
    fn begin_frame(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.calls.clear();
    }

    fn draw_column(&mut self, x: u32, y_top: f32, y_bottom: f32, color: Color) {
        self.calls.push(DrawCall::Column {
            x,
            y_top,
            y_bottom,
            color,
        });
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        self.calls.push(DrawCall::Rect { x, y, w, h, color });
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&[], self.width, self.height);
    }
}
