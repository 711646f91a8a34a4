// Display colors and the distance fog applied to every span.

use super::Rgba;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const GRAY: Color = Color::rgb(130, 130, 130);
pub const PURPLE: Color = Color::rgb(89, 27, 79);
pub const RED: Color = Color::rgb(166, 46, 90);
pub const DARK_BLUE: Color = Color::rgb(40, 17, 64);
pub const BEIGE: Color = Color::rgb(242, 211, 172);
/// Frame clear color.
pub const CHARCOAL: Color = Color::rgb(50, 50, 50);
pub const MAGENTA: Color = Color::rgb(200, 122, 255);

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Linear fade towards black: `0.0` keeps the color, `1.0` is black.
    /// Out-of-range input is clamped; alpha is always opaque.
    pub fn darken(self, darkness: f32) -> Self {
        let d = darkness.clamp(0.0, 1.0);
        let fade = |c: u8| (c as f32 + (0.0 - c as f32) * d).round() as u8;
        Self {
            r: fade(self.r),
            g: fade(self.g),
            b: fade(self.b),
            a: 255,
        }
    }

    /// Pack as `0xAARRGGBB`.
    #[inline]
    pub fn to_rgba(self) -> Rgba {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}
