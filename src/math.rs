//! The few math types the harness needs.

pub use cgmath::Vector2;

/// A RGBA `Color`. Each channel is a floating point value with a range
/// from 0 to 1.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Color(pub f32, pub f32, pub f32, pub f32);

impl Color {
    #[inline]
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color(r, g, b, a)
    }
}

impl From<Color> for [f32; 4] {
    fn from(v: Color) -> Self {
        [v.0, v.1, v.2, v.3]
    }
}
