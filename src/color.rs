use cgmath::Vector4;

/// An RGBA color, 8 bits per channel, packed as `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color((r as u32) << 24 | (g as u32) << 16 | (b as u32) << 8 | a as u32)
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color::rgba(r, g, b, 255)
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Normalized components, as consumed by vertex data.
    pub fn to_vec4(self) -> Vector4<f32> {
        Vector4::new(
            f32::from(self.r()) / 255.,
            f32::from(self.g()) / 255.,
            f32::from(self.b()) / 255.,
            f32::from(self.a()) / 255.,
        )
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r(), self.g(), self.b(), self.a()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_round_trip() {
        let color = Color::rgba(1, 2, 3, 4);
        assert_eq!(color.0, 0x01020304);
        assert_eq!(color.to_array(), [1, 2, 3, 4]);
    }

    #[test]
    fn normalized() {
        let v = Color::rgba(255, 0, 51, 255).to_vec4();
        assert_eq!(v, Vector4::new(1., 0., 0.2, 1.));
    }
}
