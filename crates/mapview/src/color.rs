use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque_alpha")]
    pub a: u8,
}

fn opaque_alpha() -> u8 {
    255
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn modulate(self, tint: Color) -> Color {
        let mul = |a: u8, b: u8| ((a as u16 * b as u16 + 127) / 255) as u8;
        Color::rgba(
            mul(self.r, tint.r),
            mul(self.g, tint.g),
            mul(self.b, tint.b),
            mul(self.a, tint.a),
        )
    }
}

// Truncates toward zero.
pub fn channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0) as u8
}

pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const YELLOW: Color = Color::rgb(250, 255, 0);
pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const ALMOST_BLACK: Color = Color::rgb(16, 16, 16);
pub const NIGHT_BLUE: Color = Color::rgb(0, 0, 20);
pub const RED: Color = Color::rgb(255, 0, 0);
pub const GREEN: Color = Color::rgb(0, 255, 0);
pub const LIGHT_GRAY: Color = Color::rgb(150, 150, 150);
pub const DARK_GREEN: Color = Color::rgb(0, 150, 0);
