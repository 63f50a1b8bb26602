use bytemuck::{Pod, Zeroable};

/// An RGB color with channel intensities in [0, 1]
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Color { r, g, b }
    }

    /// Build a color from 8-bit channel values
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Color::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    pub fn channels(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    // Camouflage palette
    pub const DARK_GREEN: Color = Color::from_rgb8(0, 100, 0);
    pub const FOREST_GREEN: Color = Color::from_rgb8(34, 139, 34);
    pub const NAVY: Color = Color::from_rgb8(0, 0, 128);
    pub const SADDLE_BROWN: Color = Color::from_rgb8(139, 69, 19);
    pub const OLIVE: Color = Color::from_rgb8(128, 128, 0);
}

impl From<[f64; 3]> for Color {
    fn from([r, g, b]: [f64; 3]) -> Self {
        Color::new(r, g, b)
    }
}

/// The five-color woodland palette, in compositing order
pub fn camo_palette() -> Vec<Color> {
    vec![
        Color::DARK_GREEN,
        Color::FOREST_GREEN,
        Color::NAVY,
        Color::SADDLE_BROWN,
        Color::OLIVE,
    ]
}
