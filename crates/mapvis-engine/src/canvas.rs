//! Colour render surface.

use crate::color::Color;

/// A 2D colour buffer.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data (row-major).
    pub data: Vec<Color>,
}

impl Canvas {
    /// Create a new canvas filled with a color.
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            data: vec![fill; size],
        }
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.data[self.index(x, y)]
    }

    /// Composite a color over the pixel at the given coordinates.
    #[inline]
    pub fn blend(&mut self, x: u32, y: u32, color: Color) {
        let idx = self.index(x, y);
        self.data[idx] = color.over(&self.data[idx]);
    }

    /// Composite a color over every listed pixel.
    pub fn blend_pixels(&mut self, pixels: &[(u32, u32)], color: Color) {
        for &(x, y) in pixels {
            self.blend(x, y, color);
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + x as usize
    }

    /// Convert to 8-bit RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * 4);
        for color in &self.data {
            bytes.extend_from_slice(&color.to_rgba8());
        }
        bytes
    }

    /// Convert to 8-bit RGB bytes flattened onto white.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * 3);
        for color in &self.data {
            bytes.extend_from_slice(&color.to_rgb8_on_white());
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills() {
        let canvas = Canvas::new(3, 2, Color::white());
        assert_eq!(canvas.data.len(), 6);
        assert_eq!(canvas.get(2, 1), Color::white());
    }

    #[test]
    fn test_blend_pixels() {
        let mut canvas = Canvas::new(2, 2, Color::transparent());
        canvas.blend_pixels(&[(1, 0), (0, 1)], Color::black());

        assert_eq!(canvas.get(1, 0), Color::black());
        assert_eq!(canvas.get(0, 1), Color::black());
        assert_eq!(canvas.get(0, 0), Color::transparent());
    }

    #[test]
    fn test_byte_layouts() {
        let canvas = Canvas::new(1, 1, Color::rgba(1.0, 0.0, 0.0, 0.0));
        assert_eq!(canvas.to_rgba8(), vec![255, 0, 0, 0]);
        assert_eq!(canvas.to_rgb8(), vec![255, 255, 255]);
    }
}
