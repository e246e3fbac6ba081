//! Render targets: where traced radiance ends up.

use std::sync::{Mutex, PoisonError};

use crate::Color;

/// Destination image for a render.
///
/// `set_pixel` takes `&self` because parallel renders write from many worker
/// threads at once. The scheduler guarantees every call in flight targets a
/// different pixel.
pub trait RenderTarget: Send + Sync {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn set_pixel(&self, x: u32, y: u32, color: Color);
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * linear_to_gamma(color.x).clamp(0.0, 1.0)) as u8;
    let g = (255.0 * linear_to_gamma(color.y).clamp(0.0, 1.0)) as u8;
    let b = (255.0 * linear_to_gamma(color.z).clamp(0.0, 1.0)) as u8;
    [r, g, b, 255]
}

/// Simple in-memory image, safe to write from several threads.
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pixels: Mutex<Vec<Color>>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "image dimensions must be non-zero");
        Self {
            width,
            height,
            pixels: Mutex::new(vec![Color::ZERO; (width * height) as usize]),
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.lock()[self.index(x, y)]
    }

    /// Copy of all pixels in row-major order.
    pub fn pixels(&self) -> Vec<Color> {
        self.lock().clone()
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let pixels = self.lock();
        let mut bytes = Vec::with_capacity(pixels.len() * 4);
        for color in pixels.iter() {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        (y * self.width + x) as usize
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Color>> {
        self.pixels.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RenderTarget for ImageBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_pixel(&self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.lock()[index] = color;
    }
}
