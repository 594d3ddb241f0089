//! Drawing surface dimensions.

use glam::Vec2;

/// Highest device pixel ratio the backing store is allowed to use.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Logical canvas size plus the backing-store scale.
///
/// The simulation works purely in logical pixels; `scale` only affects how
/// many physical pixels back each logical one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl Canvas {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        let mut canvas = Self {
            width: 0.0,
            height: 0.0,
            scale: 1.0,
        };
        canvas.resize(width, height, device_pixel_ratio);
        canvas
    }

    /// Update the logical size and the capped pixel ratio.
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.scale = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(MAX_PIXEL_RATIO)
        } else {
            1.0
        };
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Physical pixel size of the backing store, never zero.
    pub fn backing_size(&self) -> (u32, u32) {
        let w = (self.width * self.scale).round().max(1.0) as u32;
        let h = (self.height * self.scale).round().max(1.0) as u32;
        (w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_ratio_capped() {
        let canvas = Canvas::new(800.0, 600.0, 3.0);
        assert_eq!(canvas.scale, 2.0);
        assert_eq!(canvas.backing_size(), (1600, 1200));
    }

    #[test]
    fn test_fractional_ratio() {
        let canvas = Canvas::new(100.0, 50.0, 1.5);
        assert_eq!(canvas.backing_size(), (150, 75));
    }

    #[test]
    fn test_degenerate_inputs() {
        let canvas = Canvas::new(-5.0, 0.0, f32::NAN);
        assert_eq!(canvas.scale, 1.0);
        assert_eq!(canvas.backing_size(), (1, 1));
    }
}
