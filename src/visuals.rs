//! Colour model and visual configuration.
//!
//! Rendering options control how the constellation looks, separate from the
//! physics that controls how it moves.
//!
//! # Usage
//!
//! ```ignore
//! Constellation::new()
//!     .with_visuals(|v| {
//!         v.link_bend = 40.0;
//!         v.label_size = 15.0;
//!     })
//!     .run()?;
//! ```

/// Straight (non-premultiplied) RGBA colour, components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels and a float alpha.
    pub fn from_rgb8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a)
    }

    /// Same colour with a different alpha.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Convert to 8-bit channels, clamping out-of-range components.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Hue/saturation/lightness colour with alpha.
///
/// Hue is in degrees, saturation and lightness in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub h: f32,
    pub s: f32,
    pub l: f32,
    pub a: f32,
}

impl Hsla {
    pub const fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a }
    }

    pub fn to_rgba(self) -> Rgba {
        let h = self.h.rem_euclid(360.0) / 60.0;
        let s = self.s.clamp(0.0, 1.0);
        let l = self.l.clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Rgba::new(r + m, g + m, b + m, self.a)
    }
}

/// Rendering constants. All lengths are in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualConfig {
    /// Translucent fill laid over the previous frame; lower alpha means
    /// longer motion blur.
    pub fade: Rgba,
    /// Vignette colour at the canvas centre.
    pub vignette_inner: Rgba,
    /// Vignette colour at the rim.
    pub vignette_outer: Rgba,
    /// Vignette radius as a fraction of the canvas diagonal.
    pub vignette_extent: f32,

    /// Maximum perpendicular bend of a link curve.
    pub link_bend: f32,
    pub link_glow_width: f32,
    pub link_core_width: f32,
    /// Alpha of a link's core stroke at zero normalised distance.
    pub link_alpha: f32,
    pub link_saturation: f32,
    pub link_lightness: f32,
    /// Base orbit radius of the midpoint accent dot.
    pub accent_orbit: f32,
    pub accent_radius: f32,

    /// Trail alpha at the newest sample.
    pub trail_alpha: f32,
    /// Trail width at the newest sample.
    pub trail_width: f32,
    /// Core disc radius as a fraction of the node radius.
    pub node_core_scale: f32,
    /// Halo radius as a multiple of the core disc radius.
    pub node_glow_scale: f32,

    pub label_size: f32,
    /// Gap between the top of the node and the baseline of its label.
    pub label_gap: f32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            fade: Rgba::from_rgb8(4, 6, 18, 0.22),
            vignette_inner: Rgba::from_rgb8(24, 34, 72, 0.10),
            vignette_outer: Rgba::from_rgb8(0, 0, 0, 0.0),
            vignette_extent: 0.6,

            link_bend: 26.0,
            link_glow_width: 6.0,
            link_core_width: 1.2,
            link_alpha: 0.7,
            link_saturation: 0.85,
            link_lightness: 0.68,
            accent_orbit: 4.0,
            accent_radius: 1.6,

            trail_alpha: 0.45,
            trail_width: 2.4,
            node_core_scale: 0.28,
            node_glow_scale: 4.0,

            label_size: 13.0,
            label_gap: 6.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgba, b: Rgba) -> bool {
        (a.r - b.r).abs() < 1e-3 && (a.g - b.g).abs() < 1e-3 && (a.b - b.b).abs() < 1e-3 && (a.a - b.a).abs() < 1e-3
    }

    #[test]
    fn test_primary_hues() {
        assert!(close(Hsla::new(0.0, 1.0, 0.5, 1.0).to_rgba(), Rgba::new(1.0, 0.0, 0.0, 1.0)));
        assert!(close(Hsla::new(120.0, 1.0, 0.5, 1.0).to_rgba(), Rgba::new(0.0, 1.0, 0.0, 1.0)));
        assert!(close(Hsla::new(240.0, 1.0, 0.5, 0.5).to_rgba(), Rgba::new(0.0, 0.0, 1.0, 0.5)));
        assert!(close(Hsla::new(360.0, 1.0, 0.5, 1.0).to_rgba(), Rgba::new(1.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_grey_and_white() {
        assert!(close(Hsla::new(225.0, 0.0, 0.5, 1.0).to_rgba(), Rgba::new(0.5, 0.5, 0.5, 1.0)));
        assert!(close(Hsla::new(225.0, 0.9, 1.0, 1.0).to_rgba(), Rgba::new(1.0, 1.0, 1.0, 1.0)));
    }

    #[test]
    fn test_node_hue_is_blue() {
        let c = Hsla::new(225.0, 0.9, 0.6, 1.0).to_rgba();
        assert!(c.b > c.g && c.g > c.r);
    }

    #[test]
    fn test_to_rgba8_clamps() {
        assert_eq!(Rgba::new(1.5, -0.2, 0.5, 1.0).to_rgba8(), [255, 0, 128, 255]);
    }
}
