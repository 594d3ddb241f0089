//! Physics and motion constants.
//!
//! Everything the simulation tunes lives in [`SimConfig`]. The defaults are
//! the canonical values; rendering constants live separately in
//! [`VisualConfig`](crate::visuals::VisualConfig).
//!
//! # Usage
//!
//! ```ignore
//! Constellation::new()
//!     .with_physics(|p| {
//!         p.constellation_distance = 140.0;
//!         p.drag = 0.97;
//!     })
//!     .run()?;
//! ```

/// Constants driving the force field, the motion model and the frame clock.
///
/// Distances are in logical canvas pixels, times in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Pairs closer than this are linked and mark each other as
    /// constellation members.
    pub constellation_distance: f32,
    /// Attraction only acts beyond this separation.
    pub min_link_distance: f32,
    /// Upper end of the link normalisation range. Forces act up to
    /// `1.25 ×` this distance.
    pub max_link_distance: f32,
    /// Repulsion only acts below this separation.
    pub repulsion_distance: f32,
    /// Numerator of the inverse-square attraction.
    pub soft_attract: f32,
    /// Numerator of the inverse-square repulsion.
    pub repulsion_strength: f32,
    /// Per-tick velocity retention at 60 Hz.
    pub drag: f32,
    /// Added to pair distances so coincident nodes never divide by zero.
    pub distance_epsilon: f32,

    /// Rate of the first-order seek towards the orbit target.
    pub move_speed: f32,
    /// Weight of the primary orbit in the blended target (secondary gets the rest).
    pub orbit_blend: f32,
    /// Orbit centre drift speed, pixels per second at full noise deflection.
    pub center_drift: f32,
    /// Noise time scale for the primary orbit centre.
    pub primary_drift_rate: f32,
    /// Noise time scale for the secondary orbit centre.
    pub secondary_drift_rate: f32,
    /// Positional jitter, pixels per second at full noise deflection.
    pub noise_strength: f32,
    /// Noise time scale for the positional jitter.
    pub jitter_rate: f32,

    /// Trail capacity per node.
    pub trail_keep: usize,
    /// How far outside the canvas a node may go before it wraps.
    pub wrap_margin: f32,
    /// Largest inward distance, beyond the orbit radius, of an orbit centre
    /// re-drawn after a wrap.
    pub recenter_spread: f32,

    /// Delta time used before a previous frame exists.
    pub first_frame_dt: f32,
    /// Upper clamp for delta time.
    pub max_dt: f32,

    /// Inset for nodes placed without explicit coordinates.
    pub spawn_margin: f32,
    /// Fraction of the canvas where the form-submit path places nodes.
    pub center_band: (f32, f32),
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            constellation_distance: 120.0,
            min_link_distance: 48.0,
            max_link_distance: 160.0,
            repulsion_distance: 24.0,
            soft_attract: 1800.0,
            repulsion_strength: 3200.0,
            drag: 0.98,
            distance_epsilon: 1e-3,

            move_speed: 2.0,
            orbit_blend: 0.7,
            center_drift: 24.0,
            primary_drift_rate: 0.05,
            secondary_drift_rate: 0.083,
            noise_strength: 12.0,
            jitter_rate: 0.2,

            trail_keep: 40,
            wrap_margin: 40.0,
            recenter_spread: 200.0,

            first_frame_dt: 0.016,
            max_dt: 0.033,

            spawn_margin: 80.0,
            center_band: (0.3, 0.7),
        }
    }
}

impl SimConfig {
    /// Separation below which pair forces are evaluated at all.
    #[inline]
    pub fn force_range(&self) -> f32 {
        self.max_link_distance * 1.25
    }

    /// Clamp a raw frame delta into `[0, max_dt]`.
    ///
    /// Non-finite input collapses to zero.
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_canonical_values() {
        let c = SimConfig::default();
        assert_eq!(c.constellation_distance, 120.0);
        assert_eq!(c.min_link_distance, 48.0);
        assert_eq!(c.repulsion_distance, 24.0);
        assert_eq!(c.drag, 0.98);
        assert_eq!(c.move_speed, 2.0);
        assert_eq!(c.trail_keep, 40);
        assert_eq!(c.wrap_margin, 40.0);
        assert_eq!(c.max_dt, 0.033);
    }

    #[test]
    fn test_force_range() {
        let c = SimConfig::default();
        assert_eq!(c.force_range(), 200.0);
    }

    #[test]
    fn test_clamp_dt() {
        let c = SimConfig::default();
        assert_eq!(c.clamp_dt(-1.0), 0.0);
        assert_eq!(c.clamp_dt(0.01), 0.01);
        assert_eq!(c.clamp_dt(0.5), 0.033);
        assert_eq!(c.clamp_dt(f32::NAN), 0.0);
    }
}
