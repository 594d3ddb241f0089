//! Per-node motion model.
//!
//! Each tick a node:
//!
//! 1. drifts both orbit centres through the noise field,
//! 2. advances both orbit phases,
//! 3. seeks the blended orbit target with a first-order filter,
//! 4. integrates the velocity left by the force field,
//! 5. picks up a little positional jitter from the noise field,
//! 6. advances its rotation (whose rate random-walks towards zero),
//! 7. wraps around the canvas once it is more than a margin outside,
//! 8. records its position in the trail.
//!
//! A zero `dt` leaves the node untouched.

use glam::Vec2;
use rand::Rng;

use crate::config::SimConfig;
use crate::node::{Node, TrailSample};
use crate::noise::Noise;

/// Offset separating the y-axis noise lookups from the x-axis ones.
const AXIS_DECORRELATION: f32 = 137.0;
/// Input scaling applied to positions before they enter the noise field.
const SPATIAL_SCALE: f32 = 0.01;

/// Everything a node needs from the world to take one step.
#[derive(Debug, Clone, Copy)]
pub struct MotionStep<'a> {
    pub dt: f32,
    /// Simulation time at the start of the step, seconds.
    pub time: f32,
    pub bounds: Vec2,
    pub noise: &'a Noise,
    pub config: &'a SimConfig,
}

impl MotionStep<'_> {
    /// Advance one node.
    pub fn apply<R: Rng + ?Sized>(&self, node: &mut Node, rng: &mut R) {
        let dt = self.dt;
        if dt <= 0.0 {
            return;
        }
        let config = self.config;

        let primary_t = self.time * config.primary_drift_rate;
        let secondary_t = self.time * config.secondary_drift_rate;
        node.primary.center += self.drift(node.primary.center, primary_t) * config.center_drift * dt;
        node.secondary.center +=
            self.drift(node.secondary.center, secondary_t) * config.center_drift * dt;

        node.primary.advance(dt);
        node.secondary.advance(dt);

        let target = node.orbit_target(config.orbit_blend);
        node.position += (target - node.position) * config.move_speed * dt;
        node.position += node.velocity * dt;

        let jitter_t = self.time * config.jitter_rate;
        node.position += self.drift(node.position, jitter_t) * config.noise_strength * dt;

        node.angle += node.angular_velocity * dt;
        let kick = rng.gen_range(-0.001..=0.001);
        node.angular_velocity += (kick - node.angular_velocity * 0.1) * dt;

        wrap(node, self.bounds, config, rng);

        node.trail.push(TrailSample {
            position: node.position,
            time: self.time + dt,
        });
    }

    /// Zero-centred noise displacement for a point, one lookup per axis.
    fn drift(&self, at: Vec2, t: f32) -> Vec2 {
        Vec2::new(
            self.noise.centered(at.x * SPATIAL_SCALE, t),
            self.noise.centered(at.y * SPATIAL_SCALE, t + AXIS_DECORRELATION),
        )
    }
}

/// Teleport a node that has strayed beyond the margin to the opposite edge.
///
/// The wrapped axis of both orbit centres is re-drawn on the canvas side of
/// the new position, at least one orbit radius plus a quarter of the spread
/// away, so every point of the orbit lies inward and the seek carries the
/// node onto the canvas instead of back across the edge. Returns whether any
/// axis wrapped.
pub fn wrap<R: Rng + ?Sized>(node: &mut Node, bounds: Vec2, config: &SimConfig, rng: &mut R) -> bool {
    let margin = config.wrap_margin;
    let spread = config.recenter_spread;
    let mut wrapped = false;

    if let Some((x, inward)) = wrapped_coordinate(node.position.x, bounds.x, margin) {
        node.position.x = x;
        node.primary.center.x = x + inward * recenter_offset(node.primary.radius, spread, rng);
        node.secondary.center.x = x + inward * recenter_offset(node.secondary.radius, spread, rng);
        wrapped = true;
    }
    if let Some((y, inward)) = wrapped_coordinate(node.position.y, bounds.y, margin) {
        node.position.y = y;
        node.primary.center.y = y + inward * recenter_offset(node.primary.radius, spread, rng);
        node.secondary.center.y = y + inward * recenter_offset(node.secondary.radius, spread, rng);
        wrapped = true;
    }

    wrapped
}

/// New coordinate and the sign pointing back onto the canvas.
fn wrapped_coordinate(value: f32, extent: f32, margin: f32) -> Option<(f32, f32)> {
    if value < -margin {
        Some((extent + margin, -1.0))
    } else if value > extent + margin {
        Some((-margin, 1.0))
    } else {
        None
    }
}

fn recenter_offset<R: Rng + ?Sized>(orbit_radius: f32, spread: f32, rng: &mut R) -> f32 {
    let spread = spread.max(0.0);
    orbit_radius + rng.gen_range(spread * 0.25..=spread)
}
