//! Nodes: one per user word.
//!
//! A node carries its kinematic state, two orbit descriptors whose blended
//! target it seeks, a slowly wandering rotation and a bounded trail of recent
//! positions. Nodes are never removed; their index in the world's node list
//! is their identity.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;

use crate::config::SimConfig;

/// Lower bound of the mass drawn at creation.
pub const MASS_MIN: f32 = 0.6;
/// Upper bound of the mass drawn at creation.
pub const MASS_MAX: f32 = 1.6;
/// Lower bound of the hue drawn at creation, in degrees.
pub const HUE_MIN: f32 = 215.0;
/// Upper bound of the hue drawn at creation, in degrees.
pub const HUE_MAX: f32 = 235.0;

const RADIUS_BASE: f32 = 8.0;
const RADIUS_PER_MASS: f32 = 3.5;

/// Radius for a given mass.
#[inline]
pub fn radius_for_mass(mass: f32) -> f32 {
    RADIUS_BASE + mass * RADIUS_PER_MASS
}

/// Circular path around a drifting centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub center: Vec2,
    pub radius: f32,
    /// Angular speed in radians per second, always positive.
    pub speed: f32,
    /// `1.0` or `-1.0`.
    pub direction: f32,
    pub phase: f32,
}

impl Orbit {
    /// Build an orbit whose current point is exactly `position`.
    pub fn through(position: Vec2, radius: f32, speed: f32, direction: f32, phase: f32) -> Self {
        let center = position - radius * Vec2::new(phase.cos(), phase.sin());
        Self {
            center,
            radius,
            speed,
            direction,
            phase,
        }
    }

    /// Current point on the circle.
    #[inline]
    pub fn point(&self) -> Vec2 {
        self.center + self.radius * Vec2::new(self.phase.cos(), self.phase.sin())
    }

    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.phase += self.speed * self.direction * dt;
    }
}

/// One recorded trail position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSample {
    pub position: Vec2,
    /// Simulation time in seconds when the sample was taken.
    pub time: f32,
}

/// Fixed-capacity FIFO of recent positions, oldest first.
#[derive(Debug, Clone)]
pub struct Trail {
    samples: VecDeque<TrailSample>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest when full.
    pub fn push(&mut self, sample: TrailSample) {
        if self.capacity == 0 {
            return;
        }
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<&TrailSample> {
        self.samples.back()
    }

    /// Samples from oldest to newest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TrailSample> + DoubleEndedIterator {
        self.samples.iter()
    }
}

/// A simulated word.
#[derive(Debug, Clone)]
pub struct Node {
    text: String,
    mass: f32,
    radius: f32,
    hue: f32,

    pub position: Vec2,
    pub velocity: Vec2,

    pub primary: Orbit,
    pub secondary: Orbit,

    pub angle: f32,
    pub angular_velocity: f32,
    /// Phase offset kept per node for turbulence; not yet read by the motion model.
    pub turbulence_phase: f32,

    /// Set during the force pass when any other node is within
    /// constellation distance.
    pub in_constellation: bool,
    pub trail: Trail,
}

impl Node {
    /// Create a node at rest at `position`.
    ///
    /// Mass, hue and both orbits are drawn from `rng`. The orbits are placed
    /// so that their blended target coincides with `position`.
    pub fn spawn<R: Rng + ?Sized>(
        text: impl Into<String>,
        position: Vec2,
        config: &SimConfig,
        rng: &mut R,
    ) -> Self {
        let mass = rng.gen_range(MASS_MIN..=MASS_MAX);
        let hue = rng.gen_range(HUE_MIN..=HUE_MAX);

        let primary = Orbit::through(
            position,
            rng.gen_range(40.0..140.0),
            rng.gen_range(0.1..0.4),
            random_direction(rng),
            rng.gen_range(0.0..std::f32::consts::TAU),
        );
        let secondary = Orbit::through(
            position,
            rng.gen_range(15.0..60.0),
            rng.gen_range(0.3..0.9),
            random_direction(rng),
            rng.gen_range(0.0..std::f32::consts::TAU),
        );

        Self {
            text: text.into(),
            mass,
            radius: radius_for_mass(mass),
            hue,
            position,
            velocity: Vec2::ZERO,
            primary,
            secondary,
            angle: rng.gen_range(0.0..std::f32::consts::TAU),
            angular_velocity: rng.gen_range(-0.3..0.3),
            turbulence_phase: rng.gen_range(0.0..1000.0),
            in_constellation: false,
            trail: Trail::new(config.trail_keep),
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Colour seed in degrees.
    #[inline]
    pub fn hue(&self) -> f32 {
        self.hue
    }

    /// Weighted blend of the two orbit points.
    pub fn orbit_target(&self, blend: f32) -> Vec2 {
        self.primary.point() * blend + self.secondary.point() * (1.0 - blend)
    }
}

fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.gen_bool(0.5) {
        1.0
    } else {
        -1.0
    }
}
