//! Deterministic smooth noise used for organic drift.
//!
//! A single [`Noise`] is created per [`World`](crate::world::World) with a seed
//! drawn once at startup. Every use site (orbit centre drift, positional
//! jitter, link curvature) calls the same pure function with its own input
//! scaling.
//!
//! The field is value noise: a sine hash gives each integer lattice corner a
//! value in `[0, 1)` and samples blend the four surrounding corners with a
//! smoothstep weight, so nearby inputs give nearby outputs.

/// Multiplier for the first coordinate.
const K1: f32 = 12.9898;
/// Multiplier for the second coordinate.
const K2: f32 = 78.233;
/// Amplitude applied before taking the fractional part.
const K3: f32 = 43758.547;

/// Seeded continuous noise field on the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Noise {
    seed: f32,
}

impl Noise {
    pub fn new(seed: f32) -> Self {
        Self { seed }
    }

    /// Sample the field. Always returns a value in `[0, 1)`.
    #[inline]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let (ix, iy) = (x.floor(), y.floor());
        let (fx, fy) = (x - ix, y - iy);

        let a = self.hash(ix, iy);
        let b = self.hash(ix + 1.0, iy);
        let c = self.hash(ix, iy + 1.0);
        let d = self.hash(ix + 1.0, iy + 1.0);

        let (u, v) = (smoothstep(fx), smoothstep(fy));
        let value = lerp(lerp(a, b, u), lerp(c, d, u), v);
        clamp_unit(value)
    }

    /// Sample and recentre on zero, giving `[-0.5, 0.5)`.
    #[inline]
    pub fn centered(&self, x: f32, y: f32) -> f32 {
        self.sample(x, y) - 0.5
    }

    /// Value at a lattice corner.
    #[inline]
    fn hash(&self, x: f32, y: f32) -> f32 {
        let v = ((x * K1 + y * K2 + self.seed).sin() * K3).abs();
        clamp_unit(v - v.floor())
    }
}

#[inline]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// f32 rounding can land exactly on 1.0 for tiny negative remainders.
#[inline]
fn clamp_unit(f: f32) -> f32 {
    if !f.is_finite() || f < 0.0 {
        0.0
    } else if f >= 1.0 {
        f32::from_bits(1.0f32.to_bits() - 1)
    } else {
        f
    }
}
