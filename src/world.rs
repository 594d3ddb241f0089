//! Simulation state and the per-tick update.
//!
//! [`World`] is the single explicit context the frame driver owns: canvas
//! size, the ordered node list, the current link set, the noise seed and the
//! RNG. One call to [`World::tick`] runs the force field, the motion model and
//! the link rebuild, in that order.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::canvas::Canvas;
use crate::config::SimConfig;
use crate::forces::{self, ForceSummary};
use crate::links::{self, Link};
use crate::motion::MotionStep;
use crate::node::Node;
use crate::noise::Noise;

/// The whole simulation.
#[derive(Debug, Clone)]
pub struct World {
    config: SimConfig,
    canvas: Canvas,
    nodes: Vec<Node>,
    links: Vec<Link>,
    noise: Noise,
    rng: StdRng,
    time: f32,
    last_forces: ForceSummary,
}

impl World {
    /// Create an empty world seeded from OS entropy.
    pub fn new(config: SimConfig, canvas: Canvas) -> Self {
        Self::from_rng(config, canvas, StdRng::from_entropy())
    }

    /// Create an empty world whose every random draw follows from `seed`.
    pub fn with_seed(config: SimConfig, canvas: Canvas, seed: u64) -> Self {
        Self::from_rng(config, canvas, StdRng::seed_from_u64(seed))
    }

    fn from_rng(config: SimConfig, canvas: Canvas, mut rng: StdRng) -> Self {
        let noise = Noise::new(rng.gen_range(0.0..1000.0));
        Self {
            config,
            canvas,
            nodes: Vec::new(),
            links: Vec::new(),
            noise,
            rng,
            time: 0.0,
            last_forces: ForceSummary::default(),
        }
    }

    /// Add a word.
    ///
    /// Whitespace is trimmed; empty text is ignored and returns `None`. When
    /// `at` is omitted the node is placed uniformly inside the canvas minus
    /// the spawn margin. Returns the new node's index.
    pub fn add_node(&mut self, text: &str, at: Option<Vec2>) -> Option<usize> {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("ignoring empty word");
            return None;
        }
        let position = match at {
            Some(p) => p,
            None => {
                let m = self.config.spawn_margin;
                Vec2::new(
                    uniform_inset(&mut self.rng, self.canvas.width, m, m),
                    uniform_inset(&mut self.rng, self.canvas.height, m, m),
                )
            }
        };
        Some(self.push_node(text, position))
    }

    /// Add a word somewhere in the central band of the canvas.
    ///
    /// This is the placement used for words typed into the entry field.
    pub fn add_node_near_center(&mut self, text: &str) -> Option<usize> {
        let (lo, hi) = self.config.center_band;
        let x = self.canvas.width * self.rng.gen_range(lo..=hi);
        let y = self.canvas.height * self.rng.gen_range(lo..=hi);
        self.add_node(text, Some(Vec2::new(x, y)))
    }

    fn push_node(&mut self, text: &str, position: Vec2) -> usize {
        let node = Node::spawn(text, position, &self.config, &mut self.rng);
        self.nodes.push(node);
        let index = self.nodes.len() - 1;
        tracing::debug!(index, text, x = position.x, y = position.y, "node added");
        index
    }

    /// Resize the canvas. Node positions are left alone.
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.canvas.resize(width, height, device_pixel_ratio);
        tracing::debug!(width, height, scale = self.canvas.scale, "canvas resized");
    }

    /// Advance the simulation by `dt` seconds (clamped to `[0, max_dt]`).
    pub fn tick(&mut self, dt: f32) {
        let dt = self.config.clamp_dt(dt);

        self.last_forces = forces::apply(&mut self.nodes, dt, &self.config);

        let step = MotionStep {
            dt,
            time: self.time,
            bounds: self.canvas.size(),
            noise: &self.noise,
            config: &self.config,
        };
        for node in &mut self.nodes {
            step.apply(node, &mut self.rng);
        }

        links::rebuild(&self.nodes, self.config.constellation_distance, &mut self.links);
        self.time += dt;
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Mutable access to one node, e.g. to pin a position.
    pub fn node_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    #[inline]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    #[inline]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[inline]
    pub fn noise(&self) -> &Noise {
        &self.noise
    }

    /// Simulation time in seconds (sum of clamped deltas).
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Counts from the most recent force pass.
    #[inline]
    pub fn last_forces(&self) -> ForceSummary {
        self.last_forces
    }
}

/// Uniform in `[lo_margin, extent - hi_margin]`, or the midpoint when the
/// extent is too small for the margins.
fn uniform_inset<R: Rng + ?Sized>(rng: &mut R, extent: f32, lo_margin: f32, hi_margin: f32) -> f32 {
    let lo = lo_margin;
    let hi = extent - hi_margin;
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        extent * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::with_seed(SimConfig::default(), Canvas::new(800.0, 600.0, 1.0), 42)
    }

    #[test]
    fn test_starts_empty() {
        let w = world();
        assert!(w.nodes().is_empty());
        assert!(w.links().is_empty());
        assert_eq!(w.time(), 0.0);
    }

    #[test]
    fn test_empty_text_ignored() {
        let mut w = world();
        assert_eq!(w.add_node("   ", None), None);
        assert_eq!(w.add_node("", Some(Vec2::ZERO)), None);
        assert_eq!(w.add_node_near_center("\t\n"), None);
        assert!(w.nodes().is_empty());
    }

    #[test]
    fn test_text_trimmed() {
        let mut w = world();
        let i = w.add_node("  nova  ", None);
        assert_eq!(i, Some(0));
        assert_eq!(w.nodes()[0].text(), "nova");
    }

    #[test]
    fn test_random_placement_inside_margin() {
        let mut w = world();
        for k in 0..100 {
            w.add_node(&format!("w{}", k), None);
        }
        for node in w.nodes() {
            assert!((80.0..=720.0).contains(&node.position.x));
            assert!((80.0..=520.0).contains(&node.position.y));
        }
    }

    #[test]
    fn test_center_band_placement() {
        let mut w = world();
        for k in 0..100 {
            w.add_node_near_center(&format!("w{}", k));
        }
        for node in w.nodes() {
            assert!((240.0..=560.0).contains(&node.position.x));
            assert!((180.0..=420.0).contains(&node.position.y));
        }
    }

    #[test]
    fn test_tiny_canvas_placement() {
        let mut w = World::with_seed(SimConfig::default(), Canvas::new(100.0, 60.0, 1.0), 1);
        w.add_node("small", None);
        assert_eq!(w.nodes()[0].position, Vec2::new(50.0, 30.0));
    }

    #[test]
    fn test_resize_keeps_positions() {
        let mut w = world();
        w.add_node("a", Some(Vec2::new(700.0, 500.0)));
        w.resize(300.0, 200.0, 3.0);
        assert_eq!(w.nodes()[0].position, Vec2::new(700.0, 500.0));
        assert_eq!(w.canvas().width, 300.0);
        assert_eq!(w.canvas().scale, 2.0);
    }

    #[test]
    fn test_tick_clamps_dt() {
        let mut w = world();
        w.tick(1.0);
        assert!((w.time() - 0.033).abs() < 1e-6);
        w.tick(-1.0);
        assert!((w.time() - 0.033).abs() < 1e-6);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = world();
        let mut b = world();
        for w in [&mut a, &mut b] {
            w.add_node("one", None);
            w.add_node("two", None);
            w.add_node("three", None);
            for _ in 0..30 {
                w.tick(0.016);
            }
        }
        for (x, y) in a.nodes().iter().zip(b.nodes()) {
            assert_eq!(x.position, y.position);
            assert_eq!(x.velocity, y.velocity);
        }
    }
}
