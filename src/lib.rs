//! # Constellation
//!
//! Words drifting on layered orbits, pulled together by soft gravity and
//! linked by glowing curves when they come close.
//!
//! The crate is split into a pure simulation core and a thin GPU shell. The
//! core never touches the window; it can be ticked and inspected headlessly.
//!
//! ## Quick Start
//!
//! ```ignore
//! use constellation::prelude::*;
//!
//! fn main() -> Result<(), RunError> {
//!     Constellation::new()
//!         .with_words(["nebula", "orbit", "drift"])
//!         .with_visuals(|v| v.link_bend = 32.0)
//!         .run()
//! }
//! ```
//!
//! ## Headless use
//!
//! ```ignore
//! let mut world = World::with_seed(SimConfig::default(), Canvas::new(800.0, 600.0, 1.0), 7);
//! world.add_node("hello", None);
//! world.add_node("world", None);
//! world.tick(0.016);
//!
//! let frame = Renderer::default().draw(&world);
//! for label in frame.labels() {
//!     println!("{}", label);
//! }
//! ```
//!
//! ## Per-tick pipeline
//!
//! Data flows one way each frame:
//!
//! 1. [`forces`]: pairwise attraction/repulsion, constellation flags, drag
//! 2. [`motion`]: orbit drift, seek, jitter, rotation, wrap, trail
//! 3. [`links`]: full rebuild of the proximity link set
//! 4. [`render`]: display list for the GPU backend

pub mod canvas;
pub mod config;
pub mod error;
pub mod forces;
mod gpu;
pub mod links;
pub mod motion;
pub mod node;
pub mod noise;
pub mod render;
mod simulation;
pub mod time;
pub mod ui;
pub mod visuals;
pub mod world;

pub use canvas::Canvas;
pub use config::SimConfig;
pub use error::{GpuError, RunError};
pub use glam::Vec2;
pub use links::Link;
pub use node::{Node, Orbit, Trail, TrailSample};
pub use noise::Noise;
pub use render::{DrawCommand, Frame, Renderer};
pub use simulation::Constellation;
pub use visuals::{Hsla, Rgba, VisualConfig};
pub use world::World;

/// Common imports.
pub mod prelude {
    pub use crate::canvas::Canvas;
    pub use crate::config::SimConfig;
    pub use crate::error::RunError;
    pub use crate::render::{DrawCommand, Frame, Renderer};
    pub use crate::simulation::Constellation;
    pub use crate::time::FrameClock;
    pub use crate::visuals::{Hsla, Rgba, VisualConfig};
    pub use crate::world::World;
    pub use crate::Vec2;
}
