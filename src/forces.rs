//! Pairwise force field.
//!
//! Every unordered pair is visited once per tick. Close pairs mark each other
//! as constellation members; pairs inside the force range receive either an
//! inverse-square attraction or an inverse-square repulsion, never both. The
//! band between the repulsion and attraction thresholds is a dead zone.

use crate::config::SimConfig;
use crate::node::Node;

/// Which force a pair receives in one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairForce {
    None,
    Attract,
    Repel,
}

impl PairForce {
    /// Classify a (softened) pair distance.
    pub fn classify(dist: f32, config: &SimConfig) -> Self {
        if dist >= config.force_range() {
            PairForce::None
        } else if dist > config.min_link_distance {
            PairForce::Attract
        } else if dist < config.repulsion_distance {
            PairForce::Repel
        } else {
            PairForce::None
        }
    }
}

/// Counts from one force pass, handy for tracing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForceSummary {
    pub attracted: usize,
    pub repelled: usize,
    pub members: usize,
}

/// Run one force pass over all pairs, then apply drag.
///
/// Clears and recomputes `in_constellation` on every node. Velocity deltas
/// are scaled by the other node's mass and by `dt`.
pub fn apply(nodes: &mut [Node], dt: f32, config: &SimConfig) -> ForceSummary {
    let mut summary = ForceSummary::default();

    for node in nodes.iter_mut() {
        node.in_constellation = false;
    }

    let n = nodes.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let (head, tail) = nodes.split_at_mut(j);
            let a = &mut head[i];
            let b = &mut tail[0];

            let delta = b.position - a.position;
            let dist = delta.length() + config.distance_epsilon;

            if dist < config.constellation_distance {
                a.in_constellation = true;
                b.in_constellation = true;
            }

            let dir = delta / dist;
            match PairForce::classify(dist, config) {
                PairForce::Attract => {
                    let f = config.soft_attract / (dist * dist);
                    a.velocity += dir * f * b.mass() * dt;
                    b.velocity -= dir * f * a.mass() * dt;
                    summary.attracted += 1;
                }
                PairForce::Repel => {
                    let f = config.repulsion_strength / (dist * dist);
                    a.velocity -= dir * f * b.mass() * dt;
                    b.velocity += dir * f * a.mass() * dt;
                    summary.repelled += 1;
                }
                PairForce::None => {}
            }
        }
    }

    let retain = drag_factor(config.drag, dt);
    for node in nodes.iter_mut() {
        node.velocity *= retain;
        if node.in_constellation {
            summary.members += 1;
        }
    }

    summary
}

/// Velocity retention for a step of `dt` seconds, normalised to 60 Hz.
#[inline]
pub fn drag_factor(drag: f32, dt: f32) -> f32 {
    drag.powf(dt * 60.0)
}
