//! Proximity links.
//!
//! The link set is rebuilt from scratch after motion every tick. It is never
//! patched, so it can never go stale relative to the node positions it was
//! built from.

use crate::node::Node;

/// A draw-only connection between two nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    /// Lower node index.
    pub a: usize,
    /// Higher node index.
    pub b: usize,
    /// Euclidean distance at rebuild time.
    pub distance: f32,
}

/// Replace `out` with one link per unordered pair closer than `threshold`.
///
/// Links are emitted in node index order, `a < b` always.
pub fn rebuild(nodes: &[Node], threshold: f32, out: &mut Vec<Link>) {
    out.clear();
    for (i, a) in nodes.iter().enumerate() {
        for (j, b) in nodes.iter().enumerate().skip(i + 1) {
            let distance = a.position.distance(b.position);
            if distance < threshold {
                out.push(Link { a: i, b: j, distance });
            }
        }
    }
}
