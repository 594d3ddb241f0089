//! Scene rendering as a display list.
//!
//! The [`Renderer`] reads a [`World`] and emits [`DrawCommand`]s in
//! back-to-front order. It holds no simulation state and never mutates the
//! world; turning commands into pixels is the GPU backend's job.
//!
//! Draw order:
//!
//! 1. background fade and vignette,
//! 2. links (glow stroke, core stroke, orbiting accent),
//! 3. nodes (trail, halo and core, label when the node is a constellation
//!    member).

use glam::Vec2;

use crate::links::Link;
use crate::node::Node;
use crate::visuals::{Hsla, Rgba, VisualConfig};
use crate::world::World;

/// One primitive of the display list.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Translucent fill over the whole canvas.
    Fade { color: Rgba },
    /// Radial gradient centred on the canvas.
    Vignette {
        center: Vec2,
        radius: f32,
        inner: Rgba,
        outer: Rgba,
    },
    /// Quadratic Bézier stroke.
    Curve {
        from: Vec2,
        control: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
    /// Straight stroke.
    Segment {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
    /// Solid disc.
    Disc { center: Vec2, radius: f32, color: Rgba },
    /// Soft disc fading from `color` at the centre to transparent at `radius`.
    Glow { center: Vec2, radius: f32, color: Rgba },
    /// Text centred horizontally on `anchor`, sitting on it.
    Label {
        anchor: Vec2,
        text: String,
        size: f32,
        color: Rgba,
        glow: Rgba,
    },
}

/// A complete display list for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }

    /// Text of every label in draw order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Label { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Builds display lists.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    visuals: VisualConfig,
}

impl Renderer {
    pub fn new(visuals: VisualConfig) -> Self {
        Self { visuals }
    }

    /// Render the whole scene.
    pub fn draw(&self, world: &World) -> Frame {
        let mut frame = Frame::default();
        self.draw_background(world, &mut frame);
        self.draw_links(world, &mut frame);
        self.draw_nodes(world, &mut frame);
        frame
    }

    fn draw_background(&self, world: &World, frame: &mut Frame) {
        let v = &self.visuals;
        let canvas = world.canvas();
        frame.commands.push(DrawCommand::Fade { color: v.fade });
        frame.commands.push(DrawCommand::Vignette {
            center: canvas.center(),
            radius: canvas.size().length() * v.vignette_extent,
            inner: v.vignette_inner,
            outer: v.vignette_outer,
        });
    }

    fn draw_links(&self, world: &World, frame: &mut Frame) {
        let nodes = world.nodes();
        for link in world.links() {
            let (Some(a), Some(b)) = (nodes.get(link.a), nodes.get(link.b)) else {
                continue;
            };
            self.draw_link(world, link, a, b, frame);
        }
    }

    fn draw_link(&self, world: &World, link: &Link, a: &Node, b: &Node, frame: &mut Frame) {
        let v = &self.visuals;
        let config = world.config();
        let time = world.time();

        let t = normalized_distance(link.distance, config.min_link_distance, config.max_link_distance);
        let control = link_control_point(world, a.position, b.position, t * v.link_bend);

        let hue = (a.hue() + b.hue()) * 0.5;
        let alpha = (1.0 - t) * v.link_alpha;
        let color = Hsla::new(hue, v.link_saturation, v.link_lightness, 1.0).to_rgba();

        frame.commands.push(DrawCommand::Curve {
            from: a.position,
            control,
            to: b.position,
            width: v.link_glow_width,
            color: color.with_alpha(alpha * 0.25),
        });
        frame.commands.push(DrawCommand::Curve {
            from: a.position,
            control,
            to: b.position,
            width: v.link_core_width,
            color: color.with_alpha(alpha),
        });

        let mid = quadratic_point(a.position, control, b.position, 0.5);
        let orbit = v.accent_orbit * (1.0 + 0.5 * (time * 2.0 + link.distance * 0.1).sin());
        let angle = time * 1.6 + link.distance * 0.05;
        let accent = mid + orbit * Vec2::new(angle.cos(), angle.sin());
        frame.commands.push(DrawCommand::Glow {
            center: accent,
            radius: v.accent_radius * 4.0,
            color: color.with_alpha(alpha * 0.6),
        });
        frame.commands.push(DrawCommand::Disc {
            center: accent,
            radius: v.accent_radius,
            color: Hsla::new(hue, 1.0, 0.9, alpha).to_rgba(),
        });
    }

    fn draw_nodes(&self, world: &World, frame: &mut Frame) {
        for node in world.nodes() {
            self.draw_trail(node, frame);
            self.draw_node(node, frame);
        }
    }

    fn draw_trail(&self, node: &Node, frame: &mut Frame) {
        let v = &self.visuals;
        let count = node.trail.len();
        if count < 2 {
            return;
        }
        let color = Hsla::new(node.hue(), 0.8, 0.7, 1.0).to_rgba();
        let samples: Vec<Vec2> = node.trail.iter().map(|s| s.position).collect();
        let last = (count - 1) as f32;
        for (k, pair) in samples.windows(2).enumerate() {
            let f = (k + 1) as f32 / last;
            frame.commands.push(DrawCommand::Segment {
                from: pair[0],
                to: pair[1],
                width: 0.3 + f * (v.trail_width - 0.3),
                color: color.with_alpha(f * v.trail_alpha),
            });
        }
    }

    fn draw_node(&self, node: &Node, frame: &mut Frame) {
        let v = &self.visuals;
        let core = node.radius() * v.node_core_scale;

        frame.commands.push(DrawCommand::Glow {
            center: node.position,
            radius: core * v.node_glow_scale,
            color: Hsla::new(node.hue(), 0.9, 0.7, 0.45).to_rgba(),
        });
        frame.commands.push(DrawCommand::Disc {
            center: node.position,
            radius: core,
            color: Hsla::new(node.hue(), 1.0, 0.88, 1.0).to_rgba(),
        });

        if node.in_constellation {
            frame.commands.push(DrawCommand::Label {
                anchor: node.position - Vec2::new(0.0, node.radius() + v.label_gap),
                text: node.text().to_owned(),
                size: v.label_size,
                color: Hsla::new(node.hue(), 0.6, 0.9, 0.95).to_rgba(),
                glow: Hsla::new(node.hue(), 0.9, 0.65, 0.35).to_rgba(),
            });
        }
    }
}

/// Map `distance` from `[min, max]` onto `[0, 1]`, clamped.
pub fn normalized_distance(distance: f32, min: f32, max: f32) -> f32 {
    if max <= min {
        return 0.0;
    }
    ((distance - min) / (max - min)).clamp(0.0, 1.0)
}

/// Control point bent perpendicular to `a → b` by `bend` pixels.
///
/// The side is picked by the noise field at the segment midpoint.
fn link_control_point(world: &World, a: Vec2, b: Vec2, bend: f32) -> Vec2 {
    let mid = (a + b) * 0.5;
    let d = b - a;
    let len = d.length();
    if len <= f32::EPSILON {
        return mid;
    }
    let perp = Vec2::new(-d.y, d.x) / len;
    let side = if world.noise().sample(mid.x * 0.01, mid.y * 0.01 + world.time() * 0.1) > 0.5 {
        1.0
    } else {
        -1.0
    };
    mid + perp * bend * side
}

/// Point on a quadratic Bézier at parameter `t`.
pub fn quadratic_point(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
}
