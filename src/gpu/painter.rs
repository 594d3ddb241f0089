//! Display list to egui shapes.
//!
//! Strokes, discs and text are handed to egui's tessellator so they come out
//! anti-aliased. Background commands are not shapes; they become uniforms for
//! the backdrop pass instead.

use egui::epaint::{ClippedShape, QuadraticBezierShape};
use egui::{Color32, FontId, Mesh, Pos2, Rect, Shape, Stroke};
use glam::Vec2;

use crate::canvas::Canvas;
use crate::gpu::backdrop::BackgroundUniforms;
use crate::render::{DrawCommand, Frame};
use crate::visuals::Rgba;

/// Segments used to approximate a glow disc.
const GLOW_SEGMENTS: u32 = 32;

/// Label glow offsets in logical pixels.
const LABEL_GLOW_OFFSETS: [(f32, f32); 4] = [(-1.0, 0.0), (1.0, 0.0), (0.0, -1.0), (0.0, 1.0)];

#[inline]
fn pos(v: Vec2) -> Pos2 {
    Pos2::new(v.x, v.y)
}

#[inline]
fn color(c: Rgba) -> Color32 {
    let [r, g, b, a] = c.to_rgba8();
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Collect the background commands of `frame` into backdrop uniforms.
///
/// A frame without background commands leaves the canvas untouched.
pub fn background(frame: &Frame, canvas: &Canvas) -> BackgroundUniforms {
    let size = [canvas.width, canvas.height];
    let mut uniforms = BackgroundUniforms::transparent(size);
    for command in frame.iter() {
        match command {
            DrawCommand::Fade { color } => uniforms.fade = color.to_array(),
            DrawCommand::Vignette {
                center,
                radius,
                inner,
                outer,
            } => {
                uniforms.vignette_inner = inner.to_array();
                uniforms.vignette_outer = outer.to_array();
                uniforms.center = center.to_array();
                uniforms.radius = *radius;
            }
            _ => {}
        }
    }
    uniforms
}

/// Convert the scene commands of `frame` into clipped egui shapes.
///
/// Must be called between `begin_pass` and `end_pass` of `ctx` so label
/// glyphs are rasterised into the current font atlas.
pub fn paint(ctx: &egui::Context, frame: &Frame) -> Vec<ClippedShape> {
    let mut shapes = Vec::with_capacity(frame.len());
    let mut push = |shape: Shape| {
        shapes.push(ClippedShape {
            clip_rect: Rect::EVERYTHING,
            shape,
        })
    };

    for command in frame.iter() {
        match command {
            DrawCommand::Fade { .. } | DrawCommand::Vignette { .. } => {}
            DrawCommand::Curve {
                from,
                control,
                to,
                width,
                color: c,
            } => {
                push(Shape::QuadraticBezier(QuadraticBezierShape::from_points_stroke(
                    [pos(*from), pos(*control), pos(*to)],
                    false,
                    Color32::TRANSPARENT,
                    Stroke::new(*width, color(*c)),
                )));
            }
            DrawCommand::Segment {
                from,
                to,
                width,
                color: c,
            } => {
                push(Shape::line_segment([pos(*from), pos(*to)], Stroke::new(*width, color(*c))));
            }
            DrawCommand::Disc {
                center,
                radius,
                color: c,
            } => {
                push(Shape::circle_filled(pos(*center), *radius, color(*c)));
            }
            DrawCommand::Glow {
                center,
                radius,
                color: c,
            } => {
                push(Shape::mesh(glow_mesh(*center, *radius, color(*c))));
            }
            DrawCommand::Label {
                anchor,
                text,
                size,
                color: c,
                glow,
            } => {
                let font = FontId::proportional(*size);
                let (halo, galley) = ctx.fonts(|f| {
                    (
                        f.layout_no_wrap(text.clone(), font.clone(), color(*glow)),
                        f.layout_no_wrap(text.clone(), font.clone(), color(*c)),
                    )
                });
                let top_left = Pos2::new(anchor.x - galley.size().x * 0.5, anchor.y - galley.size().y);
                for (dx, dy) in LABEL_GLOW_OFFSETS {
                    push(Shape::galley(
                        top_left + egui::vec2(dx, dy),
                        halo.clone(),
                        color(*glow),
                    ));
                }
                push(Shape::galley(top_left, galley, color(*c)));
            }
        }
    }
    shapes
}

/// Triangle fan from an opaque centre to a transparent rim.
fn glow_mesh(center: Vec2, radius: f32, inner: Color32) -> Mesh {
    let mut mesh = Mesh::default();
    let c = pos(center);
    mesh.colored_vertex(c, inner);
    for i in 0..GLOW_SEGMENTS {
        let a = i as f32 / GLOW_SEGMENTS as f32 * std::f32::consts::TAU;
        mesh.colored_vertex(c + radius * egui::vec2(a.cos(), a.sin()), Color32::TRANSPARENT);
    }
    for i in 0..GLOW_SEGMENTS {
        let next = (i + 1) % GLOW_SEGMENTS;
        mesh.add_triangle(0, 1 + i, 1 + next);
    }
    mesh
}
