//! Drawing seam
//!
//! The simulation never draws. Each frame the caller hands a `DrawSink` to
//! `draw_world`, which issues one circle per ball in collection order.

pub mod shapes;
pub mod vertex;

pub use vertex::{Vertex, colors};

use glam::Vec2;

use crate::sim::World;

/// Anything that can put a filled circle on screen
pub trait DrawSink {
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]);
}

/// A single circle draw request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleDraw {
    pub center: Vec2,
    pub radius: f32,
    pub color: [f32; 4],
}

/// Issue one draw request per ball, in collection order
pub fn draw_world<S: DrawSink + ?Sized>(world: &World, sink: &mut S) {
    for ball in &world.balls {
        sink.draw_circle(ball.pos, ball.radius, ball.color);
    }
}

/// Collects draw requests for a frame
#[derive(Debug, Clone, Default)]
pub struct CircleList {
    pub circles: Vec<CircleDraw>,
}

impl CircleList {
    pub fn clear(&mut self) {
        self.circles.clear();
    }
}

impl DrawSink for CircleList {
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        self.circles.push(CircleDraw {
            center,
            radius,
            color,
        });
    }
}

/// Tessellates circles into a triangle list ready for a vertex buffer
#[derive(Debug, Clone, Default)]
pub struct MeshSink {
    pub vertices: Vec<Vertex>,
}

impl MeshSink {
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Raw bytes for GPU upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

impl DrawSink for MeshSink {
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        let segments = shapes::segments_for_radius(radius);
        self.vertices.extend(shapes::circle(center, radius, color, segments));
    }
}
