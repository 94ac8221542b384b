use std::f32::consts::TAU;

use super::{MeshData, VertexAttribute};

const SEGMENTS: u32 = 16;
const SHAFT_RADIUS: f32 = 0.35;
const SHAFT_LENGTH: f32 = 7.0;
const HEAD_RADIUS: f32 = 1.0;
pub const ARROW_LENGTH: f32 = 10.0;

/// Color intensity for faces pointing straight down -Y (the underside of the tip).
pub const SHADED: f32 = 0.8;
pub const LIT: f32 = 1.0;

#[derive(Default)]
struct ArrowBuilder {
    vertices: Vec<f32>,
    indices: Vec<u32>,
    count: u32,
}

impl ArrowBuilder {
    fn vertex(&mut self, position: [f32; 3], intensity: f32) -> u32 {
        self.vertices.extend_from_slice(&position);
        self.vertices.push(intensity);
        self.count += 1;
        self.count - 1
    }

    /// Returns the index of the first of `SEGMENTS` vertices around the Y axis.
    fn ring(&mut self, y: f32, radius: f32, intensity: f32) -> u32 {
        let first = self.count;
        for i in 0..SEGMENTS {
            let angle = i as f32 * TAU / SEGMENTS as f32;
            self.vertex([radius * angle.cos(), y, radius * angle.sin()], intensity);
        }
        first
    }

    fn band(&mut self, lower: u32, upper: u32) {
        for i in 0..SEGMENTS {
            let next = (i + 1) % SEGMENTS;
            self.indices
                .extend_from_slice(&[lower + i, upper + i, upper + next]);
            self.indices
                .extend_from_slice(&[lower + i, upper + next, lower + next]);
        }
    }

    fn fan(&mut self, center: u32, ring: u32, facing_down: bool) {
        for i in 0..SEGMENTS {
            let next = (i + 1) % SEGMENTS;
            if facing_down {
                self.indices.extend_from_slice(&[center, ring + i, ring + next]);
            } else {
                self.indices.extend_from_slice(&[center, ring + next, ring + i]);
            }
        }
    }
}

/// Arrow pointing along +Y from the origin, laid out as position + color intensity.
pub fn hud_arrow() -> MeshData {
    let mut b = ArrowBuilder::default();

    let shaft_bottom = b.ring(0.0, SHAFT_RADIUS, LIT);
    let shaft_top = b.ring(SHAFT_LENGTH, SHAFT_RADIUS, LIT);
    b.band(shaft_bottom, shaft_top);

    let cap_center = b.vertex([0.0, 0.0, 0.0], SHADED);
    let cap_ring = b.ring(0.0, SHAFT_RADIUS, SHADED);
    b.fan(cap_center, cap_ring, true);

    let under_center = b.vertex([0.0, SHAFT_LENGTH, 0.0], SHADED);
    let under_ring = b.ring(SHAFT_LENGTH, HEAD_RADIUS, SHADED);
    b.fan(under_center, under_ring, true);

    let apex = b.vertex([0.0, ARROW_LENGTH, 0.0], LIT);
    let head_ring = b.ring(SHAFT_LENGTH, HEAD_RADIUS, LIT);
    b.fan(apex, head_ring, false);

    MeshData {
        vertices: b.vertices,
        indices: Some(b.indices),
        attributes: vec![VertexAttribute::new(0, 3), VertexAttribute::new(1, 1)],
    }
}
