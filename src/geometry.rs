//! Coloured vertex type and the flat primitives the scene is built from.
//!
//! Everything is in window pixels with the origin at the top-left and y
//! pointing down, matching the orthographic projection in `rendering`.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Vertex data for scene meshes (position + RGB colour)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, color: [f32; 3]) -> Self {
        Self {
            position: position.to_array(),
            color,
        }
    }
}

/// Append a quad (corners in winding order) as two triangles
pub fn push_quad(out: &mut Vec<Vertex>, corners: [Vec3; 4], color: [f32; 3]) {
    let [a, b, c, d] = corners;
    for p in [a, b, c, a, c, d] {
        out.push(Vertex::new(p, color));
    }
}

/// Append a filled disc as a fan of triangles around `center`
pub fn push_disc(out: &mut Vec<Vertex>, center: Vec2, radius: f32, segments: u32, color: [f32; 3]) {
    let center3 = center.extend(0.0);
    for i in 0..segments {
        let a0 = TAU * i as f32 / segments as f32;
        let a1 = TAU * (i + 1) as f32 / segments as f32;
        let p0 = center + Vec2::new(a0.cos(), a0.sin()) * radius;
        let p1 = center + Vec2::new(a1.cos(), a1.sin()) * radius;

        out.push(Vertex::new(center3, color));
        out.push(Vertex::new(p0.extend(0.0), color));
        out.push(Vertex::new(p1.extend(0.0), color));
    }
}

/// Append a polyline as a line list (one segment per consecutive pair)
pub fn push_polyline(out: &mut Vec<Vertex>, points: &[Vec3], color: [f32; 3]) {
    for pair in points.windows(2) {
        out.push(Vertex::new(pair[0], color));
        out.push(Vertex::new(pair[1], color));
    }
}

/// Torus centred on the origin in the XY plane, as a triangle list of
/// positions.
///
/// `inner_radius` is the tube radius, `outer_radius` the distance from the
/// centre to the middle of the tube; `segments` subdivides both the tube and
/// the ring.
pub fn torus_triangles(inner_radius: f32, outer_radius: f32, segments: u32) -> Vec<Vec3> {
    let point = |ring: u32, side: u32| {
        let theta = TAU * ring as f32 / segments as f32;
        let phi = TAU * side as f32 / segments as f32;
        let r = outer_radius + inner_radius * phi.cos();
        Vec3::new(r * theta.cos(), r * theta.sin(), inner_radius * phi.sin())
    };

    let mut triangles = Vec::with_capacity((segments * segments * 6) as usize);
    for ring in 0..segments {
        for side in 0..segments {
            let a = point(ring, side);
            let b = point(ring + 1, side);
            let c = point(ring + 1, side + 1);
            let d = point(ring, side + 1);
            triangles.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_is_two_triangles() {
        let mut out = Vec::new();
        push_quad(
            &mut out,
            [Vec3::ZERO, Vec3::X, Vec3::ONE, Vec3::Y],
            [1.0, 0.0, 0.0],
        );
        assert_eq!(out.len(), 6);
    }

    #[test]
    fn test_disc_stays_within_radius() {
        let mut out = Vec::new();
        let center = Vec2::new(100.0, 50.0);
        push_disc(&mut out, center, 20.0, 30, [0.0; 3]);

        assert_eq!(out.len(), 30 * 3);
        for v in &out {
            let p = Vec2::new(v.position[0], v.position[1]);
            assert!(p.distance(center) <= 20.0 + 1e-3);
        }
    }

    #[test]
    fn test_polyline_segment_count() {
        let mut out = Vec::new();
        push_polyline(&mut out, &[Vec3::ZERO, Vec3::X, Vec3::Y], [1.0; 3]);
        assert_eq!(out.len(), 4);

        out.clear();
        push_polyline(&mut out, &[Vec3::ZERO], [1.0; 3]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_torus_extent() {
        let triangles = torus_triangles(2.0, 4.0, 16);

        assert_eq!(triangles.len(), 16 * 16 * 6);
        for p in &triangles {
            let radial = p.truncate().length();
            assert!(radial >= 2.0 - 1e-3 && radial <= 6.0 + 1e-3);
            assert!(p.z.abs() <= 2.0 + 1e-3);
        }
    }
}
