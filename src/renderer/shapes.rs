//! Shape generation for 2D primitives
//!
//! All shapes are emitted in canvas pixels; the pipeline maps them to NDC.

use glam::Vec2;
use std::f32::consts::FRAC_PI_2;

use super::vertex::Vertex;

/// Arc segments per rounded corner
pub const CORNER_SEGMENTS: u32 = 6;

/// Textured quad covering `size` around `center` (full texture)
pub fn sprite_quad(center: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let half = size / 2.0;
    let (l, r) = (center.x - half.x, center.x + half.x);
    let (t, b) = (center.y - half.y, center.y + half.y);

    vec![
        Vertex::new(l, t, 0.0, 0.0, color),
        Vertex::new(r, t, 1.0, 0.0, color),
        Vertex::new(l, b, 0.0, 1.0, color),
        Vertex::new(l, b, 0.0, 1.0, color),
        Vertex::new(r, t, 1.0, 0.0, color),
        Vertex::new(r, b, 1.0, 1.0, color),
    ]
}

/// Thick line segment as a quad
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a1 = from + perp;
    let a2 = from - perp;
    let b1 = to + perp;
    let b2 = to - perp;

    vec![
        Vertex::solid(a1.x, a1.y, color),
        Vertex::solid(a2.x, a2.y, color),
        Vertex::solid(b1.x, b1.y, color),
        Vertex::solid(b1.x, b1.y, color),
        Vertex::solid(a2.x, a2.y, color),
        Vertex::solid(b2.x, b2.y, color),
    ]
}

/// Perimeter of a rounded rectangle, clockwise on screen starting at the
/// top edge of the top-right corner
pub fn rounded_rect_points(center: Vec2, half: Vec2, radius: f32, segments: u32) -> Vec<Vec2> {
    let radius = radius.clamp(0.0, half.x.min(half.y).max(0.0));
    let corners = [
        (Vec2::new(half.x - radius, -half.y + radius), -FRAC_PI_2),
        (Vec2::new(half.x - radius, half.y - radius), 0.0),
        (Vec2::new(-half.x + radius, half.y - radius), FRAC_PI_2),
        (Vec2::new(-half.x + radius, -half.y + radius), 2.0 * FRAC_PI_2),
    ];

    let mut points = Vec::with_capacity(((segments + 1) * 4) as usize);
    for (offset, start) in corners {
        for i in 0..=segments {
            let theta = start + FRAC_PI_2 * (i as f32 / segments as f32);
            points.push(center + offset + Vec2::new(theta.cos(), theta.sin()) * radius);
        }
    }
    points
}

/// Filled rounded rectangle (triangle fan from the center)
pub fn rounded_rect(center: Vec2, size: Vec2, radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    let points = rounded_rect_points(center, size / 2.0, radius, CORNER_SEGMENTS);
    let mut vertices = Vec::with_capacity(points.len() * 3);

    for i in 0..points.len() {
        let p1 = points[i];
        let p2 = points[(i + 1) % points.len()];
        vertices.push(Vertex::solid(center.x, center.y, color));
        vertices.push(Vertex::solid(p1.x, p1.y, color));
        vertices.push(Vertex::solid(p2.x, p2.y, color));
    }

    vertices
}

/// Rounded rectangle outline centered on the rectangle edge
pub fn rounded_rect_outline(
    center: Vec2,
    size: Vec2,
    radius: f32,
    width: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let half = size / 2.0;
    let w = width / 2.0;
    let outer = rounded_rect_points(center, half + Vec2::splat(w), radius + w, CORNER_SEGMENTS);
    let inner = rounded_rect_points(
        center,
        (half - Vec2::splat(w)).max(Vec2::ZERO),
        (radius - w).max(0.0),
        CORNER_SEGMENTS,
    );

    let mut vertices = Vec::with_capacity(outer.len() * 6);
    for i in 0..outer.len() {
        let j = (i + 1) % outer.len();
        let (inner1, outer1) = (inner[i], outer[i]);
        let (inner2, outer2) = (inner[j], outer[j]);

        // Two triangles per segment
        vertices.push(Vertex::solid(inner1.x, inner1.y, color));
        vertices.push(Vertex::solid(outer1.x, outer1.y, color));
        vertices.push(Vertex::solid(inner2.x, inner2.y, color));

        vertices.push(Vertex::solid(inner2.x, inner2.y, color));
        vertices.push(Vertex::solid(outer1.x, outer1.y, color));
        vertices.push(Vertex::solid(outer2.x, outer2.y, color));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_sprite_quad_corners() {
        let quad = sprite_quad(Vec2::new(100.0, 50.0), Vec2::new(40.0, 20.0), BLACK);
        assert_eq!(quad.len(), 6);
        assert_eq!(quad[0].position, [80.0, 40.0]);
        assert_eq!(quad[5].position, [120.0, 60.0]);
        assert_eq!(quad[5].uv, [1.0, 1.0]);
    }

    #[test]
    fn test_line_width() {
        let verts = line(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0, BLACK);
        assert_eq!(verts.len(), 6);
        assert_eq!(verts[0].position, [0.0, 1.0]);
        assert_eq!(verts[1].position, [0.0, -1.0]);
    }

    #[test]
    fn test_degenerate_line_is_empty() {
        assert!(line(Vec2::ONE, Vec2::ONE, 2.0, BLACK).is_empty());
    }

    #[test]
    fn test_rounded_rect_stays_in_bounds() {
        let center = Vec2::new(50.0, 50.0);
        let points = rounded_rect_points(center, Vec2::new(30.0, 10.0), 6.0, 4);
        assert_eq!(points.len(), 20);
        for p in points {
            assert!((p.x - center.x).abs() <= 30.0 + 1e-4);
            assert!((p.y - center.y).abs() <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn test_radius_clamped_to_half_extent() {
        let points = rounded_rect_points(Vec2::ZERO, Vec2::new(20.0, 4.0), 50.0, 2);
        for p in points {
            assert!(p.y.abs() <= 4.0 + 1e-4);
        }
    }

    #[test]
    fn test_outline_vertex_count() {
        let verts =
            rounded_rect_outline(Vec2::ZERO, Vec2::new(100.0, 36.0), 6.0, 2.0, BLACK);
        assert_eq!(verts.len(), ((CORNER_SEGMENTS + 1) * 4 * 6) as usize);
    }
}
