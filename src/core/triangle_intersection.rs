use glam::Vec3;

use crate::core::bvh::BVHPrimitive;
use crate::math::{Ray, AABB};

/// Result of triangle intersection test
#[derive(Debug, Clone, Copy)]
pub struct TriangleIntersection {
    pub t: f32,       // Distance along ray
    pub u: f32,       // Barycentric coordinate u
    pub v: f32,       // Barycentric coordinate v
    pub normal: Vec3, // Geometric normal (counter-clockwise winding)
}

impl TriangleIntersection {
    /// Barycentric coordinates (u, v, w) where w = 1 - u - v
    pub fn barycentric(&self) -> (f32, f32, f32) {
        (self.u, self.v, 1.0 - self.u - self.v)
    }
}

/// World-space triangle, the primitive of every imported mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    pub fn intersect(&self, ray: &Ray) -> Option<TriangleIntersection> {
        moller_trumbore_intersect(ray.origin, ray.direction, self.v0, self.v1, self.v2)
    }

    /// Zero-area triangles never produce hits; loaders drop them
    pub fn is_degenerate(&self) -> bool {
        (self.v1 - self.v0).cross(self.v2 - self.v0).length_squared() < 1e-12
    }
}

impl BVHPrimitive for Triangle {
    fn bounds(&self) -> AABB {
        AABB {
            min: self.v0.min(self.v1).min(self.v2),
            max: self.v0.max(self.v1).max(self.v2),
        }
    }

    fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }
}

/// Möller-Trumbore ray-triangle intersection algorithm.
/// Two-sided: walls are solid whichever way their faces were authored.
pub fn moller_trumbore_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<TriangleIntersection> {
    const EPSILON: f32 = 1e-6;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray_dir.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray_origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray_dir.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    // Intersection behind origin
    if t < EPSILON {
        return None;
    }

    let normal = edge1.cross(edge2).normalize();

    Some(TriangleIntersection { t, u, v, normal })
}
