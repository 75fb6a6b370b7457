//! Collidable scene geometry.
//!
//! The navigation core never walks a render graph. Each frame it asks a
//! [`GeometryProvider`] for a snapshot of visible [`CollidableSurface`]s and
//! only ever issues ray queries against them.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::bvh::{BVHNode, BVHStats};
use crate::core::triangle_intersection::Triangle;
use crate::math::{intersect_aabb, Ray, AABB};

/// A single ray/surface intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub distance: f32,
    pub normal: Vec3,
}

/// Static, read-only geometry that answers ray queries
pub trait CollidableSurface {
    /// Nearest hit along `ray` no farther than `max_distance`
    fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit>;

    /// Nearest hit that `accept` agrees to. Surfaces made of many faces should
    /// override this so a rejected face does not hide an accepted one behind it.
    fn raycast_where(
        &self,
        ray: &Ray,
        max_distance: f32,
        accept: &dyn Fn(&RayHit) -> bool,
    ) -> Option<RayHit> {
        self.raycast(ray, max_distance).filter(|hit| accept(hit))
    }

    /// Hidden surfaces never participate in collision
    fn is_visible(&self) -> bool {
        true
    }
}

/// Supplies the surfaces that can currently be collided with.
/// Implementations must filter out invisible geometry.
pub trait GeometryProvider {
    fn collidables(&self) -> Vec<&dyn CollidableSurface>;
}

/// Provider with nothing loaded yet
impl GeometryProvider for () {
    fn collidables(&self) -> Vec<&dyn CollidableSurface> {
        Vec::new()
    }
}

/// Nearest hit across a frame's surface snapshot
pub fn nearest_hit(surfaces: &[&dyn CollidableSurface], ray: &Ray, max_distance: f32) -> Option<RayHit> {
    nearest_hit_where(surfaces, ray, max_distance, &|_| true)
}

pub fn nearest_hit_where(
    surfaces: &[&dyn CollidableSurface],
    ray: &Ray,
    max_distance: f32,
    accept: &dyn Fn(&RayHit) -> bool,
) -> Option<RayHit> {
    let mut best: Option<RayHit> = None;
    for surface in surfaces {
        let limit = best.map_or(max_distance, |b| b.distance);
        if let Some(hit) = surface.raycast_where(ray, limit, accept) {
            if hit.distance <= limit {
                best = Some(hit);
            }
        }
    }
    best
}

/// Solid axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxSurface {
    pub bounds: AABB,
}

impl BoxSurface {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            bounds: AABB::new(min, max),
        }
    }

    /// Outward face normal at a point on the box surface
    fn face_normal(&self, point: Vec3) -> Vec3 {
        let b = &self.bounds;
        let distances = [
            ((point.x - b.min.x).abs(), Vec3::NEG_X),
            ((point.x - b.max.x).abs(), Vec3::X),
            ((point.y - b.min.y).abs(), Vec3::NEG_Y),
            ((point.y - b.max.y).abs(), Vec3::Y),
            ((point.z - b.min.z).abs(), Vec3::NEG_Z),
            ((point.z - b.max.z).abs(), Vec3::Z),
        ];
        distances
            .iter()
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map_or(Vec3::Y, |(_, n)| *n)
    }
}

impl CollidableSurface for BoxSurface {
    /// A ray starting strictly inside the solid reports an immediate hit
    fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        const INSIDE_EPSILON: f32 = 1e-3;

        let inner = self.bounds.expand(-INSIDE_EPSILON);
        if inner.min.cmplt(inner.max).all() && inner.contains(ray.origin) {
            return Some(RayHit {
                point: ray.origin,
                distance: 0.0,
                normal: -ray.direction,
            });
        }

        // On the surface shell: only rays heading into the solid hit
        if self.bounds.contains(ray.origin) {
            let normal = self.face_normal(ray.origin);
            return (ray.direction.dot(normal) < -INSIDE_EPSILON && max_distance >= 0.0).then_some(RayHit {
                point: ray.origin,
                distance: 0.0,
                normal,
            });
        }

        let t = intersect_aabb(ray.origin, ray.direction, self.bounds.min, self.bounds.max);
        if t < 0.0 || t > max_distance {
            return None;
        }
        let point = ray.at(t);
        Some(RayHit {
            point,
            distance: t,
            normal: self.face_normal(point),
        })
    }
}

/// Triangle soup accelerated by a BVH
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    triangles: Vec<Triangle>,
    bvh: Option<BVHNode>,
}

impl TriangleMesh {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        let triangles: Vec<Triangle> = triangles.into_iter().filter(|t| !t.is_degenerate()).collect();
        let bvh = BVHNode::build(&triangles);
        Self { triangles, bvh }
    }

    /// Two triangles spanning a horizontal rectangle at height `y`
    pub fn quad_xz(min: Vec3, max: Vec3, y: f32) -> Self {
        let a = Vec3::new(min.x, y, min.z);
        let b = Vec3::new(max.x, y, min.z);
        let c = Vec3::new(max.x, y, max.z);
        let d = Vec3::new(min.x, y, max.z);
        Self::new(vec![Triangle::new(a, b, c), Triangle::new(a, c, d)])
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn bounds(&self) -> Option<AABB> {
        self.bvh.as_ref().map(|b| *b.bounds())
    }

    pub fn stats(&self) -> Option<BVHStats> {
        self.bvh.as_ref().map(|b| b.stats())
    }

    /// Linear scan, kept for benchmarking against the BVH
    pub fn raycast_brute_force(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        self.triangles
            .iter()
            .filter_map(|tri| tri.intersect(ray))
            .filter(|hit| hit.t <= max_distance)
            .min_by(|a, b| a.t.total_cmp(&b.t))
            .map(|hit| RayHit {
                point: ray.at(hit.t),
                distance: hit.t,
                normal: hit.normal,
            })
    }
}

impl CollidableSurface for TriangleMesh {
    fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        self.raycast_where(ray, max_distance, &|_| true)
    }

    fn raycast_where(
        &self,
        ray: &Ray,
        max_distance: f32,
        accept: &dyn Fn(&RayHit) -> bool,
    ) -> Option<RayHit> {
        let bvh = self.bvh.as_ref()?;
        let (_, hit) = bvh.raycast(ray, max_distance, |idx| {
            let tri_hit = self.triangles[idx as usize].intersect(ray)?;
            let hit = RayHit {
                point: ray.at(tri_hit.t),
                distance: tri_hit.t,
                normal: tri_hit.normal,
            };
            accept(&hit).then_some((hit.distance, hit))
        })?;
        Some(hit)
    }
}

struct SceneSurface {
    name: String,
    visible: bool,
    surface: Box<dyn CollidableSurface>,
}

/// Owning set of named surfaces with per-surface visibility
#[derive(Default)]
pub struct SceneGeometry {
    surfaces: Vec<SceneSurface>,
}

impl std::fmt::Debug for SceneGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.surfaces.iter().map(|s| (&s.name, s.visible)))
            .finish()
    }
}

impl SceneGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, surface: impl CollidableSurface + 'static) {
        self.surfaces.push(SceneSurface {
            name: name.into(),
            visible: true,
            surface: Box::new(surface),
        });
    }

    pub fn with(mut self, name: impl Into<String>, surface: impl CollidableSurface + 'static) -> Self {
        self.add(name, surface);
        self
    }

    /// Show or hide every surface with this name. Returns how many matched.
    pub fn set_visible(&mut self, name: &str, visible: bool) -> usize {
        let mut count = 0;
        for entry in self.surfaces.iter_mut().filter(|s| s.name == name) {
            entry.visible = visible;
            count += 1;
        }
        count
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.surfaces.iter().map(|s| s.name.as_str())
    }
}

impl GeometryProvider for SceneGeometry {
    fn collidables(&self) -> Vec<&dyn CollidableSurface> {
        self.surfaces
            .iter()
            .filter(|s| s.visible && s.surface.is_visible())
            .map(|s| s.surface.as_ref())
            .collect()
    }
}
