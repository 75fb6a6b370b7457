use glam::Vec3;

/// Half-line used for every collision and ground query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Always unit length (or zero if built from a zero vector)
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Ray pointing straight down (-Y)
    pub fn down(origin: Vec3) -> Self {
        Self {
            origin,
            direction: Vec3::NEG_Y,
        }
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Slab test. Returns entry distance, exit distance when the origin is inside,
/// or -1.0 on miss.
pub fn intersect_aabb(ray_origin: Vec3, ray_dir: Vec3, box_min: Vec3, box_max: Vec3) -> f32 {
    const EPSILON: f32 = 1e-8;

    // Near-zero components are clamped so the division yields a huge value instead of inf/NaN
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.x) } else { 1.0 / ray_dir.x },
        if ray_dir.y.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.y) } else { 1.0 / ray_dir.y },
        if ray_dir.z.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.z) } else { 1.0 / ray_dir.z },
    );

    let t_min = (box_min - ray_origin) * inv_dir;
    let t_max = (box_max - ray_origin) * inv_dir;

    let t1 = t_min.min(t_max);
    let t2 = t_min.max(t_max);

    let t_near = t1.x.max(t1.y).max(t1.z);
    let t_far = t2.x.min(t2.y).min(t2.z);

    if t_near > t_far || t_far < 0.0 {
        return -1.0;
    }

    if t_near < 0.0 {
        if t_far > 0.001 {
            t_far
        } else {
            -1.0
        }
    } else {
        t_near
    }
}

/// Entry distance of the ray into the box, 0.0 when the origin is inside.
/// Used for pruning, where "already inside" must count as the nearest possible hit.
pub fn slab_entry(ray: &Ray, box_min: Vec3, box_max: Vec3) -> Option<f32> {
    if ray.origin.cmpge(box_min).all() && ray.origin.cmple(box_max).all() {
        return Some(0.0);
    }
    let t = intersect_aabb(ray.origin, ray.direction, box_min, box_max);
    (t >= 0.0).then_some(t)
}
