mod aabb;
mod ray;

pub use aabb::AABB;
pub use ray::{intersect_aabb, slab_entry, Ray};
