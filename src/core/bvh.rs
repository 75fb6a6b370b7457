//! Bounding volume hierarchy over collision primitives.
//!
//! [`TriangleMesh`](crate::geometry::TriangleMesh) builds one of these once at
//! load time so the per-frame body and ground probes only test the handful of
//! triangles whose boxes the ray actually crosses. Splits are chosen with a
//! binned surface-area heuristic; [`BVHNode::raycast`] returns the nearest hit
//! the caller's closure accepts.

use crate::math::{slab_entry, Ray, AABB};
use glam::Vec3;

/// Maximum primitives per leaf node before splitting
const MAX_LEAF_SIZE: usize = 4;

/// Number of SAH buckets for binned building
const SAH_BUCKETS: usize = 12;

/// BVH node using compact representation
#[derive(Clone, Debug)]
pub enum BVHNode {
    Leaf {
        bounds: AABB,
        primitive_indices: Vec<u32>,
    },
    Internal {
        bounds: AABB,
        left: Box<BVHNode>,
        right: Box<BVHNode>,
    },
}

/// Primitive trait for objects that can be inserted into BVH
pub trait BVHPrimitive {
    fn bounds(&self) -> AABB;
    fn centroid(&self) -> Vec3 {
        self.bounds().center()
    }
}

/// BVH build statistics for profiling
#[derive(Debug, Clone, Copy)]
pub struct BVHStats {
    pub num_nodes: usize,
    pub num_leaves: usize,
    pub max_depth: usize,
    pub total_primitives: usize,
    pub avg_leaf_size: f32,
}

impl BVHNode {
    /// Build BVH using SAH (Surface Area Heuristic). None for an empty primitive list.
    pub fn build<P: BVHPrimitive>(primitives: &[P]) -> Option<Self> {
        if primitives.is_empty() {
            return None;
        }
        let indices: Vec<u32> = (0..primitives.len() as u32).collect();
        Some(Self::build_recursive(primitives, indices, 0))
    }

    fn build_recursive<P: BVHPrimitive>(
        primitives: &[P],
        mut indices: Vec<u32>,
        depth: usize,
    ) -> Self {
        let bounds = indices.iter().fold(
            primitives[indices[0] as usize].bounds(),
            |acc, &idx| acc.union(&primitives[idx as usize].bounds()),
        );

        if indices.len() <= MAX_LEAF_SIZE {
            return BVHNode::Leaf {
                bounds,
                primitive_indices: indices,
            };
        }

        let (split_axis, split_pos) = Self::find_best_split(primitives, &indices, &bounds);
        let mid = Self::partition_primitives(primitives, &mut indices, split_axis, split_pos);

        // Degenerate split (all centroids on one side)
        if mid == 0 || mid == indices.len() {
            return BVHNode::Leaf {
                bounds,
                primitive_indices: indices,
            };
        }

        let right_indices = indices.split_off(mid);
        let left = Box::new(Self::build_recursive(primitives, indices, depth + 1));
        let right = Box::new(Self::build_recursive(primitives, right_indices, depth + 1));

        BVHNode::Internal {
            bounds,
            left,
            right,
        }
    }

    /// Find best split using binned SAH
    fn find_best_split<P: BVHPrimitive>(
        primitives: &[P],
        indices: &[u32],
        bounds: &AABB,
    ) -> (usize, f32) {
        let mut best_cost = f32::INFINITY;
        let mut best_axis = 0;
        let mut best_pos = 0.0;

        for axis in 0..3 {
            let (cost, pos) = Self::evaluate_sah_axis(primitives, indices, bounds, axis);
            if cost < best_cost {
                best_cost = cost;
                best_axis = axis;
                best_pos = pos;
            }
        }

        (best_axis, best_pos)
    }

    fn evaluate_sah_axis<P: BVHPrimitive>(
        primitives: &[P],
        indices: &[u32],
        bounds: &AABB,
        axis: usize,
    ) -> (f32, f32) {
        let mut bucket_bounds: Vec<Option<AABB>> = vec![None; SAH_BUCKETS];
        let mut bucket_counts = vec![0; SAH_BUCKETS];

        let axis_extent = (bounds.max - bounds.min)[axis];
        if axis_extent < 1e-6 {
            return (f32::INFINITY, 0.0);
        }

        for &idx in indices {
            let centroid = primitives[idx as usize].centroid();
            let offset = (centroid[axis] - bounds.min[axis]) / axis_extent;
            let bucket_idx = ((offset * SAH_BUCKETS as f32) as usize).min(SAH_BUCKETS - 1);

            bucket_counts[bucket_idx] += 1;
            let prim_bounds = primitives[idx as usize].bounds();
            bucket_bounds[bucket_idx] = Some(match bucket_bounds[bucket_idx] {
                Some(b) => b.union(&prim_bounds),
                None => prim_bounds,
            });
        }

        let mut best_cost = f32::INFINITY;
        let mut best_split = 0;

        for split in 1..SAH_BUCKETS {
            let (left_bounds, left_count) =
                Self::accumulate_buckets(&bucket_bounds, &bucket_counts, 0, split);
            let (right_bounds, right_count) =
                Self::accumulate_buckets(&bucket_bounds, &bucket_counts, split, SAH_BUCKETS);

            if let (Some(lb), Some(rb)) = (left_bounds, right_bounds) {
                let cost = Self::sah_cost(
                    lb.surface_area(),
                    left_count,
                    rb.surface_area(),
                    right_count,
                );

                if cost < best_cost {
                    best_cost = cost;
                    best_split = split;
                }
            }
        }

        let split_pos = bounds.min[axis] + (best_split as f32 / SAH_BUCKETS as f32) * axis_extent;

        (best_cost, split_pos)
    }

    fn accumulate_buckets(
        bucket_bounds: &[Option<AABB>],
        bucket_counts: &[usize],
        start: usize,
        end: usize,
    ) -> (Option<AABB>, usize) {
        let mut combined_bounds: Option<AABB> = None;
        let mut total_count = 0;

        for i in start..end {
            if let Some(bounds) = bucket_bounds[i] {
                combined_bounds = Some(match combined_bounds {
                    Some(b) => b.union(&bounds),
                    None => bounds,
                });
                total_count += bucket_counts[i];
            }
        }

        (combined_bounds, total_count)
    }

    fn sah_cost(left_area: f32, left_count: usize, right_area: f32, right_count: usize) -> f32 {
        const TRAVERSAL_COST: f32 = 0.125;
        const INTERSECTION_COST: f32 = 1.0;

        TRAVERSAL_COST
            + INTERSECTION_COST * (left_area * left_count as f32 + right_area * right_count as f32)
    }

    fn partition_primitives<P: BVHPrimitive>(
        primitives: &[P],
        indices: &mut [u32],
        axis: usize,
        split_pos: f32,
    ) -> usize {
        let mut left = 0;
        let mut right = indices.len();

        while left < right {
            let centroid = primitives[indices[left] as usize].centroid();
            if centroid[axis] < split_pos {
                left += 1;
            } else {
                right -= 1;
                indices.swap(left, right);
            }
        }

        left
    }

    pub fn bounds(&self) -> &AABB {
        match self {
            BVHNode::Leaf { bounds, .. } => bounds,
            BVHNode::Internal { bounds, .. } => bounds,
        }
    }

    /// Nearest-hit traversal. `test` is called with each candidate primitive index and
    /// returns the hit distance plus payload; nodes farther than the best hit are skipped.
    pub fn raycast<H, F>(&self, ray: &Ray, max_distance: f32, mut test: F) -> Option<(f32, H)>
    where
        F: FnMut(u32) -> Option<(f32, H)>,
    {
        let mut best: Option<(f32, H)> = None;
        let mut stack: Vec<&BVHNode> = vec![self];

        while let Some(node) = stack.pop() {
            let limit = best.as_ref().map_or(max_distance, |(t, _)| *t);
            match slab_entry(ray, node.bounds().min, node.bounds().max) {
                Some(entry) if entry <= limit => {}
                _ => continue,
            }

            match node {
                BVHNode::Leaf {
                    primitive_indices, ..
                } => {
                    for &idx in primitive_indices {
                        let limit = best.as_ref().map_or(max_distance, |(t, _)| *t);
                        if let Some((t, payload)) = test(idx) {
                            if t <= limit {
                                best = Some((t, payload));
                            }
                        }
                    }
                }
                BVHNode::Internal { left, right, .. } => {
                    // Push the farther child first so the nearer one is visited first
                    let l = slab_entry(ray, left.bounds().min, left.bounds().max);
                    let r = slab_entry(ray, right.bounds().min, right.bounds().max);
                    match (l, r) {
                        (Some(lt), Some(rt)) if lt <= rt => {
                            stack.push(right);
                            stack.push(left);
                        }
                        (Some(_), Some(_)) => {
                            stack.push(left);
                            stack.push(right);
                        }
                        (Some(_), None) => stack.push(left),
                        (None, Some(_)) => stack.push(right),
                        (None, None) => {}
                    }
                }
            }
        }

        best
    }

    /// Gather statistics about the BVH
    pub fn stats(&self) -> BVHStats {
        let mut stats = BVHStats {
            num_nodes: 0,
            num_leaves: 0,
            max_depth: 0,
            total_primitives: 0,
            avg_leaf_size: 0.0,
        };

        self.gather_stats(&mut stats, 0);

        if stats.num_leaves > 0 {
            stats.avg_leaf_size = stats.total_primitives as f32 / stats.num_leaves as f32;
        }

        stats
    }

    fn gather_stats(&self, stats: &mut BVHStats, depth: usize) {
        stats.num_nodes += 1;
        stats.max_depth = stats.max_depth.max(depth);

        match self {
            BVHNode::Leaf {
                primitive_indices, ..
            } => {
                stats.num_leaves += 1;
                stats.total_primitives += primitive_indices.len();
            }
            BVHNode::Internal { left, right, .. } => {
                left.gather_stats(stats, depth + 1);
                right.gather_stats(stats, depth + 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::intersect_aabb;

    #[derive(Clone)]
    struct TestPrimitive {
        bounds: AABB,
    }

    impl BVHPrimitive for TestPrimitive {
        fn bounds(&self) -> AABB {
            self.bounds
        }
    }

    fn row_of_boxes(count: usize) -> Vec<TestPrimitive> {
        (0..count)
            .map(|i| TestPrimitive {
                bounds: AABB::new(
                    Vec3::new(i as f32 * 10.0, 0.0, 0.0),
                    Vec3::new(i as f32 * 10.0 + 1.0, 1.0, 1.0),
                ),
            })
            .collect()
    }

    fn hit_box(prims: &[TestPrimitive], ray: &Ray, idx: u32) -> Option<(f32, u32)> {
        let b = prims[idx as usize].bounds;
        let t = intersect_aabb(ray.origin, ray.direction, b.min, b.max);
        (t >= 0.0).then_some((t, idx))
    }

    #[test]
    fn test_bvh_empty() {
        let prims: Vec<TestPrimitive> = Vec::new();
        assert!(BVHNode::build(&prims).is_none());
    }

    #[test]
    fn test_bvh_single_primitive() {
        let prims = row_of_boxes(1);
        match BVHNode::build(&prims).unwrap() {
            BVHNode::Leaf {
                primitive_indices, ..
            } => assert_eq!(primitive_indices, vec![0]),
            _ => panic!("Expected leaf node"),
        }
    }

    #[test]
    fn test_bvh_split() {
        let bvh = BVHNode::build(&row_of_boxes(5)).unwrap();
        assert!(
            matches!(bvh, BVHNode::Internal { .. }),
            "Expected internal node for 5 primitives"
        );
    }

    #[test]
    fn test_bvh_stats() {
        let stats = BVHNode::build(&row_of_boxes(10)).unwrap().stats();
        assert_eq!(stats.total_primitives, 10);
        assert!(stats.num_leaves > 1);
        assert!(stats.max_depth > 0);
        assert!(stats.avg_leaf_size > 0.0);
    }

    #[test]
    fn test_sah_cost_calculation() {
        let cost = BVHNode::sah_cost(100.0, 5, 200.0, 10);
        let smaller_cost = BVHNode::sah_cost(50.0, 2, 50.0, 2);
        assert!(smaller_cost < cost);
    }

    #[test]
    fn test_raycast_returns_nearest() {
        let prims = row_of_boxes(20);
        let bvh = BVHNode::build(&prims).unwrap();
        let ray = Ray::new(Vec3::new(-5.0, 0.5, 0.5), Vec3::X);

        let (t, idx) = bvh
            .raycast(&ray, f32::INFINITY, |i| hit_box(&prims, &ray, i))
            .expect("ray along the row should hit");
        assert_eq!(idx, 0);
        assert!((t - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_raycast_respects_max_distance() {
        let prims = row_of_boxes(20);
        let bvh = BVHNode::build(&prims).unwrap();
        let ray = Ray::new(Vec3::new(-5.0, 0.5, 0.5), Vec3::X);

        assert!(bvh.raycast(&ray, 4.0, |i| hit_box(&prims, &ray, i)).is_none());
    }

    #[test]
    fn test_raycast_matches_brute_force() {
        let prims = row_of_boxes(32);
        let bvh = BVHNode::build(&prims).unwrap();
        let ray = Ray::new(Vec3::new(155.5, 0.5, 0.5), Vec3::NEG_X);

        let brute = (0..prims.len() as u32)
            .filter_map(|i| hit_box(&prims, &ray, i))
            .min_by(|a, b| a.0.total_cmp(&b.0));
        let fast = bvh.raycast(&ray, f32::INFINITY, |i| hit_box(&prims, &ray, i));

        assert_eq!(fast.map(|h| h.1), brute.map(|h| h.1));
    }
}
