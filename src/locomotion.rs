//! Collision-aware first-person locomotion.
//!
//! One call to [`step`] per frame turns a [`MoveIntent`] into a new pose:
//! horizontal motion is all-or-nothing (three body probes cast from the
//! current position along the travel direction, no sliding), then the eye is
//! snapped or eased onto the floor found by a downward probe. Nothing here can fail; a frame that cannot be
//! resolved simply leaves the pose where it was.

use glam::Vec3;

use crate::camera::Pose;
use crate::config::NavigationConfig;
use crate::core::input_sampler::MoveIntent;
use crate::geometry::{nearest_hit, nearest_hit_where, CollidableSurface, RayHit};
use crate::math::Ray;

/// Which body probe reported a blocking hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyProbe {
    Feet,
    Waist,
    Head,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HorizontalOutcome {
    /// No net movement requested
    Idle,
    Moved { displacement: Vec3 },
    /// Whole displacement rejected for this frame
    Blocked { probe: BodyProbe, distance: f32 },
    /// No geometry loaded, moved without collision tests
    Unconstrained { displacement: Vec3 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundOutcome {
    /// Eye placed instantly above the floor
    Snapped { ground_y: f32, fallback: bool },
    /// Idle frame, eye moved part of the way toward its resting height
    Eased { ground_y: f32, fallback: bool },
    /// Both probes missed; height left unchanged
    Miss,
    /// Scene not loaded yet; height left unchanged
    GeometryUnavailable,
}

/// Per-frame diagnostics, the only place failures surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub horizontal: HorizontalOutcome,
    pub ground: GroundOutcome,
}

const fn axis(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

/// Camera-space movement direction: forward is -Z, strafe is ±X.
/// Unit length whenever the held keys do not cancel out, zero otherwise.
pub fn local_direction(intent: &MoveIntent) -> Vec3 {
    Vec3::new(
        axis(intent.right, intent.left),
        0.0,
        axis(intent.backward, intent.forward),
    )
    .normalize_or_zero()
}

/// Frame delta the solver actually integrates
pub fn effective_delta(dt: f32, config: &NavigationConfig) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, config.max_frame_delta)
    } else {
        0.0
    }
}

/// Advance `pose` by one frame. Orientation must already be integrated for this frame.
pub fn step(
    pose: &mut Pose,
    intent: &MoveIntent,
    config: &NavigationConfig,
    dt: f32,
    surfaces: &[&dyn CollidableSurface],
) -> StepReport {
    let local = local_direction(intent);

    if local == Vec3::ZERO {
        return StepReport {
            horizontal: HorizontalOutcome::Idle,
            ground: idle_adherence(pose, config, surfaces),
        };
    }

    let direction = pose.heading() * local;
    let displacement = direction * config.move_speed * effective_delta(dt, config);

    let horizontal = if surfaces.is_empty() {
        pose.position += displacement;
        HorizontalOutcome::Unconstrained { displacement }
    } else {
        match probe_body(pose.position, displacement, config, surfaces) {
            Some((probe, distance)) => {
                log::trace!("move blocked by {:?} probe at {:.3}", probe, distance);
                HorizontalOutcome::Blocked { probe, distance }
            }
            None => {
                pose.position += displacement;
                HorizontalOutcome::Moved { displacement }
            }
        }
    };

    let ground = match probe_ground(pose.position, config, surfaces) {
        GroundProbe::Hit { ground_y, fallback } => {
            pose.position.y = ground_y + config.player_height;
            GroundOutcome::Snapped { ground_y, fallback }
        }
        GroundProbe::Miss => GroundOutcome::Miss,
        GroundProbe::NoGeometry => GroundOutcome::GeometryUnavailable,
    };

    StepReport { horizontal, ground }
}

/// Cast along `displacement` from feet, waist and head height above `eye`'s floor.
/// Returns the first probe whose hit lies within the wall reach of the
/// destination, so nothing between here and there can be skipped over.
pub fn probe_body(
    eye: Vec3,
    displacement: Vec3,
    config: &NavigationConfig,
    surfaces: &[&dyn CollidableSurface],
) -> Option<(BodyProbe, f32)> {
    let direction = displacement.normalize_or_zero();
    if direction == Vec3::ZERO {
        return None;
    }
    let floor_y = eye.y - config.player_height;
    let samples = [
        (BodyProbe::Feet, floor_y + config.step_height),
        (BodyProbe::Waist, floor_y + config.player_height * 0.5),
        (BodyProbe::Head, floor_y + config.player_height),
    ];
    let reach = config.wall_reach() + displacement.length();

    samples.into_iter().find_map(|(probe, y)| {
        let ray = Ray::new(Vec3::new(eye.x, y, eye.z), direction);
        nearest_hit(surfaces, &ray, reach)
            .filter(|hit| hit.distance < reach)
            .map(|hit| (probe, hit.distance))
    })
}

/// Result of looking for the floor under the viewer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundProbe {
    Hit { ground_y: f32, fallback: bool },
    Miss,
    NoGeometry,
}

/// Downward probe from above the eye, retried from a lower origin on a miss.
/// Hits above eye level are overhead structure (ceilings, roofs) unless nothing
/// lies below the eye at all; then the viewer has sunk under the floor and the
/// lowest hit is taken as ground.
/// A probe whose origin is embedded in a solid counts as a miss.
pub fn probe_ground(
    eye: Vec3,
    config: &NavigationConfig,
    surfaces: &[&dyn CollidableSurface],
) -> GroundProbe {
    if surfaces.is_empty() {
        return GroundProbe::NoGeometry;
    }

    let below_eye = |hit: &RayHit| hit.point.y <= eye.y;
    let heights = [
        (config.ground_probe_height, false),
        (config.fallback_probe_height, true),
    ];

    for (height, fallback) in heights {
        let ray = Ray::down(eye + Vec3::Y * height);
        if surfaces.iter().any(|s| s.raycast(&ray, 0.0).is_some()) {
            log::trace!("ground probe origin {:?} is inside geometry", ray.origin);
            continue;
        }
        let hit = nearest_hit_where(surfaces, &ray, f32::INFINITY, &below_eye)
            .or_else(|| lowest_hit(surfaces, &ray));
        if let Some(hit) = hit {
            return GroundProbe::Hit {
                ground_y: hit.point.y,
                fallback,
            };
        }
    }

    GroundProbe::Miss
}

/// Farthest hit along a downward ray
fn lowest_hit(surfaces: &[&dyn CollidableSurface], ray: &Ray) -> Option<RayHit> {
    const MAX_LAYERS: usize = 64;
    let mut lowest: Option<RayHit> = None;
    for _ in 0..MAX_LAYERS {
        let beyond = lowest.map_or(f32::NEG_INFINITY, |h| h.distance + 1e-4);
        match nearest_hit_where(surfaces, ray, f32::INFINITY, &|hit: &RayHit| hit.distance > beyond) {
            Some(hit) => lowest = Some(hit),
            None => break,
        }
    }
    lowest
}

fn idle_adherence(
    pose: &mut Pose,
    config: &NavigationConfig,
    surfaces: &[&dyn CollidableSurface],
) -> GroundOutcome {
    match probe_ground(pose.position, config, surfaces) {
        GroundProbe::Hit { ground_y, fallback } => {
            let target = ground_y + config.player_height;
            pose.position.y += (target - pose.position.y) * config.idle_ease_factor;
            GroundOutcome::Eased { ground_y, fallback }
        }
        GroundProbe::Miss => GroundOutcome::Miss,
        GroundProbe::NoGeometry => GroundOutcome::GeometryUnavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoxSurface, TriangleMesh};

    fn intent(forward: bool, backward: bool, left: bool, right: bool) -> MoveIntent {
        MoveIntent {
            forward,
            backward,
            left,
            right,
            ..Default::default()
        }
    }

    #[test]
    fn test_local_direction_axes() {
        assert_eq!(local_direction(&intent(true, false, false, false)), Vec3::NEG_Z);
        assert_eq!(local_direction(&intent(false, true, false, false)), Vec3::Z);
        assert_eq!(local_direction(&intent(false, false, true, false)), Vec3::NEG_X);
        assert_eq!(local_direction(&intent(false, false, false, true)), Vec3::X);
    }

    #[test]
    fn test_local_direction_every_key_combination() {
        for bits in 0u8..16 {
            let held = intent(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, bits & 8 != 0);
            let dir = local_direction(&held);
            let cancels = held.forward == held.backward && held.left == held.right;
            if cancels {
                assert_eq!(dir, Vec3::ZERO, "{:?}", held);
            } else {
                assert!((dir.length() - 1.0).abs() < 1e-6, "{:?} -> {:?}", held, dir);
            }
            assert_eq!(dir.y, 0.0);
        }
    }

    #[test]
    fn test_local_direction_diagonal_is_unit() {
        let dir = local_direction(&intent(true, false, false, true));
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.x > 0.0 && dir.z < 0.0);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        assert_eq!(local_direction(&intent(true, true, false, false)), Vec3::ZERO);
        assert_eq!(local_direction(&intent(true, true, true, true)), Vec3::ZERO);
    }

    #[test]
    fn test_effective_delta_clamps() {
        let config = NavigationConfig::default();
        assert_eq!(effective_delta(5.0, &config), config.max_frame_delta);
        assert_eq!(effective_delta(-1.0, &config), 0.0);
        assert_eq!(effective_delta(f32::NAN, &config), 0.0);
        assert_eq!(effective_delta(0.016, &config), 0.016);
    }

    #[test]
    fn test_probe_body_reports_lowest_blocking_probe() {
        let config = NavigationConfig::default();
        // Knee-high block 0.2 ahead: only the feet probe sees it
        let block = BoxSurface::new(Vec3::new(0.2, 0.0, -1.0), Vec3::new(1.0, 0.5, 1.0));
        let surfaces: Vec<&dyn CollidableSurface> = vec![&block];
        let eye = Vec3::new(0.0, 1.6, 0.0);
        let hit = probe_body(eye, Vec3::X * 0.08, &config, &surfaces);
        assert_eq!(hit.map(|h| h.0), Some(BodyProbe::Feet));
    }

    #[test]
    fn test_probe_body_ignores_far_wall() {
        let config = NavigationConfig::default();
        let wall = BoxSurface::new(Vec3::new(0.5, 0.0, -1.0), Vec3::new(1.0, 3.0, 1.0));
        let surfaces: Vec<&dyn CollidableSurface> = vec![&wall];
        assert!(probe_body(Vec3::new(0.0, 1.6, 0.0), Vec3::X * 0.08, &config, &surfaces).is_none());
    }

    #[test]
    fn test_probe_body_reach_grows_with_displacement() {
        let config = NavigationConfig::default();
        let wall = BoxSurface::new(Vec3::new(0.5, 0.0, -1.0), Vec3::new(1.0, 3.0, 1.0));
        let surfaces: Vec<&dyn CollidableSurface> = vec![&wall];
        let hit = probe_body(Vec3::new(0.0, 1.6, 0.0), Vec3::X * 0.2, &config, &surfaces);
        assert!(matches!(hit, Some((BodyProbe::Feet, d)) if (d - 0.5).abs() < 1e-4));
        assert!(probe_body(Vec3::new(0.0, 1.6, 0.0), Vec3::ZERO, &config, &surfaces).is_none());
    }

    #[test]
    fn test_step_height_lifts_feet_probe() {
        let config = NavigationConfig {
            step_height: 0.3,
            ..Default::default()
        };
        let stair = BoxSurface::new(Vec3::new(0.2, 0.0, -1.0), Vec3::new(1.0, 0.2, 1.0));
        let surfaces: Vec<&dyn CollidableSurface> = vec![&stair];
        assert!(probe_body(Vec3::new(0.0, 1.6, 0.0), Vec3::X * 0.08, &config, &surfaces).is_none());
    }

    #[test]
    fn test_probe_ground_ignores_ceiling() {
        let config = NavigationConfig::default();
        let floor = TriangleMesh::quad_xz(Vec3::splat(-5.0), Vec3::splat(5.0), 0.0);
        let ceiling = TriangleMesh::quad_xz(Vec3::splat(-5.0), Vec3::splat(5.0), 3.0);
        let surfaces: Vec<&dyn CollidableSurface> = vec![&ceiling, &floor];
        match probe_ground(Vec3::new(0.0, 1.6, 0.0), &config, &surfaces) {
            GroundProbe::Hit { ground_y, fallback } => {
                assert!(ground_y.abs() < 1e-4, "expected floor, got {}", ground_y);
                assert!(!fallback);
            }
            other => panic!("expected ground hit, got {:?}", other),
        }
    }

    #[test]
    fn test_probe_ground_finds_floor_above_sunken_eye() {
        let config = NavigationConfig::default();
        let floor = TriangleMesh::quad_xz(Vec3::splat(-5.0), Vec3::splat(5.0), 0.0);
        let ceiling = TriangleMesh::quad_xz(Vec3::splat(-5.0), Vec3::splat(5.0), 3.0);
        let surfaces: Vec<&dyn CollidableSurface> = vec![&ceiling, &floor];
        match probe_ground(Vec3::new(0.0, -0.5, 0.0), &config, &surfaces) {
            GroundProbe::Hit { ground_y, .. } => assert!(ground_y.abs() < 1e-4, "got {}", ground_y),
            other => panic!("expected the floor, got {:?}", other),
        }
    }

    #[test]
    fn test_probe_ground_no_geometry() {
        let config = NavigationConfig::default();
        assert_eq!(probe_ground(Vec3::ZERO, &config, &[]), GroundProbe::NoGeometry);
    }

    #[test]
    fn test_probe_ground_miss_off_the_edge() {
        let config = NavigationConfig::default();
        let floor = TriangleMesh::quad_xz(Vec3::splat(-1.0), Vec3::splat(1.0), 0.0);
        let surfaces: Vec<&dyn CollidableSurface> = vec![&floor];
        assert_eq!(
            probe_ground(Vec3::new(10.0, 1.6, 0.0), &config, &surfaces),
            GroundProbe::Miss
        );
    }
}
