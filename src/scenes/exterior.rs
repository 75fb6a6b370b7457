use glam::Vec3;

use super::ScenePreset;
use crate::camera::Pose;
use crate::config::{NavigationConfig, DEFAULT_DOOR_RADIUS};
use crate::geometry::{BoxSurface, SceneGeometry, TriangleMesh};
use crate::triggers::Trigger;

pub const EXTERIOR_SPAWN: Vec3 = Vec3::new(0.51, -5.0, 18.38);
pub const FRONT_DOOR: Vec3 = Vec3::new(-1.94, -5.0, 6.38);

const GROUND_Y: f32 = -6.6;
/// Porch and building floor level
const PLINTH_TOP: f32 = -5.0;
const STEP_RISE: f32 = 0.4;
const STEP_DEPTH: f32 = 1.0;
const WALL_TOP: f32 = 1.0;

/// Building on a raised plinth with stairs up to the front door
pub fn create_exterior_scene() -> ScenePreset {
    let mut geometry = SceneGeometry::new();

    geometry.add(
        "ground",
        TriangleMesh::quad_xz(Vec3::new(-40.0, 0.0, -30.0), Vec3::new(40.0, 0.0, 50.0), GROUND_Y),
    );

    // Solid block under the building and the porch in front of it
    geometry.add(
        "plinth",
        BoxSurface::new(Vec3::new(-8.0, GROUND_Y, -10.0), Vec3::new(6.0, PLINTH_TOP, 9.0)),
    );

    // Three steps; each box runs back to the porch so there is no gap under the treads
    for k in 1..=3 {
        let top = GROUND_Y + STEP_RISE * k as f32;
        let front = 9.0 + STEP_DEPTH * (4 - k) as f32;
        geometry.add(
            "stairs",
            BoxSurface::new(Vec3::new(-5.0, GROUND_Y, 9.0), Vec3::new(1.5, top, front)),
        );
    }

    // Shell: the front wall is solid, the door is entered with the confirm key
    geometry.add(
        "facade",
        BoxSurface::new(Vec3::new(-8.0, PLINTH_TOP, 5.8), Vec3::new(6.0, WALL_TOP, 6.3)),
    );
    geometry.add(
        "walls",
        BoxSurface::new(Vec3::new(-8.0, PLINTH_TOP, -10.0), Vec3::new(-7.6, WALL_TOP, 5.8)),
    );
    geometry.add(
        "walls",
        BoxSurface::new(Vec3::new(5.6, PLINTH_TOP, -10.0), Vec3::new(6.0, WALL_TOP, 5.8)),
    );
    geometry.add(
        "walls",
        BoxSurface::new(Vec3::new(-7.6, PLINTH_TOP, -10.0), Vec3::new(5.6, WALL_TOP, -9.6)),
    );
    // Overhang reaches past the porch so it sits above the viewer at the door
    geometry.add(
        "roof",
        BoxSurface::new(Vec3::new(-8.5, WALL_TOP, -10.5), Vec3::new(6.5, WALL_TOP + 0.4, 8.0)),
    );

    let triggers = vec![Trigger::door("front-door", FRONT_DOOR, DEFAULT_DOOR_RADIUS).with_target("interior")];

    log::info!(
        "exterior scene: {} surfaces, {} triggers",
        geometry.len(),
        triggers.len()
    );

    ScenePreset {
        name: "exterior".to_string(),
        spawn: Pose::at(EXTERIOR_SPAWN),
        config: NavigationConfig {
            step_height: STEP_RISE + 0.05,
            ..Default::default()
        },
        geometry,
        triggers,
    }
}
