use glam::Vec3;

use super::ScenePreset;
use crate::camera::Pose;
use crate::config::{NavigationConfig, DEFAULT_HOTSPOT_RADIUS};
use crate::geometry::{BoxSurface, SceneGeometry, TriangleMesh};
use crate::triggers::Trigger;

pub const INTERIOR_SPAWN: Vec3 = Vec3::new(0.0, 1.6, 5.0);

const ROOM_HALF_WIDTH: f32 = 10.0;
const ROOM_BACK: f32 = -12.0;
const ROOM_FRONT: f32 = 10.0;
const ROOM_HEIGHT: f32 = 4.0;
const WALL: f32 = 0.4;
const GALLERY_RISE: f32 = 0.3;

/// Book id and where its hotspot floats
const BOOKS: [(&str, Vec3); 3] = [
    ("book-1", Vec3::new(-4.0, 1.5, -9.5)),
    ("book-2", Vec3::new(0.0, 1.5, -9.5)),
    ("book-3", Vec3::new(4.0, 1.5, -9.5)),
];

/// Reading room: a raised gallery along the back wall, shelves of books and an exit portal
pub fn create_interior_scene() -> ScenePreset {
    let mut geometry = SceneGeometry::new();
    let (w, h) = (ROOM_HALF_WIDTH, ROOM_HEIGHT);

    geometry.add(
        "floor",
        TriangleMesh::quad_xz(Vec3::new(-w, 0.0, ROOM_BACK), Vec3::new(w, 0.0, ROOM_FRONT), 0.0),
    );
    geometry.add(
        "ceiling",
        TriangleMesh::quad_xz(Vec3::new(-w, 0.0, ROOM_BACK), Vec3::new(w, 0.0, ROOM_FRONT), h),
    );

    geometry.add(
        "walls",
        BoxSurface::new(Vec3::new(-w, 0.0, ROOM_BACK - WALL), Vec3::new(w, h, ROOM_BACK)),
    );
    geometry.add(
        "walls",
        BoxSurface::new(Vec3::new(-w, 0.0, ROOM_FRONT), Vec3::new(w, h, ROOM_FRONT + WALL)),
    );
    geometry.add(
        "walls",
        BoxSurface::new(Vec3::new(-w - WALL, 0.0, ROOM_BACK), Vec3::new(-w, h, ROOM_FRONT)),
    );
    geometry.add(
        "walls",
        BoxSurface::new(Vec3::new(w, 0.0, ROOM_BACK), Vec3::new(w + WALL, h, ROOM_FRONT)),
    );

    geometry.add(
        "gallery",
        BoxSurface::new(Vec3::new(-8.0, 0.0, -11.0), Vec3::new(8.0, GALLERY_RISE, -7.0)),
    );
    geometry.add(
        "shelves",
        BoxSurface::new(Vec3::new(-8.0, GALLERY_RISE, ROOM_BACK), Vec3::new(8.0, 3.0, -11.0)),
    );

    let mut triggers: Vec<Trigger> = BOOKS
        .iter()
        .map(|(id, position)| Trigger::hotspot(*id, *position, DEFAULT_HOTSPOT_RADIUS))
        .collect();
    triggers.push(Trigger::portal(
        "exit-portal",
        Vec3::new(0.0, 1.5, 8.5),
        DEFAULT_HOTSPOT_RADIUS,
        "exterior",
    ));

    log::info!(
        "interior scene: {} surfaces, {} triggers",
        geometry.len(),
        triggers.len()
    );

    ScenePreset {
        name: "interior".to_string(),
        spawn: Pose::at(INTERIOR_SPAWN),
        config: NavigationConfig {
            step_height: GALLERY_RISE + 0.05,
            ..Default::default()
        },
        geometry,
        triggers,
    }
}
