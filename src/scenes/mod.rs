//! Built-in scenes: the building exterior and the library interior

mod exterior;
mod interior;

use crate::camera::Pose;
use crate::config::NavigationConfig;
use crate::geometry::SceneGeometry;
use crate::session::NavigationSession;
use crate::triggers::Trigger;

pub use exterior::create_exterior_scene;
pub use interior::create_interior_scene;

pub const PRESET_NAMES: [&str; 2] = ["exterior", "interior"];

/// Everything needed to start navigating a scene
#[derive(Debug)]
pub struct ScenePreset {
    pub name: String,
    pub spawn: Pose,
    pub config: NavigationConfig,
    pub geometry: SceneGeometry,
    pub triggers: Vec<Trigger>,
}

impl ScenePreset {
    /// Fresh session at the spawn pose with this scene's triggers registered
    pub fn session(&self) -> NavigationSession {
        NavigationSession::new(self.config, self.spawn).with_triggers(self.triggers.iter().cloned())
    }
}

/// Look up a built-in scene by name
pub fn preset(name: &str) -> Option<ScenePreset> {
    match name {
        "exterior" => Some(create_exterior_scene()),
        "interior" => Some(create_interior_scene()),
        _ => None,
    }
}
