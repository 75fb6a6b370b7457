//! JSON scene descriptions: spawn point, tuning overrides, collision boxes,
//! an optional glTF collision mesh and triggers.
//!
//! ```json
//! {
//!   "name": "gallery",
//!   "spawn": { "position": [0.0, 1.6, 5.0], "yaw": 0.0 },
//!   "config": { "moveSpeed": 4.0, "stepHeight": 0.3 },
//!   "mesh": "gallery.gltf",
//!   "boxes": [ { "name": "plinth", "min": [-1, 0, -1], "max": [1, 0.5, 1] } ],
//!   "triggers": [
//!     { "id": "door", "kind": "door", "position": [0, 0, -8], "target": "interior" },
//!     { "id": "book-1", "kind": "hotspot", "position": [2, 1.2, -3], "radius": 1.0 }
//!   ]
//! }
//! ```

use anyhow::{bail, Context, Result};
use glam::Vec3;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::gltf::load_gltf_mesh;
use crate::camera::Pose;
use crate::config::{NavigationConfig, DEFAULT_DOOR_RADIUS, DEFAULT_HOTSPOT_RADIUS};
use crate::geometry::{BoxSurface, SceneGeometry};
use crate::scenes::ScenePreset;
use crate::triggers::Trigger;

#[derive(Debug, Clone, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub name: Option<String>,
    pub spawn: SpawnDef,
    #[serde(default)]
    pub config: NavigationConfig,
    /// glTF collision mesh, relative to the scene file
    #[serde(default)]
    pub mesh: Option<PathBuf>,
    #[serde(default)]
    pub boxes: Vec<BoxDef>,
    #[serde(default)]
    pub triggers: Vec<TriggerDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpawnDef {
    pub position: Vec3,
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoxDef {
    #[serde(default)]
    pub name: Option<String>,
    pub min: Vec3,
    pub max: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerDefKind {
    Door,
    Hotspot,
    Portal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriggerDef {
    pub id: String,
    pub kind: TriggerDefKind,
    pub position: Vec3,
    /// Defaults by kind when omitted
    #[serde(default)]
    pub radius: Option<f32>,
    #[serde(default)]
    pub target: Option<String>,
}

impl TriggerDef {
    fn resolve(self) -> Result<Trigger> {
        let radius = self.radius.unwrap_or(match self.kind {
            TriggerDefKind::Door => DEFAULT_DOOR_RADIUS,
            TriggerDefKind::Hotspot | TriggerDefKind::Portal => DEFAULT_HOTSPOT_RADIUS,
        });
        if !(radius.is_finite() && radius > 0.0) {
            bail!("trigger '{}': radius must be positive, got {}", self.id, radius);
        }

        let trigger = match (self.kind, self.target) {
            (TriggerDefKind::Door, None) => Trigger::door(self.id, self.position, radius),
            (TriggerDefKind::Door, Some(target)) => Trigger::door(self.id, self.position, radius).with_target(target),
            (TriggerDefKind::Hotspot, target) => {
                if target.is_some() {
                    log::warn!("trigger '{}': hotspots ignore 'target', use kind \"portal\"", self.id);
                }
                Trigger::hotspot(self.id, self.position, radius)
            }
            (TriggerDefKind::Portal, Some(target)) => Trigger::portal(self.id, self.position, radius, target),
            (TriggerDefKind::Portal, None) => bail!("trigger '{}': portal needs a 'target'", self.id),
        };
        Ok(trigger)
    }
}

/// Read and resolve a scene file
pub fn load_scene_file(path: impl AsRef<Path>) -> Result<ScenePreset> {
    let path = path.as_ref();
    log::info!("loading scene file: {:?}", path);

    let text = fs::read_to_string(path).with_context(|| format!("Failed to read scene file: {:?}", path))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let fallback_name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scene".to_string());

    parse_scene(&text, base_dir, &fallback_name).with_context(|| format!("Invalid scene file: {:?}", path))
}

/// Resolve scene JSON; relative mesh paths are taken from `base_dir`
pub fn parse_scene(json: &str, base_dir: &Path, fallback_name: &str) -> Result<ScenePreset> {
    let file: SceneFile = serde_json::from_str(json).context("Failed to parse scene JSON")?;
    file.config.validate().context("Invalid navigation config")?;

    let mut geometry = SceneGeometry::new();
    if let Some(mesh_path) = &file.mesh {
        let mesh = load_gltf_mesh(base_dir.join(mesh_path))?;
        geometry.add("mesh", mesh);
    }
    for (i, def) in file.boxes.iter().enumerate() {
        let name = def.name.clone().unwrap_or_else(|| format!("box-{}", i));
        geometry.add(name, BoxSurface::new(def.min, def.max));
    }

    let triggers = file
        .triggers
        .into_iter()
        .map(TriggerDef::resolve)
        .collect::<Result<Vec<_>>>()?;

    if geometry.is_empty() {
        log::warn!("scene has no collidable geometry; movement will be unconstrained");
    }

    Ok(ScenePreset {
        name: file.name.unwrap_or_else(|| fallback_name.to_string()),
        spawn: Pose::new(file.spawn.position, file.spawn.yaw, file.spawn.pitch),
        config: file.config,
        geometry,
        triggers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triggers::{HotspotAction, TriggerKind};

    #[test]
    fn test_minimal_scene() {
        let scene = parse_scene(r#"{ "spawn": { "position": [1, 2, 3] } }"#, Path::new("."), "tiny").unwrap();
        assert_eq!(scene.name, "tiny");
        assert_eq!(scene.spawn.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.config, NavigationConfig::default());
        assert!(scene.geometry.is_empty());
        assert!(scene.triggers.is_empty());
    }

    #[test]
    fn test_trigger_radius_defaults_by_kind() {
        let json = r#"{
            "spawn": { "position": [0, 1.6, 0] },
            "triggers": [
                { "id": "door", "kind": "door", "position": [0, 0, -5], "target": "interior" },
                { "id": "book", "kind": "hotspot", "position": [1, 1, 1] },
                { "id": "exit", "kind": "portal", "position": [2, 1, 1], "radius": 2.5, "target": "exterior" }
            ]
        }"#;
        let scene = parse_scene(json, Path::new("."), "t").unwrap();
        assert_eq!(scene.triggers[0].radius, DEFAULT_DOOR_RADIUS);
        assert_eq!(
            scene.triggers[0].kind,
            TriggerKind::Door {
                target: Some("interior".into())
            }
        );
        assert_eq!(scene.triggers[1].radius, DEFAULT_HOTSPOT_RADIUS);
        assert_eq!(
            scene.triggers[2].kind,
            TriggerKind::Hotspot {
                action: HotspotAction::Transition {
                    target: "exterior".into()
                }
            }
        );
        assert_eq!(scene.triggers[2].radius, 2.5);
    }

    #[test]
    fn test_portal_without_target_rejected() {
        let json = r#"{
            "spawn": { "position": [0, 0, 0] },
            "triggers": [ { "id": "p", "kind": "portal", "position": [0, 0, 0] } ]
        }"#;
        let err = parse_scene(json, Path::new("."), "t").unwrap_err();
        assert!(format!("{:#}", err).contains("portal needs a 'target'"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let json = r#"{ "spawn": { "position": [0, 0, 0] }, "config": { "moveSpeed": -1 } }"#;
        assert!(parse_scene(json, Path::new("."), "t").is_err());
    }

    #[test]
    fn test_boxes_named() {
        let json = r#"{
            "spawn": { "position": [0, 1.6, 0] },
            "boxes": [
                { "name": "wall", "min": [2, 0, -1], "max": [3, 3, 1] },
                { "min": [-3, 0, -1], "max": [-2, 3, 1] }
            ]
        }"#;
        let scene = parse_scene(json, Path::new("."), "t").unwrap();
        let names: Vec<&str> = scene.geometry.names().collect();
        assert_eq!(names, vec!["wall", "box-1"]);
    }
}
