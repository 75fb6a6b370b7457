pub mod gltf;
pub mod scene_file;

pub use self::gltf::{load_gltf_mesh, load_gltf_mesh_from_slice};
pub use scene_file::{load_scene_file, parse_scene, SceneFile};
