use anyhow::{bail, Context, Result};
use glam::{Mat4, Vec3};
use std::path::Path;

use crate::core::triangle_intersection::Triangle;
use crate::geometry::TriangleMesh;

/// Load every mesh in a glTF file as one collision mesh, in world space
pub fn load_gltf_mesh(path: impl AsRef<Path>) -> Result<TriangleMesh> {
    let path = path.as_ref();
    log::info!("loading glTF collision mesh: {:?}", path);

    let (document, buffers, _images) =
        gltf::import(path).with_context(|| format!("Failed to load glTF file: {:?}", path))?;

    mesh_from_document(&document, &buffers).with_context(|| format!("Invalid glTF geometry in {:?}", path))
}

/// Same as [`load_gltf_mesh`] for an in-memory `.gltf`/`.glb` (buffers must be embedded)
pub fn load_gltf_mesh_from_slice(bytes: &[u8]) -> Result<TriangleMesh> {
    let (document, buffers, _images) = gltf::import_slice(bytes).context("Failed to parse glTF data")?;
    mesh_from_document(&document, &buffers)
}

fn mesh_from_document(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Result<TriangleMesh> {
    log::debug!(
        "glTF: {} scenes, {} nodes, {} meshes",
        document.scenes().count(),
        document.nodes().count(),
        document.meshes().count()
    );

    let mut triangles = Vec::new();
    for scene in document.scenes() {
        for node in scene.nodes() {
            collect_node(&node, buffers, Mat4::IDENTITY, &mut triangles)?;
        }
    }

    let mesh = TriangleMesh::new(triangles);
    if mesh.is_empty() {
        log::warn!("glTF contains no usable triangles");
    } else {
        log::info!("collision mesh: {} triangles", mesh.len());
    }
    Ok(mesh)
}

fn collect_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: Mat4,
    triangles: &mut Vec<Triangle>,
) -> Result<()> {
    let transform = parent_transform * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        collect_mesh(&mesh, buffers, transform, triangles)?;
    }

    for child in node.children() {
        collect_node(&child, buffers, transform, triangles)?;
    }

    Ok(())
}

fn collect_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    transform: Mat4,
    triangles: &mut Vec<Triangle>,
) -> Result<()> {
    for primitive in mesh.primitives() {
        // Lines and points have nothing to collide with
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::debug!("skipping {:?} primitive in mesh {:?}", primitive.mode(), mesh.name());
            continue;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data[..]));
        let Some(positions) = reader.read_positions() else {
            log::warn!("mesh {:?} has a primitive without positions", mesh.name());
            continue;
        };
        let vertices: Vec<Vec3> = positions
            .map(|p| transform.transform_point3(Vec3::from_array(p)))
            .collect();

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..vertices.len() as u32).collect(),
        };

        if indices.len() % 3 != 0 {
            bail!("mesh {:?} has {} indices, not a multiple of 3", mesh.name(), indices.len());
        }

        for corner in indices.chunks_exact(3) {
            let vertex = |i: u32| {
                vertices
                    .get(i as usize)
                    .copied()
                    .with_context(|| format!("index {} out of range in mesh {:?}", i, mesh.name()))
            };
            triangles.push(Triangle::new(vertex(corner[0])?, vertex(corner[1])?, vertex(corner[2])?));
        }
    }

    Ok(())
}
