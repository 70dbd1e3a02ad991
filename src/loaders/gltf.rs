use glam::{Mat4, Vec3};

use crate::error::DecodeError;
use crate::scene::{Material, Mesh, SceneGraph, TextureMap, MODEL_NODE_NAME};
use crate::traits::SceneLoader;

/// Decodes glTF/GLB payloads into a [`SceneGraph`] under the reserved model
/// name. Node transforms are baked into vertex positions; the graph itself
/// starts at the origin.
#[derive(Debug, Default)]
pub struct GltfLoader;

impl GltfLoader {
    pub fn new() -> Self {
        Self
    }
}

impl SceneLoader for GltfLoader {
    fn decode(&self, payload: &[u8]) -> Result<SceneGraph, DecodeError> {
        let (document, buffers, _images) =
            gltf::import_slice(payload).map_err(|e| DecodeError::new(e.to_string()))?;

        let mut graph = SceneGraph::new(MODEL_NODE_NAME);
        for scene in document.scenes() {
            for node in scene.nodes() {
                process_node(&node, &buffers, &Mat4::IDENTITY, &mut graph)?;
            }
        }

        if graph.meshes.is_empty() {
            return Err(DecodeError::new("payload contains no geometry"));
        }

        log::debug!(
            "decoded {} meshes, {} vertices",
            graph.meshes.len(),
            graph.vertex_count()
        );
        Ok(graph)
    }
}

fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: &Mat4,
    graph: &mut SceneGraph,
) -> Result<(), DecodeError> {
    let local = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global = *parent_transform * local;

    if let Some(mesh) = node.mesh() {
        process_mesh(&mesh, buffers, &global, graph)?;
    }

    for child in node.children() {
        process_node(&child, buffers, &global, graph)?;
    }

    Ok(())
}

fn process_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    transform: &Mat4,
    graph: &mut SceneGraph,
) -> Result<(), DecodeError> {
    for primitive in mesh.primitives() {
        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let positions = reader
            .read_positions()
            .ok_or_else(|| DecodeError::new("mesh primitive has no positions"))?;
        let positions: Vec<Vec3> = positions
            .map(|pos| transform.transform_point3(Vec3::from_array(pos)))
            .collect();
        if positions.is_empty() {
            continue;
        }

        graph.meshes.push(Mesh {
            name: mesh.name().map(str::to_owned),
            positions,
            material: read_material(&primitive.material()),
        });
    }

    Ok(())
}

fn read_material(material: &gltf::Material) -> Material {
    let pbr = material.pbr_metallic_roughness();
    Material {
        base_color_factor: pbr.base_color_factor(),
        base_color_texture: pbr
            .base_color_texture()
            .map(|info| TextureMap::new(info.texture().source().index())),
        emissive_texture: material
            .emissive_texture()
            .map(|info| TextureMap::new(info.texture().source().index())),
        needs_upload: false,
    }
}
