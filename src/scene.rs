use glam::Vec3;

use crate::math::AABB;

/// Reserved node name for the active model. The scene never holds more than
/// one node under this name.
pub const MODEL_NODE_NAME: &str = "model";

/// Color encoding of a texture map. Model payloads decode as `Linear`; the
/// viewer normalizes color/emissive maps to `Srgb` before upload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColorEncoding {
    Linear,
    Srgb,
}

#[derive(Clone, Debug)]
pub struct TextureMap {
    /// Index of the image inside the source payload.
    pub source: usize,
    pub encoding: ColorEncoding,
}

impl TextureMap {
    pub fn new(source: usize) -> Self {
        Self {
            source,
            encoding: ColorEncoding::Linear,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Material {
    pub base_color_factor: [f32; 4],
    pub base_color_texture: Option<TextureMap>,
    pub emissive_texture: Option<TextureMap>,
    /// Set when the material changed after decode and the backend must
    /// re-upload it.
    pub needs_upload: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            base_color_texture: None,
            emissive_texture: None,
            needs_upload: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Mesh {
    pub name: Option<String>,
    /// Vertex positions in graph-local space.
    pub positions: Vec<Vec3>,
    pub material: Material,
}

/// Decoded renderable graph for one model, held as a single named node.
#[derive(Clone, Debug)]
pub struct SceneGraph {
    pub name: String,
    pub position: Vec3,
    pub meshes: Vec<Mesh>,
}

impl SceneGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            meshes: Vec::new(),
        }
    }

    /// World-space bounding box: local vertex bounds offset by the node
    /// position. None when the graph has no geometry.
    pub fn bounds(&self) -> Option<AABB> {
        let local = self
            .meshes
            .iter()
            .filter_map(|m| AABB::from_points(m.positions.iter().copied()))
            .reduce(|a, b| a.union(&b))?;
        Some(local.translated(self.position))
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.positions.len()).sum()
    }
}

#[derive(Copy, Clone, Debug)]
pub enum Light {
    Ambient { color: [f32; 3], intensity: f32 },
    Directional { color: [f32; 3], intensity: f32, direction: Vec3 },
}

/// Persistent scene: named nodes plus lights. Node replacement is wholesale,
/// remove-then-insert.
#[derive(Default)]
pub struct Scene {
    nodes: Vec<SceneGraph>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, name: &str) -> Option<&SceneGraph> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn node_mut(&mut self, name: &str) -> Option<&mut SceneGraph> {
        self.nodes.iter_mut().find(|n| n.name == name)
    }

    /// Removes and returns the named node, if present.
    pub fn remove_node(&mut self, name: &str) -> Option<SceneGraph> {
        let idx = self.nodes.iter().position(|n| n.name == name)?;
        Some(self.nodes.remove(idx))
    }

    /// Inserts a node, first removing any existing node with the same name so
    /// the name stays unique.
    pub fn insert_node(&mut self, node: SceneGraph) {
        self.remove_node(&node.name);
        self.nodes.push(node);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with_box(name: &str, min: Vec3, max: Vec3) -> SceneGraph {
        let mut graph = SceneGraph::new(name);
        graph.meshes.push(Mesh {
            name: None,
            positions: vec![min, max],
            material: Material::default(),
        });
        graph
    }

    #[test]
    fn insert_replaces_same_name() {
        let mut scene = Scene::new();
        scene.insert_node(graph_with_box(MODEL_NODE_NAME, Vec3::ZERO, Vec3::ONE));
        scene.insert_node(graph_with_box(MODEL_NODE_NAME, Vec3::ZERO, Vec3::splat(2.0)));

        assert_eq!(scene.node_count(), 1);
        let bounds = scene.node(MODEL_NODE_NAME).unwrap().bounds().unwrap();
        assert_eq!(bounds.max, Vec3::splat(2.0));
    }

    #[test]
    fn remove_missing_node_is_none() {
        let mut scene = Scene::new();
        assert!(scene.remove_node(MODEL_NODE_NAME).is_none());
    }

    #[test]
    fn bounds_follow_node_position() {
        let mut graph = graph_with_box(MODEL_NODE_NAME, Vec3::ZERO, Vec3::ONE);
        graph.position = Vec3::new(10.0, 0.0, 0.0);

        let bounds = graph.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(11.0, 1.0, 1.0));
    }

    #[test]
    fn empty_graph_has_no_bounds() {
        assert!(SceneGraph::new(MODEL_NODE_NAME).bounds().is_none());
    }
}
