// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::fog::Fog;
use super::mesh::Mesh;
use super::skybox::SkyBox;
use crate::renderer::Light;

/// A stable handle to a node of a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Anything that can live in a scene.
#[derive(Debug)]
pub enum SceneNode {
    /// A drawable mesh.
    Mesh(Mesh),
    /// A light source.
    Light(Light),
    /// The environment box.
    SkyBox(SkyBox),
}

impl SceneNode {
    /// The mesh, if this node is one.
    pub fn as_mesh(&self) -> Option<&Mesh> {
        match self {
            SceneNode::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// The mesh, mutably, if this node is one.
    pub fn as_mesh_mut(&mut self) -> Option<&mut Mesh> {
        match self {
            SceneNode::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// The light, if this node is one.
    pub fn as_light(&self) -> Option<&Light> {
        match self {
            SceneNode::Light(light) => Some(light),
            _ => None,
        }
    }
}

impl From<Mesh> for SceneNode {
    fn from(mesh: Mesh) -> Self {
        SceneNode::Mesh(mesh)
    }
}

impl From<Light> for SceneNode {
    fn from(light: Light) -> Self {
        SceneNode::Light(light)
    }
}

impl From<SkyBox> for SceneNode {
    fn from(skybox: SkyBox) -> Self {
        SceneNode::SkyBox(skybox)
    }
}

/// The set of objects rendered together, in insertion order.
///
/// Structural changes (adding or removing nodes, changing lights or fog) raise
/// the `needs_update` flag; the renderer reclassifies lights and regenerates
/// programs only when it is set, then clears it.
#[derive(Debug)]
pub struct Scene {
    nodes: Vec<(NodeId, SceneNode)>,
    next_id: usize,
    fog: Option<Fog>,
    needs_update: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// An empty scene. It starts flagged so the first render builds programs.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            next_id: 0,
            fog: None,
            needs_update: true,
        }
    }

    /// Appends a node and returns its handle.
    pub fn add(&mut self, node: impl Into<SceneNode>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push((id, node.into()));
        self.needs_update = true;
        id
    }

    /// Removes a node, preserving the order of the others.
    pub fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        let index = self.nodes.iter().position(|(node_id, _)| *node_id == id)?;
        self.needs_update = true;
        Some(self.nodes.remove(index).1)
    }

    /// The node behind `id`.
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes
            .iter()
            .find(|(node_id, _)| *node_id == id)
            .map(|(_, node)| node)
    }

    /// The node behind `id`, mutably.
    ///
    /// Mutating a light through this handle does not raise `needs_update`; use
    /// [`Scene::light_mut`] for that.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes
            .iter_mut()
            .find(|(node_id, _)| *node_id == id)
            .map(|(_, node)| node)
    }

    /// The mesh behind `id`.
    pub fn mesh(&self, id: NodeId) -> Option<&Mesh> {
        self.get(id).and_then(SceneNode::as_mesh)
    }

    /// The mesh behind `id`, mutably.
    pub fn mesh_mut(&mut self, id: NodeId) -> Option<&mut Mesh> {
        self.get_mut(id).and_then(SceneNode::as_mesh_mut)
    }

    /// The light behind `id`, mutably. Raises `needs_update`.
    pub fn light_mut(&mut self, id: NodeId) -> Option<&mut Light> {
        let light = self
            .nodes
            .iter_mut()
            .find(|(node_id, _)| *node_id == id)
            .and_then(|(_, node)| match node {
                SceneNode::Light(light) => Some(light),
                _ => None,
            });
        if light.is_some() {
            self.needs_update = true;
        }
        light
    }

    /// All nodes in draw order.
    pub fn nodes(&self) -> &[(NodeId, SceneNode)] {
        &self.nodes
    }

    /// All nodes in draw order, mutably.
    pub fn nodes_mut(&mut self) -> &mut [(NodeId, SceneNode)] {
        &mut self.nodes
    }

    /// The number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The lights, in insertion order.
    pub fn lights(&self) -> impl Iterator<Item = &Light> {
        self.nodes.iter().filter_map(|(_, node)| node.as_light())
    }

    /// The meshes with their handles, in insertion order.
    pub fn meshes(&self) -> impl Iterator<Item = (NodeId, &Mesh)> {
        self.nodes
            .iter()
            .filter_map(|(id, node)| node.as_mesh().map(|mesh| (*id, mesh)))
    }

    /// Sets or clears the scene fog. Meshes pick it up on the next update.
    pub fn set_fog(&mut self, fog: Option<Fog>) {
        self.fog = fog;
        self.needs_update = true;
    }

    /// The scene fog.
    pub fn fog(&self) -> Option<&Fog> {
        self.fog.as_ref()
    }

    /// Copies the scene fog onto every mesh.
    pub fn propagate_fog(&mut self) {
        let fog = self.fog;
        for (_, node) in &mut self.nodes {
            if let SceneNode::Mesh(mesh) = node {
                mesh.fog = fog;
            }
        }
    }

    /// Whether lights, fog or the node set changed since the last update.
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Acknowledges an update.
    pub fn clear_needs_update(&mut self) {
        self.needs_update = false;
    }
}
