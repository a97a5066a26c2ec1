//! Semantic classification of character hierarchies.
//!
//! Partitions renderable nodes into skin, hair, and garment groups by
//! name/material-name heuristics, and indexes morph-target meshes and
//! skeleton bones by name. Every operation is a single read-only traversal:
//! an empty hierarchy yields empty results and no visited node is mutated.
//!
//! Group membership is computed once per character load and stays fixed for
//! the session lifetime; later operations mutate the nodes the groups point
//! at, never the groups themselves.

mod rules;

pub use rules::{GARMENT_GROUP_VOCAB, GARMENT_VOCAB, HAIR_MATERIAL_TOKEN};

use std::collections::HashMap;

use crate::scene::{Hierarchy, NodeId, SceneNode};

/// Ordered group of renderable nodes, in hierarchy traversal order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGroup {
    ids: Vec<NodeId>,
}

impl MeshGroup {
    /// Number of nodes in the group.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the group has no nodes.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Node id at `index`.
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.ids.get(index).copied()
    }

    /// Iterate the node ids in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids.iter().copied()
    }
}

/// Lowercased node name -> node carrying morph targets.
///
/// Last-write-wins when two morphable nodes share a name.
#[derive(Debug, Clone, Default)]
pub struct MorphIndex {
    by_name: HashMap<String, NodeId>,
}

impl MorphIndex {
    /// Look up a morphable node; the key is lowercased before lookup.
    pub fn get(&self, key: &str) -> Option<NodeId> {
        self.by_name.get(&key.to_lowercase()).copied()
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// The indexed (lowercased) node names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }
}

/// Skinned-mesh node name -> bone name -> bone node.
///
/// Names are exactly as authored in the source asset; a rename there
/// silently breaks matching.
#[derive(Debug, Clone, Default)]
pub struct BoneIndex {
    by_mesh: HashMap<String, HashMap<String, NodeId>>,
}

impl BoneIndex {
    /// Iterate (skinned-mesh name, bone map) entries.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &HashMap<String, NodeId>)> {
        self.by_mesh.iter().map(|(name, map)| (name.as_str(), map))
    }

    /// Bone node of `bone` under the skinned mesh `mesh`.
    pub fn bone(&self, mesh: &str, bone: &str) -> Option<NodeId> {
        self.by_mesh.get(mesh).and_then(|map| map.get(bone)).copied()
    }

    /// Number of skinned-mesh entries.
    pub fn len(&self) -> usize {
        self.by_mesh.len()
    }

    /// Whether no skinned mesh was indexed.
    pub fn is_empty(&self) -> bool {
        self.by_mesh.is_empty()
    }
}

/// Lowercased node name and primary-material name of a renderable node.
fn match_keys(node: &SceneNode) -> (String, String) {
    let name = node.name_str().to_lowercase();
    let material = node
        .mesh
        .as_ref()
        .and_then(|mesh| mesh.materials.first())
        .and_then(|mat| mat.name.as_deref())
        .map(str::to_lowercase)
        .unwrap_or_default();
    (name, material)
}

fn collect_renderable(
    hierarchy: &Hierarchy,
    predicate: impl Fn(&str, &str) -> bool,
) -> MeshGroup {
    let mut group = MeshGroup::default();
    hierarchy.visit(|id, node| {
        if !node.is_renderable() {
            return;
        }
        let (name, material) = match_keys(node);
        if predicate(&name, &material) {
            group.ids.push(id);
        }
    });
    group
}

/// Collect every renderable node matching the skin rules and not classified
/// as a garment. Exclusion wins over any positive match.
pub fn classify_skin(hierarchy: &Hierarchy) -> MeshGroup {
    collect_renderable(hierarchy, |name, material| {
        rules::is_skin(name, material) && !rules::is_garment(name, material)
    })
}

/// Collect every renderable node matching the garment-group vocabulary.
pub fn classify_garment(hierarchy: &Hierarchy) -> MeshGroup {
    collect_renderable(hierarchy, rules::is_garment_group)
}

/// Collect the stock hair meshes.
pub fn classify_hair(hierarchy: &Hierarchy) -> MeshGroup {
    collect_renderable(hierarchy, rules::is_hair)
}

/// Index every renderable node carrying morph targets by lowercased name.
pub fn index_morph_targets(hierarchy: &Hierarchy) -> MorphIndex {
    let mut index = MorphIndex::default();
    hierarchy.visit(|id, node| {
        let has_morphs = node
            .mesh
            .as_ref()
            .and_then(|mesh| mesh.morphs.as_ref())
            .is_some_and(|morphs| !morphs.is_empty());
        if has_morphs {
            index.by_name.insert(node.name_str().to_lowercase(), id);
        }
    });
    index
}

/// Index the skeleton of every named skinned mesh: node name to a map from
/// bone name to bone node. Unnamed skinned meshes and unnamed joints are
/// skipped.
pub fn index_bones(hierarchy: &Hierarchy) -> BoneIndex {
    let mut index = BoneIndex::default();
    hierarchy.visit(|_, node| {
        if !node.is_renderable() {
            return;
        }
        let skin = match node.skin.as_ref() {
            Some(skin) => skin,
            None => return,
        };
        let mesh_name = match node.name.as_deref() {
            Some(name) => name,
            None => {
                log::debug!("skipping unnamed skinned mesh in bone index");
                return;
            }
        };
        let mut bones = HashMap::new();
        for &joint in &skin.joints {
            let joint_node = match hierarchy.node(joint) {
                Some(joint_node) => joint_node,
                None => continue,
            };
            if let Some(bone_name) = joint_node.name.as_deref() {
                bones.insert(bone_name.to_string(), joint);
            }
        }
        index.by_mesh.insert(mesh_name.to_string(), bones);
    });
    index
}
