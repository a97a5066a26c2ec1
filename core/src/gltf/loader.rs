//! Internal document-to-hierarchy construction.
//!
//! Two passes over the parsed document: the first instantiates the node
//! tree (names, transforms, mesh attachments), the second resolves skin
//! joints to arena ids once every node exists.

use std::collections::HashMap;

use crate::material::Material;
use crate::math::Aabb;
use crate::scene::{
    Hierarchy, MeshAttachment, MorphTargets, NodeId, NodeTransform, SceneNode, SkinBinding,
};

use super::error::GltfError;

pub(crate) fn build_hierarchy(document: &gltf_dep::Document) -> Result<Hierarchy, GltfError> {
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(GltfError::NoScene)?;

    let mut hierarchy = Hierarchy::new();
    let root = hierarchy.add_root(SceneNode::new().with_name(scene.name().unwrap_or("scene")));

    let mut node_ids: HashMap<usize, NodeId> = HashMap::new();
    for node in scene.nodes() {
        add_node(&mut hierarchy, &mut node_ids, root, &node);
    }

    // Joints may appear anywhere in the tree, so skins resolve after the
    // whole scene is instantiated.
    for node in document.nodes() {
        let skin = match node.skin() {
            Some(skin) => skin,
            None => continue,
        };
        let id = match node_ids.get(&node.index()) {
            Some(&id) => id,
            None => continue,
        };
        let joints: Vec<NodeId> = skin
            .joints()
            .filter_map(|joint| node_ids.get(&joint.index()).copied())
            .collect();
        if let Some(scene_node) = hierarchy.node_mut(id) {
            scene_node.skin = Some(SkinBinding {
                name: skin.name().map(String::from),
                joints,
            });
        }
    }

    Ok(hierarchy)
}

fn add_node(
    hierarchy: &mut Hierarchy,
    node_ids: &mut HashMap<usize, NodeId>,
    parent: NodeId,
    node: &gltf_dep::Node,
) {
    let (translation, rotation, scale) = node.transform().decomposed();
    let mut scene_node = SceneNode::new().with_transform(NodeTransform {
        translation,
        rotation,
        scale,
    });
    if let Some(name) = node.name() {
        scene_node = scene_node.with_name(name);
    }
    if let Some(mesh) = node.mesh() {
        scene_node = scene_node.with_mesh(load_mesh(&mesh));
    }
    let id = hierarchy.add_child(parent, scene_node);
    node_ids.insert(node.index(), id);

    for child in node.children() {
        add_node(hierarchy, node_ids, id, &child);
    }
}

fn load_mesh(mesh: &gltf_dep::Mesh) -> MeshAttachment {
    let mut materials = Vec::new();
    let mut bounds: Option<Aabb> = None;
    let mut target_count = 0usize;

    for primitive in mesh.primitives() {
        materials.push(load_material(&primitive.material()));
        if let Some(primitive_bounds) = position_bounds(&primitive) {
            bounds = Some(match bounds {
                Some(acc) => acc.union(&primitive_bounds),
                None => primitive_bounds,
            });
        }
        target_count = target_count.max(primitive.morph_targets().count());
    }

    let mut attachment = MeshAttachment::new().with_materials(materials);
    if let Some(bounds) = bounds {
        attachment = attachment.with_bounds(bounds);
    }
    if target_count > 0 {
        let mut morphs = MorphTargets::new(target_names(mesh, target_count));
        if let Some(weights) = mesh.weights() {
            for (slot, weight) in morphs.weights.iter_mut().zip(weights) {
                *slot = *weight;
            }
        }
        attachment = attachment.with_morphs(morphs);
    }
    attachment
}

fn load_material(material: &gltf_dep::Material) -> Material {
    if material.index().is_none() {
        // primitive without a material: the viewer's standard surface
        return Material::new();
    }
    let pbr = material.pbr_metallic_roughness();
    let mut result = Material::new()
        .with_base_color(pbr.base_color_factor())
        .with_color_texture(pbr.base_color_texture().is_some());
    if let Some(name) = material.name() {
        result = result.with_name(name);
    }
    result.roughness = pbr.roughness_factor();
    result.metalness = pbr.metallic_factor();
    result
}

/// Local-space bounds from the POSITION accessor min/max, when declared.
fn position_bounds(primitive: &gltf_dep::Primitive) -> Option<Aabb> {
    let accessor = primitive.get(&gltf_dep::Semantic::Positions)?;
    let min = json_vec3(&accessor.min()?)?;
    let max = json_vec3(&accessor.max()?)?;
    Some(Aabb::new(min, max))
}

fn json_vec3(value: &serde_json::Value) -> Option<[f32; 3]> {
    let array = value.as_array()?;
    if array.len() < 3 {
        return None;
    }
    let mut out = [0.0f32; 3];
    for (slot, component) in out.iter_mut().zip(array) {
        *slot = component.as_f64()? as f32;
    }
    Some(out)
}

/// Morph channel names.
///
/// glTF has no channel names in the core schema; exporters write them to
/// the mesh `extras.targetNames` array. Channels past the named list fall
/// back to `morph_<i>`.
fn target_names(mesh: &gltf_dep::Mesh, count: usize) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    if let Some(raw) = mesh.extras() {
        match serde_json::from_str::<serde_json::Value>(raw.get()) {
            Ok(value) => {
                if let Some(list) = value.get("targetNames").and_then(|v| v.as_array()) {
                    names = list
                        .iter()
                        .filter_map(|v| v.as_str().map(String::from))
                        .collect();
                }
            }
            Err(e) => log::debug!("unreadable mesh extras: {e}"),
        }
    }
    names.truncate(count);
    for i in names.len()..count {
        names.push(format!("morph_{i}"));
    }
    names
}
