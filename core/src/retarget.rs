//! Live retargeting operations.
//!
//! Mutations applied to a loaded character in response to viewer controls:
//! variant visibility, material tinting, morph weights, and the limb
//! "amputation ladder". Every operation is idempotent under repeated
//! identical input and fully overrides the previous state it touches.
//!
//! The policy throughout is best-effort: a missing group, node, bone, or
//! morph channel logs a warning and leaves state untouched, while sibling
//! sub-operations in the same call proceed. Malformed or absent assets must
//! never take the viewer down.

use crate::classify::{BoneIndex, MeshGroup, MorphIndex};
use crate::material::Color;
use crate::scene::{Hierarchy, NodeId};

/// Swap visibility between the default and custom variant of a group.
///
/// Two-variant groups (`custom_index: Some(_)`) show exactly one of the two
/// nodes; single-variant groups (`custom_index: None`) show or hide the one
/// node at `default_index`. An empty group or an out-of-range default index
/// is a warned no-op.
pub fn toggle_group_variant(
    hierarchy: &mut Hierarchy,
    group: &MeshGroup,
    default_index: usize,
    custom_index: Option<usize>,
    show_custom: bool,
) {
    if group.is_empty() {
        log::warn!("variant toggle on empty mesh group");
        return;
    }
    let default_id = match group.get(default_index) {
        Some(id) => id,
        None => {
            log::warn!(
                "variant toggle: index {default_index} out of range for group of {}",
                group.len()
            );
            return;
        }
    };
    match custom_index {
        None => set_visible(hierarchy, default_id, show_custom),
        Some(index) => {
            set_visible(hierarchy, default_id, !show_custom);
            match group.get(index) {
                Some(custom_id) => set_visible(hierarchy, custom_id, show_custom),
                None => log::warn!("variant toggle: group has no custom variant at index {index}"),
            }
        }
    }
}

fn set_visible(hierarchy: &mut Hierarchy, id: NodeId, visible: bool) {
    match hierarchy.node_mut(id) {
        Some(node) => node.visible = visible,
        None => log::warn!("variant toggle: stale node id {}", id.index()),
    }
}

/// Tint every material slot of every node in a group.
///
/// Untextured slots always take the flat tint; textured slots only when
/// `allow_texture_tint` is set (multiplicative tint over the texture).
/// Every visited slot is marked dirty for re-upload.
pub fn tint_group(
    hierarchy: &mut Hierarchy,
    group: &MeshGroup,
    color: Color,
    allow_texture_tint: bool,
) {
    if group.is_empty() {
        log::warn!("tint on empty mesh group");
        return;
    }
    for id in group.iter() {
        let node = match hierarchy.node_mut(id) {
            Some(node) => node,
            None => continue,
        };
        let mesh = match node.mesh.as_mut() {
            Some(mesh) => mesh,
            None => continue,
        };
        for material in &mut mesh.materials {
            if !material.has_color_texture || allow_texture_tint {
                material.set_color(color);
            }
            material.dirty = true;
        }
    }
}

/// Set one morph channel's influence weight on an indexed node.
///
/// The channel is resolved in the looked-up node's own dictionary. The
/// weight is applied as given; range enforcement belongs to the control
/// upstream. A missing node or channel is a warned no-op.
pub fn set_morph_weight(
    hierarchy: &mut Hierarchy,
    morphs: &MorphIndex,
    node_key: &str,
    channel: &str,
    weight: f32,
) {
    let id = match morphs.get(node_key) {
        Some(id) => id,
        None => {
            log::warn!("no morph mesh named {node_key:?}");
            return;
        }
    };
    let targets = hierarchy
        .node_mut(id)
        .and_then(|node| node.mesh.as_mut())
        .and_then(|mesh| mesh.morphs.as_mut());
    let targets = match targets {
        Some(targets) => targets,
        None => {
            log::warn!("morph index entry {node_key:?} points at a node without morph targets");
            return;
        }
    };
    match targets.channel(channel) {
        Some(slot) => targets.weights[slot] = weight,
        None => log::warn!("morph mesh {node_key:?} has no channel {channel:?}"),
    }
}

/// Apply a discrete limb-length level over an ordered bone chain,
/// proximal to distal.
///
/// For every skinned mesh in the index, every chain bone is first reset to
/// unit scale, then bones are zeroed from the most distal inward: the bone
/// at chain position `p` (0 = proximal) is zeroed iff `level <= p + 1`.
/// For the canonical three-bone arm chain, level 3 retracts the hand,
/// level 2 also the forearm, level 1 the whole arm, and level 4 and above
/// restores full length. The thresholds are evaluated independently, so a
/// low level zeroes several trailing bones in one call.
pub fn apply_limb_length_level(
    hierarchy: &mut Hierarchy,
    bones: &BoneIndex,
    chain: &[&str],
    level: i32,
) {
    if chain.is_empty() {
        log::warn!("limb length applied with an empty bone chain");
        return;
    }
    if bones.is_empty() {
        log::warn!("limb length applied with no skinned meshes indexed");
        return;
    }
    for (mesh_name, bone_map) in bones.entries() {
        for bone in chain {
            match bone_map.get(*bone) {
                Some(&id) => set_scale(hierarchy, id, [1.0, 1.0, 1.0]),
                None => log::warn!("skinned mesh {mesh_name:?} has no bone {bone:?}"),
            }
        }
        for position in (0..chain.len()).rev() {
            let threshold = (position + 1) as i32;
            if level <= threshold {
                if let Some(&id) = bone_map.get(chain[position]) {
                    set_scale(hierarchy, id, [0.0, 0.0, 0.0]);
                }
            }
        }
    }
}

fn set_scale(hierarchy: &mut Hierarchy, id: NodeId, scale: [f32; 3]) {
    if let Some(node) = hierarchy.node_mut(id) {
        node.transform.scale = scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify_garment, classify_hair, index_bones, index_morph_targets};
    use crate::material::Material;
    use crate::scene::{MeshAttachment, MorphTargets, SceneNode, SkinBinding};

    fn mesh_node(name: &str) -> SceneNode {
        SceneNode::new()
            .with_name(name)
            .with_mesh(MeshAttachment::new().with_materials(vec![Material::new()]))
    }

    fn garment_fixture() -> (Hierarchy, MeshGroup) {
        let mut h = Hierarchy::new();
        let root = h.add_root(SceneNode::new().with_name("root"));
        h.add_child(root, mesh_node("Shirt_Default"));
        h.add_child(root, mesh_node("Shirt_Custom"));
        let group = classify_garment(&h);
        (h, group)
    }

    #[test]
    fn toggle_on_empty_group_changes_nothing() {
        let mut h = Hierarchy::new();
        let before = h.clone();
        toggle_group_variant(&mut h, &MeshGroup::default(), 0, Some(1), true);
        assert_eq!(h, before);
    }

    #[test]
    fn two_variant_toggle_shows_exactly_one() {
        let (mut h, group) = garment_fixture();
        toggle_group_variant(&mut h, &group, 0, Some(1), true);
        assert!(!h.node(group.get(0).unwrap()).unwrap().visible);
        assert!(h.node(group.get(1).unwrap()).unwrap().visible);

        toggle_group_variant(&mut h, &group, 0, Some(1), false);
        assert!(h.node(group.get(0).unwrap()).unwrap().visible);
        assert!(!h.node(group.get(1).unwrap()).unwrap().visible);
    }

    #[test]
    fn single_variant_toggle_drives_one_node() {
        let mut h = Hierarchy::new();
        let root = h.add_root(SceneNode::new().with_name("root"));
        h.add_child(root, mesh_node("CH31_Hair001"));
        let hair = classify_hair(&h);

        toggle_group_variant(&mut h, &hair, 0, None, false);
        assert!(!h.node(hair.get(0).unwrap()).unwrap().visible);
        toggle_group_variant(&mut h, &hair, 0, None, true);
        assert!(h.node(hair.get(0).unwrap()).unwrap().visible);
    }

    #[test]
    fn tint_overwrites_previous_tint() {
        let (mut h, group) = garment_fixture();
        let c1 = Color::from_hex("#ff0000").unwrap();
        let c2 = Color::from_hex("#00ff00").unwrap();
        tint_group(&mut h, &group, c1, true);
        tint_group(&mut h, &group, c2, true);

        for id in group.iter() {
            let node = h.node(id).unwrap();
            let material = &node.mesh.as_ref().unwrap().materials[0];
            assert_eq!(material.color(), c2);
            assert!(material.dirty);
        }
    }

    #[test]
    fn tint_skips_textured_slots_unless_allowed() {
        let mut h = Hierarchy::new();
        let root = h.add_root(SceneNode::new().with_name("root"));
        let shirt = h.add_child(
            root,
            SceneNode::new().with_name("Shirt_Default").with_mesh(
                MeshAttachment::new().with_materials(vec![
                    Material::new().with_color_texture(true),
                    Material::new(),
                ]),
            ),
        );
        let group = classify_garment(&h);
        let tint = Color::from_hex("#123456").unwrap();

        tint_group(&mut h, &group, tint, false);
        let materials = &h.node(shirt).unwrap().mesh.as_ref().unwrap().materials;
        assert_eq!(materials[0].color(), Color::WHITE);
        assert!(materials[0].dirty);
        assert_eq!(materials[1].color(), tint);

        tint_group(&mut h, &group, tint, true);
        let materials = &h.node(shirt).unwrap().mesh.as_ref().unwrap().materials;
        assert_eq!(materials[0].color(), tint);
    }

    #[test]
    fn unknown_morph_channel_leaves_weights_alone() {
        let mut h = Hierarchy::new();
        let root = h.add_root(SceneNode::new().with_name("root"));
        let sweater = h.add_child(
            root,
            SceneNode::new().with_name("Sweater").with_mesh(
                MeshAttachment::new()
                    .with_morphs(MorphTargets::new(vec!["weight_sweater".into()])),
            ),
        );
        let index = index_morph_targets(&h);

        set_morph_weight(&mut h, &index, "sweater", "weight_sweater", 0.8);
        set_morph_weight(&mut h, &index, "sweater", "missing_channel", 0.3);
        set_morph_weight(&mut h, &index, "missing_mesh", "weight_sweater", 0.3);

        let morphs = h.node(sweater).unwrap().mesh.as_ref().unwrap().morphs.clone();
        assert_eq!(morphs.unwrap().weights, vec![0.8]);
    }

    fn arm_fixture() -> (Hierarchy, BoneIndex, [NodeId; 3]) {
        let mut h = Hierarchy::new();
        let root = h.add_root(SceneNode::new().with_name("Armature"));
        let upper = h.add_child(root, SceneNode::new().with_name("mixamorig9LeftArm"));
        let fore = h.add_child(upper, SceneNode::new().with_name("mixamorig9LeftForeArm"));
        let hand = h.add_child(fore, SceneNode::new().with_name("mixamorig9LeftHand"));
        h.add_child(
            root,
            mesh_node("Skin_Body").with_skin(SkinBinding {
                name: None,
                joints: vec![upper, fore, hand],
            }),
        );
        let bones = index_bones(&h);
        (h, bones, [upper, fore, hand])
    }

    const CHAIN: [&str; 3] = [
        "mixamorig9LeftArm",
        "mixamorig9LeftForeArm",
        "mixamorig9LeftHand",
    ];

    #[test]
    fn level_one_zeroes_whole_chain() {
        let (mut h, bones, joints) = arm_fixture();
        apply_limb_length_level(&mut h, &bones, &CHAIN, 1);
        for id in joints {
            assert_eq!(h.node(id).unwrap().transform.scale, [0.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn level_three_zeroes_only_the_hand() {
        let (mut h, bones, [upper, fore, hand]) = arm_fixture();
        apply_limb_length_level(&mut h, &bones, &CHAIN, 3);
        assert_eq!(h.node(upper).unwrap().transform.scale, [1.0, 1.0, 1.0]);
        assert_eq!(h.node(fore).unwrap().transform.scale, [1.0, 1.0, 1.0]);
        assert_eq!(h.node(hand).unwrap().transform.scale, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn raising_the_level_restores_unit_scale() {
        let (mut h, bones, joints) = arm_fixture();
        apply_limb_length_level(&mut h, &bones, &CHAIN, 1);
        apply_limb_length_level(&mut h, &bones, &CHAIN, 4);
        for id in joints {
            assert_eq!(h.node(id).unwrap().transform.scale, [1.0, 1.0, 1.0]);
        }
    }

    #[test]
    fn missing_chain_bone_is_skipped() {
        let (mut h, bones, [upper, fore, _]) = arm_fixture();
        let partial = ["mixamorig9LeftArm", "mixamorig9LeftForeArm", "missing_bone"];
        apply_limb_length_level(&mut h, &bones, &partial, 2);
        assert_eq!(h.node(upper).unwrap().transform.scale, [1.0, 1.0, 1.0]);
        assert_eq!(h.node(fore).unwrap().transform.scale, [0.0, 0.0, 0.0]);
    }
}
