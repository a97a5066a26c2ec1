//! Character session lifecycle.
//!
//! Exactly one character is live at a time. The [`CharacterStage`] owns the
//! session slot and the `Unloaded -> Loading -> Loaded` state machine;
//! starting a new load always drops the previous session first, and a
//! failed load returns to `Unloaded` with no partial state. There is no
//! error terminal state: load failures are diagnostics, not crashes.

use crate::classify::{self, BoneIndex, MeshGroup, MorphIndex};
use crate::material::Color;
use crate::retarget;
use crate::scene::Hierarchy;

/// Load state of the character stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No character loaded.
    #[default]
    Unloaded,
    /// A load has started and not yet completed.
    Loading,
    /// A character is loaded and its session is live.
    Loaded,
}

/// A loaded character: the hierarchy plus every derived structure.
///
/// The groups and indices are computed once in [`CharacterSession::build`]
/// and stay fixed for the session's lifetime, even as operations mutate
/// node visibility, materials, and bone scales underneath them.
#[derive(Debug)]
pub struct CharacterSession {
    hierarchy: Hierarchy,
    skin: MeshGroup,
    garment: MeshGroup,
    hair: MeshGroup,
    morphs: MorphIndex,
    bones: BoneIndex,
}

impl CharacterSession {
    /// Classify a freshly loaded hierarchy into a session.
    pub fn build(hierarchy: Hierarchy) -> Self {
        let skin = classify::classify_skin(&hierarchy);
        let garment = classify::classify_garment(&hierarchy);
        let hair = classify::classify_hair(&hierarchy);
        let morphs = classify::index_morph_targets(&hierarchy);
        let bones = classify::index_bones(&hierarchy);
        log::info!(
            "classified character: {} skin, {} garment, {} hair, {} morph meshes, {} skinned meshes",
            skin.len(),
            garment.len(),
            hair.len(),
            morphs.len(),
            bones.len()
        );
        Self {
            hierarchy,
            skin,
            garment,
            hair,
            morphs,
            bones,
        }
    }

    /// The owned hierarchy.
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// Mutable access to the owned hierarchy.
    pub fn hierarchy_mut(&mut self) -> &mut Hierarchy {
        &mut self.hierarchy
    }

    /// The skin mesh group.
    pub fn skin_group(&self) -> &MeshGroup {
        &self.skin
    }

    /// The garment mesh group.
    pub fn garment_group(&self) -> &MeshGroup {
        &self.garment
    }

    /// The hair mesh group.
    pub fn hair_group(&self) -> &MeshGroup {
        &self.hair
    }

    /// The morph-target index.
    pub fn morph_index(&self) -> &MorphIndex {
        &self.morphs
    }

    /// The bone index.
    pub fn bone_index(&self) -> &BoneIndex {
        &self.bones
    }

    /// Show or hide the hair mesh.
    pub fn set_hair_visible(&mut self, visible: bool) {
        retarget::toggle_group_variant(&mut self.hierarchy, &self.hair, 0, None, visible);
    }

    /// Swap between the default and custom garment variant.
    ///
    /// Falls back to a single-variant toggle when the garment group has
    /// only one entry.
    pub fn set_garment_variant(&mut self, show_custom: bool) {
        let custom_index = if self.garment.len() > 1 { Some(1) } else { None };
        retarget::toggle_group_variant(&mut self.hierarchy, &self.garment, 0, custom_index, show_custom);
    }

    /// Tint every skin material.
    pub fn tint_skin(&mut self, color: Color, allow_texture_tint: bool) {
        retarget::tint_group(&mut self.hierarchy, &self.skin, color, allow_texture_tint);
    }

    /// Tint every garment material. Color state is independent of the skin
    /// tint.
    pub fn tint_garment(&mut self, color: Color, allow_texture_tint: bool) {
        retarget::tint_group(&mut self.hierarchy, &self.garment, color, allow_texture_tint);
    }

    /// Set one morph channel's weight by node key and channel name.
    pub fn set_morph_weight(&mut self, node_key: &str, channel: &str, weight: f32) {
        retarget::set_morph_weight(&mut self.hierarchy, &self.morphs, node_key, channel, weight);
    }

    /// Apply a limb-length level over a bone chain.
    pub fn apply_limb_length(&mut self, chain: &[&str], level: i32) {
        retarget::apply_limb_length_level(&mut self.hierarchy, &self.bones, chain, level);
    }
}

/// Owner of the single live session and its load state machine.
#[derive(Debug, Default)]
pub struct CharacterStage {
    state: SessionState,
    session: Option<CharacterSession>,
}

impl CharacterStage {
    /// Creates an empty stage in the `Unloaded` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current load state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The live session, if one is loaded.
    pub fn session(&self) -> Option<&CharacterSession> {
        self.session.as_ref()
    }

    /// Mutable access to the live session, if one is loaded.
    pub fn session_mut(&mut self) -> Option<&mut CharacterSession> {
        self.session.as_mut()
    }

    /// Begin loading a new character, detaching any previous session.
    ///
    /// A load started while another is in flight replaces it; the older
    /// load's eventual result must be discarded by the caller.
    pub fn begin_load(&mut self) {
        if self.state == SessionState::Loading {
            log::warn!("character load restarted while another load was in flight");
        }
        if self.session.take().is_some() {
            log::info!("detached previous character session");
        }
        self.state = SessionState::Loading;
    }

    /// Complete a load: classify the hierarchy and install the session.
    pub fn finish_load(&mut self, hierarchy: Hierarchy) -> &mut CharacterSession {
        self.state = SessionState::Loaded;
        self.session.insert(CharacterSession::build(hierarchy))
    }

    /// Abort a load, returning to `Unloaded` with no partial state.
    pub fn fail_load(&mut self, error: impl std::fmt::Display) {
        log::warn!("character load failed: {error}");
        self.session = None;
        self.state = SessionState::Unloaded;
    }

    /// Drop the live session, if any.
    pub fn unload(&mut self) {
        self.session = None;
        self.state = SessionState::Unloaded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::scene::{MeshAttachment, SceneNode};

    fn mesh_node(name: &str) -> SceneNode {
        SceneNode::new()
            .with_name(name)
            .with_mesh(MeshAttachment::new().with_materials(vec![Material::new()]))
    }

    fn character_hierarchy() -> Hierarchy {
        let mut h = Hierarchy::new();
        let root = h.add_root(SceneNode::new().with_name("root"));
        h.add_child(root, mesh_node("Skin_Body"));
        h.add_child(root, mesh_node("Shirt_Default"));
        h.add_child(root, mesh_node("Shirt_Custom"));
        h.add_child(root, mesh_node("CH31_Hair001"));
        h
    }

    #[test]
    fn stage_walks_the_state_machine() {
        let mut stage = CharacterStage::new();
        assert_eq!(stage.state(), SessionState::Unloaded);

        stage.begin_load();
        assert_eq!(stage.state(), SessionState::Loading);
        assert!(stage.session().is_none());

        stage.finish_load(character_hierarchy());
        assert_eq!(stage.state(), SessionState::Loaded);
        assert!(stage.session().is_some());
    }

    #[test]
    fn failed_load_leaves_no_partial_state() {
        let mut stage = CharacterStage::new();
        stage.begin_load();
        stage.fail_load("model file missing");
        assert_eq!(stage.state(), SessionState::Unloaded);
        assert!(stage.session().is_none());
    }

    #[test]
    fn new_load_detaches_previous_session() {
        let mut stage = CharacterStage::new();
        stage.begin_load();
        stage.finish_load(character_hierarchy());

        stage.begin_load();
        assert_eq!(stage.state(), SessionState::Loading);
        assert!(stage.session().is_none());
    }

    #[test]
    fn end_to_end_toggle_and_tint() {
        let mut stage = CharacterStage::new();
        stage.begin_load();
        let session = stage.finish_load(character_hierarchy());

        session.set_garment_variant(true);
        let garment = session.garment_group().clone();
        assert!(!session.hierarchy().node(garment.get(0).unwrap()).unwrap().visible);
        assert!(session.hierarchy().node(garment.get(1).unwrap()).unwrap().visible);

        let tint = Color::from_hex("#8d5524").unwrap();
        session.tint_skin(tint, true);
        let skin_id = session.skin_group().get(0).unwrap();
        let node = session.hierarchy().node(skin_id).unwrap();
        assert_eq!(node.mesh.as_ref().unwrap().materials[0].color(), tint);
        assert_eq!(node.name_str(), "Skin_Body");
    }
}
