//! Scene hierarchy data types.
//!
//! All types use plain arrays (`[f32; 3]`, `[f32; 4]`, etc.); convert to
//! math types at the boundary via the helpers in [`crate::math`].

use crate::material::Material;
use crate::math::Aabb;

/// Identifier of a node within a [`Hierarchy`](super::Hierarchy).
///
/// Plain arena index. Ids are only meaningful for the hierarchy that
/// produced them and are invalidated when a new character is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Node transform decomposed into translation, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    /// Translation [x, y, z].
    pub translation: [f32; 3],
    /// Rotation quaternion [x, y, z, w].
    pub rotation: [f32; 4],
    /// Scale [x, y, z].
    pub scale: [f32; 3],
}

impl NodeTransform {
    /// Identity transform: no translation, identity rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: [0.0, 0.0, 0.0],
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: [1.0, 1.0, 1.0],
    };

    /// Returns this transform with a different translation.
    #[must_use]
    pub const fn with_translation(mut self, translation: [f32; 3]) -> Self {
        self.translation = translation;
        self
    }

    /// Returns this transform with a different scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: [f32; 3]) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Morph target channels of a mesh.
///
/// `names` and `weights` are parallel: the influence weight of channel
/// `names[i]` is `weights[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphTargets {
    /// Channel names, in influence-slot order.
    pub names: Vec<String>,
    /// Current influence weights, one per channel.
    pub weights: Vec<f32>,
}

impl MorphTargets {
    /// Create channels with all weights at zero.
    pub fn new(names: Vec<String>) -> Self {
        let weights = vec![0.0; names.len()];
        Self { names, weights }
    }

    /// Index of a channel by exact name.
    pub fn channel(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether there are no channels.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Skeleton binding of a skinned mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinBinding {
    /// Skin name, if any.
    pub name: Option<String>,
    /// Joint nodes in skin declaration order. Joints are ordinary
    /// hierarchy nodes; limb retargeting mutates their scale.
    pub joints: Vec<NodeId>,
}

/// Renderable payload of a node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshAttachment {
    /// Material slots. Multi-primitive meshes have one entry per slot.
    pub materials: Vec<Material>,
    /// Morph target channels, if the mesh carries any.
    pub morphs: Option<MorphTargets>,
    /// Local-space bounds, if known.
    pub bounds: Option<Aabb>,
}

impl MeshAttachment {
    /// Create an attachment with no materials, morphs, or bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the material slots.
    #[must_use]
    pub fn with_materials(mut self, materials: Vec<Material>) -> Self {
        self.materials = materials;
        self
    }

    /// Set the morph target channels.
    #[must_use]
    pub fn with_morphs(mut self, morphs: MorphTargets) -> Self {
        self.morphs = Some(morphs);
        self
    }

    /// Set the local-space bounds.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Aabb) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

/// A node in a character hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    /// Node name as authored in the source asset, if any.
    pub name: Option<String>,
    /// Local transform relative to parent.
    pub transform: NodeTransform,
    /// Whether the node is drawn.
    pub visible: bool,
    /// Renderable payload, if the node carries a mesh.
    pub mesh: Option<MeshAttachment>,
    /// Skeleton binding, if the node is a skinned mesh.
    pub skin: Option<SkinBinding>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl SceneNode {
    /// Creates a new visible node with identity transform and no attachments.
    pub fn new() -> Self {
        Self {
            name: None,
            transform: NodeTransform::IDENTITY,
            visible: true,
            mesh: None,
            skin: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Set the node name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the local transform.
    #[must_use]
    pub fn with_transform(mut self, transform: NodeTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the renderable payload.
    #[must_use]
    pub fn with_mesh(mut self, mesh: MeshAttachment) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Set the skeleton binding.
    #[must_use]
    pub fn with_skin(mut self, skin: SkinBinding) -> Self {
        self.skin = Some(skin);
        self
    }

    /// Whether the node carries a mesh.
    pub fn is_renderable(&self) -> bool {
        self.mesh.is_some()
    }

    /// The node name, or `""` when unnamed.
    pub fn name_str(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Parent node id, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child node ids, in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_transform_default_is_identity() {
        let t = NodeTransform::default();
        assert_eq!(t, NodeTransform::IDENTITY);
        assert_eq!(t.scale, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn scene_node_defaults() {
        let node = SceneNode::new();
        assert!(node.name.is_none());
        assert!(node.visible);
        assert!(!node.is_renderable());
        assert_eq!(node.name_str(), "");
    }

    #[test]
    fn scene_node_builder() {
        let node = SceneNode::new()
            .with_name("Skin_Body")
            .with_mesh(MeshAttachment::new());
        assert_eq!(node.name_str(), "Skin_Body");
        assert!(node.is_renderable());
    }

    #[test]
    fn morph_channel_lookup() {
        let morphs = MorphTargets::new(vec!["weight_sweater".into(), "smile".into()]);
        assert_eq!(morphs.channel("smile"), Some(1));
        assert_eq!(morphs.channel("frown"), None);
        assert_eq!(morphs.weights, vec![0.0, 0.0]);
    }
}
