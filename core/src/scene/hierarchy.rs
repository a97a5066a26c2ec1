//! The node arena and traversal.

use crate::math::{mat4_from_scale_rotation_translation, quat_from_array, Aabb, Mat4, Vec3};

use super::{NodeId, SceneNode};

/// Arena of scene nodes forming one character hierarchy.
///
/// Nodes live in a flat arena and are addressed by [`NodeId`]; parent and
/// child links are ids. Depth-first pre-order over the root list defines
/// the traversal order used everywhere (classification groups record nodes
/// in this order).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hierarchy {
    nodes: Vec<SceneNode>,
    roots: Vec<NodeId>,
}

impl Hierarchy {
    /// Creates an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total node count.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the hierarchy has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root node ids, in insertion order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Add a node with no parent.
    pub fn add_root(&mut self, node: SceneNode) -> NodeId {
        let id = self.push(node, None);
        self.roots.push(id);
        id
    }

    /// Add a node as the last child of `parent`.
    ///
    /// An unknown parent id is logged and the node becomes a root instead,
    /// so a malformed build never loses nodes.
    pub fn add_child(&mut self, parent: NodeId, node: SceneNode) -> NodeId {
        if parent.0 >= self.nodes.len() {
            log::warn!("add_child with unknown parent id {}", parent.0);
            return self.add_root(node);
        }
        let id = self.push(node, Some(parent));
        self.nodes[parent.0].children.push(id);
        id
    }

    fn push(&mut self, mut node: SceneNode, parent: Option<NodeId>) -> NodeId {
        node.parent = parent;
        node.children.clear();
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    /// Mutably borrow a node.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    /// Visit every node in depth-first pre-order.
    pub fn visit(&self, mut f: impl FnMut(NodeId, &SceneNode)) {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            f(id, node);
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// Node ids in traversal order.
    pub fn traversal_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        self.visit(|id, _| order.push(id));
        order
    }

    /// World-space bounds of every renderable node with known local bounds.
    pub fn world_bounds(&self) -> Option<Aabb> {
        let mut result: Option<Aabb> = None;
        let mut stack: Vec<(NodeId, Mat4)> = self
            .roots
            .iter()
            .rev()
            .map(|&id| (id, Mat4::identity()))
            .collect();
        while let Some((id, parent_matrix)) = stack.pop() {
            let node = &self.nodes[id.0];
            let t = node.transform;
            let world = parent_matrix
                * mat4_from_scale_rotation_translation(
                    Vec3::from(t.scale),
                    quat_from_array(t.rotation),
                    Vec3::from(t.translation),
                );
            if let Some(bounds) = node.mesh.as_ref().and_then(|m| m.bounds) {
                let world_bounds = bounds.transformed(&world);
                result = Some(match result {
                    Some(acc) => acc.union(&world_bounds),
                    None => world_bounds,
                });
            }
            stack.extend(node.children.iter().rev().map(|&c| (c, world)));
        }
        result
    }

    /// Scale the roots uniformly and translate them so the model is
    /// centered on X/Z with its lowest point at `y = 0`.
    ///
    /// The original viewer applies this placement on every character load.
    /// A hierarchy with no renderable bounds is left untouched.
    pub fn fit_to_ground(&mut self, base_scale: f32) {
        if self.is_empty() {
            return;
        }
        for &root in &self.roots {
            self.nodes[root.0].transform.scale = [base_scale; 3];
        }
        let bounds = match self.world_bounds() {
            Some(b) => b,
            None => {
                log::warn!("fit_to_ground: hierarchy has no renderable bounds");
                return;
            }
        };
        let center = bounds.center();
        for &root in &self.roots {
            let t = &mut self.nodes[root.0].transform;
            t.translation[0] -= center[0];
            t.translation[1] -= center[1];
            t.translation[2] -= center[2];
            // drop the lowest vertex onto the ground plane
            t.translation[1] -= bounds.min[1] - center[1];
        }
        log::debug!(
            "fit_to_ground: scale {base_scale}, centered at {:?}, floored at y=0",
            center
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Aabb;
    use crate::scene::MeshAttachment;

    fn named(name: &str) -> SceneNode {
        SceneNode::new().with_name(name)
    }

    #[test]
    fn traversal_is_depth_first_pre_order() {
        let mut h = Hierarchy::new();
        let root = h.add_root(named("root"));
        let a = h.add_child(root, named("a"));
        h.add_child(a, named("a1"));
        h.add_child(root, named("b"));

        let names: Vec<&str> = h
            .traversal_order()
            .into_iter()
            .map(|id| h.node(id).unwrap().name_str())
            .collect();
        assert_eq!(names, ["root", "a", "a1", "b"]);
    }

    #[test]
    fn empty_hierarchy_has_no_bounds() {
        let h = Hierarchy::new();
        assert!(h.is_empty());
        assert!(h.world_bounds().is_none());
    }

    #[test]
    fn fit_to_ground_centers_and_floors() {
        let mut h = Hierarchy::new();
        let root = h.add_root(named("root"));
        h.add_child(
            root,
            SceneNode::new().with_name("Skin_Body").with_mesh(
                MeshAttachment::new().with_bounds(Aabb::new([100.0, 100.0, 100.0], [300.0, 500.0, 300.0])),
            ),
        );
        h.fit_to_ground(0.01);

        let bounds = h.world_bounds().expect("bounds after placement");
        let center = bounds.center();
        assert!(center[0].abs() < 1e-4);
        assert!(center[2].abs() < 1e-4);
        assert!(bounds.min[1].abs() < 1e-4);
        // 200x400x200 box at scale 0.01
        assert!((bounds.max[1] - 4.0).abs() < 1e-4);
    }

    #[test]
    fn unknown_parent_falls_back_to_root() {
        let mut h = Hierarchy::new();
        let id = h.add_child(NodeId(42), named("orphan"));
        assert_eq!(h.roots().len(), 1);
        assert_eq!(h.roots()[0], id);
    }
}
