//! Character hierarchy data types and traversal.
//!
//! A loaded character is a [`Hierarchy`]: an arena of [`SceneNode`]s
//! addressed by [`NodeId`]. Derived structures (mesh groups, morph and bone
//! indices) hold node ids, never references, so their lifetime is tied to
//! the session that owns the hierarchy.
//!
//! - [`Hierarchy`] — node arena with depth-first traversal
//! - [`SceneNode`] — one node: name, transform, visibility, attachments
//! - [`NodeTransform`] — TRS transform using plain arrays
//! - [`MeshAttachment`] / [`MorphTargets`] — renderable payload
//! - [`SkinBinding`] — skeleton joints of a skinned mesh

mod hierarchy;
mod types;

pub use hierarchy::Hierarchy;
pub use types::{MeshAttachment, MorphTargets, NodeId, NodeTransform, SceneNode, SkinBinding};
