//! Character model loading via glTF.
//!
//! Parses `.glb`/`.gltf` bytes into a [`Hierarchy`]: node names and
//! transforms, material slots (name, base color, texture presence), morph
//! channel names and weights, skin joint bindings, and per-mesh bounds.
//!
//! No vertex, buffer, or image data is decoded here; the classification and
//! retargeting layers only consume the document structure, and rendering is
//! someone else's job.

mod error;
mod loader;

pub use error::GltfError;

use crate::scene::Hierarchy;

/// Load a character hierarchy from glTF data.
///
/// Supports both binary glTF (`.glb`) and JSON glTF (`.gltf`). External
/// buffers are never resolved; only the document structure is read.
pub fn load_character(data: &[u8]) -> Result<Hierarchy, GltfError> {
    // Only the document structure is consumed (names, transforms, material
    // slots, bounds from accessor min/max); buffers and images are never
    // resolved, so skip completeness validation that would reject documents
    // whose accessors declare no buffer views.
    let gltf = gltf_dep::Gltf::from_slice_without_validation(data)?;
    let hierarchy = loader::build_hierarchy(&gltf.document)?;
    log::info!("loaded character hierarchy: {} nodes", hierarchy.len());
    Ok(hierarchy)
}
