//! # Figurine Core
//!
//! Classification and live retargeting of loaded character hierarchies:
//! semantic mesh groups (skin / hair / garment), morph and bone indices by
//! name, and the mutation operations behind the viewer controls.

pub mod classify;
#[cfg(feature = "gltf")]
pub mod gltf;
pub mod material;
pub mod math;
pub mod retarget;
pub mod scene;
pub mod session;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
