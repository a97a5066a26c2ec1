//! Error types for character loading.

/// Errors that can occur while loading a character document.
#[derive(Debug)]
pub enum GltfError {
    /// Failed to parse the glTF document.
    Parse(gltf_dep::Error),
    /// The document contains no scene to instantiate.
    NoScene,
}

impl std::fmt::Display for GltfError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "glTF parse error: {e}"),
            Self::NoScene => write!(f, "document has no scene"),
        }
    }
}

impl std::error::Error for GltfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::NoScene => None,
        }
    }
}

impl From<gltf_dep::Error> for GltfError {
    fn from(e: gltf_dep::Error) -> Self {
        Self::Parse(e)
    }
}
