//! Viewer configuration.
//!
//! Loaded from `figurine.toml`. Every field has a default tuned to the
//! character rig the viewer ships with, so an absent or partial file still
//! yields a working setup.

use std::path::Path;

use serde::Deserialize;

/// Top-level viewer configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Character model to load.
    pub model: ModelConfig,
    /// Animation-generation service endpoint.
    pub api: ApiConfig,
    /// Bone chains driven by the limb-length control.
    pub limbs: LimbConfig,
    /// Morph channels driven by the garment-weight control.
    pub morphs: Vec<MorphBinding>,
    /// Defaults for the generate request.
    pub generate: GenerateDefaults,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            api: ApiConfig::default(),
            limbs: LimbConfig::default(),
            morphs: vec![
                MorphBinding {
                    node: "sweater".into(),
                    channel: "weight_sweater".into(),
                },
                MorphBinding {
                    node: "ch31_pants001".into(),
                    channel: "weight_sweater".into(),
                },
            ],
            generate: GenerateDefaults::default(),
        }
    }
}

/// Character model settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the model file.
    pub path: String,
    /// Uniform scale applied to the model root on load.
    pub base_scale: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "data/character.glb".into(),
            base_scale: 0.01,
        }
    }
}

/// Animation-generation service settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the service, without a trailing slash.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".into(),
        }
    }
}

/// Bone chains for limb retargeting, proximal to distal.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimbConfig {
    /// The left-arm chain the length slider drives.
    pub left_arm_chain: Vec<String>,
}

impl Default for LimbConfig {
    fn default() -> Self {
        Self {
            left_arm_chain: vec![
                "mixamorig9LeftArm".into(),
                "mixamorig9LeftForeArm".into(),
                "mixamorig9LeftHand".into(),
            ],
        }
    }
}

/// One morph channel driven by the garment-weight control.
#[derive(Debug, Clone, Deserialize)]
pub struct MorphBinding {
    /// Morph-index key of the node (lowercased node name).
    pub node: String,
    /// Channel name inside that node's own morph dictionary.
    pub channel: String,
}

/// Defaults for the generate request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerateDefaults {
    /// Participant identifier.
    pub participant: String,
    /// Movement name.
    pub movement: String,
    /// Set type (e.g. `correct`).
    pub set_type: String,
    /// Camera label.
    pub camera: String,
    /// Output frame rate.
    pub fps: u32,
    /// Output save name.
    pub save_name: String,
}

impl Default for GenerateDefaults {
    fn default() -> Self {
        Self {
            participant: "04".into(),
            movement: "squat".into(),
            set_type: "correct".into(),
            camera: "04".into(),
            fps: 30,
            save_name: "test".into(),
        }
    }
}

/// Errors from loading a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the file.
    Io(std::io::Error),
    /// Failed to parse the TOML contents.
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config: {e}"),
            Self::Parse(e) => write!(f, "failed to parse config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

/// Load a viewer config from a TOML file.
pub fn load_config(path: &Path) -> Result<ViewerConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load a viewer config, falling back to defaults when the file is absent
/// or invalid.
pub fn load_or_default(path: &Path) -> ViewerConfig {
    match load_config(path) {
        Ok(config) => {
            log::info!("loaded config from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("no config file ({e}), using defaults");
            ViewerConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_stock_rig() {
        let config = ViewerConfig::default();
        assert_eq!(config.model.base_scale, 0.01);
        assert_eq!(config.limbs.left_arm_chain.len(), 3);
        assert_eq!(config.morphs.len(), 2);
        assert_eq!(config.generate.fps, 30);
    }

    #[test]
    fn partial_toml_fills_missing_fields() {
        let config: ViewerConfig = toml::from_str(
            r#"
            [model]
            path = "assets/other.glb"

            [api]
            base_url = "http://example.com:9000"
            "#,
        )
        .unwrap();
        assert_eq!(config.model.path, "assets/other.glb");
        // unspecified within [model] falls back too
        assert_eq!(config.model.base_scale, 0.01);
        assert_eq!(config.api.base_url, "http://example.com:9000");
        assert_eq!(config.limbs.left_arm_chain[2], "mixamorig9LeftHand");
    }

    #[test]
    fn morph_bindings_can_be_replaced() {
        let config: ViewerConfig = toml::from_str(
            r#"
            [[morphs]]
            node = "hoodie"
            channel = "weight_hoodie"
            "#,
        )
        .unwrap();
        assert_eq!(config.morphs.len(), 1);
        assert_eq!(config.morphs[0].node, "hoodie");
    }
}
