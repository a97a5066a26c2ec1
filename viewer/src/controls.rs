//! Viewer control surface.
//!
//! One method per control of the character page: hair and garment variant
//! toggles, skin and garment color pickers, the limb-length slider, the
//! garment-weight slider, and the generate button. Controls invoked with
//! no character loaded warn and do nothing, matching the best-effort
//! policy of the retargeting layer.

use std::path::Path;
use std::sync::mpsc::Receiver;

use figurine_core::gltf::GltfError;
use figurine_core::material::Color;
use figurine_core::session::{CharacterSession, CharacterStage, SessionState};

use crate::config::ViewerConfig;
use crate::generate::{GenerateClient, GenerateError, GenerateRequest, GenerateResponse};

/// Errors surfaced by [`Viewer::load_character`].
#[derive(Debug)]
pub enum LoadError {
    /// Failed to read the model file.
    Io(std::io::Error),
    /// Failed to parse the model document.
    Gltf(GltfError),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read model: {e}"),
            Self::Gltf(e) => write!(f, "failed to load model: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Gltf(e) => Some(e),
        }
    }
}

/// The viewer: configuration, the single character stage, and the
/// generation client.
#[derive(Debug)]
pub struct Viewer {
    config: ViewerConfig,
    stage: CharacterStage,
    client: GenerateClient,
}

impl Viewer {
    /// Create a viewer from a configuration.
    pub fn new(config: ViewerConfig) -> Self {
        let client = GenerateClient::new(config.api.base_url.clone());
        Self {
            config,
            stage: CharacterStage::new(),
            client,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// The character stage.
    pub fn stage(&self) -> &CharacterStage {
        &self.stage
    }

    /// Load a character model from disk, replacing any current session.
    ///
    /// On failure the stage is left `Unloaded` and the error is returned
    /// for the caller's status surface; nothing panics.
    pub fn load_character(&mut self, path: &Path) -> Result<(), LoadError> {
        self.stage.begin_load();
        let loaded = std::fs::read(path)
            .map_err(LoadError::Io)
            .and_then(|data| figurine_core::gltf::load_character(&data).map_err(LoadError::Gltf));
        match loaded {
            Ok(mut hierarchy) => {
                hierarchy.fit_to_ground(self.config.model.base_scale);
                self.stage.finish_load(hierarchy);
                log::info!("character loaded from {}", path.display());
                Ok(())
            }
            Err(e) => {
                self.stage.fail_load(&e);
                Err(e)
            }
        }
    }

    /// Show or hide the custom hair.
    pub fn show_custom_hair(&mut self, show: bool) {
        if let Some(session) = loaded_session(&mut self.stage) {
            session.set_hair_visible(show);
        }
    }

    /// Swap between the default and custom garment.
    pub fn show_custom_garment(&mut self, show: bool) {
        if let Some(session) = loaded_session(&mut self.stage) {
            session.set_garment_variant(show);
        }
    }

    /// Tint the skin from a hex color string.
    pub fn set_skin_color(&mut self, hex: &str) {
        if let Some(color) = parse_color(hex) {
            if let Some(session) = loaded_session(&mut self.stage) {
                session.tint_skin(color, true);
            }
        }
    }

    /// Tint the garment from a hex color string.
    pub fn set_garment_color(&mut self, hex: &str) {
        if let Some(color) = parse_color(hex) {
            if let Some(session) = loaded_session(&mut self.stage) {
                session.tint_garment(color, true);
            }
        }
    }

    /// Apply a limb-length level over the configured left-arm chain.
    pub fn set_limb_length(&mut self, level: i32) {
        let chain: Vec<&str> = self
            .config
            .limbs
            .left_arm_chain
            .iter()
            .map(String::as_str)
            .collect();
        if let Some(session) = loaded_session(&mut self.stage) {
            session.apply_limb_length(&chain, level);
        }
    }

    /// Drive every configured morph binding with one weight.
    pub fn set_garment_weight(&mut self, weight: f32) {
        let session = match loaded_session(&mut self.stage) {
            Some(session) => session,
            None => return,
        };
        for binding in &self.config.morphs {
            session.set_morph_weight(&binding.node, &binding.channel, weight);
        }
    }

    /// Fire the configured generation request.
    ///
    /// Returns the result receiver, or `Err(Busy)` while a previous
    /// request is still in flight.
    pub fn generate(
        &self,
    ) -> Result<Receiver<Result<GenerateResponse, GenerateError>>, GenerateError> {
        let defaults = &self.config.generate;
        let request = GenerateRequest {
            participant: defaults.participant.clone(),
            movement: defaults.movement.clone(),
            set_type: defaults.set_type.clone(),
            camera: defaults.camera.clone(),
            fps: defaults.fps,
            save_name: defaults.save_name.clone(),
        };
        self.client.submit(request)
    }

    /// Whether a generation request is in flight (disable the button).
    pub fn is_generating(&self) -> bool {
        self.client.is_busy()
    }
}

fn loaded_session(stage: &mut CharacterStage) -> Option<&mut CharacterSession> {
    if stage.state() != SessionState::Loaded {
        log::warn!("control ignored: no character loaded");
    }
    stage.session_mut()
}

fn parse_color(hex: &str) -> Option<Color> {
    match Color::from_hex(hex) {
        Ok(color) => Some(color),
        Err(e) => {
            log::warn!("ignoring color {hex:?}: {e}");
            None
        }
    }
}
