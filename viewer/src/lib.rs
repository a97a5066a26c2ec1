//! # Figurine Viewer
//!
//! The application layer around `figurine-core`: TOML configuration, the
//! control surface mapping discrete UI events onto the live character
//! session, and the fire-and-forget client for the animation-generation
//! service.

pub mod config;
pub mod controls;
pub mod generate;

pub use config::{load_or_default, ViewerConfig};
pub use controls::Viewer;
pub use generate::{GenerateClient, GenerateRequest};
