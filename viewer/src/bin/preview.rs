//! Headless preview: load a character, print the classification summary,
//! and run one mutation of each kind.
//!
//! Usage: `preview [model.glb]` — with no argument the configured model
//! path is used. Set `RUST_LOG=debug` for per-node detail.

use std::path::Path;
use std::process::ExitCode;

use figurine_viewer::{config, Viewer};

fn main() -> ExitCode {
    env_logger::init();

    let config = config::load_or_default(Path::new("figurine.toml"));
    let model_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.model.path.clone());

    let mut viewer = Viewer::new(config);
    if let Err(e) = viewer.load_character(Path::new(&model_path)) {
        log::error!("cannot preview {model_path}: {e}");
        return ExitCode::FAILURE;
    }

    if let Some(session) = viewer.stage().session() {
        println!("loaded {model_path}");
        println!("  nodes:          {}", session.hierarchy().len());
        println!("  skin meshes:    {}", session.skin_group().len());
        println!("  garment meshes: {}", session.garment_group().len());
        println!("  hair meshes:    {}", session.hair_group().len());
        println!("  skinned meshes: {}", session.bone_index().len());
        let mut morph_keys: Vec<&str> = session.morph_index().keys().collect();
        morph_keys.sort_unstable();
        for key in morph_keys {
            println!("  morph mesh:     {key}");
        }
    }

    // one of each mutation, to exercise the full control surface
    viewer.show_custom_hair(true);
    viewer.show_custom_garment(true);
    viewer.set_skin_color("#8d5524");
    viewer.set_garment_color("#3a6ea5");
    viewer.set_garment_weight(0.5);
    viewer.set_limb_length(2);
    println!("applied sample mutations (garment variant, tints, morph weight, limb level 2)");

    ExitCode::SUCCESS
}
