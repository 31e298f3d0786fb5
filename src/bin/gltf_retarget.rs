use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use gltf_retarget::{load_and_retarget_animation_by_name, GltfAsset, NameMatchRetargeter, RetargetConfig};

const USAGE: &str =
    "usage: gltf_retarget <file.gltf|file.glb> <animation> <source-skin> <dest-skin> [config.json] [out.json]";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 4 || args.len() > 6 {
        bail!(USAGE);
    }
    let gltf_path = PathBuf::from(&args[0]);
    let animation = &args[1];
    let source_skin = &args[2];
    let dest_skin = &args[3];

    let config = match args.get(4) {
        Some(path) => RetargetConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load config {path}"))?,
        None => RetargetConfig::default(),
    };

    let asset = GltfAsset::open(&gltf_path)
        .with_context(|| format!("Failed to load glTF {}", gltf_path.display()))?;
    let source = asset
        .skeleton(source_skin)
        .with_context(|| format!("Source skin {source_skin} not found in {}", gltf_path.display()))?;
    let dest = asset
        .skeleton(dest_skin)
        .with_context(|| format!("Destination skin {dest_skin} not found in {}", gltf_path.display()))?;

    let mut solver = NameMatchRetargeter::new();
    let clip = load_and_retarget_animation_by_name(
        &asset,
        animation,
        &source,
        &dest,
        &mut solver,
        &config.retargeter,
        &config.animation,
        false,
    )
    .with_context(|| format!("Failed to retarget animation {animation}"))?;

    let json = clip.to_json().context("Failed to serialize the baked clip")?;
    match args.get(5) {
        Some(out) => {
            std::fs::write(out, json).with_context(|| format!("Failed to write {out}"))?;
            log::info!("Wrote {} tracks to {out}", clip.tracks.len());
        }
        None => println!("{json}"),
    }

    Ok(())
}
