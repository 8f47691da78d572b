//! cellray - render a scene description file to an image.

mod cli;

use anyhow::{Context, Result};
use cellray_core::{load_scene, ImageBuffer};
use cellray_renderer::{RayTracer, RenderSettings};
use clap::Parser;

use crate::cli::{init_logger, is_hdr_path, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level);

    let base = match &args.settings {
        Some(path) => RenderSettings::from_json_file(path)
            .with_context(|| format!("Failed to read render settings from {}", path.display()))?,
        None => RenderSettings::default(),
    };
    let tracer = RayTracer::new(args.apply_overrides(base));

    let data = load_scene(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;
    log::info!(
        "Loaded {}: {} primitives, {} lights, {}x{}, max depth {}",
        args.scene.display(),
        data.scene.primitive_count(),
        data.scene.light_count(),
        data.width,
        data.height,
        data.max_depth
    );

    let mut image = ImageBuffer::new(data.width, data.height);
    let stats = tracer.render(&data, &mut image).context("Render failed")?;
    log::info!(
        "Grid {:.2?}, render {:.2?}, {} tiles ({:?} per worker)",
        stats.grid_build,
        stats.render,
        stats.tiles,
        stats.tiles_per_worker
    );

    let output = args.output_path(data.output_name.as_deref());
    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let saved = if is_hdr_path(&output) {
        image.save_hdr(&output, args.gamma)
    } else {
        image.save_png(&output, args.gamma)
    };
    saved.with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(())
}
