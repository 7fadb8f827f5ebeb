//! Build a composite from image files.

use std::path::PathBuf;

use chrono::Local;
use photobooth_capture_engine::capture_frame;
use photobooth_common::config::AppConfig;
use photobooth_model::{EncodedFormat, FilterId, LayoutId, Shot};
use photobooth_render_engine::{download_file_name, encode, CompositeRenderer};

pub fn run(
    config: &AppConfig,
    images: Vec<PathBuf>,
    layout: Option<LayoutId>,
    filter: Option<FilterId>,
    output: Option<PathBuf>,
    format: EncodedFormat,
    quality: Option<f32>,
) -> anyhow::Result<()> {
    let layout = match layout {
        Some(id) => id,
        None => config.capture.default_layout.parse()?,
    }
    .layout();
    let filter = match filter {
        Some(id) => id,
        None => config.capture.default_filter.parse()?,
    }
    .spec();

    if images.len() > layout.shot_count as usize {
        anyhow::bail!(
            "{} images given but layout {} holds {}",
            images.len(),
            layout.id,
            layout.shot_count
        );
    }

    let renderer = CompositeRenderer::from_config(&config.composite)?;
    let metrics = renderer.metrics();
    let mut shots = Vec::with_capacity(images.len());
    for (index, path) in images.iter().enumerate() {
        let frame = image::open(path)
            .map_err(|e| anyhow::anyhow!("Failed to open {}: {e}", path.display()))?
            .to_rgba8();
        let cell = capture_frame(&frame, metrics.cell_width, metrics.cell_height)?;
        shots.push(Shot::from_image(index, &cell)?);
    }

    let today = Local::now().date_naive();
    let composite = renderer.render(&shots, layout, filter, today)?;
    let encoded = encode(&composite, super::export_options(config, format, quality))?;

    let product = &config.composite.product_name;
    let path = super::output_path(output, &download_file_name(product, today, format));
    std::fs::write(&path, &encoded.bytes)?;
    println!(
        "Wrote {} ({}x{}, {} shots, {})",
        path.display(),
        composite.width(),
        composite.height(),
        shots.len(),
        filter.label
    );
    Ok(())
}
