//! List layouts and filters.

use photobooth_common::config::AppConfig;
use photobooth_model::{CanvasMetrics, FILTERS, LAYOUTS};

pub fn layouts(config: &AppConfig) {
    let metrics = CanvasMetrics::from(&config.composite);
    println!("{:<8} {:<16} {:>5} {:>6} {:>11}", "ID", "LABEL", "SHOTS", "GRID", "CANVAS");
    for layout in &LAYOUTS {
        let (w, h) = metrics.canvas_size(layout);
        println!(
            "{:<8} {:<16} {:>5} {:>6} {:>11}",
            layout.id.as_str(),
            layout.label,
            layout.shot_count,
            format!("{}x{}", layout.columns, layout.rows),
            format!("{w}x{h}"),
        );
    }
}

pub fn filters() {
    println!("{:<10} {:<8} PREVIEW", "ID", "LABEL");
    for filter in &FILTERS {
        println!("{:<10} {:<8} {}", filter.id.as_str(), filter.label, filter.preview_css());
    }
}
