//! Composite renderer: lays out shots on the canvas, applies the filter to
//! each cell, and stamps the watermark.
//!
//! Rendering is a pure function of its inputs. The only time-dependent part
//! is the watermark date, which the caller passes in.

use chrono::NaiveDate;
use image::{imageops, Rgba, RgbaImage};
use photobooth_common::config::CompositeConfig;
use photobooth_common::error::{BoothError, BoothResult};
use photobooth_model::{CanvasMetrics, FilterSpec, Layout, PixelRect, Rgb, Shot};

use crate::filters::{apply_passes, cell_passes};
use crate::watermark::{draw_watermark, watermark_text, WatermarkStyle};

/// Colors and watermark used for every composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeStyle {
    pub background: Rgb,
    pub border: Rgb,
    /// `None` renders without a watermark.
    pub watermark: Option<WatermarkStyle>,
}

impl Default for CompositeStyle {
    fn default() -> Self {
        Self {
            background: Rgb::WHITE,
            border: Rgb::new(0xe0, 0xe0, 0xe0),
            watermark: Some(WatermarkStyle {
                product_name: "LJR Photobooth".to_string(),
                color: Rgb::new(0xaa, 0xaa, 0xaa),
            }),
        }
    }
}

impl CompositeStyle {
    pub fn from_config(config: &CompositeConfig) -> BoothResult<Self> {
        Ok(Self {
            background: Rgb::from_hex(&config.background)?,
            border: Rgb::from_hex(&config.border)?,
            watermark: Some(WatermarkStyle {
                product_name: config.product_name.clone(),
                color: Rgb::from_hex(&config.watermark_color)?,
            }),
        })
    }
}

/// Renders composites with fixed metrics and style.
#[derive(Debug, Clone, Default)]
pub struct CompositeRenderer {
    metrics: CanvasMetrics,
    style: CompositeStyle,
}

impl CompositeRenderer {
    pub fn new(metrics: CanvasMetrics, style: CompositeStyle) -> Self {
        Self { metrics, style }
    }

    pub fn from_config(config: &CompositeConfig) -> BoothResult<Self> {
        Ok(Self::new(
            CanvasMetrics::from(config),
            CompositeStyle::from_config(config)?,
        ))
    }

    pub fn metrics(&self) -> &CanvasMetrics {
        &self.metrics
    }

    pub fn style(&self) -> &CompositeStyle {
        &self.style
    }

    /// Render `shots` into a composite for `layout`.
    ///
    /// `date` is the local date printed in the watermark. Every shot is
    /// decoded before anything is drawn, so a corrupt shot aborts the render
    /// with [`BoothError::ImageDecodeFailed`] and produces no partial output.
    /// Cells without a shot stay blank.
    pub fn render(
        &self,
        shots: &[Shot],
        layout: &Layout,
        filter: &FilterSpec,
        date: NaiveDate,
    ) -> BoothResult<RgbaImage> {
        if shots.len() > layout.shot_count as usize {
            return Err(BoothError::render(format!(
                "{} shots do not fit layout {} ({} cells)",
                shots.len(),
                layout.id,
                layout.shot_count
            )));
        }

        let cells = self.decode_cells(shots)?;

        let (width, height) = self.metrics.canvas_size(layout);
        let mut canvas = RgbaImage::from_pixel(width, height, Rgba(self.style.background.to_rgba()));
        draw_border(&mut canvas, self.style.border);

        let passes = cell_passes(filter);
        for (index, mut cell) in cells.into_iter().enumerate() {
            let rect = self.metrics.cell_rect(layout, index);
            apply_passes(&mut cell, &passes);
            imageops::replace(&mut canvas, &cell, i64::from(rect.x), i64::from(rect.y));
        }

        if let Some(watermark) = &self.style.watermark {
            let band = self.metrics.label_band(layout);
            let text = watermark_text(&watermark.product_name, date);
            draw_watermark(
                &mut canvas,
                band,
                &text,
                self.metrics.watermark_font_px(layout),
                watermark.color,
            )?;
        }

        tracing::debug!(
            layout = %layout.id,
            filter = %filter.id,
            shots = shots.len(),
            width,
            height,
            "rendered composite"
        );
        Ok(canvas)
    }

    /// Decode every shot at exactly the cell size.
    fn decode_cells(&self, shots: &[Shot]) -> BoothResult<Vec<RgbaImage>> {
        let (cw, ch) = (self.metrics.cell_width, self.metrics.cell_height);
        shots
            .iter()
            .map(|shot| {
                let image = shot.decode()?;
                if image.dimensions() == (cw, ch) {
                    Ok(image)
                } else {
                    Ok(imageops::resize(&image, cw, ch, imageops::FilterType::Triangle))
                }
            })
            .collect()
    }

    /// Where shot `index` lands on the canvas.
    pub fn cell_rect(&self, layout: &Layout, index: usize) -> PixelRect {
        self.metrics.cell_rect(layout, index)
    }
}

/// One pixel ring around the canvas edge.
fn draw_border(canvas: &mut RgbaImage, color: Rgb) {
    let (w, h) = canvas.dimensions();
    if w == 0 || h == 0 {
        return;
    }
    let px = Rgba(color.to_rgba());
    for x in 0..w {
        canvas.put_pixel(x, 0, px);
        canvas.put_pixel(x, h - 1, px);
    }
    for y in 0..h {
        canvas.put_pixel(0, y, px);
        canvas.put_pixel(w - 1, y, px);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photobooth_model::{FilterId, LayoutId};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn solid_shot(index: usize, color: [u8; 4], w: u32, h: u32) -> Shot {
        Shot::from_image(index, &RgbaImage::from_pixel(w, h, Rgba(color))).unwrap()
    }

    fn plain_renderer() -> CompositeRenderer {
        CompositeRenderer::new(
            CanvasMetrics::default(),
            CompositeStyle {
                watermark: None,
                ..CompositeStyle::default()
            },
        )
    }

    #[test]
    fn test_strip3_canvas_and_placement() {
        let renderer = plain_renderer();
        let shots: Vec<_> = (0..3)
            .map(|i| solid_shot(i, [10 * i as u8 + 50, 0, 0, 255], 480, 360))
            .collect();
        let out = renderer
            .render(&shots, LayoutId::Strip3.layout(), FilterId::Normal.spec(), date())
            .unwrap();

        assert_eq!(out.dimensions(), (520, 1188));
        assert_eq!(*out.get_pixel(20, 20), Rgba([50, 0, 0, 255]));
        assert_eq!(*out.get_pixel(20, 390), Rgba([60, 0, 0, 255]));
        assert_eq!(*out.get_pixel(499, 1119), Rgba([70, 0, 0, 255]));
        // Gap between cells stays background.
        assert_eq!(*out.get_pixel(200, 385), Rgba([255, 255, 255, 255]));
        // Border ring.
        assert_eq!(*out.get_pixel(0, 0), Rgba([0xe0, 0xe0, 0xe0, 255]));
        assert_eq!(*out.get_pixel(519, 1187), Rgba([0xe0, 0xe0, 0xe0, 255]));
    }

    #[test]
    fn test_unfilled_cells_stay_blank() {
        let renderer = plain_renderer();
        let shots = vec![solid_shot(0, [0, 0, 0, 255], 480, 360)];
        let grid = LayoutId::Grid4.layout();
        let out = renderer
            .render(&shots, grid, FilterId::Normal.spec(), date())
            .unwrap();
        let last = renderer.cell_rect(grid, 3);
        assert_eq!(*out.get_pixel(last.x + 5, last.y + 5), Rgba([255, 255, 255, 255]));
        assert_eq!(*out.get_pixel(25, 25), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_mismatched_shot_is_scaled_to_cell() {
        let renderer = plain_renderer();
        let shots = vec![solid_shot(0, [0, 128, 0, 255], 64, 48)];
        let out = renderer
            .render(&shots, LayoutId::Single.layout(), FilterId::Normal.spec(), date())
            .unwrap();
        assert_eq!(*out.get_pixel(20, 20), Rgba([0, 128, 0, 255]));
        assert_eq!(*out.get_pixel(499, 379), Rgba([0, 128, 0, 255]));
    }

    #[test]
    fn test_corrupt_shot_aborts_render() {
        let renderer = plain_renderer();
        let shots = vec![
            solid_shot(0, [0, 0, 0, 255], 480, 360),
            Shot::from_encoded(1, b"garbage".to_vec()),
        ];
        let err = renderer
            .render(&shots, LayoutId::Strip3.layout(), FilterId::Normal.spec(), date())
            .unwrap_err();
        assert!(matches!(err, BoothError::ImageDecodeFailed { index: 1, .. }));
    }

    #[test]
    fn test_too_many_shots_is_rejected() {
        let renderer = plain_renderer();
        let shots: Vec<_> = (0..2).map(|i| solid_shot(i, [0, 0, 0, 255], 480, 360)).collect();
        assert!(renderer
            .render(&shots, LayoutId::Single.layout(), FilterId::Normal.spec(), date())
            .is_err());
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = CompositeRenderer::default();
        let shots: Vec<_> = (0..4)
            .map(|i| solid_shot(i, [40 * i as u8, 90, 200, 255], 480, 360))
            .collect();
        let layout = LayoutId::Wide4.layout();
        let a = renderer
            .render(&shots, layout, FilterId::Vintage.spec(), date())
            .unwrap();
        let b = renderer
            .render(&shots, layout, FilterId::Vintage.spec(), date())
            .unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_duotone_is_confined_to_cells() {
        let renderer = plain_renderer();
        let shots = vec![solid_shot(0, [255, 255, 255, 255], 480, 360)];
        let out = renderer
            .render(&shots, LayoutId::Single.layout(), FilterId::Duotone.spec(), date())
            .unwrap();
        // Inside the cell the gradient tints white toward blue.
        let inside = out.get_pixel(22, 22);
        assert!(inside[2] > 200 && inside[0] < 40);
        // Padding is untouched.
        assert_eq!(*out.get_pixel(10, 10), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_watermark_never_touches_photo_area() {
        let shots: Vec<_> = (0..4)
            .map(|i| solid_shot(i, [30, 60, 90, 255], 480, 360))
            .collect();
        let layout = LayoutId::Grid4.layout();
        let with = CompositeRenderer::default()
            .render(&shots, layout, FilterId::Normal.spec(), date())
            .unwrap();
        let without = plain_renderer()
            .render(&shots, layout, FilterId::Normal.spec(), date())
            .unwrap();

        let band = CanvasMetrics::default().label_band(layout);
        for (x, y, px) in with.enumerate_pixels() {
            if !band.contains(x, y) {
                assert_eq!(px, without.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn test_style_from_config() {
        let config = CompositeConfig::default();
        let style = CompositeStyle::from_config(&config).unwrap();
        assert_eq!(style, CompositeStyle::default());

        let bad = CompositeConfig {
            border: "nope".into(),
            ..CompositeConfig::default()
        };
        assert!(CompositeStyle::from_config(&bad).is_err());
    }
}
