//! Canvas and cell geometry for composites.
//!
//! All values are integer output pixels. A composite is a grid of fixed-size
//! cells surrounded by padding, separated by gaps, with a label band under
//! the grid for the watermark.

use photobooth_common::config::CompositeConfig;
use serde::{Deserialize, Serialize};

use crate::layout::Layout;

/// An axis-aligned rectangle in output pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    pub fn intersects(&self, other: &PixelRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Fixed metrics shared by every composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasMetrics {
    pub cell_width: u32,
    pub cell_height: u32,
    pub padding: u32,
    pub gap: u32,
    pub label_height: u32,
}

impl Default for CanvasMetrics {
    fn default() -> Self {
        Self {
            cell_width: 480,
            cell_height: 360,
            padding: 20,
            gap: 10,
            label_height: 48,
        }
    }
}

impl From<&CompositeConfig> for CanvasMetrics {
    fn from(config: &CompositeConfig) -> Self {
        Self {
            cell_width: config.cell_width.max(1),
            cell_height: config.cell_height.max(1),
            padding: config.padding,
            gap: config.gap,
            label_height: config.label_height,
        }
    }
}

impl CanvasMetrics {
    /// Full canvas size `(width, height)` for a layout.
    pub fn canvas_size(&self, layout: &Layout) -> (u32, u32) {
        let (grid_w, grid_h) = self.grid_size(layout);
        (
            self.padding * 2 + grid_w,
            self.padding * 2 + grid_h + self.label_height,
        )
    }

    /// Size of the photo grid alone, without padding or label band.
    pub fn grid_size(&self, layout: &Layout) -> (u32, u32) {
        let cols = layout.columns;
        let rows = layout.rows;
        (
            cols * self.cell_width + cols.saturating_sub(1) * self.gap,
            rows * self.cell_height + rows.saturating_sub(1) * self.gap,
        )
    }

    /// Placement of the cell holding shot `index`.
    ///
    /// Cells fill row by row: `col = index mod cols`, `row = index div cols`.
    pub fn cell_rect(&self, layout: &Layout, index: usize) -> PixelRect {
        let cols = layout.columns.max(1) as usize;
        let col = (index % cols) as u32;
        let row = (index / cols) as u32;
        PixelRect::new(
            self.padding + col * (self.cell_width + self.gap),
            self.padding + row * (self.cell_height + self.gap),
            self.cell_width,
            self.cell_height,
        )
    }

    /// The band under the grid where the watermark is drawn.
    pub fn label_band(&self, layout: &Layout) -> PixelRect {
        let (width, height) = self.canvas_size(layout);
        PixelRect::new(
            0,
            height - self.label_height,
            width,
            self.label_height,
        )
    }

    /// Watermark font size in pixels: larger on multi-column canvases.
    pub fn watermark_font_px(&self, layout: &Layout) -> u32 {
        if layout.columns > 1 {
            14
        } else {
            12
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutId, LAYOUTS};
    use proptest::prelude::*;

    #[test]
    fn test_strip3_canvas_size() {
        let metrics = CanvasMetrics::default();
        let size = metrics.canvas_size(LayoutId::Strip3.layout());
        assert_eq!(size, (2 * 20 + 480, 2 * 20 + 3 * 360 + 2 * 10 + 48));
        assert_eq!(size, (520, 1188));
    }

    #[test]
    fn test_grid4_cell_placement() {
        let metrics = CanvasMetrics::default();
        let grid = LayoutId::Grid4.layout();
        assert_eq!(metrics.cell_rect(grid, 0), PixelRect::new(20, 20, 480, 360));
        assert_eq!(metrics.cell_rect(grid, 1), PixelRect::new(510, 20, 480, 360));
        assert_eq!(metrics.cell_rect(grid, 2), PixelRect::new(20, 390, 480, 360));
        assert_eq!(metrics.cell_rect(grid, 3), PixelRect::new(510, 390, 480, 360));
    }

    #[test]
    fn test_watermark_font_size() {
        let metrics = CanvasMetrics::default();
        assert_eq!(metrics.watermark_font_px(LayoutId::Strip4.layout()), 12);
        assert_eq!(metrics.watermark_font_px(LayoutId::Wide4.layout()), 14);
    }

    #[test]
    fn test_label_band_sits_under_grid() {
        let metrics = CanvasMetrics::default();
        for layout in &LAYOUTS {
            let band = metrics.label_band(layout);
            let (w, h) = metrics.canvas_size(layout);
            assert_eq!(band.width, w);
            assert_eq!(band.bottom(), h);
            for i in 0..layout.shot_count as usize {
                assert!(!metrics.cell_rect(layout, i).intersects(&band));
            }
        }
    }

    proptest! {
        #[test]
        fn prop_cells_stay_inside_canvas_and_never_overlap(
            layout_idx in 0usize..LAYOUTS.len(),
            cell_width in 1u32..800,
            cell_height in 1u32..800,
            padding in 0u32..64,
            gap in 0u32..64,
            label_height in 0u32..96,
        ) {
            let layout = &LAYOUTS[layout_idx];
            let metrics = CanvasMetrics { cell_width, cell_height, padding, gap, label_height };
            let (w, h) = metrics.canvas_size(layout);
            let cells: Vec<_> = (0..layout.shot_count as usize)
                .map(|i| metrics.cell_rect(layout, i))
                .collect();

            for (i, cell) in cells.iter().enumerate() {
                prop_assert!(cell.right() + padding <= w);
                prop_assert!(cell.bottom() + padding + label_height <= h);
                for other in &cells[i + 1..] {
                    prop_assert!(!cell.intersects(other));
                }
            }
        }
    }
}
