//! Per-pixel color filters.
//!
//! Every [`ColorOp`] is a 3x3 color matrix plus an offset, applied to
//! normalized RGB in the order the filter lists them. Results are clamped to
//! `[0, 1]` after each operation so chains behave like the equivalent CSS
//! filter chain. Alpha is left untouched.

use image::{Rgba, RgbaImage};
use photobooth_model::{ColorOp, ColorOpKind, Duotone, FilterSpec, Rgb, TransformDescriptor};

/// Luminance weights used by grayscale.
const LUMA: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// One compiled color operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix {
    m: [[f32; 3]; 3],
    offset: [f32; 3],
}

impl ColorMatrix {
    pub fn for_op(op: &ColorOp) -> Self {
        match op.kind {
            ColorOpKind::Grayscale => Self::grayscale(op.amount),
            ColorOpKind::Sepia => Self::sepia(op.amount),
            ColorOpKind::HueRotate => Self::hue_rotate(op.amount),
            ColorOpKind::Saturate => Self::saturate(op.amount),
            ColorOpKind::Contrast => Self::contrast(op.amount),
            ColorOpKind::Brightness => Self::brightness(op.amount),
        }
    }

    pub fn grayscale(amount: f32) -> Self {
        let s = 1.0 - amount.clamp(0.0, 1.0);
        Self::linear([
            [LUMA[0] + 0.7874 * s, LUMA[1] - LUMA[1] * s, LUMA[2] - LUMA[2] * s],
            [LUMA[0] - LUMA[0] * s, LUMA[1] + 0.2848 * s, LUMA[2] - LUMA[2] * s],
            [LUMA[0] - LUMA[0] * s, LUMA[1] - LUMA[1] * s, LUMA[2] + 0.9278 * s],
        ])
    }

    pub fn sepia(amount: f32) -> Self {
        let s = 1.0 - amount.clamp(0.0, 1.0);
        Self::linear([
            [0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s],
            [0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s],
            [0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s],
        ])
    }

    pub fn saturate(amount: f32) -> Self {
        let s = amount.max(0.0);
        Self::linear([
            [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
            [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
            [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
        ])
    }

    /// `degrees` around the luminance axis.
    pub fn hue_rotate(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::linear([
            [
                0.213 + cos * 0.787 - sin * 0.213,
                0.715 - cos * 0.715 - sin * 0.715,
                0.072 - cos * 0.072 + sin * 0.928,
            ],
            [
                0.213 - cos * 0.213 + sin * 0.143,
                0.715 + cos * 0.285 + sin * 0.140,
                0.072 - cos * 0.072 - sin * 0.283,
            ],
            [
                0.213 - cos * 0.213 - sin * 0.787,
                0.715 - cos * 0.715 + sin * 0.715,
                0.072 + cos * 0.928 + sin * 0.072,
            ],
        ])
    }

    /// `(x - 0.5) * c + 0.5` per channel.
    pub fn contrast(amount: f32) -> Self {
        let c = amount.max(0.0);
        let mut matrix = Self::scale(c);
        matrix.offset = [0.5 - 0.5 * c; 3];
        matrix
    }

    pub fn brightness(amount: f32) -> Self {
        Self::scale(amount.max(0.0))
    }

    fn linear(m: [[f32; 3]; 3]) -> Self {
        Self { m, offset: [0.0; 3] }
    }

    fn scale(k: f32) -> Self {
        Self::linear([[k, 0.0, 0.0], [0.0, k, 0.0], [0.0, 0.0, k]])
    }

    /// Apply to normalized RGB, clamping the result.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let mut out = [0.0; 3];
        for (i, row) in self.m.iter().enumerate() {
            let v = row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2] + self.offset[i];
            out[i] = v.clamp(0.0, 1.0);
        }
        out
    }
}

/// A compiled chain of color operations.
#[derive(Debug, Clone, Default)]
pub struct OpPipeline {
    stages: Vec<ColorMatrix>,
}

impl OpPipeline {
    pub fn compile(ops: &[ColorOp]) -> Self {
        Self {
            stages: ops.iter().map(ColorMatrix::for_op).collect(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn apply_pixel(&self, px: Rgba<u8>) -> Rgba<u8> {
        if self.is_identity() {
            return px;
        }
        let mut rgb = [px[0], px[1], px[2]].map(|c| f32::from(c) / 255.0);
        for stage in &self.stages {
            rgb = stage.apply(rgb);
        }
        let [r, g, b] = rgb.map(to_channel);
        Rgba([r, g, b, px[3]])
    }

    pub fn apply_in_place(&self, image: &mut RgbaImage) {
        if self.is_identity() {
            return;
        }
        for px in image.pixels_mut() {
            *px = self.apply_pixel(*px);
        }
    }
}

/// One step of the work done to a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellPass {
    /// Generic per-pixel operation chain.
    Ops(Vec<ColorOp>),
    /// Full desaturation.
    Grayscale,
    /// Multiply-blend a diagonal gradient across the cell.
    GradientMultiply(Duotone),
}

/// The passes a filter performs on each cell, in order.
///
/// Duotone never goes through the generic operation chain: it is always a
/// grayscale pass followed by the gradient multiply.
pub fn cell_passes(filter: &FilterSpec) -> Vec<CellPass> {
    match filter.transform {
        TransformDescriptor::Duotone(duotone) => {
            vec![CellPass::Grayscale, CellPass::GradientMultiply(duotone)]
        }
        TransformDescriptor::Ops(ops) if ops.is_empty() => Vec::new(),
        TransformDescriptor::Ops(ops) => vec![CellPass::Ops(ops.to_vec())],
    }
}

/// Run a cell's passes in order.
pub fn apply_passes(image: &mut RgbaImage, passes: &[CellPass]) {
    for pass in passes {
        match pass {
            CellPass::Ops(ops) => OpPipeline::compile(ops).apply_in_place(image),
            CellPass::Grayscale => grayscale_in_place(image),
            CellPass::GradientMultiply(duotone) => multiply_gradient_in_place(image, *duotone),
        }
    }
}

pub fn grayscale_in_place(image: &mut RgbaImage) {
    let matrix = ColorMatrix::grayscale(1.0);
    for px in image.pixels_mut() {
        let rgb = matrix.apply([px[0], px[1], px[2]].map(|c| f32::from(c) / 255.0));
        let [r, g, b] = rgb.map(to_channel);
        *px = Rgba([r, g, b, px[3]]);
    }
}

/// Multiply each pixel by a linear gradient running from the top-left corner
/// (`from`) to the bottom-right corner (`to`).
pub fn multiply_gradient_in_place(image: &mut RgbaImage, duotone: Duotone) {
    let (w, h) = (image.width() as f32, image.height() as f32);
    let len_sq = w * w + h * h;
    if len_sq <= 0.0 {
        return;
    }
    for (x, y, px) in image.enumerate_pixels_mut() {
        // Projection of the pixel center onto the diagonal.
        let t = ((x as f32 + 0.5) * w + (y as f32 + 0.5) * h) / len_sq;
        let tint = Rgb::lerp(duotone.from, duotone.to, t);
        let multiply = |c: u8, k: u8| ((u16::from(c) * u16::from(k) + 127) / 255) as u8;
        *px = Rgba([
            multiply(px[0], tint.r),
            multiply(px[1], tint.g),
            multiply(px[2], tint.b),
            px[3],
        ]);
    }
}

fn to_channel(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use photobooth_model::FilterId;
    use proptest::prelude::*;

    fn px(r: u8, g: u8, b: u8) -> Rgba<u8> {
        Rgba([r, g, b, 255])
    }

    #[test]
    fn test_grayscale_equalizes_channels() {
        let out = OpPipeline::compile(FilterId::Grayscale.spec().preview).apply_pixel(px(200, 40, 90));
        assert_eq!(out[0], out[1]);
        assert_eq!(out[1], out[2]);
    }

    #[test]
    fn test_contrast_pivots_on_mid_gray() {
        let m = ColorMatrix::contrast(1.5);
        let out = m.apply([0.5, 0.25, 0.75]);
        assert!((out[0] - 0.5).abs() < 1e-6);
        assert!((out[1] - 0.125).abs() < 1e-6);
        assert!((out[2] - 0.875).abs() < 1e-6);
    }

    #[test]
    fn test_operations_clamp_between_stages() {
        // Brightness pushes past 1.0; a following contrast must see the
        // clamped value.
        let ops = [
            ColorOp::new(ColorOpKind::Brightness, 2.0),
            ColorOp::new(ColorOpKind::Contrast, 0.5),
        ];
        let out = OpPipeline::compile(&ops).apply_pixel(px(204, 204, 204));
        // clamp(0.8 * 2) = 1.0 then (1.0 - 0.5) * 0.5 + 0.5 = 0.75
        assert_eq!(out, px(191, 191, 191));
    }

    #[test]
    fn test_sepia_full_white_and_alpha_preserved() {
        let out = OpPipeline::compile(FilterId::Sepia.spec().preview).apply_pixel(Rgba([0, 0, 0, 42]));
        assert_eq!(out, Rgba([0, 0, 0, 42]));
    }

    #[test]
    fn test_hue_rotate_full_turn_is_identity() {
        let m = ColorMatrix::hue_rotate(360.0);
        let out = m.apply([0.2, 0.6, 0.9]);
        for (a, b) in out.iter().zip([0.2, 0.6, 0.9]) {
            assert!((a - b).abs() < 1e-3);
        }
    }

    #[test]
    fn test_duotone_plan_skips_operation_chain() {
        let passes = cell_passes(FilterId::Duotone.spec());
        assert_eq!(passes.len(), 2);
        assert_eq!(passes[0], CellPass::Grayscale);
        assert!(matches!(passes[1], CellPass::GradientMultiply(_)));
        assert!(!passes.iter().any(|p| matches!(p, CellPass::Ops(_))));

        assert!(cell_passes(FilterId::Normal.spec()).is_empty());
        assert!(matches!(
            cell_passes(FilterId::Vivid.spec()).as_slice(),
            [CellPass::Ops(ops)] if ops.len() == 2
        ));
    }

    #[test]
    fn test_gradient_runs_corner_to_corner() {
        let duotone = match FilterId::Duotone.spec().transform {
            TransformDescriptor::Duotone(d) => d,
            TransformDescriptor::Ops(_) => unreachable!(),
        };
        let mut img = RgbaImage::from_pixel(400, 300, px(255, 255, 255));
        apply_passes(&mut img, &cell_passes(FilterId::Duotone.spec()));

        let near = |a: Rgba<u8>, b: Rgb| {
            (i16::from(a[0]) - i16::from(b.r)).abs() <= 2
                && (i16::from(a[1]) - i16::from(b.g)).abs() <= 2
                && (i16::from(a[2]) - i16::from(b.b)).abs() <= 2
        };
        assert!(near(*img.get_pixel(0, 0), duotone.from));
        assert!(near(*img.get_pixel(399, 299), duotone.to));
    }

    proptest! {
        #[test]
        fn prop_every_filter_keeps_alpha(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), a in any::<u8>()) {
            for spec in &photobooth_model::FILTERS {
                let mut img = RgbaImage::from_pixel(3, 2, Rgba([r, g, b, a]));
                apply_passes(&mut img, &cell_passes(spec));
                prop_assert!(img.pixels().all(|p| p[3] == a));
            }
        }
    }
}
