//! Frame capturer: cover-crop, scale, and mirror a source frame into a cell.

use image::{imageops, RgbaImage};
use photobooth_common::error::{BoothError, BoothResult};

use crate::source::FrameSource;

/// Region of the source frame that ends up in the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Centered crop of a `vw x vh` frame that, scaled up or down, exactly
    /// covers a `cell_w x cell_h` cell.
    pub fn cover(vw: u32, vh: u32, cell_w: u32, cell_h: u32) -> BoothResult<Self> {
        if vw == 0 || vh == 0 {
            return Err(BoothError::source_not_ready(format!(
                "source reports {vw}x{vh}"
            )));
        }
        if cell_w == 0 || cell_h == 0 {
            return Err(BoothError::invalid_state(format!(
                "cell size {cell_w}x{cell_h}"
            )));
        }

        let scale = (f64::from(cell_w) / f64::from(vw)).max(f64::from(cell_h) / f64::from(vh));
        let width = ((f64::from(cell_w) / scale).round() as u32).clamp(1, vw);
        let height = ((f64::from(cell_h) / scale).round() as u32).clamp(1, vh);
        Ok(Self {
            x: (vw - width) / 2,
            y: (vh - height) / 2,
            width,
            height,
        })
    }
}

/// Cover-crop `frame` into a mirrored `cell_w x cell_h` image.
pub fn capture_frame(frame: &RgbaImage, cell_w: u32, cell_h: u32) -> BoothResult<RgbaImage> {
    let (vw, vh) = frame.dimensions();
    let crop = CropRect::cover(vw, vh, cell_w, cell_h)?;

    let region = imageops::crop_imm(frame, crop.x, crop.y, crop.width, crop.height).to_image();
    let scaled = if region.dimensions() == (cell_w, cell_h) {
        region
    } else {
        imageops::resize(&region, cell_w, cell_h, imageops::FilterType::Triangle)
    };
    Ok(imageops::flip_horizontal(&scaled))
}

/// Grab the current frame from `source` and capture it into a cell.
///
/// Fails with [`BoothError::SourceNotReady`] while the source has no frame
/// size yet.
pub async fn capture(source: &dyn FrameSource, cell_w: u32, cell_h: u32) -> BoothResult<RgbaImage> {
    if !source.is_ready() {
        return Err(BoothError::source_not_ready(format!(
            "{} has not reported a frame size",
            source.name()
        )));
    }
    let frame = source.current_frame().await?;
    capture_frame(&frame, cell_w, cell_h)
}
