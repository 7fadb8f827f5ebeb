//! Composite encoding and download naming.

use chrono::NaiveDate;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use photobooth_common::error::{BoothError, BoothResult};
use photobooth_model::{EncodedFormat, EncodedImage};

/// Default JPEG quality, on the `0.0..=1.0` scale.
pub const DEFAULT_JPEG_QUALITY: f32 = 0.92;

/// Output options for an export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    pub format: EncodedFormat,
    /// JPEG quality in `0.0..=1.0`. Ignored for PNG.
    pub quality: f32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: EncodedFormat::Png,
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ExportOptions {
    pub fn png() -> Self {
        Self::default()
    }

    pub fn jpeg(quality: f32) -> Self {
        Self {
            format: EncodedFormat::Jpeg,
            quality,
        }
    }
}

/// Encode a composite.
///
/// PNG is lossless. JPEG drops alpha (composites are opaque) and maps
/// `quality` onto the encoder's 1..=100 scale.
pub fn encode(image: &RgbaImage, options: ExportOptions) -> BoothResult<EncodedImage> {
    let mut bytes = Vec::new();
    match options.format {
        EncodedFormat::Png => {
            image
                .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
                .map_err(|e| BoothError::encode(format!("png: {e}")))?;
        }
        EncodedFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut bytes, jpeg_quality(options.quality));
            encoder
                .encode_image(&rgb)
                .map_err(|e| BoothError::encode(format!("jpeg: {e}")))?;
        }
    }
    Ok(EncodedImage {
        format: options.format,
        bytes,
    })
}

fn jpeg_quality(quality: f32) -> u8 {
    let q = if quality.is_finite() {
        quality.clamp(0.0, 1.0)
    } else {
        DEFAULT_JPEG_QUALITY
    };
    ((q * 100.0).round() as u8).max(1)
}

/// Lowercase, dash-separated form of a product name.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("photobooth");
    }
    slug
}

/// `<product-slug>-<YYYY-MM-DD>.<ext>`
pub fn download_file_name(product_name: &str, date: NaiveDate, format: EncodedFormat) -> String {
    format!(
        "{}-{}.{}",
        slugify(product_name),
        date.format("%Y-%m-%d"),
        format.extension()
    )
}
