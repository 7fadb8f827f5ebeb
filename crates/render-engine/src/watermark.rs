//! Watermark text rendering.
//!
//! The watermark is a single centered line in the label band under the
//! photo grid. Text is laid out by usvg from a tiny SVG document and
//! rasterized with resvg, then blended over the band.

use std::sync::{Arc, OnceLock};

use chrono::NaiveDate;
use image::{Rgba, RgbaImage};
use photobooth_common::error::{BoothError, BoothResult};
use photobooth_model::{PixelRect, Rgb};

static FONT_DB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();

fn font_db() -> Arc<usvg::fontdb::Database> {
    FONT_DB
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "loaded watermark fonts");
            Arc::new(db)
        })
        .clone()
}

/// Watermark appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkStyle {
    pub product_name: String,
    pub color: Rgb,
}

/// `"{product}  ·  {Month D, YYYY}"`.
pub fn watermark_text(product_name: &str, date: NaiveDate) -> String {
    format!("{product_name}  \u{b7}  {}", date.format("%B %-d, %Y"))
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn watermark_svg(text: &str, font_px: u32, color: Rgb, width: u32, height: u32) -> String {
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<text x="{cx}" y="{cy}" text-anchor="middle" dominant-baseline="central" "#,
            r#"font-family="Helvetica, Arial, sans-serif" font-size="{px}" font-weight="500" "#,
            r#"fill="{fill}" xml:space="preserve">{text}</text></svg>"#
        ),
        w = width,
        h = height,
        cx = f64::from(width) / 2.0,
        cy = f64::from(height) / 2.0,
        px = font_px,
        fill = color.to_hex(),
        text = escape_xml(text),
    )
}

/// Draw `text` centered in `band` on `canvas`. Nothing outside the band is
/// touched.
pub fn draw_watermark(
    canvas: &mut RgbaImage,
    band: PixelRect,
    text: &str,
    font_px: u32,
    color: Rgb,
) -> BoothResult<()> {
    if band.width == 0 || band.height == 0 || text.is_empty() {
        return Ok(());
    }

    let svg = watermark_svg(text, font_px, color, band.width, band.height);
    let opts = usvg::Options {
        fontdb: font_db(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(&svg, &opts)
        .map_err(|e| BoothError::render(format!("watermark layout: {e}")))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(band.width, band.height)
        .ok_or_else(|| BoothError::render("failed to allocate watermark pixmap"))?;
    resvg::render(&tree, resvg::tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    // Source-over with premultiplied source.
    for (i, src) in pixmap.data().chunks_exact(4).enumerate() {
        let alpha = u32::from(src[3]);
        if alpha == 0 {
            continue;
        }
        let x = band.x + (i as u32 % band.width);
        let y = band.y + (i as u32 / band.width);
        if x >= canvas.width() || y >= canvas.height() {
            continue;
        }
        let dst = canvas.get_pixel_mut(x, y);
        let inv = 255 - alpha;
        let blend = |s: u8, d: u8| (u32::from(s) + (u32::from(d) * inv + 127) / 255).min(255) as u8;
        let out_a = (alpha + (u32::from(dst[3]) * inv + 127) / 255).min(255) as u8;
        *dst = Rgba([
            blend(src[0], dst[0]),
            blend(src[1], dst[1]),
            blend(src[2], dst[2]),
            out_a,
        ]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watermark_text_format() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 6).unwrap();
        assert_eq!(
            watermark_text("LJR Photobooth", date),
            "LJR Photobooth  \u{b7}  October 6, 2026"
        );
    }

    #[test]
    fn test_svg_escapes_markup() {
        let svg = watermark_svg("Tom & Jerry <3", 12, Rgb::new(0xaa, 0xaa, 0xaa), 100, 40);
        assert!(svg.contains("Tom &amp; Jerry &lt;3"));
        assert!(svg.contains(r##"fill="#aaaaaa""##));
        assert!(svg.contains(r#"font-size="12""#));
    }

    #[test]
    fn test_draw_stays_inside_band() {
        let mut canvas = RgbaImage::from_pixel(120, 80, Rgba([255, 255, 255, 255]));
        let band = PixelRect::new(0, 50, 120, 30);
        draw_watermark(&mut canvas, band, "Photobooth", 14, Rgb::new(0, 0, 0)).unwrap();
        for (x, y, px) in canvas.enumerate_pixels() {
            if !band.contains(x, y) {
                assert_eq!(*px, Rgba([255, 255, 255, 255]), "pixel ({x},{y}) changed");
            }
        }
    }

    #[test]
    fn test_empty_band_is_noop() {
        let mut canvas = RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 255]));
        let before = canvas.clone();
        draw_watermark(&mut canvas, PixelRect::new(0, 10, 10, 0), "x", 12, Rgb::WHITE).unwrap();
        assert_eq!(canvas, before);
    }
}
