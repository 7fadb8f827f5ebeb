//! Captured shots.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use photobooth_common::error::{BoothError, BoothResult};

/// One captured still, addressed by its position in the session.
///
/// The pixels are held PNG-encoded: capture is lossless and the encoded
/// form is what thumbnails and stores consume. A shot is never mutated in
/// place; a retake replaces it and re-indexing produces a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shot {
    index: usize,
    png: Vec<u8>,
}

impl Shot {
    /// Encode a captured cell image as the shot at `index`.
    pub fn from_image(index: usize, image: &RgbaImage) -> BoothResult<Self> {
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| BoothError::encode(format!("shot {index}: {e}")))?;
        Ok(Self { index, png })
    }

    /// Wrap already-encoded bytes. They are only validated on [`Shot::decode`].
    pub fn from_encoded(index: usize, bytes: Vec<u8>) -> Self {
        Self { index, png: bytes }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The encoded image bytes.
    pub fn encoded(&self) -> &[u8] {
        &self.png
    }

    /// Decode the shot back into pixels.
    pub fn decode(&self) -> BoothResult<RgbaImage> {
        image::load_from_memory(&self.png)
            .map(|img| img.to_rgba8())
            .map_err(|e| BoothError::decode_failed(self.index, e.to_string()))
    }

    /// The same pixels at a new position.
    pub fn reindexed(self, index: usize) -> Self {
        Self { index, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_encoded_shot_preserves_pixels() {
        let mut img = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 255]));
        img.put_pixel(1, 2, Rgba([200, 100, 50, 255]));

        let shot = Shot::from_image(2, &img).unwrap();
        assert_eq!(shot.index(), 2);
        assert!(shot.encoded().starts_with(&[0x89, b'P', b'N', b'G']));
        assert_eq!(shot.decode().unwrap(), img);
    }

    #[test]
    fn test_corrupt_bytes_fail_with_index() {
        let shot = Shot::from_encoded(5, b"not an image".to_vec());
        match shot.decode() {
            Err(BoothError::ImageDecodeFailed { index, .. }) => assert_eq!(index, 5),
            other => panic!("expected decode failure, got {other:?}"),
        }
    }

    #[test]
    fn test_reindex_keeps_bytes() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
        let shot = Shot::from_image(2, &img).unwrap();
        let bytes = shot.encoded().to_vec();
        let moved = shot.reindexed(1);
        assert_eq!(moved.index(), 1);
        assert_eq!(moved.encoded(), bytes.as_slice());
    }
}
