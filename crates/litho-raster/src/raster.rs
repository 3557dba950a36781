//! Decoded upload pixels.

use std::path::Path;

use crate::RasterError;

/// Uploads above this size are rejected before any decode work runs.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// A decoded uploaded image: row-major RGBA bytes. Immutable once decoded;
/// a new upload replaces the whole value.
#[derive(Debug, Clone)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Decode an image from raw file bytes (PNG or JPEG).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RasterError> {
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(RasterError::TooLarge {
                size: bytes.len(),
                limit: MAX_UPLOAD_BYTES,
            });
        }
        let decoded = image::load_from_memory(bytes).map_err(RasterError::Decode)?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("decoded upload: {width}x{height}");
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// Read and decode an image file.
    pub fn from_path(path: &Path) -> Result<Self, RasterError> {
        let bytes = std::fs::read(path).map_err(RasterError::Read)?;
        Self::from_bytes(&bytes)
    }

    /// Build an image directly from RGBA pixel data. `pixels` must hold
    /// exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA bytes, 4 per pixel.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA of the pixel at (x, y); coordinates are clamped to the edges.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat, RgbaImage};

    fn encode_png(image: RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png_roundtrip() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(2, 1, image::Rgba([0, 0, 255, 255]));
        let bytes = encode_png(img);

        let raster = RasterImage::from_bytes(&bytes).unwrap();
        assert_eq!(raster.width(), 3);
        assert_eq!(raster.height(), 2);
        assert_eq!(raster.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(raster.pixel(2, 1), [0, 0, 255, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = RasterImage::from_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, RasterError::Decode(_)), "got {err:?}");
    }

    #[test]
    fn test_oversized_upload_rejected_before_decode() {
        let bytes = vec![0u8; MAX_UPLOAD_BYTES + 1];
        let err = RasterImage::from_bytes(&bytes).unwrap_err();
        match err {
            RasterError::TooLarge { size, limit } => {
                assert_eq!(size, MAX_UPLOAD_BYTES + 1);
                assert_eq!(limit, MAX_UPLOAD_BYTES);
            }
            other => panic!("expected TooLarge, got {other:?}"),
        }
    }

    #[test]
    fn test_from_path_reads_file() {
        let img = RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 255]));
        let bytes = encode_png(img);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.png");
        std::fs::write(&path, &bytes).unwrap();

        let raster = RasterImage::from_path(&path).unwrap();
        assert_eq!(raster.width(), 4);
        assert_eq!(raster.pixel(3, 3), [10, 20, 30, 255]);
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = RasterImage::from_path(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, RasterError::Read(_)), "got {err:?}");
    }

    #[test]
    fn test_pixel_clamps_out_of_range() {
        let raster = RasterImage::from_rgba(2, 2, vec![7; 16]);
        assert_eq!(raster.pixel(99, 99), [7, 7, 7, 7]);
    }
}
