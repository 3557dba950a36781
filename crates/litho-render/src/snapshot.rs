//! PNG snapshots of the presented frame.
//!
//! [`FrameEncoder::copy_surface_to_buffer`](crate::pass::FrameEncoder) queues
//! the readback before submit; after submit the host calls
//! [`write_snapshot_png`] to map the buffer, strip the row padding, and write
//! the file. Mapping blocks the frame, which is fine for a key-bound action.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Error type for snapshot failures.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The readback buffer could not be mapped for reading.
    #[error("failed to map the snapshot readback buffer")]
    MapFailed,

    /// PNG encoding failed.
    #[error("failed to encode snapshot PNG: {0}")]
    Encode(#[from] png::EncodingError),

    /// The file could not be created.
    #[error("failed to write snapshot file: {0}")]
    Write(#[from] std::io::Error),
}

/// Map the readback buffer and write the frame to `path` as RGBA PNG.
///
/// `padded_bytes_per_row` is the aligned row stride the copy was queued
/// with; the padding bytes are dropped here. BGRA surfaces are swizzled to
/// RGBA while unpacking.
pub fn write_snapshot_png(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
    buffer: &wgpu::Buffer,
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
    path: &Path,
) -> Result<(), SnapshotError> {
    let slice = buffer.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    let _ = device.poll(wgpu::PollType::Wait {
        submission_index: None,
        timeout: None,
    });

    match rx.recv() {
        Ok(Ok(())) => {}
        _ => return Err(SnapshotError::MapFailed),
    }

    let pixels = {
        let mapped = slice.get_mapped_range();
        unpack_padded_rows(
            &mapped,
            width,
            height,
            padded_bytes_per_row,
            is_bgra(surface_format),
        )
    };
    buffer.unmap();

    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&pixels)?;

    log::info!("Saved snapshot {} ({width}x{height})", path.display());
    Ok(())
}

/// A timestamped snapshot path under `dir`.
pub fn snapshot_path(dir: &Path) -> PathBuf {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    dir.join(snapshot_filename(millis))
}

fn snapshot_filename(unix_millis: u128) -> String {
    format!("litho-preview-{unix_millis}.png")
}

/// Whether a surface format stores bytes in BGRA order.
fn is_bgra(format: wgpu::TextureFormat) -> bool {
    matches!(
        format,
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
    )
}

/// Copy `height` rows of `width` RGBA pixels out of a padded readback
/// mapping, optionally swizzling BGRA to RGBA.
fn unpack_padded_rows(
    mapped: &[u8],
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
    swizzle_bgra: bool,
) -> Vec<u8> {
    let bytes_per_pixel = 4u32;
    let mut pixels = Vec::with_capacity((width * height * bytes_per_pixel) as usize);
    for row in 0..height {
        let start = (row * padded_bytes_per_row) as usize;
        let end = start + (width * bytes_per_pixel) as usize;
        let row_data = &mapped[start..end];
        if swizzle_bgra {
            for chunk in row_data.chunks_exact(4) {
                pixels.push(chunk[2]);
                pixels.push(chunk[1]);
                pixels.push(chunk[0]);
                pixels.push(chunk[3]);
            }
        } else {
            pixels.extend_from_slice(row_data);
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a padded mapping where every pixel's first byte encodes its
    /// (x, y) index and the padding bytes are 0xEE.
    fn padded_rows(width: u32, height: u32, padded: u32) -> Vec<u8> {
        let mut data = vec![0xEE; (padded * height) as usize];
        for y in 0..height {
            for x in 0..width {
                let at = (y * padded + x * 4) as usize;
                data[at] = (y * width + x) as u8;
                data[at + 1] = 0x11;
                data[at + 2] = 0x22;
                data[at + 3] = 0xFF;
            }
        }
        data
    }

    #[test]
    fn test_unpack_strips_row_padding() {
        let (w, h, padded) = (3u32, 2u32, 256u32);
        let mapped = padded_rows(w, h, padded);
        let pixels = unpack_padded_rows(&mapped, w, h, padded, false);

        assert_eq!(pixels.len(), (w * h * 4) as usize);
        for i in 0..(w * h) {
            assert_eq!(pixels[(i * 4) as usize], i as u8, "pixel {i} misplaced");
        }
        assert!(!pixels.contains(&0xEE), "padding bytes leaked into output");
    }

    #[test]
    fn test_unpack_swizzles_bgra() {
        let (w, h, padded) = (2u32, 1u32, 256u32);
        let mapped = padded_rows(w, h, padded);
        let pixels = unpack_padded_rows(&mapped, w, h, padded, true);

        // B and R swap; G and A stay put
        assert_eq!(&pixels[0..4], &[0x22, 0x11, 0x00, 0xFF]);
        assert_eq!(&pixels[4..8], &[0x22, 0x11, 0x01, 0xFF]);
    }

    #[test]
    fn test_unpack_handles_unpadded_rows() {
        // width 64 at 4 bpp is already 256-aligned
        let (w, h) = (64u32, 3u32);
        let mapped = padded_rows(w, h, w * 4);
        let pixels = unpack_padded_rows(&mapped, w, h, w * 4, false);
        assert_eq!(pixels.len(), (w * h * 4) as usize);
    }

    #[test]
    fn test_bgra_formats() {
        assert!(is_bgra(wgpu::TextureFormat::Bgra8UnormSrgb));
        assert!(is_bgra(wgpu::TextureFormat::Bgra8Unorm));
        assert!(!is_bgra(wgpu::TextureFormat::Rgba8UnormSrgb));
        assert!(!is_bgra(wgpu::TextureFormat::Rgba8Unorm));
    }

    #[test]
    fn test_snapshot_filename_is_stable() {
        assert_eq!(snapshot_filename(123), "litho-preview-123.png");
        let path = snapshot_path(Path::new("/tmp"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("litho-preview-"));
        assert!(name.ends_with(".png"));
    }
}
