//! Fixed-resolution luminance grid.

use crate::RasterImage;

/// Sample count on the longer axis of the working grid.
pub const WORKING_EDGE: u32 = 256;

/// Rec.601 luma weights applied to RGB.
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// The resampled luminance grid all displacement and shading lookups read
/// from.
///
/// Luminance is stored as one byte per sample. [`LuminanceGrid::sample`]
/// returns `byte / 255`, which is exactly the value an `R8Unorm` texture
/// fetch of the same byte produces, so CPU displacement and GPU color read
/// identical numbers from identical texels.
#[derive(Debug, Clone, PartialEq)]
pub struct LuminanceGrid {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl LuminanceGrid {
    /// Resample an image down (or up) to the working resolution:
    /// [`WORKING_EDGE`] samples on the longer axis, aspect kept on the
    /// shorter, nearest-neighbor.
    pub fn from_image(image: &RasterImage) -> Self {
        let (src_w, src_h) = (image.width().max(1), image.height().max(1));
        let (width, height) = if src_w >= src_h {
            let h = ((WORKING_EDGE as f32 * src_h as f32 / src_w as f32).round() as u32).max(1);
            (WORKING_EDGE, h)
        } else {
            let w = ((WORKING_EDGE as f32 * src_w as f32 / src_h as f32).round() as u32).max(1);
            (w, WORKING_EDGE)
        };

        let mut data = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            let src_y = nearest_source(y, height, src_h);
            for x in 0..width {
                let src_x = nearest_source(x, width, src_w);
                let [r, g, b, _] = image.pixel(src_x, src_y);
                data.push(luma_byte(r, g, b));
            }
        }
        log::debug!("resampled {src_w}x{src_h} image to {width}x{height} grid");
        Self {
            width,
            height,
            data,
        }
    }

    /// A grid where every sample holds the same luminance.
    pub fn solid(width: u32, height: u32, luminance: f32) -> Self {
        let byte = (luminance.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            width: width.max(1),
            height: height.max(1),
            data: vec![byte; (width.max(1) * height.max(1)) as usize],
        }
    }

    /// A grid filled from a per-sample luminance function. Used by tests and
    /// procedural placeholders.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> f32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut data = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push((f(x, y).clamp(0.0, 1.0) * 255.0).round() as u8);
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Nearest-neighbor luminance at normalized (u, v), v running down the
    /// image. Coordinates outside [0, 1] are clamped.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);
        let px = (u * (self.width - 1) as f32).floor() as u32;
        let py = (v * (self.height - 1) as f32).floor() as u32;
        let idx = (py * self.width + px) as usize;
        self.data[idx] as f32 / 255.0
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major luminance bytes, ready for an `R8Unorm` texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

fn luma_byte(r: u8, g: u8, b: u8) -> u8 {
    let luma = LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32;
    luma.round().clamp(0.0, 255.0) as u8
}

/// Map a destination index to its nearest source index via pixel centers.
fn nearest_source(dst: u32, dst_len: u32, src_len: u32) -> u32 {
    let pos = (dst as f32 + 0.5) * src_len as f32 / dst_len as f32;
    (pos.floor() as u32).min(src_len - 1)
}
