//! Raster decoding error types.

/// Errors that can occur when loading or decoding an uploaded image.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// The bytes could not be decoded as a supported image format.
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// The upload exceeds the accepted file size.
    #[error("image is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    /// The file could not be read from disk.
    #[error("failed to read image file: {0}")]
    Read(#[source] std::io::Error),
}
