//! Pixel-level primitives shared by publish and delivery.
//!
//! - Decoding with file-size and image-bomb guards
//! - Re-encoding in the source format (JPEG fallback)
//! - Block downsampling for low-fidelity broadcast copies

pub mod codec;
pub mod error;
pub mod format;
pub mod pixelate;

pub use codec::{decode, encode, DecodeLimits, DecodedPhoto, EncodedImage};
pub use error::ImageError;
pub use format::{detect_format, OutputFormat};
pub use pixelate::{broadcast_block_size, pixelate};

/// Produce the broadcast copy of a photo.
///
/// Returns the encoded bytes and the block size that was applied.
pub fn downsample_for_broadcast(
    data: &[u8],
    block_divisor: u32,
    limits: &DecodeLimits,
    jpeg_quality: u8,
) -> Result<(EncodedImage, u32), ImageError> {
    let decoded = decode(data, limits)?;
    let block = broadcast_block_size(decoded.pixels.width(), block_divisor);
    let pixelated = pixelate(&decoded.pixels, block);
    let encoded = encode(&pixelated, decoded.format, jpeg_quality)?;
    Ok((encoded, block))
}
