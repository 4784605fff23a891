//! Photo decoding and encoding.
//!
//! Decoding checks file size and header dimensions before allocating the
//! pixel buffer, so a small file that expands to a huge bitmap is rejected
//! early.

use image::io::Reader as ImageReader;
use image::{ImageEncoder as _, RgbaImage};
use std::io::Cursor;

use super::error::ImageError;
use super::format::OutputFormat;
use crate::constants::{DEFAULT_JPEG_QUALITY, DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_MAX_PIXELS};

/// Safety limits applied before decoding.
#[derive(Debug, Clone, Copy)]
pub struct DecodeLimits {
    pub max_file_size: usize,
    pub max_pixels: u64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_file_size: (DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024) as usize,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

/// A decoded photo together with the format it arrived in.
#[derive(Debug, Clone)]
pub struct DecodedPhoto {
    pub pixels: RgbaImage,
    pub format: OutputFormat,
}

/// Result of encoding an image
#[derive(Debug)]
pub struct EncodedImage {
    /// The encoded image data
    pub data: Vec<u8>,
    /// The output format
    pub format: OutputFormat,
}

fn reader(data: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, ImageError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(ImageError::undecodable)
}

/// Decode photo bytes into an RGBA buffer.
pub fn decode(data: &[u8], limits: &DecodeLimits) -> Result<DecodedPhoto, ImageError> {
    if data.len() > limits.max_file_size {
        return Err(ImageError::TooLarge {
            size: data.len(),
            max_size: limits.max_file_size,
        });
    }

    let (width, height) = reader(data)?
        .into_dimensions()
        .map_err(ImageError::undecodable)?;
    if width as u64 * height as u64 > limits.max_pixels {
        return Err(ImageError::TooManyPixels {
            width,
            height,
            max_pixels: limits.max_pixels,
        });
    }

    let image = reader(data)?.decode().map_err(ImageError::undecodable)?;

    Ok(DecodedPhoto {
        pixels: image.to_rgba8(),
        format: super::format::detect_format(data),
    })
}

/// Encode an RGBA buffer to the given format.
pub fn encode(
    image: &RgbaImage,
    format: OutputFormat,
    jpeg_quality: u8,
) -> Result<EncodedImage, ImageError> {
    let (width, height) = image.dimensions();
    let mut output = Cursor::new(Vec::new());

    match format {
        OutputFormat::Jpeg => {
            use image::codecs::jpeg::JpegEncoder;

            // JPEG doesn't support alpha
            let rgb_data = rgba_to_rgb(image.as_raw());
            let quality = if jpeg_quality == 0 {
                DEFAULT_JPEG_QUALITY
            } else {
                jpeg_quality.min(100)
            };

            JpegEncoder::new_with_quality(&mut output, quality)
                .write_image(&rgb_data, width, height, image::ColorType::Rgb8)
                .map_err(|e| ImageError::unencodable(format, e))?;
        }
        OutputFormat::Png => {
            use image::codecs::png::PngEncoder;

            PngEncoder::new(&mut output)
                .write_image(image.as_raw(), width, height, image::ColorType::Rgba8)
                .map_err(|e| ImageError::unencodable(format, e))?;
        }
        OutputFormat::WebP => {
            use image::codecs::webp::WebPEncoder;

            WebPEncoder::new_lossless(&mut output)
                .write_image(image.as_raw(), width, height, image::ColorType::Rgba8)
                .map_err(|e| ImageError::unencodable(format, e))?;
        }
    }

    Ok(EncodedImage {
        data: output.into_inner(),
        format,
    })
}

/// Drop the alpha channel.
fn rgba_to_rgb(data: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(data.len() / 4 * 3);
    for chunk in data.chunks_exact(4) {
        rgb.extend_from_slice(&chunk[..3]);
    }
    rgb
}
