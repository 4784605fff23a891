//! Output format selection.
//!
//! Photos are re-encoded in the format they arrived in. Formats the encoder
//! does not handle fall back to JPEG.

/// Formats photos can be re-encoded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    /// `(name, MIME type, file extension)`
    const fn descriptor(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Self::Jpeg => ("jpeg", "image/jpeg", "jpg"),
            Self::Png => ("png", "image/png", "png"),
            Self::WebP => ("webp", "image/webp", "webp"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.descriptor().0
    }

    pub fn content_type(&self) -> &'static str {
        self.descriptor().1
    }

    /// File name used when uploading an encoded photo.
    pub fn file_name(&self) -> String {
        format!("photo.{}", self.descriptor().2)
    }
}

/// Detect the source format from magic bytes.
pub fn detect_format(data: &[u8]) -> OutputFormat {
    match image::guess_format(data) {
        Ok(image::ImageFormat::Png) => OutputFormat::Png,
        Ok(image::ImageFormat::WebP) => OutputFormat::WebP,
        _ => OutputFormat::Jpeg,
    }
}
