//! Captured photos encoded as `data:` URLs, the form the scoring API accepts.

use crate::frame::Frame;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageFormat};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("image data is empty")]
    Empty,
    #[error("unsupported image format (need JPEG, PNG or WebP)")]
    UnsupportedFormat,
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JPEG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// One captured photo, held as a base64 data URL.
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedImage {
    data_url: String,
    mime: &'static str,
    byte_len: usize,
}

fn mime_for(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}

impl CapturedImage {
    /// Wrap encoded image bytes (a selected file), sniffing the format.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PhotoError> {
        if bytes.is_empty() {
            return Err(PhotoError::Empty);
        }
        let format = image::guess_format(bytes).map_err(|_| PhotoError::UnsupportedFormat)?;
        let mime = mime_for(format).ok_or(PhotoError::UnsupportedFormat)?;
        Ok(Self {
            data_url: format!("data:{mime};base64,{}", STANDARD.encode(bytes)),
            mime,
            byte_len: bytes.len(),
        })
    }

    /// Read and wrap an image file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PhotoError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| PhotoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let image = Self::from_bytes(&bytes)?;
        tracing::debug!(path = %path.display(), mime = image.mime, bytes = image.byte_len, "image file loaded");
        Ok(image)
    }

    /// JPEG-encode a camera frame (the shutter screenshot).
    pub fn from_frame(frame: &Frame, quality: u8) -> Result<Self, PhotoError> {
        if frame.data.is_empty() {
            return Err(PhotoError::Empty);
        }
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100)).encode(
            &frame.data,
            frame.width,
            frame.height,
            ExtendedColorType::Rgb8,
        )?;
        Self::from_bytes(&jpeg)
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    /// Size of the encoded image before base64.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }
}

impl fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedImage")
            .field("mime", &self.mime)
            .field("byte_len", &self.byte_len)
            .finish()
    }
}

impl Serialize for CapturedImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.data_url)
    }
}
