//! Image payloads sent to the model.
//!
//! Providers accept PNG, JPEG, WebP and GIF, which are sent as-is. BMP and
//! TIFF are decoded and re-encoded as PNG. Other formats are rejected.

use crate::error::{EvalError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, ImageFormat};
use llm::ContentPart;
use std::io::Cursor;
use std::path::Path;

/// An encoded raster image ready to attach to a request.
#[derive(Clone, PartialEq, Eq)]
pub struct DesignImage {
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl std::fmt::Debug for DesignImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesignImage")
            .field("media_type", &self.media_type())
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl DesignImage {
    /// Encode an in-memory image as PNG.
    pub fn from_dynamic_image(image: &DynamicImage) -> Result<Self> {
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, ImageFormat::Png)?;
        Ok(Self {
            bytes: buf.into_inner(),
            format: ImageFormat::Png,
        })
    }

    /// Wrap already-encoded image bytes, sniffing the format.
    ///
    /// BMP and TIFF input is converted to PNG.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(EvalError::Image("image payload is empty".to_string()));
        }

        let format = image::guess_format(&bytes)?;
        match format {
            ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP | ImageFormat::Gif => {
                Ok(Self { bytes, format })
            }
            _ => {
                let decoded = image::load_from_memory_with_format(&bytes, format)?;
                Self::from_dynamic_image(&decoded)
            }
        }
    }

    /// Read an image file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(bytes)
    }

    /// MIME type of the encoded bytes.
    pub fn media_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Standard base64 of the encoded bytes.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// `data:<mime>;base64,<data>` URL.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type(), self.to_base64())
    }

    /// The image as a message content part.
    pub fn content_part(&self) -> ContentPart {
        ContentPart::image_base64(self.media_type(), self.to_base64())
    }
}

impl TryFrom<&DynamicImage> for DesignImage {
    type Error = EvalError;

    fn try_from(image: &DynamicImage) -> Result<Self> {
        Self::from_dynamic_image(image)
    }
}
