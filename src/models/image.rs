use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use image::{codecs::jpeg::JpegEncoder, RgbImage};
use serde::{Serialize, Serializer};

pub const JPEG_MIME: &str = "image/jpeg";

/// JPEG quality used when rendering a frame for the classifier.
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Encoded still image handed to (or returned by) the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StillImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl StillImage {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self::new(JPEG_MIME, bytes)
    }

    /// Encode a decoded RGB frame as JPEG.
    pub fn from_rgb(frame: &RgbImage, quality: u8) -> Result<Self> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err(anyhow!("cannot encode an empty frame"));
        }

        let mut bytes = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
        encoder
            .encode_image(frame)
            .context("jpeg encoding failed")?;
        Ok(Self::jpeg(bytes))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    /// Accepts either a full `data:` URL or a bare base64 payload (assumed JPEG).
    pub fn from_data_url(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let (mime, payload) = match raw.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest
                    .split_once(',')
                    .ok_or_else(|| anyhow!("data url has no payload separator"))?;
                let mime = header.strip_suffix(";base64").unwrap_or(header);
                let mime = if mime.is_empty() { JPEG_MIME } else { mime };
                (mime.to_string(), payload)
            }
            None => (JPEG_MIME.to_string(), raw),
        };

        let bytes = STANDARD
            .decode(payload)
            .context("image payload is not valid base64")?;
        Ok(Self { mime, bytes })
    }
}

impl Serialize for StillImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_url())
    }
}
