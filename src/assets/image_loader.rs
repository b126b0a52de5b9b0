use crate::foundation::error::{NewsprintError, NewsprintResult};
use anyhow::Context as _;
use base64::{Engine as _, engine::general_purpose};
use serde::Serialize;
use std::path::Path;

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// A fully loaded image, embedded as a self-contained `data:` URL.
///
/// The original file bytes are kept untouched: no cropping, resizing or re-encoding happens at
/// load time. Sizing and fitting are applied by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EmbeddedImage {
    data_url: String,
}

impl EmbeddedImage {
    /// Embed raw encoded image bytes. Non-image content is rejected.
    pub fn from_bytes(bytes: &[u8]) -> NewsprintResult<Self> {
        let format = image::guess_format(bytes).map_err(|e| {
            NewsprintError::validation(format!("selected file is not a supported image: {e}"))
        })?;
        let mime = format.to_mime_type();
        let payload = general_purpose::STANDARD.encode(bytes);
        Ok(Self {
            data_url: format!("{DATA_PREFIX}{mime}{BASE64_MARKER}{payload}"),
        })
    }

    /// Accept an existing `data:<mime>;base64,<payload>` URL.
    pub fn from_data_url(data_url: impl Into<String>) -> NewsprintResult<Self> {
        let data_url = data_url.into();
        let (mime, payload) = split_data_url(&data_url)?;
        if !mime.starts_with("image/") {
            return Err(NewsprintError::validation(format!(
                "data URL must carry an image MIME type, got \"{mime}\""
            )));
        }
        if payload.is_empty() {
            return Err(NewsprintError::validation("data URL has an empty payload"));
        }
        Ok(Self { data_url })
    }

    /// The embeddable representation.
    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// MIME type recorded in the data URL.
    pub fn mime(&self) -> &str {
        split_data_url(&self.data_url)
            .map(|(mime, _)| mime)
            .unwrap_or_default()
    }

    /// Decode the base64 payload back to the original file bytes.
    pub fn decode_bytes(&self) -> NewsprintResult<Vec<u8>> {
        let (_, payload) = split_data_url(&self.data_url)?;
        general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| NewsprintError::image(format!("invalid base64 image payload: {e}")))
    }
}

/// Pixels of an embedded image, premultiplied and ready to paint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ImagePixels {
    pub(crate) width: u32,
    pub(crate) height: u32,
    /// Premultiplied RGBA8, row-major.
    pub(crate) rgba8_premul: Vec<u8>,
}

impl EmbeddedImage {
    /// Decode the embedded file as the format its MIME type declares.
    ///
    /// A payload that does not match its declared MIME type is an error.
    pub(crate) fn decode_premul(&self) -> NewsprintResult<ImagePixels> {
        let format = image::ImageFormat::from_mime_type(self.mime()).ok_or_else(|| {
            NewsprintError::image(format!("no decoder for embedded \"{}\"", self.mime()))
        })?;
        let bytes = self.decode_bytes()?;
        let rgba = image::load_from_memory_with_format(&bytes, format)
            .with_context(|| format!("decode embedded {}", self.mime()))?
            .into_rgba8();
        let (width, height) = rgba.dimensions();
        let rgba8_premul = rgba
            .pixels()
            .flat_map(|px| {
                let [r, g, b, a] = px.0;
                let mul = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
                [mul(r), mul(g), mul(b), a]
            })
            .collect();
        Ok(ImagePixels {
            width,
            height,
            rgba8_premul,
        })
    }
}

fn split_data_url(s: &str) -> NewsprintResult<(&str, &str)> {
    let rest = s
        .strip_prefix(DATA_PREFIX)
        .ok_or_else(|| NewsprintError::validation("image source is not a data URL"))?;
    let idx = rest
        .find(BASE64_MARKER)
        .ok_or_else(|| NewsprintError::validation("data URL is not base64 encoded"))?;
    Ok((&rest[..idx], &rest[idx + BASE64_MARKER.len()..]))
}

/// Read the selected file and embed it.
///
/// `None` means the picker was dismissed without a choice; that is a silent no-op and yields
/// `Ok(None)`.
#[tracing::instrument(level = "debug")]
pub fn load_image(selection: Option<&Path>) -> NewsprintResult<Option<EmbeddedImage>> {
    let Some(path) = selection else {
        tracing::debug!("no file selected; image left unchanged");
        return Ok(None);
    };
    let bytes =
        std::fs::read(path).with_context(|| format!("read image file '{}'", path.display()))?;
    let embedded = EmbeddedImage::from_bytes(&bytes)?;
    tracing::debug!(
        bytes = bytes.len(),
        mime = embedded.mime(),
        "image embedded"
    );
    Ok(Some(embedded))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/image_loader.rs"]
mod tests;
