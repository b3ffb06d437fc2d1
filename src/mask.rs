use image::imageops::FilterType;

use crate::error::{GatewayError, Result};

/// Side length of the grayscale grid the array-based inpaint endpoint expects.
pub const MASK_SIZE: u32 = 64;

/// What a drawing editor hands back: a flattened composite, the individual
/// strokes layers, and the picture that was drawn on. Every field holds encoded
/// image bytes (PNG, JPEG).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorPayload {
    pub composite: Option<Vec<u8>>,
    pub layers: Vec<Vec<u8>>,
    pub background: Option<Vec<u8>>,
}

impl EditorPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_composite(mut self, bytes: Vec<u8>) -> Self {
        self.composite = Some(bytes);
        self
    }

    pub fn with_layer(mut self, bytes: Vec<u8>) -> Self {
        self.layers.push(bytes);
        self
    }

    pub fn with_background(mut self, bytes: Vec<u8>) -> Self {
        self.background = Some(bytes);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskInput {
    /// An already-flat mask image.
    Image(Vec<u8>),
    Editor(EditorPayload),
}

impl MaskInput {
    /// Picks the single mask image to send: composite, else first layer, else background.
    pub fn normalize(&self) -> Result<&[u8]> {
        match self {
            MaskInput::Image(bytes) if !bytes.is_empty() => Ok(bytes.as_slice()),
            MaskInput::Image(_) => Err(GatewayError::MaskError("mask image is empty".into())),
            MaskInput::Editor(payload) => payload
                .composite
                .as_ref()
                .filter(|b| !b.is_empty())
                .or_else(|| payload.layers.first().filter(|b| !b.is_empty()))
                .or_else(|| payload.background.as_ref().filter(|b| !b.is_empty()))
                .map(Vec::as_slice)
                .ok_or_else(|| {
                    GatewayError::MaskError(
                        "editor payload has no composite, layer or background".into(),
                    )
                }),
        }
    }

    /// Normalized mask as a row-major 64x64 grayscale byte array.
    pub fn to_grayscale_array(&self) -> Result<Vec<u8>> {
        flatten_grayscale(self.normalize()?)
    }
}

impl From<Vec<u8>> for MaskInput {
    fn from(bytes: Vec<u8>) -> Self {
        MaskInput::Image(bytes)
    }
}

impl From<EditorPayload> for MaskInput {
    fn from(payload: EditorPayload) -> Self {
        MaskInput::Editor(payload)
    }
}

/// Decodes `bytes`, drops to one luma channel and resizes to `MASK_SIZE` square.
/// Trades mask precision for a bounded payload of `MASK_SIZE * MASK_SIZE` bytes.
pub fn flatten_grayscale(bytes: &[u8]) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| GatewayError::MaskError(format!("cannot decode mask image: {}", e)))?;
    let gray = decoded.to_luma8();
    let resized = image::imageops::resize(&gray, MASK_SIZE, MASK_SIZE, FilterType::Triangle);
    log::debug!(
        "Flattened {}x{} mask to {}x{}",
        gray.width(),
        gray.height(),
        MASK_SIZE,
        MASK_SIZE
    );
    Ok(resized.into_raw())
}
