use serde::Serialize;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use super::ImageModel;
use crate::error::{GatewayError, Result};

pub const DEFAULT_STEPS: u32 = 4;
pub const DEFAULT_STRENGTH: f32 = 0.8;
pub const DEFAULT_GUIDANCE: f32 = 7.5;
pub const DEFAULT_DIMENSION: u32 = 512;

pub const DIFFUSION_STEPS: u32 = 20;
pub const DIFFUSION_DIMENSION: u32 = 1024;

pub const LUCID_STEPS: u32 = 8;
pub const LUCID_GUIDANCE: f32 = 4.5;
pub const LUCID_DIMENSION: u32 = 1120;
pub const LUCID_MAX_STEPS: u32 = 40;
pub const LUCID_MAX_DIMENSION: u32 = 2500;
pub const LUCID_MAX_PROMPT_CHARS: usize = 2048;

fn check_sampling(steps: u32, strength: f32, guidance: f32, width: u32, height: u32) -> Result<()> {
    if steps == 0 {
        return Err(GatewayError::ValidationError(
            "Steps must be at least 1".into(),
        ));
    }
    if !(0.0..=1.0).contains(&strength) {
        return Err(GatewayError::ValidationError(format!(
            "Strength must be between 0.0 and 1.0, got {}",
            strength
        )));
    }
    if !(1.0..=15.0).contains(&guidance) {
        return Err(GatewayError::ValidationError(format!(
            "Guidance must be between 1.0 and 15.0, got {}",
            guidance
        )));
    }
    if width == 0 || height == 0 {
        return Err(GatewayError::ValidationError(
            "Width and height must be non-zero".into(),
        ));
    }
    Ok(())
}

fn non_blank(text: &Option<String>) -> Option<String> {
    text.as_ref().filter(|p| !p.trim().is_empty()).cloned()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub steps: u32,
    pub model: ImageModel,
}

/// Everything besides image, mask and prompt that an inpainting call carries.
#[derive(Debug, Clone, PartialEq)]
pub struct InpaintOptions {
    pub negative_prompt: Option<String>,
    pub steps: u32,
    pub strength: f32,
    pub guidance: f32,
    pub width: u32,
    pub height: u32,
    pub seed: Option<i64>,
    pub model: ImageModel,
}

impl Default for InpaintOptions {
    fn default() -> Self {
        InpaintOptions {
            negative_prompt: None,
            steps: DEFAULT_STEPS,
            strength: DEFAULT_STRENGTH,
            guidance: DEFAULT_GUIDANCE,
            width: DEFAULT_DIMENSION,
            height: DEFAULT_DIMENSION,
            seed: None,
            model: ImageModel::default_inpainting(),
        }
    }
}

impl InpaintOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: ImageModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative_prompt.into());
        self
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_guidance(mut self, guidance: f32) -> Self {
        self.guidance = guidance;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_sampling(
            self.steps,
            self.strength,
            self.guidance,
            self.width,
            self.height,
        )
    }

    /// Negative prompt with blank values treated as absent.
    pub fn effective_negative_prompt(&self) -> Option<String> {
        non_blank(&self.negative_prompt)
    }
}

/// Sampler settings for SDXL generation and image-to-image.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffusionOptions {
    pub negative_prompt: Option<String>,
    pub steps: u32,
    pub strength: f32,
    pub guidance: f32,
    pub width: u32,
    pub height: u32,
    pub seed: Option<i64>,
}

impl Default for DiffusionOptions {
    fn default() -> Self {
        Self::sdxl()
    }
}

impl DiffusionOptions {
    /// Full-strength text-to-image defaults.
    pub fn sdxl() -> Self {
        DiffusionOptions {
            negative_prompt: None,
            steps: DIFFUSION_STEPS,
            strength: 1.0,
            guidance: DEFAULT_GUIDANCE,
            width: DIFFUSION_DIMENSION,
            height: DIFFUSION_DIMENSION,
            seed: None,
        }
    }

    /// Keeps part of the source image.
    pub fn image_to_image() -> Self {
        DiffusionOptions {
            strength: DEFAULT_STRENGTH,
            ..Self::sdxl()
        }
    }

    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative_prompt.into());
        self
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_guidance(mut self, guidance: f32) -> Self {
        self.guidance = guidance;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Output size taken from an encoded source image.
    pub fn with_size_of(self, image: &[u8]) -> Result<Self> {
        let (width, height) = image::io::Reader::new(Cursor::new(image))
            .with_guessed_format()
            .map_err(|e| GatewayError::ValidationError(format!("Cannot read image: {}", e)))?
            .into_dimensions()
            .map_err(|e| {
                GatewayError::ValidationError(format!("Cannot read image size: {}", e))
            })?;
        Ok(self.with_size(width, height))
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_sampling(
            self.steps,
            self.strength,
            self.guidance,
            self.width,
            self.height,
        )
    }

    pub fn payload(&self, prompt: &str, image_b64: Option<String>) -> DiffusionPayload {
        DiffusionPayload {
            prompt: prompt.to_string(),
            negative_prompt: non_blank(&self.negative_prompt),
            height: self.height,
            width: self.width,
            image_b64,
            num_steps: self.steps,
            strength: self.strength,
            guidance: self.guidance,
            seed: self.seed,
        }
    }
}

/// Body of `POST /generative/image/sdxl` and `POST /generative/image/imageToImage`.
/// Only image-to-image carries `image_b64`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffusionPayload {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    pub height: u32,
    pub width: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_b64: Option<String>,
    pub num_steps: u32,
    pub strength: f32,
    pub guidance: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LucidOriginOptions {
    pub steps: u32,
    pub guidance: f32,
    pub width: u32,
    pub height: u32,
    pub seed: Option<i64>,
}

impl Default for LucidOriginOptions {
    fn default() -> Self {
        LucidOriginOptions {
            steps: LUCID_STEPS,
            guidance: LUCID_GUIDANCE,
            width: LUCID_DIMENSION,
            height: LUCID_DIMENSION,
            seed: None,
        }
    }
}

impl LucidOriginOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_guidance(mut self, guidance: f32) -> Self {
        self.guidance = guidance;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Lucid Origin has its own ranges: 1-40 steps, guidance 0-10, sides up to 2500px.
    pub fn validate(&self) -> Result<()> {
        if !(1..=LUCID_MAX_STEPS).contains(&self.steps) {
            return Err(GatewayError::ValidationError(format!(
                "Steps must be between 1 and {}",
                LUCID_MAX_STEPS
            )));
        }
        if !(0.0..=10.0).contains(&self.guidance) {
            return Err(GatewayError::ValidationError(
                "Guidance must be between 0 and 10".into(),
            ));
        }
        for (side, value) in [("Width", self.width), ("Height", self.height)] {
            if !(1..=LUCID_MAX_DIMENSION).contains(&value) {
                return Err(GatewayError::ValidationError(format!(
                    "{} must be between 1 and {}",
                    side, LUCID_MAX_DIMENSION
                )));
            }
        }
        Ok(())
    }
}

/// Body of `POST /generative/image/lucidOriginTTI`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LucidOriginPayload {
    pub prompt: String,
    pub steps: u32,
    pub guidance: f32,
    pub height: u32,
    pub width: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    pub model: ImageModel,
}

/// Body of `POST /image/inpaint`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyInpaintPayload {
    pub image: String,
    pub mask: String,
    pub prompt: String,
    pub steps: u32,
    pub model: ImageModel,
}

/// Body of `POST /generative/image/inpaint`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaskArrayInpaintPayload {
    pub prompt: String,
    pub image_b64: String,
    pub mask: Vec<u8>,
    pub num_steps: u32,
    pub strength: f32,
    pub guidance: f32,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    pub model: ImageModel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOrigin {
    Remote(String),
    Local(PathBuf),
}

/// Bytes of a finished image plus where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub origin: ImageOrigin,
}

impl GeneratedImage {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// File extension matching the image bytes, `png` when unknown.
    pub fn extension(&self) -> &'static str {
        match image::guess_format(&self.bytes) {
            Ok(image::ImageFormat::Jpeg) => "jpg",
            Ok(image::ImageFormat::WebP) => "webp",
            Ok(image::ImageFormat::Gif) => "gif",
            _ => "png",
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, &self.bytes)
    }
}
