use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GatewayError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub category: ModelCategory,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModelCategory {
    TextToImage,
    Inpainting,
}

/// Models the backend accepts. Serialized as the backend's model id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageModel {
    #[serde(rename = "@cf/black-forest-labs/flux-1-schnell")]
    FluxSchnell,
    #[serde(rename = "@cf/stabilityai/stable-diffusion-xl-base-1.0")]
    SdxlBase,
    #[serde(rename = "@cf/runwayml/stable-diffusion-v1-5")]
    StableDiffusion15,
    #[serde(rename = "@cf/leonardo/lucid-origin")]
    LucidOrigin,
    #[serde(rename = "@cf/runwayml/stable-diffusion-v1-5-inpainting")]
    StableDiffusion15Inpainting,
    #[serde(rename = "@cf/runwayml/stable-diffusion-inpainting")]
    StableDiffusionInpainting,
    #[serde(rename = "@cf/stabilityai/stable-diffusion-xl-inpainting-1.0")]
    SdxlInpainting,
}

impl ImageModel {
    pub const ALL: [ImageModel; 7] = [
        ImageModel::FluxSchnell,
        ImageModel::SdxlBase,
        ImageModel::StableDiffusion15,
        ImageModel::LucidOrigin,
        ImageModel::StableDiffusion15Inpainting,
        ImageModel::StableDiffusionInpainting,
        ImageModel::SdxlInpainting,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ImageModel::FluxSchnell => "@cf/black-forest-labs/flux-1-schnell",
            ImageModel::SdxlBase => "@cf/stabilityai/stable-diffusion-xl-base-1.0",
            ImageModel::StableDiffusion15 => "@cf/runwayml/stable-diffusion-v1-5",
            ImageModel::LucidOrigin => "@cf/leonardo/lucid-origin",
            ImageModel::StableDiffusion15Inpainting => {
                "@cf/runwayml/stable-diffusion-v1-5-inpainting"
            }
            ImageModel::StableDiffusionInpainting => "@cf/runwayml/stable-diffusion-inpainting",
            ImageModel::SdxlInpainting => "@cf/stabilityai/stable-diffusion-xl-inpainting-1.0",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ImageModel::FluxSchnell => "FLUX.1 [schnell]",
            ImageModel::SdxlBase => "Stable Diffusion XL Base 1.0",
            ImageModel::StableDiffusion15 => "Stable Diffusion 1.5",
            ImageModel::LucidOrigin => "Lucid Origin",
            ImageModel::StableDiffusion15Inpainting => "Stable Diffusion 1.5 Inpainting",
            ImageModel::StableDiffusionInpainting => "Stable Diffusion Inpainting",
            ImageModel::SdxlInpainting => "Stable Diffusion XL Inpainting 1.0",
        }
    }

    pub fn provider(&self) -> &'static str {
        match self {
            ImageModel::FluxSchnell => "Black Forest Labs",
            ImageModel::LucidOrigin => "Leonardo",
            ImageModel::SdxlBase | ImageModel::SdxlInpainting => "Stability AI",
            ImageModel::StableDiffusion15
            | ImageModel::StableDiffusion15Inpainting
            | ImageModel::StableDiffusionInpainting => "RunwayML",
        }
    }

    pub fn category(&self) -> ModelCategory {
        match self {
            ImageModel::FluxSchnell
            | ImageModel::SdxlBase
            | ImageModel::StableDiffusion15
            | ImageModel::LucidOrigin => ModelCategory::TextToImage,
            _ => ModelCategory::Inpainting,
        }
    }

    pub fn default_text_to_image() -> Self {
        ImageModel::FluxSchnell
    }

    pub fn default_inpainting() -> Self {
        ImageModel::StableDiffusion15Inpainting
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            id: self.id().to_string(),
            name: self.display_name().to_string(),
            provider: self.provider().to_string(),
            category: self.category(),
        }
    }
}

impl fmt::Display for ImageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ImageModel {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ImageModel::ALL
            .iter()
            .copied()
            .find(|model| model.id() == wanted)
            .ok_or_else(|| GatewayError::ValidationError(format!("Unsupported model: {}", wanted)))
    }
}

/// Catalogue of every model, text-to-image first.
pub fn supported_models() -> Vec<ModelInfo> {
    ImageModel::ALL.iter().map(ImageModel::info).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_ids_round_trip_through_from_str() {
        for model in ImageModel::ALL {
            assert_eq!(model.id().parse::<ImageModel>().unwrap(), model);
        }
        assert!("@cf/unknown/model".parse::<ImageModel>().is_err());
    }

    #[test]
    fn test_model_serializes_as_id() {
        let json = serde_json::to_string(&ImageModel::StableDiffusionInpainting).unwrap();
        assert_eq!(json, "\"@cf/runwayml/stable-diffusion-inpainting\"");
    }

    #[test]
    fn test_catalogue_categories() {
        let models = supported_models();
        assert_eq!(models.len(), 7);
        assert_eq!(
            models
                .iter()
                .filter(|m| m.category == ModelCategory::TextToImage)
                .count(),
            4
        );
        assert_eq!(
            ImageModel::default_inpainting().category(),
            ModelCategory::Inpainting
        );
    }
}
