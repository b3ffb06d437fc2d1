//! Client for an image-generation backend.
//!
//! Text-to-image, inpainting, gallery listing and edit-by-URL, each a single
//! request/response exchange with the backend. [`GatewayClient`] is the entry
//! point; its methods return an [`Outcome`] that is either the image or the
//! message to show in its place.

pub mod config;
pub mod error;
pub mod gateway;
pub mod logger;
pub mod mask;
pub mod models;

#[cfg(test)]
mod test_support;

pub use config::{GatewayConfig, ImgbbConfig, InpaintSchema};
pub use error::{GatewayError, Result};
pub use gateway::{
    EditClient, GalleryClient, GatewayClient, ImageClient, ImageHost, ImgbbHost, Outcome,
};
pub use mask::{EditorPayload, MaskInput};
pub use models::*;
