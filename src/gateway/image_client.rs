use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

use super::transport::BackendTransport;
use crate::{
    config::InpaintSchema,
    error::{GatewayError, Result},
    logger,
    mask::MaskInput,
    models::{
        DiffusionOptions, GenerateRequest, GeneratedImage, ImageLocation, ImageModel,
        InpaintOptions, LegacyInpaintPayload, LucidOriginOptions, LucidOriginPayload,
        MaskArrayInpaintPayload, LUCID_MAX_PROMPT_CHARS,
    },
};

pub const GENERATE_PATH: &str = "image/generate";
pub const LEGACY_INPAINT_PATH: &str = "image/inpaint";
pub const MASK_ARRAY_INPAINT_PATH: &str = "generative/image/inpaint";
pub const SDXL_PATH: &str = "generative/image/sdxl";
pub const IMAGE_TO_IMAGE_PATH: &str = "generative/image/imageToImage";
pub const LUCID_ORIGIN_PATH: &str = "generative/image/lucidOriginTTI";

/// Inpainting body in whichever schema the backend was configured for.
#[derive(Debug, Clone, PartialEq)]
pub enum InpaintBody {
    Legacy(LegacyInpaintPayload),
    MaskArray(MaskArrayInpaintPayload),
}

impl InpaintBody {
    pub fn path(&self) -> &'static str {
        match self {
            InpaintBody::Legacy(_) => LEGACY_INPAINT_PATH,
            InpaintBody::MaskArray(_) => MASK_ARRAY_INPAINT_PATH,
        }
    }
}

pub(crate) fn require_prompt(prompt: &str, message: &str) -> Result<()> {
    if prompt.trim().is_empty() {
        return Err(GatewayError::ValidationError(message.to_string()));
    }
    Ok(())
}

fn require_image(image: Option<&[u8]>) -> Result<&[u8]> {
    image
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| GatewayError::ValidationError("Please upload an image".into()))
}

#[derive(Clone)]
pub struct ImageClient {
    transport: BackendTransport,
}

impl ImageClient {
    pub fn new(transport: BackendTransport) -> Self {
        Self { transport }
    }

    pub fn build_generate_request(
        prompt: &str,
        steps: u32,
        model: ImageModel,
    ) -> Result<GenerateRequest> {
        require_prompt(prompt, "Please enter a prompt")?;
        if steps == 0 {
            return Err(GatewayError::ValidationError(
                "Steps must be at least 1".into(),
            ));
        }
        Ok(GenerateRequest {
            prompt: prompt.to_string(),
            steps,
            model,
        })
    }

    pub fn build_inpaint_body(
        schema: InpaintSchema,
        image: Option<&[u8]>,
        mask: Option<&MaskInput>,
        prompt: &str,
        options: &InpaintOptions,
    ) -> Result<InpaintBody> {
        let image = require_image(image)?;
        let mask = mask.ok_or_else(|| {
            GatewayError::ValidationError("Please draw a mask on the image".into())
        })?;
        require_prompt(prompt, "Please enter an inpainting prompt")?;
        options.validate()?;

        let body = match schema {
            InpaintSchema::Legacy => InpaintBody::Legacy(LegacyInpaintPayload {
                image: STANDARD.encode(image),
                mask: STANDARD.encode(mask.normalize()?),
                prompt: prompt.to_string(),
                steps: options.steps,
                model: options.model,
            }),
            InpaintSchema::MaskArray => InpaintBody::MaskArray(MaskArrayInpaintPayload {
                prompt: prompt.to_string(),
                image_b64: STANDARD.encode(image),
                mask: mask.to_grayscale_array()?,
                num_steps: options.steps,
                strength: options.strength,
                guidance: options.guidance,
                width: options.width,
                height: options.height,
                negative_prompt: options.effective_negative_prompt(),
                seed: options.seed,
                model: options.model,
            }),
        };
        Ok(body)
    }

    pub fn build_lucid_origin_payload(
        prompt: &str,
        options: &LucidOriginOptions,
    ) -> Result<LucidOriginPayload> {
        require_prompt(prompt, "Prompt is required")?;
        if prompt.chars().count() > LUCID_MAX_PROMPT_CHARS {
            return Err(GatewayError::ValidationError(format!(
                "Prompt cannot exceed {} characters",
                LUCID_MAX_PROMPT_CHARS
            )));
        }
        options.validate()?;
        Ok(LucidOriginPayload {
            prompt: prompt.to_string(),
            steps: options.steps,
            guidance: options.guidance,
            height: options.height,
            width: options.width,
            seed: options.seed,
            model: ImageModel::LucidOrigin,
        })
    }

    pub async fn generate(
        &self,
        prompt: &str,
        steps: u32,
        model: ImageModel,
    ) -> Result<GeneratedImage> {
        let request = Self::build_generate_request(prompt, steps, model)?;
        log::info!(
            "Generating image with prompt: '{}', steps: {}, model: {}",
            request.prompt,
            request.steps,
            request.model
        );

        self.post_for_image(
            "image generation",
            GENERATE_PATH,
            &request,
            "Unknown error occurred",
        )
        .await
    }

    pub async fn inpaint(
        &self,
        image: Option<&[u8]>,
        mask: Option<&MaskInput>,
        prompt: &str,
        options: &InpaintOptions,
    ) -> Result<GeneratedImage> {
        let schema = self.transport.config().inpaint_schema;
        let body = Self::build_inpaint_body(schema, image, mask, prompt, options)?;
        log::info!(
            "Inpainting with prompt: '{}', steps: {}, model: {}, schema: {}",
            prompt,
            options.steps,
            options.model,
            schema.as_str()
        );

        let fallback = "Unknown inpainting error occurred";
        match &body {
            InpaintBody::Legacy(payload) => {
                self.post_for_image("inpainting", body.path(), payload, fallback)
                    .await
            }
            InpaintBody::MaskArray(payload) => {
                self.post_for_image("inpainting", body.path(), payload, fallback)
                    .await
            }
        }
    }

    /// Text-to-image on the SDXL pipeline, with its full sampler settings.
    pub async fn sdxl(&self, prompt: &str, options: &DiffusionOptions) -> Result<GeneratedImage> {
        require_prompt(prompt, "Prompt is required")?;
        options.validate()?;
        let payload = options.payload(prompt, None);
        log::info!(
            "SDXL generation with prompt: '{}', {}x{}, steps: {}",
            prompt,
            payload.width,
            payload.height,
            payload.num_steps
        );

        self.post_for_image("SDXL generation", SDXL_PATH, &payload, "Failed to generate image")
            .await
    }

    /// Re-renders `image` guided by `prompt`.
    pub async fn image_to_image(
        &self,
        image: Option<&[u8]>,
        prompt: &str,
        options: &DiffusionOptions,
    ) -> Result<GeneratedImage> {
        require_prompt(prompt, "Prompt is required")?;
        let image = require_image(image)?;
        options.validate()?;
        let payload = options.payload(prompt, Some(STANDARD.encode(image)));
        log::info!(
            "Image-to-image with prompt: '{}', strength: {}, {}x{}",
            prompt,
            payload.strength,
            payload.width,
            payload.height
        );

        self.post_for_image(
            "image-to-image generation",
            IMAGE_TO_IMAGE_PATH,
            &payload,
            "Request failed",
        )
        .await
    }

    pub async fn lucid_origin(
        &self,
        prompt: &str,
        options: &LucidOriginOptions,
    ) -> Result<GeneratedImage> {
        let payload = Self::build_lucid_origin_payload(prompt, options)?;
        log::info!(
            "Lucid Origin generation with prompt: '{}', steps: {}",
            payload.prompt,
            payload.steps
        );

        self.post_for_image(
            "Lucid Origin generation",
            LUCID_ORIGIN_PATH,
            &payload,
            "Failed to generate image",
        )
        .await
    }

    /// One generation-class exchange: POST, decode the envelope, fetch the image.
    async fn post_for_image<B: Serialize + ?Sized>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<GeneratedImage> {
        let _timer = logger::timer(operation);
        self.exchange(path, body, fallback)
            .await
            .map_err(|e| e.during(operation))
    }

    async fn exchange<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<GeneratedImage> {
        let envelope = self
            .transport
            .post_envelope(path, body, self.transport.config().generation_timeout)
            .await?;
        let data = envelope.into_object(fallback)?;
        let location = ImageLocation::from_data(data)?;

        self.transport.load_image(location).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use crate::mask::{EditorPayload, MASK_SIZE};
    use crate::models::ImageOrigin;
    use crate::test_support::{centre_square_mask_png, solid_png};
    use reqwest::Client;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{any, body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, schema: InpaintSchema) -> ImageClient {
        let config = GatewayConfig::new()
            .with_base_url(format!("{}/api/v1", server.uri()))
            .with_inpaint_schema(schema);
        ImageClient::new(BackendTransport::new(Client::new(), Arc::new(config)))
    }

    #[tokio::test]
    async fn test_blank_prompt_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, InpaintSchema::MaskArray);
        for prompt in ["", "   ", "\t\n"] {
            let err = client
                .generate(prompt, 4, ImageModel::FluxSchnell)
                .await
                .unwrap_err();
            assert!(matches!(err, GatewayError::ValidationError(ref m) if m == "Please enter a prompt"));
        }
    }

    #[tokio::test]
    async fn test_relative_path_triggers_one_follow_up_get() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/image/generate"))
            .and(body_json(json!({
                "prompt": "a cute cyberpunk cat",
                "steps": 4,
                "model": "@cf/black-forest-labs/flux-1-schnell"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": "true",
                "message": "ok",
                "data": {"relativePath": "/generated/cat.png"}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/generated/cat.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNGDATA".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let image = client_for(&server, InpaintSchema::MaskArray)
            .generate("a cute cyberpunk cat", 4, ImageModel::FluxSchnell)
            .await
            .unwrap();
        assert_eq!(image.bytes, b"PNGDATA");
        assert_eq!(
            image.origin,
            ImageOrigin::Remote(format!("{}/generated/cat.png", server.uri()))
        );
    }

    #[tokio::test]
    async fn test_missing_absolute_path_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/image/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": "true",
                "data": {"absolutePath": "/no/such/dir/out.png"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server, InpaintSchema::MaskArray)
            .generate("lake", 4, ImageModel::SdxlBase)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NotFoundError(_)));
    }

    #[tokio::test]
    async fn test_boolean_success_is_an_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"relativePath": "/x.png"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server, InpaintSchema::MaskArray)
            .generate("lake", 4, ImageModel::FluxSchnell)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::ApiError(ref m) if m == "Unknown error occurred"));
    }

    #[tokio::test]
    async fn test_server_error_and_bad_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/image/generate"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"success": "false", "error": "worker crashed"})),
            )
            .mount(&server)
            .await;
        let err = client_for(&server, InpaintSchema::MaskArray)
            .generate("lake", 4, ImageModel::FluxSchnell)
            .await
            .unwrap_err();
        assert!(
            matches!(err, GatewayError::HttpStatusError { status: 500, ref body } if body == "worker crashed")
        );

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;
        let err = client_for(&server, InpaintSchema::MaskArray)
            .generate("lake", 4, ImageModel::FluxSchnell)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::ResponseError(_)));
    }

    #[tokio::test]
    async fn test_legacy_inpaint_end_to_end() {
        let server = MockServer::start().await;
        let image = solid_png(512, 512, [0, 0, 255]);
        let mask = centre_square_mask_png();

        Mock::given(method("POST"))
            .and(path("/api/v1/image/inpaint"))
            .and(body_json(json!({
                "image": STANDARD.encode(&image),
                "mask": STANDARD.encode(&mask),
                "prompt": "a red flower",
                "steps": 4,
                "model": "@cf/runwayml/stable-diffusion-inpainting"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": "true",
                "data": {"relativePath": "/x.png"}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/x.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"RESULT".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let options = InpaintOptions::new()
            .with_steps(4)
            .with_model(ImageModel::StableDiffusionInpainting);
        let result = client_for(&server, InpaintSchema::Legacy)
            .inpaint(
                Some(image.as_slice()),
                Some(&MaskInput::Image(mask.clone())),
                "a red flower",
                &options,
            )
            .await
            .unwrap();
        assert_eq!(result.bytes, b"RESULT");
    }

    #[tokio::test]
    async fn test_mask_array_inpaint_payload_on_the_wire() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/generative/image/inpaint"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": "true",
                "data": {"url": format!("{}/files/out.png", server.uri())}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files/out.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"OUT".to_vec()))
            .mount(&server)
            .await;

        let image = solid_png(512, 512, [0, 0, 255]);
        let mask = MaskInput::from(EditorPayload::new().with_composite(centre_square_mask_png()));
        let options = InpaintOptions::new().with_seed(7);
        let result = client_for(&server, InpaintSchema::MaskArray)
            .inpaint(Some(image.as_slice()), Some(&mask), "a red flower", &options)
            .await
            .unwrap();
        assert_eq!(result.bytes, b"OUT");

        let requests = server.received_requests().await.unwrap();
        let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(sent["image_b64"], STANDARD.encode(&image));
        assert_eq!(
            sent["mask"].as_array().unwrap().len(),
            (MASK_SIZE * MASK_SIZE) as usize
        );
        assert_eq!(sent["num_steps"], 4);
        assert_eq!(sent["seed"], 7);
        assert!(sent.get("negative_prompt").is_none());
        assert_eq!(sent["model"], "@cf/runwayml/stable-diffusion-v1-5-inpainting");
    }

    #[test]
    fn test_inpaint_preconditions() {
        let image = solid_png(4, 4, [0, 0, 0]);
        let mask = MaskInput::Image(solid_png(4, 4, [255, 255, 255]));
        let options = InpaintOptions::new();

        let err = ImageClient::build_inpaint_body(
            InpaintSchema::Legacy,
            None,
            Some(&mask),
            "p",
            &options,
        )
        .unwrap_err();
        assert_eq!(err.user_message(), "Please upload an image");

        let err = ImageClient::build_inpaint_body(
            InpaintSchema::Legacy,
            Some(image.as_slice()),
            None,
            "p",
            &options,
        )
        .unwrap_err();
        assert_eq!(err.user_message(), "Please draw a mask on the image");

        let err = ImageClient::build_inpaint_body(
            InpaintSchema::Legacy,
            Some(image.as_slice()),
            Some(&mask),
            "  ",
            &options,
        )
        .unwrap_err();
        assert_eq!(err.user_message(), "Please enter an inpainting prompt");
    }

    #[test]
    fn test_identical_inputs_give_identical_payloads() {
        let image = solid_png(32, 32, [0, 0, 255]);
        let mask = MaskInput::Image(centre_square_mask_png());
        let options = InpaintOptions::new().with_negative_prompt("blurry");

        for schema in [InpaintSchema::Legacy, InpaintSchema::MaskArray] {
            let first =
                ImageClient::build_inpaint_body(schema, Some(image.as_slice()), Some(&mask), "p", &options)
                    .unwrap();
            let second =
                ImageClient::build_inpaint_body(schema, Some(image.as_slice()), Some(&mask), "p", &options)
                    .unwrap();
            assert_eq!(first, second);
        }

        let a = ImageClient::build_generate_request("fox", 4, ImageModel::FluxSchnell).unwrap();
        let b = ImageClient::build_generate_request("fox", 4, ImageModel::FluxSchnell).unwrap();
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
    }

    #[tokio::test]
    async fn test_slow_generation_times_out_with_its_own_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/generative/image/inpaint"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": "true", "data": {"relativePath": "/x.png"}}))
                    .set_delay(Duration::from_secs(2)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let config = GatewayConfig::new()
            .with_base_url(format!("{}/api/v1", server.uri()))
            .with_timeouts(Duration::from_millis(200), Duration::from_secs(5));
        let client = ImageClient::new(BackendTransport::new(Client::new(), Arc::new(config)));

        let image = solid_png(16, 16, [0, 0, 255]);
        let mask = MaskInput::Image(solid_png(16, 16, [255, 255, 255]));
        let err = client
            .inpaint(Some(image.as_slice()), Some(&mask), "a red flower", &InpaintOptions::new())
            .await
            .unwrap_err();
        assert_eq!(
            err.user_message(),
            "Request timeout. The inpainting is taking too long."
        );
    }

    #[tokio::test]
    async fn test_object_valued_error_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/image/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": "false",
                "error": {"code": 7, "detail": "quota"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server, InpaintSchema::MaskArray)
            .generate("lake", 4, ImageModel::FluxSchnell)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::ApiError(ref m) if m == "Unknown error occurred"));
    }

    #[tokio::test]
    async fn test_sdxl_sends_sampler_settings() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/generative/image/sdxl"))
            .and(body_json(json!({
                "prompt": "a zen garden",
                "height": 1024,
                "width": 1024,
                "num_steps": 20,
                "strength": 1.0,
                "guidance": 7.5,
                "seed": 99
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": "true",
                "message": "Image generated",
                "data": {"fileId": "f1", "url": format!("{}/ik/zen.png", server.uri())}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ik/zen.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ZEN".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let image = client_for(&server, InpaintSchema::MaskArray)
            .sdxl("a zen garden", &DiffusionOptions::sdxl().with_seed(99))
            .await
            .unwrap();
        assert_eq!(image.bytes, b"ZEN");
    }

    #[tokio::test]
    async fn test_image_to_image_carries_source_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/generative/image/imageToImage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": "true",
                "data": {"url": format!("{}/ik/paint.png", server.uri())}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ik/paint.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PAINT".to_vec()))
            .mount(&server)
            .await;

        let source = solid_png(300, 200, [10, 20, 30]);
        let options = DiffusionOptions::image_to_image()
            .with_size_of(&source)
            .unwrap();
        let result = client_for(&server, InpaintSchema::MaskArray)
            .image_to_image(Some(source.as_slice()), "watercolor", &options)
            .await
            .unwrap();
        assert_eq!(result.bytes, b"PAINT");

        let requests = server.received_requests().await.unwrap();
        let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(sent["image_b64"], STANDARD.encode(&source));
        assert_eq!(sent["width"], 300);
        assert_eq!(sent["height"], 200);
        assert_eq!(sent["strength"], 0.8);
        assert!(sent.get("negative_prompt").is_none());
    }

    #[tokio::test]
    async fn test_image_to_image_needs_an_image() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server, InpaintSchema::MaskArray)
            .image_to_image(None, "watercolor", &DiffusionOptions::image_to_image())
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Please upload an image");
    }

    #[tokio::test]
    async fn test_lucid_origin_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/generative/image/lucidOriginTTI"))
            .and(body_json(json!({
                "prompt": "misty forest",
                "steps": 8,
                "guidance": 4.5,
                "height": 1120,
                "width": 1120,
                "model": "@cf/leonardo/lucid-origin"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": "true",
                "data": {"url": format!("{}/ik/forest.png", server.uri())}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ik/forest.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"FOREST".to_vec()))
            .mount(&server)
            .await;

        let image = client_for(&server, InpaintSchema::MaskArray)
            .lucid_origin("misty forest", &LucidOriginOptions::new())
            .await
            .unwrap();
        assert_eq!(image.bytes, b"FOREST");
    }

    #[test]
    fn test_lucid_origin_prompt_limit() {
        let long = "a".repeat(LUCID_MAX_PROMPT_CHARS + 1);
        let err = ImageClient::build_lucid_origin_payload(&long, &LucidOriginOptions::new())
            .unwrap_err();
        assert_eq!(err.user_message(), "Prompt cannot exceed 2048 characters");

        let err = ImageClient::build_lucid_origin_payload(" ", &LucidOriginOptions::new())
            .unwrap_err();
        assert_eq!(err.user_message(), "Prompt is required");
    }
}
