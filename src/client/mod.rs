pub mod api;
pub mod model;
pub mod retry;
pub mod solitaire;

use std::sync::Arc;

use crate::error::{ImageGenError, Result};
use crate::models::{ImageOptions, ImageResponse};

pub use api::ImageApi;
pub use model::{GenerationModel, ImageModel};
pub use retry::RetryPolicy;

/// Entry point for image generation. Each call configures a fresh
/// [`ParamBuilder`]; builders are owned per call and never shared.
#[derive(Clone)]
pub struct ImageGenClient {
    backend: Arc<dyn ImageModel>,
}

impl ImageGenClient {
    pub fn new(model: GenerationModel) -> Self {
        Self {
            backend: Arc::new(model),
        }
    }

    /// Builds the client from environment configuration (endpoint, retry
    /// bounds, default options).
    pub fn from_env() -> Self {
        Self::new(GenerationModel::from_env())
    }

    pub fn with_backend(backend: Arc<dyn ImageModel>) -> Self {
        Self { backend }
    }

    pub fn param(&self) -> ParamBuilder {
        ParamBuilder {
            backend: self.backend.clone(),
            options: ImageOptions::new(),
        }
    }
}

/// Fluent per-call parameter accumulator. Consumed by its terminal
/// operations, so the configured options are immutable once the request is
/// underway.
pub struct ParamBuilder {
    backend: Arc<dyn ImageModel>,
    options: ImageOptions,
}

impl ParamBuilder {
    pub fn n(mut self, n: u32) -> Self {
        self.options = self.options.with_n(n);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.options = self.options.with_model(model);
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.options = self.options.with_width(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.options = self.options.with_height(height);
        self
    }

    pub fn quality(mut self, quality: impl Into<String>) -> Self {
        self.options = self.options.with_quality(quality);
        self
    }

    pub fn response_format(mut self, response_format: impl Into<String>) -> Self {
        self.options = self.options.with_response_format(response_format);
        self
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.options = self.options.with_size(size);
        self
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.options = self.options.with_style(style);
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.options = self.options.with_user(user);
        self
    }

    /// Input image as a base64 data URL; switches the call to edit semantics.
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.options = self.options.with_image(image);
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.options = self.options.with_prompt(prompt);
        self
    }

    pub fn negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.options = self.options.with_negative_prompt(negative_prompt);
        self
    }

    pub fn seed(mut self, seed: i64) -> Self {
        self.options = self.options.with_seed(seed);
        self
    }

    pub fn guidance_scale(mut self, guidance_scale: u32) -> Self {
        self.options = self.options.with_guidance_scale(guidance_scale);
        self
    }

    pub fn cfg(mut self, cfg: f64) -> Self {
        self.options = self.options.with_cfg(cfg);
        self
    }

    pub fn inference_steps(mut self, inference_steps: u32) -> Self {
        self.options = self.options.with_inference_steps(inference_steps);
        self
    }

    /// Single-shot generation returning the full decoded response.
    pub async fn call(self) -> Result<ImageResponse> {
        self.backend.call(None, &self.options).await
    }

    /// Single-shot generation returning the primary image reference.
    pub async fn output(self) -> Result<String> {
        let response = self.backend.call(None, &self.options).await?;
        response
            .first_image()
            .map(str::to_string)
            .ok_or_else(|| ImageGenError::ResponseError("generation returned no images".into()))
    }

    /// Chained generation: each step's output image becomes the next step's
    /// input. Requires `model` and `image`; `step` must be in 1..=7.
    pub async fn solitaire(self, step: u32) -> Result<Vec<String>> {
        solitaire::run_chain(self.backend.as_ref(), &self.options, step, None).await
    }

    /// Chained generation with a per-step prompt list. An empty list behaves
    /// like [`ParamBuilder::solitaire`]; a short list clamps to its last
    /// prompt.
    pub async fn solitaire_with_prompts(
        self,
        step: u32,
        prompts: Vec<String>,
    ) -> Result<Vec<String>> {
        solitaire::run_chain(self.backend.as_ref(), &self.options, step, Some(&prompts)).await
    }

    /// Text-seeded chain: a text-to-image call produces the seed (entry 0),
    /// then `step` image-to-image steps follow. No input image is required.
    pub async fn text_start_solitaire(self, step: u32) -> Result<Vec<String>> {
        solitaire::run_text_seeded_chain(self.backend.as_ref(), &self.options, step).await
    }
}
