use async_trait::async_trait;

use crate::client::api::ImageApi;
use crate::client::retry::RetryPolicy;
use crate::config::{ApiConfig, OptionsConfig, RetryConfig};
use crate::error::Result;
use crate::logger;
use crate::models::{ImageOptions, ImageResponse};

/// The seam between the fluent facade / solitaire engine and the transport.
/// Implementations merge per-call options with defaults and execute one
/// generation request; tests substitute a mock.
#[async_trait]
pub trait ImageModel: Send + Sync {
    /// `prompt` is the instruction text carried alongside the call, which
    /// takes priority over the options' own prompt field.
    async fn call(&self, prompt: Option<&str>, options: &ImageOptions) -> Result<ImageResponse>;
}

/// Production [`ImageModel`]: injected read-only default options, retry
/// wrapper, and the HTTP API client.
pub struct GenerationModel {
    api: ImageApi,
    default_options: ImageOptions,
    retry: RetryPolicy,
}

impl GenerationModel {
    pub fn new(api: ImageApi, default_options: ImageOptions, retry: RetryConfig) -> Self {
        Self {
            api,
            default_options,
            retry: RetryPolicy::from_config(retry),
        }
    }

    /// Wires the model from environment configuration: endpoint settings,
    /// retry bounds, and the full default option set.
    pub fn from_env() -> Self {
        let defaults = OptionsConfig::from_env();
        log::info!(
            "Loaded default image options: model={:?}, size={:?}",
            defaults.model(),
            defaults.size()
        );
        Self::new(
            ImageApi::new(ApiConfig::from_env()),
            defaults,
            RetryConfig::from_env(),
        )
    }

    pub fn default_options(&self) -> &ImageOptions {
        &self.default_options
    }
}

#[async_trait]
impl ImageModel for GenerationModel {
    async fn call(&self, prompt: Option<&str>, options: &ImageOptions) -> Result<ImageResponse> {
        let merged = ImageOptions::merge(options, &self.default_options, prompt);

        let rid = logger::request_id();
        log::info!(
            "[{}] Generating image with model: {:?}",
            rid,
            merged.model()
        );
        let _timer = logger::timer("create_image");

        let api = &self.api;
        let request = &merged;
        let response = self
            .retry
            .execute("create_image", move || api.create_image(request))
            .await;

        match &response {
            Ok(result) => log::info!("[{}] Received {} image(s)", rid, result.data.len()),
            Err(e) => log::error!("[{}] Image generation failed: {}", rid, e),
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_call_merges_defaults_into_request() {
        let server = MockServer::start().await;

        // model and inference steps must come from the defaults, the prompt
        // from the call, and the input image from the runtime options
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .and(body_partial_json(json!({
                "model": "Qwen/Qwen-Image-Edit",
                "num_inference_steps": 20,
                "prompt": "make the colors dreamier",
                "image": "data:image/png;base64,aGVsbG8="
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "created": 1,
                "data": [{ "url": "https://img.example/out.png" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let model = GenerationModel::new(
            ImageApi::new(ApiConfig::new().with_base_url(server.uri())),
            ImageOptions::new()
                .with_model("Qwen/Qwen-Image-Edit")
                .with_inference_steps(20),
            RetryConfig::new().with_max_attempts(1),
        );

        let runtime = ImageOptions::new().with_image("data:image/png;base64,aGVsbG8=");
        let response = model
            .call(Some("make the colors dreamier"), &runtime)
            .await
            .unwrap();
        assert_eq!(response.first_image(), Some("https://img.example/out.png"));
    }
}
