use reqwest::Client;

use crate::config::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_IMAGES_PATH};
use crate::error::{ImageGenError, Result};
use crate::models::{ImageOptions, ImageResponse};

/// Low-level access to the OpenAI-compatible images endpoint. One HTTP POST
/// per generation call; retry lives a layer above.
#[derive(Debug, Clone)]
pub struct ImageApi {
    client: Client,
    base_url: String,
    images_path: String,
    api_key: Option<String>,
}

impl ImageApi {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            images_path: config
                .images_path
                .unwrap_or_else(|| DEFAULT_IMAGES_PATH.to_string()),
            api_key: config.api_key,
        }
    }

    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }

    fn build_headers(&self) -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            "application/json".parse().unwrap(),
        );
        if let Some(key) = &self.api_key {
            headers.insert(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", key).parse().unwrap(),
            );
        }
        headers
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.images_path.trim_start_matches('/')
        )
    }

    /// Sends one generation request. The prompt precondition is checked
    /// before any network I/O; a missing or empty response body decodes to an
    /// empty result, not an error.
    pub async fn create_image(&self, options: &ImageOptions) -> Result<ImageResponse> {
        let prompt_present = options
            .prompt()
            .map(|p| !p.trim().is_empty())
            .unwrap_or(false);
        if !prompt_present {
            return Err(ImageGenError::RequestError(
                "prompt must not be empty".into(),
            ));
        }

        log::debug!(
            "POST {} model={:?} edit={}",
            self.endpoint(),
            options.model(),
            options.image().is_some()
        );

        let response = self
            .client
            .post(self.endpoint())
            .headers(self.build_headers())
            .json(options)
            .send()
            .await
            .map_err(|e| ImageGenError::TransportError {
                status: None,
                message: format!("image request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImageGenError::TransportError {
                status: Some(status.as_u16()),
                message: format!("image endpoint returned {}: {}", status, body),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ImageGenError::TransportError {
                status: None,
                message: format!("failed reading response body: {}", e),
            })?;

        if body.trim().is_empty() {
            log::warn!("Image request returned an empty body, treating as empty result");
            return Ok(ImageResponse::empty());
        }

        serde_json::from_str(&body)
            .map_err(|e| ImageGenError::ResponseError(format!("invalid response body: {}", e)))
    }
}
