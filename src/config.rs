use std::env;
use std::time::Duration;

use crate::models::ImageOptions;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_IMAGES_PATH: &str = "v1/images/generations";

/// Connection settings for the OpenAI-compatible image endpoint.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub images_path: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            api_key: None,
            base_url: None,
            images_path: None,
        }
    }
}

impl ApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("OPENAI_API_KEY").ok();
        let base_url = env::var("OPENAI_BASE_URL").ok();
        let images_path = env::var("OPENAI_IMAGES_PATH").ok();

        ApiConfig {
            api_key,
            base_url,
            images_path,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_images_path(mut self, images_path: impl Into<String>) -> Self {
        self.images_path = Some(images_path.into());
        self
    }
}

/// Retry bounds for the remote call. Attempt count and backoff are
/// configuration, not logic.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub multiplier: f64,
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(2),
            multiplier: 3.0,
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let max_attempts = env::var("IMAGE_RETRY_MAX_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_attempts);
        let initial_backoff = env::var("IMAGE_RETRY_INITIAL_BACKOFF_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.initial_backoff);

        RetryConfig {
            max_attempts,
            initial_backoff,
            ..defaults
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub fn with_max_backoff(mut self, backoff: Duration) -> Self {
        self.max_backoff = backoff;
        self
    }
}

/// Loader for the process-wide default [`ImageOptions`]. Read once at startup
/// and injected into the generation model; never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct OptionsConfig;

impl OptionsConfig {
    pub fn from_env() -> ImageOptions {
        let mut options = ImageOptions::new();

        if let Ok(model) = env::var("IMAGE_OPTIONS_MODEL") {
            options = options.with_model(model);
        }
        if let Ok(prompt) = env::var("IMAGE_OPTIONS_PROMPT") {
            options = options.with_prompt(prompt);
        }
        if let Ok(negative) = env::var("IMAGE_OPTIONS_NEGATIVE_PROMPT") {
            options = options.with_negative_prompt(negative);
        }
        if let Some(n) = env::var("IMAGE_OPTIONS_N").ok().and_then(|s| s.parse().ok()) {
            options = options.with_n(n);
        }
        if let Some(width) = env::var("IMAGE_OPTIONS_WIDTH")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            options = options.with_width(width);
        }
        if let Some(height) = env::var("IMAGE_OPTIONS_HEIGHT")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            options = options.with_height(height);
        }
        if let Ok(size) = env::var("IMAGE_OPTIONS_SIZE") {
            options = options.with_size(size);
        }
        if let Ok(quality) = env::var("IMAGE_OPTIONS_QUALITY") {
            options = options.with_quality(quality);
        }
        if let Ok(format) = env::var("IMAGE_OPTIONS_RESPONSE_FORMAT") {
            options = options.with_response_format(format);
        }
        if let Ok(style) = env::var("IMAGE_OPTIONS_STYLE") {
            options = options.with_style(style);
        }
        if let Ok(user) = env::var("IMAGE_OPTIONS_USER") {
            options = options.with_user(user);
        }
        if let Some(seed) = env::var("IMAGE_OPTIONS_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            options = options.with_seed(seed);
        }
        if let Some(scale) = env::var("IMAGE_OPTIONS_GUIDANCE_SCALE")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            options = options.with_guidance_scale(scale);
        }
        if let Some(cfg) = env::var("IMAGE_OPTIONS_CFG")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            options = options.with_cfg(cfg);
        }
        if let Some(steps) = env::var("IMAGE_OPTIONS_INFERENCE_STEPS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            options = options.with_inference_steps(steps);
        }

        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_config_builders() {
        let config = ApiConfig::new()
            .with_api_key("sk-test")
            .with_base_url("https://example.com")
            .with_images_path("v1/images/generations");

        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.base_url.as_deref(), Some("https://example.com"));
        assert_eq!(
            config.images_path.as_deref(),
            Some("v1/images/generations")
        );
    }

    #[test]
    fn test_retry_config_defaults() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.initial_backoff, Duration::from_secs(2));
        assert_eq!(config.max_backoff, Duration::from_secs(30));
    }
}
