use serde::{Deserialize, Serialize};

/// Generation parameter set for the OpenAI-compatible images endpoint.
///
/// All fields are optional; unset fields are filled from the process-wide
/// defaults at call time and omitted from the wire body. Field names follow
/// the vendor wire format (`batch_size` instead of `n`, `size_width`,
/// `size_height`, `num_inference_steps`).
///
/// `width`, `height` and `size` are mutually derived: the struct stores all
/// three raw values, the setters keep them synchronized and the getters
/// derive missing values on read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    #[serde(rename = "batch_size", skip_serializing_if = "Option::is_none")]
    n: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,

    #[serde(rename = "size_width", skip_serializing_if = "Option::is_none")]
    width: Option<u32>,

    #[serde(rename = "size_height", skip_serializing_if = "Option::is_none")]
    height: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    quality: Option<String>,

    #[serde(rename = "response_format", skip_serializing_if = "Option::is_none")]
    response_format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<String>,

    /// Input image as a base64 data URL; presence signals edit semantics.
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<String>,

    #[serde(rename = "negative_prompt", skip_serializing_if = "Option::is_none")]
    negative_prompt: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<i64>,

    #[serde(rename = "guidance_scale", skip_serializing_if = "Option::is_none")]
    guidance_scale: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    cfg: Option<f64>,

    #[serde(
        rename = "num_inference_steps",
        skip_serializing_if = "Option::is_none"
    )]
    inference_steps: Option<u32>,
}

fn parse_size(size: &str) -> Option<(u32, u32)> {
    let mut parts = size.split('x');
    let width = parts.next()?.parse().ok()?;
    let height = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((width, height))
}

impl ImageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n(&self) -> Option<u32> {
        self.n
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Stored width, or the width component of `size` when it parses.
    pub fn width(&self) -> Option<u32> {
        self.width
            .or_else(|| self.size.as_deref().and_then(parse_size).map(|(w, _)| w))
    }

    /// Stored height, or the height component of `size` when it parses.
    pub fn height(&self) -> Option<u32> {
        self.height
            .or_else(|| self.size.as_deref().and_then(parse_size).map(|(_, h)| h))
    }

    /// Stored size string (returned literally even when unparsable), or the
    /// `"{width}x{height}"` composite when both components are set.
    pub fn size(&self) -> Option<String> {
        if self.size.is_some() {
            return self.size.clone();
        }
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(format!("{}x{}", w, h)),
            _ => None,
        }
    }

    pub fn quality(&self) -> Option<&str> {
        self.quality.as_deref()
    }

    pub fn response_format(&self) -> Option<&str> {
        self.response_format.as_deref()
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn negative_prompt(&self) -> Option<&str> {
        self.negative_prompt.as_deref()
    }

    pub fn seed(&self) -> Option<i64> {
        self.seed
    }

    pub fn guidance_scale(&self) -> Option<u32> {
        self.guidance_scale
    }

    pub fn cfg(&self) -> Option<f64> {
        self.cfg
    }

    pub fn inference_steps(&self) -> Option<u32> {
        self.inference_steps
    }

    pub fn set_width(&mut self, width: Option<u32>) {
        self.width = width;
        self.sync_size_from_dimensions();
    }

    pub fn set_height(&mut self, height: Option<u32>) {
        self.height = height;
        self.sync_size_from_dimensions();
    }

    /// Stores the size string literally; width and height are recomputed only
    /// when it parses as `"{w}x{h}"`, otherwise they keep their prior values.
    pub fn set_size(&mut self, size: Option<String>) {
        if let Some(ref value) = size {
            if let Some((w, h)) = parse_size(value) {
                self.width = Some(w);
                self.height = Some(h);
            }
        }
        self.size = size;
    }

    pub fn set_image(&mut self, image: Option<String>) {
        self.image = image;
    }

    pub fn set_prompt(&mut self, prompt: Option<String>) {
        self.prompt = prompt;
    }

    fn sync_size_from_dimensions(&mut self) {
        if let (Some(w), Some(h)) = (self.width, self.height) {
            self.size = Some(format!("{}x{}", w, h));
        }
    }

    pub fn with_n(mut self, n: u32) -> Self {
        self.n = Some(n);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.set_width(Some(width));
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.set_height(Some(height));
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.set_size(Some(size.into()));
        self
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = Some(quality.into());
        self
    }

    pub fn with_response_format(mut self, response_format: impl Into<String>) -> Self {
        self.response_format = Some(response_format.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative_prompt.into());
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_guidance_scale(mut self, guidance_scale: u32) -> Self {
        self.guidance_scale = Some(guidance_scale);
        self
    }

    pub fn with_cfg(mut self, cfg: f64) -> Self {
        self.cfg = Some(cfg);
        self
    }

    pub fn with_inference_steps(mut self, inference_steps: u32) -> Self {
        self.inference_steps = Some(inference_steps);
        self
    }

    /// Field-wise null-coalescing merge of per-call options over process-wide
    /// defaults, applied to the raw stored fields so no field influences
    /// another's merge decision; width/height/size derivation happens inside
    /// the resulting value on read.
    ///
    /// Two exceptions to the plain coalesce:
    /// - `prompt` has a two-tier fallback: the explicit `call_prompt` wins
    ///   over the runtime prompt, which wins over the default prompt;
    /// - `image` is taken only from the runtime options. An input image is
    ///   call-specific and must never leak from a stale default.
    pub fn merge(runtime: &ImageOptions, defaults: &ImageOptions, call_prompt: Option<&str>) -> ImageOptions {
        ImageOptions {
            n: runtime.n.or(defaults.n),
            model: runtime.model.clone().or_else(|| defaults.model.clone()),
            width: runtime.width.or(defaults.width),
            height: runtime.height.or(defaults.height),
            quality: runtime.quality.clone().or_else(|| defaults.quality.clone()),
            response_format: runtime
                .response_format
                .clone()
                .or_else(|| defaults.response_format.clone()),
            size: runtime.size.clone().or_else(|| defaults.size.clone()),
            style: runtime.style.clone().or_else(|| defaults.style.clone()),
            user: runtime.user.clone().or_else(|| defaults.user.clone()),
            image: runtime.image.clone(),
            prompt: call_prompt
                .map(str::to_string)
                .or_else(|| runtime.prompt.clone())
                .or_else(|| defaults.prompt.clone()),
            negative_prompt: runtime
                .negative_prompt
                .clone()
                .or_else(|| defaults.negative_prompt.clone()),
            seed: runtime.seed.or(defaults.seed),
            guidance_scale: runtime.guidance_scale.or(defaults.guidance_scale),
            cfg: runtime.cfg.or(defaults.cfg),
            inference_steps: runtime.inference_steps.or(defaults.inference_steps),
        }
    }
}
