use serde::{Deserialize, Serialize};

/// Response body of the images endpoint:
/// `{ "created": ..., "data": [ { "url", "b64_json", "revised_prompt" } ] }`.
///
/// An empty or missing body is a valid empty result, not an error; callers
/// must check [`ImageResponse::is_empty`] before indexing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageResponse {
    pub created: Option<i64>,
    pub data: Vec<ImageData>,
}

/// One generated image. Exactly one of `url`/`b64_json` is expected to be
/// populated, depending on the requested response format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(rename = "b64_json", skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,

    #[serde(rename = "revised_prompt", skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

impl ImageResponse {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn first(&self) -> Option<&ImageData> {
        self.data.first()
    }

    /// Primary image reference of the first item: the url when present,
    /// otherwise the base64 payload.
    pub fn first_image(&self) -> Option<&str> {
        self.first().and_then(|data| data.image())
    }
}

impl ImageData {
    pub fn image(&self) -> Option<&str> {
        self.url.as_deref().or(self.b64_json.as_deref())
    }
}
