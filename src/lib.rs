//! rimagen: client for OpenAI-compatible image generation APIs.
//!
//! Provides a fluent request builder over a remote images endpoint, merges
//! per-call parameters with process-wide defaults, retries transient
//! transport failures, and supports chained multi-step "solitaire"
//! generation where each generated image becomes the input of the next step.
//!
//! ```no_run
//! use rimagen::ImageGenClient;
//!
//! # async fn run() -> rimagen::Result<()> {
//! let client = ImageGenClient::from_env();
//!
//! let url = client
//!     .param()
//!     .model("Qwen/Qwen-Image")
//!     .prompt("a starry sky")
//!     .negative_prompt("planets")
//!     .cfg(7.5)
//!     .output()
//!     .await?;
//!
//! let chain = client
//!     .param()
//!     .model("Qwen/Qwen-Image-Edit")
//!     .prompt("make the colors dreamier")
//!     .image(rimagen::media::data_url_from_path("seed.png")?)
//!     .solitaire(3)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod media;
pub mod models;

pub use client::{GenerationModel, ImageApi, ImageGenClient, ImageModel, ParamBuilder, RetryPolicy};
pub use config::{ApiConfig, OptionsConfig, RetryConfig};
pub use error::{ImageGenError, Result};
pub use models::{ImageData, ImageOptions, ImageResponse};
