use crate::client::model::ImageModel;
use crate::error::{ImageGenError, Result};
use crate::logger;
use crate::media;
use crate::models::ImageOptions;

pub const MIN_STEPS: u32 = 1;
pub const MAX_STEPS: u32 = 7;
/// Above this step count generation time grows materially; advisory only.
const ADVISORY_STEPS: u32 = 3;

fn validate_step(step: u32) -> Result<()> {
    if !(MIN_STEPS..=MAX_STEPS).contains(&step) {
        return Err(ImageGenError::InvalidArgument(format!(
            "step must be between {} and {}, got {}",
            MIN_STEPS, MAX_STEPS, step
        )));
    }
    if step > ADVISORY_STEPS {
        log::warn!(
            "step {} exceeds {}: generation time may increase substantially",
            step,
            ADVISORY_STEPS
        );
    }
    Ok(())
}

fn step_error(step: usize, source: ImageGenError) -> ImageGenError {
    ImageGenError::SolitaireError {
        step,
        source: Box::new(source),
    }
}

/// Prompt for step `i`: the supplied per-step list when present (a short list
/// clamps to its last element, an empty list means the shared prompt), else
/// the shared prompt from the base options.
fn step_prompt<'a>(
    base: &'a ImageOptions,
    prompts: Option<&'a [String]>,
    i: usize,
) -> Option<&'a str> {
    match prompts {
        Some(list) if !list.is_empty() => Some(list[i.min(list.len() - 1)].as_str()),
        _ => base.prompt(),
    }
}

/// Materializes a chain entry as an embedded data URL for the next step's
/// input. Data URLs are reused verbatim; remote URLs are fetched and
/// re-encoded.
async fn materialize(reference: &str) -> Result<String> {
    if media::is_data_url(reference) {
        Ok(reference.to_string())
    } else {
        media::fetch_as_data_url(reference).await
    }
}

/// Runs the image-to-image solitaire chain: each step's output image becomes
/// the next step's input. Steps are strictly sequential by data dependency.
///
/// The chain is returned in generation order; entry `k` is the image used as
/// input to step `k + 1`. Any step failure aborts the whole chain: the
/// completed prefix is discarded and the error names the failing step.
pub async fn run_chain(
    model: &dyn ImageModel,
    base: &ImageOptions,
    step: u32,
    prompts: Option<&[String]>,
) -> Result<Vec<String>> {
    if base.model().is_none() {
        return Err(ImageGenError::InvalidArgument(
            "model must be set before starting a solitaire chain".into(),
        ));
    }
    if base.image().is_none() {
        return Err(ImageGenError::InvalidArgument(
            "image must be set: the chain always starts from an existing image".into(),
        ));
    }
    validate_step(step)?;

    let _timer = logger::timer("solitaire");
    let mut chain: Vec<String> = Vec::with_capacity(step as usize);
    let mut options = base.clone();

    for i in 0..step as usize {
        if i > 0 {
            let input = materialize(&chain[i - 1])
                .await
                .map_err(|e| step_error(i, e))?;
            options.set_image(Some(input));
        }

        let prompt = step_prompt(base, prompts, i);
        let response = model
            .call(prompt, &options)
            .await
            .map_err(|e| step_error(i, e))?;

        let output = response
            .first_image()
            .ok_or_else(|| {
                step_error(
                    i,
                    ImageGenError::ResponseError("generation returned no images".into()),
                )
            })?
            .to_string();

        log::info!("step: {}, output: {}", i + 1, output);
        chain.push(output);
    }

    log::info!("solitaire complete: {} image(s)", chain.len());
    Ok(chain)
}

/// Text-seeded variant: one text-to-image call produces the seed image
/// (chain entry 0), then the image-to-image chain runs `step` more times
/// starting from that seed. A successful result has `step + 1` entries.
pub async fn run_text_seeded_chain(
    model: &dyn ImageModel,
    base: &ImageOptions,
    step: u32,
) -> Result<Vec<String>> {
    if base.model().is_none() {
        return Err(ImageGenError::InvalidArgument(
            "model must be set before starting a solitaire chain".into(),
        ));
    }
    validate_step(step)?;

    let mut seed_options = base.clone();
    seed_options.set_image(None);

    let seed_response = model
        .call(None, &seed_options)
        .await
        .map_err(|e| step_error(0, e))?;
    let seed = seed_response
        .first_image()
        .ok_or_else(|| {
            step_error(
                0,
                ImageGenError::ResponseError("seed generation returned no images".into()),
            )
        })?
        .to_string();
    log::info!("seed image: {}", seed);

    let seed_input = materialize(&seed).await.map_err(|e| step_error(0, e))?;
    let chain_base = base.clone().with_image(seed_input);

    let rest = run_chain(model, &chain_base, step, None)
        .await
        .map_err(|e| match e {
            // step indices shift by one behind the seed entry
            ImageGenError::SolitaireError { step, source } => ImageGenError::SolitaireError {
                step: step + 1,
                source,
            },
            other => other,
        })?;

    let mut chain = Vec::with_capacity(rest.len() + 1);
    chain.push(seed);
    chain.extend(rest);
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImageData, ImageResponse};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every call and answers with a distinguishable data URL so the
    /// chain never touches the network.
    struct MockModel {
        calls: Mutex<Vec<(Option<String>, ImageOptions)>>,
        fail_at: Option<usize>,
    }

    impl MockModel {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_at: None,
            }
        }

        fn failing_at(call_index: usize) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_at: Some(call_index),
            }
        }

        fn calls(&self) -> Vec<(Option<String>, ImageOptions)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ImageModel for MockModel {
        async fn call(
            &self,
            prompt: Option<&str>,
            options: &ImageOptions,
        ) -> crate::error::Result<ImageResponse> {
            let mut calls = self.calls.lock().unwrap();
            let index = calls.len();
            calls.push((prompt.map(str::to_string), options.clone()));

            if self.fail_at == Some(index) {
                return Err(ImageGenError::TransportError {
                    status: Some(500),
                    message: "mock failure".into(),
                });
            }

            Ok(ImageResponse {
                created: Some(index as i64),
                data: vec![ImageData {
                    url: Some(format!("data:image/png;base64,b3V0cHV0{}", index)),
                    b64_json: None,
                    revised_prompt: None,
                }],
            })
        }
    }

    fn chain_base() -> ImageOptions {
        ImageOptions::new()
            .with_model("Qwen/Qwen-Image-Edit")
            .with_prompt("make the colors dreamier")
            .with_image("data:image/png;base64,c2VlZA==")
    }

    #[tokio::test]
    async fn test_step_bounds_rejected_before_any_call() {
        let model = MockModel::new();
        for bad_step in [0, 8] {
            let err = run_chain(&model, &chain_base(), bad_step, None)
                .await
                .unwrap_err();
            assert!(matches!(err, ImageGenError::InvalidArgument(_)));
        }
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_image_rejected() {
        let model = MockModel::new();
        let base = ImageOptions::new()
            .with_model("Qwen/Qwen-Image-Edit")
            .with_prompt("p");
        let err = run_chain(&model, &base, 2, None).await.unwrap_err();
        assert!(matches!(err, ImageGenError::InvalidArgument(_)));
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_model_rejected() {
        let model = MockModel::new();
        let base = ImageOptions::new()
            .with_prompt("p")
            .with_image("data:image/png;base64,c2VlZA==");
        let err = run_chain(&model, &base, 2, None).await.unwrap_err();
        assert!(matches!(err, ImageGenError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_chain_feeds_each_output_into_next_step() {
        let model = MockModel::new();
        let chain = run_chain(&model, &chain_base(), 3, None).await.unwrap();
        assert_eq!(chain.len(), 3);

        let calls = model.calls();
        assert_eq!(calls.len(), 3);
        // step 0 uses the base image verbatim
        assert_eq!(
            calls[0].1.image(),
            Some("data:image/png;base64,c2VlZA==")
        );
        // entry k is the input of step k + 1
        assert_eq!(calls[1].1.image(), Some(chain[0].as_str()));
        assert_eq!(calls[2].1.image(), Some(chain[1].as_str()));
    }

    #[tokio::test]
    async fn test_shared_prompt_reused_without_list() {
        let model = MockModel::new();
        run_chain(&model, &chain_base(), 2, None).await.unwrap();
        for (prompt, _) in model.calls() {
            assert_eq!(prompt.as_deref(), Some("make the colors dreamier"));
        }
    }

    #[tokio::test]
    async fn test_short_prompt_list_clamps_to_last() {
        let model = MockModel::new();
        let prompts = vec!["first".to_string(), "second".to_string()];
        run_chain(&model, &chain_base(), 3, Some(&prompts))
            .await
            .unwrap();

        let seen: Vec<_> = model
            .calls()
            .into_iter()
            .map(|(prompt, _)| prompt.unwrap())
            .collect();
        assert_eq!(seen, vec!["first", "second", "second"]);
    }

    #[tokio::test]
    async fn test_empty_prompt_list_behaves_like_shared_prompt() {
        let model = MockModel::new();
        let prompts: Vec<String> = vec![];
        run_chain(&model, &chain_base(), 2, Some(&prompts))
            .await
            .unwrap();
        for (prompt, _) in model.calls() {
            assert_eq!(prompt.as_deref(), Some("make the colors dreamier"));
        }
    }

    #[tokio::test]
    async fn test_mid_chain_failure_discards_prefix() {
        let model = MockModel::failing_at(1);
        let err = run_chain(&model, &chain_base(), 3, None).await.unwrap_err();
        match err {
            ImageGenError::SolitaireError { step, source } => {
                assert_eq!(step, 1);
                assert!(source.is_transient());
            }
            other => panic!("expected solitaire error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_text_seeded_chain_length_and_seed() {
        let model = MockModel::new();
        let base = ImageOptions::new()
            .with_model("Qwen/Qwen-Image")
            .with_prompt("p");

        let chain = run_text_seeded_chain(&model, &base, 2).await.unwrap();
        assert_eq!(chain.len(), 3);

        let calls = model.calls();
        assert_eq!(calls.len(), 3);
        // the seed call carries no input image
        assert_eq!(calls[0].1.image(), None);
        // entry 0 is the seed and feeds step 1
        assert_eq!(chain[0], "data:image/png;base64,b3V0cHV00");
        assert_eq!(calls[1].1.image(), Some(chain[0].as_str()));
    }

    #[tokio::test]
    async fn test_text_seeded_step_bounds_checked_before_seed_call() {
        let model = MockModel::new();
        let base = ImageOptions::new()
            .with_model("Qwen/Qwen-Image")
            .with_prompt("p");
        let err = run_text_seeded_chain(&model, &base, 0).await.unwrap_err();
        assert!(matches!(err, ImageGenError::InvalidArgument(_)));
        assert!(model.calls().is_empty());
    }
}
