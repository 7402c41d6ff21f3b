use rimagen::{logger, ImageGenClient};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    logger::init_with_config(
        logger::LoggerConfig::development().with_level(logger::LogLevel::Debug),
    )?;

    if env::var("OPENAI_API_KEY").is_err() {
        log::warn!("No OPENAI_API_KEY set, requests will be sent without authorization");
    }
    match env::var("OPENAI_BASE_URL") {
        Ok(base_url) => log::info!("Using image endpoint: {}", base_url),
        Err(_) => log::info!("Using default image endpoint"),
    }

    let client = ImageGenClient::from_env();

    // Single shot: text to image
    let output = client
        .param()
        .model("Qwen/Qwen-Image")
        .prompt("a serene starry sky over mountains")
        .negative_prompt("planets")
        .cfg(7.5)
        .output()
        .await?;
    log::info!("text-to-image output: {}", output);

    // Solitaire: seed with the generated image, then chain three edits
    let seed = rimagen::media::fetch_as_data_url(&output).await?;
    let chain = client
        .param()
        .model("Qwen/Qwen-Image-Edit")
        .prompt("make the colors dreamier")
        .image(seed)
        .cfg(7.5)
        .solitaire(3)
        .await?;

    for (index, entry) in chain.iter().enumerate() {
        log::info!("chain[{}]: {}", index, entry);
    }

    Ok(())
}
