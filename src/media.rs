use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{ImageGenError, Result};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Returns whether the filename carries a known image extension.
pub fn is_image(filename: &str) -> bool {
    extension(filename)
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// MIME type derived from the filename extension, `image/png` when unknown.
pub fn mime_type(filename: &str) -> String {
    match extension(filename) {
        Some(ext) if ext == "jpg" => "image/jpeg".to_string(),
        Some(ext) => format!("image/{}", ext),
        None => "image/png".to_string(),
    }
}

fn extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Embeds raw image bytes as a `data:<mime>;base64,<payload>` URL.
pub fn to_data_url(bytes: &[u8], filename: &str) -> String {
    format!(
        "data:{};base64,{}",
        mime_type(filename),
        STANDARD.encode(bytes)
    )
}

pub fn is_data_url(reference: &str) -> bool {
    reference.starts_with("data:")
}

/// Reads a local image file and embeds it as a data URL.
pub fn data_url_from_path(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| ImageGenError::ImageError(format!("failed to read {}: {}", path.display(), e)))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image.png");

    log::debug!("Encoded {} ({} bytes) as data URL", path.display(), bytes.len());
    Ok(to_data_url(&bytes, filename))
}

/// Fetches a remote image and materializes it as a local byte buffer.
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let response = reqwest::get(url).await.map_err(|e| ImageGenError::TransportError {
        status: None,
        message: format!("image fetch failed: {}", e),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ImageGenError::TransportError {
            status: Some(status.as_u16()),
            message: format!("image fetch returned {} for {}", status, url),
        });
    }

    let bytes = response.bytes().await.map_err(|e| ImageGenError::TransportError {
        status: None,
        message: format!("image body read failed: {}", e),
    })?;

    Ok(bytes.to_vec())
}

/// Fetches a remote image and re-encodes it as an embedded data URL, using
/// the URL path to sniff the MIME type.
pub async fn fetch_as_data_url(url: &str) -> Result<String> {
    let bytes = fetch_bytes(url).await?;
    let filename = url
        .split('?')
        .next()
        .and_then(|path| path.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .unwrap_or("image.png");

    log::debug!("Fetched {} ({} bytes)", url, bytes.len());
    Ok(to_data_url(&bytes, filename))
}
