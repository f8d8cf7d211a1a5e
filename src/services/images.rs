use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::{Path, PathBuf};

use crate::error::AppResult;

pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "gif", "jpg", "jpeg"];

const DEFAULT_IMAGE: &str = "default";

pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Finds `{name}.{ext}` in `dir`, trying extensions in [`IMAGE_EXTENSIONS`] order
pub fn find_image(dir: &Path, name: &str) -> Option<PathBuf> {
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{name}.{ext}")))
        .find(|path| path.is_file())
}

/// Finds the icon for a weather code, falling back to `default.{ext}`
pub fn find_image_or_default(dir: &Path, code: &str) -> Option<PathBuf> {
    find_image(dir, code).or_else(|| find_image(dir, DEFAULT_IMAGE))
}

/// Reads an image and encodes it as a `data:` URI
///
/// Inlining keeps animated GIF icons playing in clients that would
/// otherwise re-encode a linked image.
pub fn encode_data_uri(path: &Path) -> AppResult<String> {
    let bytes = std::fs::read(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| "png".to_string());
    let mime = if ext == "jpg" { "jpeg" } else { ext.as_str() };

    Ok(format!("data:image/{};base64,{}", mime, STANDARD.encode(bytes)))
}

/// Locates and encodes the icon for `code`, logging rather than failing
pub fn weather_icon(dir: &Path, code: &str) -> Option<String> {
    let path = find_image_or_default(dir, code)?;
    match encode_data_uri(&path) {
        Ok(uri) => Some(uri),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to encode weather icon");
            None
        }
    }
}
