use regex::Regex;
use std::sync::LazyLock;

static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:v=|youtu\.be/|embed/|live/)([A-Za-z0-9_-]{11})")
        .expect("failed to compile video id regex")
});

static USERCONTENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"googleusercontent\.com/youtube\.com/\d+([A-Za-z0-9_-]+)")
        .expect("failed to compile googleusercontent regex")
});

/// Extracts the YouTube video id from a catalogue URL
///
/// Handles `watch?v=`, `youtu.be/`, `embed/` and `live/` links as well as
/// proxied `googleusercontent.com/youtube.com/N<id>` links.
pub fn extract_video_id(url: &str) -> Option<String> {
    let url = url.trim();

    if let Some(caps) = VIDEO_ID_RE.captures(url) {
        return Some(caps[1].to_string());
    }

    if let Some(caps) = USERCONTENT_RE.captures(url) {
        return Some(caps[1].to_string());
    }

    let tail = if let Some((_, rest)) = url.split_once("youtube.com/watch?v=") {
        rest.split('&').next()
    } else if let Some((_, rest)) = url.split_once("youtu.be/") {
        rest.split('?').next()
    } else if let Some((_, rest)) = url.split_once("googleusercontent.com/youtube.com/1") {
        rest.split('?').next()
    } else {
        None
    };

    tail.filter(|id| !id.is_empty()).map(str::to_string)
}

pub fn watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={id}")
}

pub fn embed_url(id: &str) -> String {
    format!("https://www.youtube.com/embed/{id}")
}
