use serde::{Deserialize, Serialize};

use super::Forecast;

/// Query string for weather lookups
#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    #[serde(default)]
    pub q: String,
}

/// Weather icon rendered inline by the client
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeatherImage {
    /// `data:image/...;base64,...`, absent when no icon file exists
    pub data_uri: Option<String>,
    pub caption: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VideoRecommendation {
    pub youtube_id: String,
    pub title: String,
    pub watch_url: String,
    pub embed_url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieRecommendation {
    pub title: String,
    pub poster_url: String,
    /// Movies left before the pool resets
    pub remaining: usize,
}

/// Everything the page needs to render one interaction
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct QueryResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<Forecast>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_image: Option<WeatherImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoRecommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie: Option<MovieRecommendation>,
    /// Informational notices such as pool resets
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<String>,
}

impl QueryResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }
}
