use serde::{Deserialize, Serialize};

/// A song in the video catalogue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoEntry {
    /// Zero-based row position in the catalogue file; identity for the no-repeat pool
    pub index: usize,
    pub url: String,
    /// Comma-separated weather descriptions the song was matched to
    pub description: String,
    pub title: String,
}

/// A movie poster found in the posters directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieEntry {
    /// File stem of the poster
    pub title: String,
    pub file_name: String,
}

impl MovieEntry {
    /// Public path the poster is served under
    pub fn poster_url(&self) -> String {
        format!("/posters/{}", self.file_name)
    }
}

/// One row of the weather code table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeatherCode {
    #[serde(rename = "中文描述")]
    pub description: String,
    #[serde(rename = "分類代碼")]
    pub code: String,
}

/// Raw catalogue row as read from CSV
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogueRow {
    #[serde(rename = "影片URL", default)]
    pub url: Option<String>,
    #[serde(rename = "matched_weather_descriptions", default)]
    pub description: Option<String>,
    #[serde(rename = "歌曲名稱", default)]
    pub title: Option<String>,
}
