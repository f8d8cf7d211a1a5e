use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Central Weather Administration open-data API key
    pub cwa_api_key: String,

    /// CWA open-data datastore base URL
    #[serde(default = "default_cwa_api_url")]
    pub cwa_api_url: String,

    /// CSV catalogue of songs matched to weather descriptions
    #[serde(default = "default_catalogue_path")]
    pub catalogue_path: String,

    /// CSV mapping weather descriptions to category codes
    #[serde(default = "default_weather_codes_path")]
    pub weather_codes_path: String,

    /// Directory of weather icons named by category code
    #[serde(default = "default_weather_images_dir")]
    pub weather_images_dir: String,

    /// Directory of movie posters named by title
    #[serde(default = "default_movie_posters_dir")]
    pub movie_posters_dir: String,

    /// Redis connection URL; caching is disabled when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Forecast cache lifetime in seconds
    #[serde(default = "default_forecast_cache_ttl")]
    pub forecast_cache_ttl: u64,

    /// Outbound HTTP timeout in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Sessions kept in memory before the least recently used is evicted
    #[serde(default = "default_session_capacity")]
    pub session_capacity: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_cwa_api_url() -> String {
    "https://opendata.cwa.gov.tw/api/v1/rest/datastore".to_string()
}

fn default_catalogue_path() -> String {
    "YT_weather_matched.csv".to_string()
}

fn default_weather_codes_path() -> String {
    "weather_codes.csv".to_string()
}

fn default_weather_images_dir() -> String {
    "images".to_string()
}

fn default_movie_posters_dir() -> String {
    "movie".to_string()
}

fn default_forecast_cache_ttl() -> u64 {
    3600
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_session_capacity() -> usize {
    10_000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
