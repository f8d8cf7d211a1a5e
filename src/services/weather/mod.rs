//! Weather data provider abstraction
//!
//! The CWA open-data API is the only source today; the trait keeps the
//! query pipeline testable without network access.

use crate::{error::AppError, models::Forecast};

pub mod cwa;
pub mod extract;

pub use cwa::CwaProvider;
pub use extract::extract_forecast;

/// Why a forecast could not be produced
///
/// The display strings are the messages shown to the user.
#[derive(thiserror::Error, Debug)]
pub enum ForecastError {
    #[error("無法取得 {city} 天氣資料：缺少 Wx 元素。")]
    MissingWx { city: String },

    #[error("無法取得 {city} 天氣資料：預報時間數據無效。")]
    InvalidTimes { city: String },

    #[error("無法取得 {city} 天氣資料：資料結構異常或該縣市無預報資料。")]
    NoForecast { city: String },

    #[error("無法取得 {city} 天氣資料：網路或 API 錯誤 ({source})。請檢查您的 API 金鑰是否有效。")]
    Request { city: String, source: AppError },
}

impl ForecastError {
    pub fn city(&self) -> &str {
        match self {
            ForecastError::MissingWx { city }
            | ForecastError::InvalidTimes { city }
            | ForecastError::NoForecast { city }
            | ForecastError::Request { city, .. } => city,
        }
    }
}

/// Source of location names and forecasts
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Official location names
    ///
    /// Never fails: providers fall back to a built-in list when the upstream
    /// source is unavailable.
    async fn location_names(&self) -> Vec<String>;

    /// Forecast for the period closest to now
    async fn fetch_forecast(&self, city: &str) -> Result<Forecast, ForecastError>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
