//! Central Weather Administration open-data provider
//!
//! Uses the 36-hour county/city forecast dataset. Location names and
//! forecasts are cached through [`Cache`] so repeated queries for the same
//! city within the TTL do not hit the API.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use reqwest::Client as HttpClient;
use tokio::sync::Mutex;

use super::{extract_forecast, ForecastError, WeatherProvider};
use crate::{
    cached,
    config::Config,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{CwaResponse, Forecast},
    services::city::default_location_names,
};

const DATASET: &str = "F-C0032-001";

/// How long the built-in location list stands in after a failed fetch
const LOCATION_FALLBACK_TTL: Duration = Duration::from_secs(300);

#[derive(Clone)]
pub struct CwaProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
    cache_ttl: u64,
    fallback_until: Arc<Mutex<Option<Instant>>>,
}

impl CwaProvider {
    pub fn new(
        cache: Cache,
        api_key: String,
        api_url: String,
        timeout: Duration,
        cache_ttl: u64,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            cache,
            cache_ttl,
            fallback_until: Arc::new(Mutex::new(None)),
        })
    }

    pub fn from_config(config: &Config, cache: Cache) -> AppResult<Self> {
        Self::new(
            cache,
            config.cwa_api_key.clone(),
            config.cwa_api_url.clone(),
            Duration::from_secs(config.http_timeout_secs),
            config.forecast_cache_ttl,
        )
    }

    fn dataset_url(&self) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), DATASET)
    }

    /// Calls the datastore, optionally narrowed to one location
    async fn request(&self, location_name: Option<&str>) -> AppResult<CwaResponse> {
        let mut query = vec![("Authorization", self.api_key.as_str())];
        if let Some(name) = location_name {
            query.push(("locationName", name));
        }

        let response = self
            .http_client
            .get(self.dataset_url())
            .query(&query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                location = location_name.unwrap_or("*"),
                "CWA request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl WeatherProvider for CwaProvider {
    async fn location_names(&self) -> Vec<String> {
        if let Some(until) = *self.fallback_until.lock().await {
            if Instant::now() < until {
                tracing::debug!("Location list unavailable recently, using defaults");
                return default_location_names();
            }
        }

        let result: AppResult<Vec<String>> =
            cached!(self.cache, CacheKey::LocationNames, self.cache_ttl, async {
                let response = self.request(None).await?;
                let names: Vec<String> = response
                    .locations()
                    .iter()
                    .map(|l| l.location_name.clone())
                    .collect();

                if names.is_empty() {
                    return Err(AppError::ExternalApi(
                        "API response contained no locations".to_string(),
                    ));
                }

                tracing::info!(count = names.len(), provider = "cwa", "Location names fetched");
                Ok::<_, AppError>(names)
            });

        match result {
            Ok(names) => names,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch location names, using defaults");
                let defaults = default_location_names();
                *self.fallback_until.lock().await = Some(Instant::now() + LOCATION_FALLBACK_TTL);
                self.cache.set_in_background(
                    &CacheKey::LocationNames,
                    &defaults,
                    LOCATION_FALLBACK_TTL.as_secs(),
                );
                defaults
            }
        }
    }

    async fn fetch_forecast(&self, city: &str) -> Result<Forecast, ForecastError> {
        cached!(
            self.cache,
            CacheKey::Forecast(city.to_string()),
            self.cache_ttl,
            async move {
                let response =
                    self.request(Some(city))
                        .await
                        .map_err(|source| ForecastError::Request {
                            city: city.to_string(),
                            source,
                        })?;

                let forecast = extract_forecast(city, &response, Local::now().naive_local())?;

                tracing::info!(
                    city = %city,
                    description = %forecast.description,
                    provider = "cwa",
                    "Forecast fetched"
                );

                Ok::<_, ForecastError>(forecast)
            }
        )
    }

    fn name(&self) -> &'static str {
        "cwa"
    }
}
