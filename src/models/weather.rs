use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ============================================================================
// CWA open-data API types (dataset F-C0032-001)
// ============================================================================

/// Top-level response from the CWA datastore
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CwaResponse {
    #[serde(default)]
    pub records: Option<CwaRecords>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CwaRecords {
    #[serde(default)]
    pub location: Vec<CwaLocation>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CwaLocation {
    pub location_name: String,
    #[serde(default)]
    pub weather_element: Vec<CwaWeatherElement>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CwaWeatherElement {
    /// `Wx`, `PoP`, `MinT`, `CI` or `MaxT`
    pub element_name: String,
    #[serde(default)]
    pub time: Vec<CwaTimeEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CwaTimeEntry {
    pub start_time: String,
    pub end_time: String,
    pub parameter: CwaParameter,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CwaParameter {
    pub parameter_name: String,
    #[serde(default)]
    pub parameter_value: Option<String>,
    #[serde(default)]
    pub parameter_unit: Option<String>,
}

impl CwaResponse {
    pub fn locations(&self) -> &[CwaLocation] {
        self.records
            .as_ref()
            .map(|r| r.location.as_slice())
            .unwrap_or_default()
    }
}

impl CwaLocation {
    pub fn element(&self, name: &str) -> Option<&CwaWeatherElement> {
        self.weather_element
            .iter()
            .find(|e| e.element_name == name)
    }
}

// ============================================================================
// Extracted forecast
// ============================================================================

/// Forecast for the period closest to the time of the query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Forecast {
    pub city: String,
    /// Weather phenomenon, e.g. "多雲時晴"
    pub description: String,
    pub start_time: NaiveDateTime,
    pub time_of_day: String,
    pub min_temp: String,
    pub max_temp: String,
    /// Probability of precipitation with a `%` suffix, or `N/A`
    pub pop: String,
    pub display_text: String,
}
