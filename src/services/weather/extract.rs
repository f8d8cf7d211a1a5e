use chrono::{Datelike, NaiveDateTime, Timelike};

use super::ForecastError;
use crate::models::{CwaLocation, CwaResponse, CwaTimeEntry, CwaWeatherElement, Forecast};

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NOT_AVAILABLE: &str = "N/A";

fn parse_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIME_FORMAT).ok()
}

/// Human-readable period of the day a forecast starts in
pub fn time_of_day(hour: u32) -> &'static str {
    match hour {
        0..=5 => "午夜到早晨",
        6..=11 => "早晨到中午",
        12..=17 => "中午到傍晚",
        _ => "傍晚到午夜",
    }
}

/// Value of the entry whose `[start, end)` window contains `at`, falling
/// back to the first entry
fn value_at(element: &CwaWeatherElement, at: NaiveDateTime) -> Option<String> {
    element
        .time
        .iter()
        .find(|entry| {
            matches!(
                (parse_time(&entry.start_time), parse_time(&entry.end_time)),
                (Some(start), Some(end)) if start <= at && at < end
            )
        })
        .or_else(|| element.time.first())
        .map(|entry| entry.parameter.parameter_name.clone())
}

fn element_value(location: &CwaLocation, name: &str, at: NaiveDateTime) -> Option<String> {
    location.element(name).and_then(|e| value_at(e, at))
}

/// Extracts the forecast for the period starting closest to `now`
///
/// Wx entries with unparseable start times are ignored. PoP, MinT and MaxT
/// are read from the entry covering the chosen start time, or the first
/// entry when none covers it, and are `N/A` when the element is missing.
pub fn extract_forecast(
    city: &str,
    response: &CwaResponse,
    now: NaiveDateTime,
) -> Result<Forecast, ForecastError> {
    let location = response
        .locations()
        .first()
        .ok_or_else(|| ForecastError::NoForecast {
            city: city.to_string(),
        })?;

    let wx = location
        .element("Wx")
        .ok_or_else(|| ForecastError::MissingWx {
            city: city.to_string(),
        })?;

    let (start, current): (NaiveDateTime, &CwaTimeEntry) = wx
        .time
        .iter()
        .filter_map(|entry| parse_time(&entry.start_time).map(|start| (start, entry)))
        .min_by_key(|(start, _)| (*start - now).num_seconds().abs())
        .ok_or_else(|| ForecastError::InvalidTimes {
            city: city.to_string(),
        })?;

    let description = current.parameter.parameter_name.clone();
    let time_of_day = time_of_day(start.hour());

    let pop = element_value(location, "PoP", start)
        .map(|p| format!("{p}%"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let min_temp =
        element_value(location, "MinT", start).unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let max_temp =
        element_value(location, "MaxT", start).unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let display_text = format!(
        "{city} {}/{} {time_of_day}是：**{description}**，氣溫介於 **{min_temp}°C** 到 **{max_temp}°C**，降雨機率 **{pop}** 喔！",
        start.month(),
        start.day(),
    );

    Ok(Forecast {
        city: city.to_string(),
        description,
        start_time: start,
        time_of_day: time_of_day.to_string(),
        min_temp,
        max_temp,
        pop,
        display_text,
    })
}
