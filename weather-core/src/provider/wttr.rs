use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::USER_AGENT};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    Config,
    error::FetchError,
    model::{CurrentConditions, ForecastDay, UnitSystem, WeatherReport, WeatherRequest},
    units::{format_temperature, format_wind_speed, weekday_name},
};

use super::WeatherProvider;

/// Number of forecast days shown.
pub const FORECAST_DAYS: usize = 3;

/// wttr.in reports eight three-hour buckets per day; index 4 is midday.
pub const SAMPLE_HOUR_INDEX: usize = 4;

/// Client for the wttr.in `?format=j1` JSON endpoint.
#[derive(Debug, Clone)]
pub struct WttrProvider {
    http: Client,
    base_url: String,
    icon_base_url: String,
    user_agent: String,
}

impl WttrProvider {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            icon_base_url: config.icon_base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        })
    }

    async fn fetch_body(&self, city: &str) -> Result<String, FetchError> {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(city));
        debug!(%url, "requesting weather");

        let res = self
            .http
            .get(&url)
            .query(&[("format", "j1")])
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(city.to_string()));
        }
        if !status.is_success() {
            debug!(%status, body = %truncate_body(&body), "weather request rejected");
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherProvider for WttrProvider {
    #[instrument(skip(self), fields(city = %request.city, units = %request.units))]
    async fn fetch_weather(&self, request: &WeatherRequest) -> Result<WeatherReport, FetchError> {
        let city = request.city.trim();
        if city.is_empty() {
            return Err(FetchError::EmptyCity);
        }

        let body = self.fetch_body(city).await?;
        let report = normalize(&body, city, request.units, &self.icon_base_url)?;
        debug!(forecast_days = report.forecast.len(), "weather normalized");
        Ok(report)
    }
}

/// Turns a wttr.in `j1` document into display records.
pub fn normalize(
    body: &str,
    city: &str,
    units: UnitSystem,
    icon_base_url: &str,
) -> Result<WeatherReport, FetchError> {
    let parsed: WttrResponse = serde_json::from_str(body)?;

    let current = parsed
        .current_condition
        .first()
        .ok_or_else(|| FetchError::Malformed("no current_condition entry".into()))?;
    let area = parsed
        .nearest_area
        .first()
        .ok_or_else(|| FetchError::NotFound(city.to_string()))?;
    let today = parsed
        .weather
        .first()
        .ok_or_else(|| FetchError::Malformed("no weather days".into()))?;
    let astronomy = today
        .astronomy
        .first()
        .ok_or_else(|| FetchError::Malformed("no astronomy entry for today".into()))?;

    let icon_base = icon_base_url.trim_end_matches('/');
    let city_segment = urlencoding::encode(city);

    let wind_speed = format_wind_speed(&current.windspeed_kmph, units)?;

    let current = CurrentConditions {
        location: format!(
            "{}, {}, {}",
            first_value(&area.area_name, "areaName")?,
            first_value(&area.region, "region")?,
            first_value(&area.country, "country")?,
        ),
        temp: format_temperature(&current.temp_c, &current.temp_f, units),
        feels_like: format_temperature(&current.feels_like_c, &current.feels_like_f, units),
        conditions: first_value(&current.weather_desc, "weatherDesc")?.to_string(),
        wind: format!("{wind_speed}, {}", current.winddir_16_point),
        humidity: format!("{}%", current.humidity),
        pressure: format!("{} hPa", current.pressure),
        visibility: format!("{} km", current.visibility),
        uv_index: current.uv_index.clone(),
        sunrise: astronomy.sunrise.clone(),
        sunset: astronomy.sunset.clone(),
        icon_url: format!("{icon_base}/{city_segment}_0p.png"),
    };

    let forecast = parsed
        .weather
        .iter()
        .take(FORECAST_DAYS)
        .map(|day| -> Result<ForecastDay, FetchError> {
            let sample = day.hourly.get(SAMPLE_HOUR_INDEX).ok_or_else(|| {
                FetchError::Malformed(format!(
                    "day {} has {} hourly entries, expected at least {}",
                    day.date,
                    day.hourly.len(),
                    SAMPLE_HOUR_INDEX + 1
                ))
            })?;

            Ok(ForecastDay {
                date: day.date.clone(),
                day_name: weekday_name(&day.date)?,
                avg_temp: format_temperature(&day.avgtemp_c, &day.avgtemp_f, units),
                max_temp: format_temperature(&day.maxtemp_c, &day.maxtemp_f, units),
                min_temp: format_temperature(&day.mintemp_c, &day.mintemp_f, units),
                description: first_value(&sample.weather_desc, "hourly weatherDesc")?.to_string(),
                // Cards always show the provider's km/h reading.
                wind: format!("{} km/h", sample.windspeed_kmph),
                icon_url: format!("{icon_base}/{city_segment}_{}_0p.png", day.date),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WeatherReport { current, forecast })
}

fn first_value<'a>(values: &'a [WttrValue], field: &str) -> Result<&'a str, FetchError> {
    values
        .first()
        .map(|v| v.value.as_str())
        .ok_or_else(|| FetchError::Malformed(format!("empty {field} list")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct WttrValue {
    value: String,
}

#[derive(Debug, Deserialize)]
struct WttrCurrent {
    #[serde(rename = "temp_C")]
    temp_c: String,
    #[serde(rename = "temp_F")]
    temp_f: String,
    #[serde(rename = "FeelsLikeC")]
    feels_like_c: String,
    #[serde(rename = "FeelsLikeF")]
    feels_like_f: String,
    #[serde(rename = "weatherDesc")]
    weather_desc: Vec<WttrValue>,
    #[serde(rename = "windspeedKmph")]
    windspeed_kmph: String,
    #[serde(rename = "winddir16Point")]
    winddir_16_point: String,
    humidity: String,
    pressure: String,
    visibility: String,
    #[serde(rename = "uvIndex")]
    uv_index: String,
}

#[derive(Debug, Deserialize)]
struct WttrArea {
    #[serde(rename = "areaName")]
    area_name: Vec<WttrValue>,
    region: Vec<WttrValue>,
    country: Vec<WttrValue>,
}

#[derive(Debug, Deserialize)]
struct WttrAstronomy {
    sunrise: String,
    sunset: String,
}

#[derive(Debug, Deserialize)]
struct WttrHour {
    #[serde(rename = "weatherDesc")]
    weather_desc: Vec<WttrValue>,
    #[serde(rename = "windspeedKmph")]
    windspeed_kmph: String,
}

#[derive(Debug, Deserialize)]
struct WttrDay {
    date: String,
    #[serde(rename = "avgtempC")]
    avgtemp_c: String,
    #[serde(rename = "avgtempF")]
    avgtemp_f: String,
    #[serde(rename = "maxtempC")]
    maxtemp_c: String,
    #[serde(rename = "maxtempF")]
    maxtemp_f: String,
    #[serde(rename = "mintempC")]
    mintemp_c: String,
    #[serde(rename = "mintempF")]
    mintemp_f: String,
    astronomy: Vec<WttrAstronomy>,
    hourly: Vec<WttrHour>,
}

#[derive(Debug, Deserialize)]
struct WttrResponse {
    current_condition: Vec<WttrCurrent>,
    nearest_area: Vec<WttrArea>,
    weather: Vec<WttrDay>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const PARIS: &str = include_str!("../../tests/fixtures/paris.json");
    const ICONS: &str = "https://wttr.in";

    fn paris_with(edit: impl FnOnce(&mut Value)) -> String {
        let mut doc: Value = serde_json::from_str(PARIS).unwrap();
        edit(&mut doc);
        doc.to_string()
    }

    #[test]
    fn metric_current_conditions() {
        let report = normalize(PARIS, "Paris", UnitSystem::Metric, ICONS).unwrap();
        let c = &report.current;

        assert_eq!(c.location, "Paris, Ile-de-France, France");
        assert_eq!(c.temp, "21 °C");
        assert_eq!(c.feels_like, "20 °C");
        assert_eq!(c.conditions, "Partly cloudy");
        assert_eq!(c.wind, "15 km/h, WSW");
        assert_eq!(c.humidity, "64%");
        assert_eq!(c.pressure, "1017 hPa");
        assert_eq!(c.visibility, "10 km");
        assert_eq!(c.uv_index, "5");
        assert_eq!(c.sunrise, "05:47 AM");
        assert_eq!(c.sunset, "09:53 PM");
        assert_eq!(c.icon_url, "https://wttr.in/Paris_0p.png");
    }

    #[test]
    fn imperial_current_conditions() {
        let report = normalize(PARIS, "Paris", UnitSystem::Imperial, ICONS).unwrap();
        let c = &report.current;

        assert_eq!(c.temp, "70 °F");
        assert_eq!(c.feels_like, "68 °F");
        assert_eq!(c.wind, "9.3 mph, WSW");
        // Units that have no imperial counterpart upstream stay as they are.
        assert_eq!(c.pressure, "1017 hPa");
        assert_eq!(c.visibility, "10 km");
    }

    #[test]
    fn forecast_samples_the_fifth_hour() {
        let report = normalize(PARIS, "Paris", UnitSystem::Metric, ICONS).unwrap();
        let days: Vec<_> = report.forecast.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(days, ["2024-06-10", "2024-06-11", "2024-06-12"]);

        let first = &report.forecast[0];
        assert_eq!(first.day_name, "Monday");
        assert_eq!(first.avg_temp, "19 °C");
        assert_eq!(first.max_temp, "23 °C");
        assert_eq!(first.min_temp, "14 °C");
        assert_eq!(first.description, "Partly cloudy");
        assert_eq!(first.wind, "13 km/h");
        assert_eq!(first.icon_url, "https://wttr.in/Paris_2024-06-10_0p.png");

        let last = &report.forecast[2];
        assert_eq!(last.day_name, "Wednesday");
        assert_eq!(last.description, "Moderate rain");
    }

    #[test]
    fn imperial_forecast_converts_temperatures_only() {
        let report = normalize(PARIS, "Paris", UnitSystem::Imperial, ICONS).unwrap();
        let second = &report.forecast[1];
        assert_eq!(second.avg_temp, "68 °F");
        assert_eq!(second.max_temp, "77 °F");
        assert_eq!(second.min_temp, "59 °F");
        assert_eq!(second.wind, "18 km/h");
    }

    #[test]
    fn forecast_is_capped_at_three_days() {
        let body = paris_with(|doc| {
            let weather = doc["weather"].as_array_mut().unwrap();
            let mut extra = weather[2].clone();
            extra["date"] = "2024-06-13".into();
            weather.push(extra);
        });
        let report = normalize(&body, "Paris", UnitSystem::Metric, ICONS).unwrap();
        assert_eq!(report.forecast.len(), 3);
        assert_eq!(report.forecast[2].date, "2024-06-12");
    }

    #[test]
    fn short_provider_forecast_is_kept_as_is() {
        let body = paris_with(|doc| {
            doc["weather"].as_array_mut().unwrap().truncate(2);
        });
        let report = normalize(&body, "Paris", UnitSystem::Metric, ICONS).unwrap();
        assert_eq!(report.forecast.len(), 2);
        assert_eq!(report.forecast[1].date, "2024-06-11");
    }

    #[test]
    fn missing_hourly_sample_is_malformed() {
        let body = paris_with(|doc| {
            doc["weather"][1]["hourly"].as_array_mut().unwrap().truncate(4);
        });
        let err = normalize(&body, "Paris", UnitSystem::Metric, ICONS).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(ref m) if m.contains("2024-06-11")), "{err}");
    }

    #[test]
    fn empty_weather_is_malformed() {
        let body = paris_with(|doc| doc["weather"] = Value::Array(vec![]));
        let err = normalize(&body, "Paris", UnitSystem::Metric, ICONS).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn empty_nearest_area_means_unknown_city() {
        let body = paris_with(|doc| doc["nearest_area"] = Value::Array(vec![]));
        let err = normalize(&body, "Atlantis", UnitSystem::Metric, ICONS).unwrap_err();
        assert!(matches!(err, FetchError::NotFound(ref c) if c == "Atlantis"));
    }

    #[test]
    fn missing_field_is_a_parse_error() {
        let body = paris_with(|doc| {
            doc["current_condition"][0].as_object_mut().unwrap().remove("temp_C");
        });
        let err = normalize(&body, "Paris", UnitSystem::Metric, ICONS).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn non_json_body_is_a_parse_error() {
        let err = normalize("Unknown location", "Paris", UnitSystem::Metric, ICONS).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn icon_urls_encode_the_city() {
        let report = normalize(PARIS, "New York", UnitSystem::Metric, "http://icons.test/").unwrap();
        assert_eq!(report.current.icon_url, "http://icons.test/New%20York_0p.png");
        assert_eq!(
            report.forecast[0].icon_url,
            "http://icons.test/New%20York_2024-06-10_0p.png"
        );
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
