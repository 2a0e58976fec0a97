use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    Block, DataPoint, ForecastReport, Location, Units,
    http::{ServiceSettings, redact, success_body},
};

use super::ForecastProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.darksky.net/forecast";

/// Dark Sky forecast API client.
#[derive(Debug, Clone)]
pub struct DarkSkyProvider {
    settings: ServiceSettings,
    http: Client,
}

impl DarkSkyProvider {
    /// Dark Sky puts the key in the path, so one is required.
    pub fn new(settings: ServiceSettings) -> Result<Self> {
        if settings.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(anyhow!("Dark Sky requires an API key"));
        }
        let http = settings.client()?;
        Ok(Self { settings, http })
    }

    fn forecast_url(&self, location: &Location) -> String {
        format!(
            "{}/{}/{},{}",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.api_key.as_deref().unwrap_or_default(),
            location.lat,
            location.lng,
        )
    }
}

#[async_trait]
impl ForecastProvider for DarkSkyProvider {
    async fn forecast(&self, location: &Location, units: Units) -> Result<ForecastReport> {
        let req = self
            .http
            .get(self.forecast_url(location))
            .query(&[("units", units.as_str()), ("exclude", "minutely,alerts")])
            .build()
            .context("Failed to build forecast request")?;
        debug!(
            "GET {}",
            redact(req.url().as_str(), self.settings.api_key.as_deref())
        );

        let res = self
            .http
            .execute(req)
            .await
            .context("Failed to send request to Dark Sky")?;

        let body = success_body(res, "Dark Sky forecast").await?;
        parse_forecast(&body, location, units)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DsDataPoint {
    time: i64,
    #[serde(default)]
    summary: String,
    temperature: Option<f64>,
    apparent_temperature: Option<f64>,
    // Daily points have highs and lows instead of a single temperature.
    temperature_high: Option<f64>,
    temperature_max: Option<f64>,
    apparent_temperature_high: Option<f64>,
    apparent_temperature_max: Option<f64>,
    humidity: Option<f64>,
    wind_speed: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct DsBlock {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    data: Vec<DsDataPoint>,
}

#[derive(Debug, Deserialize)]
struct DsFlags {
    units: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DsResponse {
    #[serde(default)]
    timezone: String,
    #[serde(default)]
    offset: f64,
    currently: Option<DsDataPoint>,
    #[serde(default)]
    hourly: DsBlock,
    #[serde(default)]
    daily: DsBlock,
    flags: Option<DsFlags>,
}

/// Decode a forecast body into a report for `location`.
///
/// `requested` is used as the unit system unless the response says which one
/// it actually resolved to.
pub fn parse_forecast(body: &str, location: &Location, requested: Units) -> Result<ForecastReport> {
    let parsed: DsResponse =
        serde_json::from_str(body).context("Failed to parse Dark Sky forecast JSON")?;

    if parsed.timezone.is_empty() {
        return Err(anyhow!("No data for location: {location}"));
    }

    let currently = parsed
        .currently
        .ok_or_else(|| anyhow!("Dark Sky response has no current conditions for {location}"))?;

    let units = parsed
        .flags
        .and_then(|f| f.units)
        .and_then(|u| Units::try_from(u.as_str()).ok())
        .unwrap_or(requested);

    Ok(ForecastReport {
        location: location.clone(),
        timezone: parsed.timezone,
        utc_offset_hours: parsed.offset,
        units,
        currently: data_point(currently)?,
        hourly: block(parsed.hourly).context("Bad hourly data")?,
        daily: block(parsed.daily).context("Bad daily data")?,
    })
}

fn block(raw: DsBlock) -> Result<Block> {
    Ok(Block {
        summary: raw.summary,
        data: raw.data.into_iter().map(data_point).collect::<Result<_>>()?,
    })
}

fn data_point(raw: DsDataPoint) -> Result<DataPoint> {
    let time = unix_to_utc(raw.time)
        .ok_or_else(|| anyhow!("Timestamp {} is out of range", raw.time))?;

    let temperature = raw.temperature.or(raw.temperature_high).or(raw.temperature_max);
    if temperature.is_none() {
        warn!("Data point at {} has no temperature", raw.time);
    }

    Ok(DataPoint {
        time,
        summary: raw.summary,
        temperature,
        apparent_temperature: raw
            .apparent_temperature
            .or(raw.apparent_temperature_high)
            .or(raw.apparent_temperature_max),
        humidity: raw.humidity,
        wind_speed: raw.wind_speed,
    })
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brooklyn() -> Location {
        Location {
            address: "Brooklyn, NY, USA".into(),
            lat: 40.6781784,
            lng: -73.9441579,
        }
    }

    const FORECAST: &str = r#"{
        "latitude": 40.6781784,
        "longitude": -73.9441579,
        "timezone": "America/New_York",
        "offset": -4,
        "currently": {
            "time": 1539700000,
            "summary": "Partly Cloudy",
            "icon": "partly-cloudy-day",
            "temperature": 61.3,
            "apparentTemperature": 60.8,
            "humidity": 0.62,
            "windSpeed": 7.1
        },
        "hourly": {
            "summary": "Mostly cloudy throughout the day.",
            "icon": "partly-cloudy-day",
            "data": [
                { "time": 1539698400, "summary": "Clear", "icon": "clear-day", "temperature": 59.0 },
                { "time": 1539702000, "summary": "Clear", "icon": "clear-day", "temperature": 62.5 },
                { "time": 1539705600, "summary": "Cloudy", "icon": "cloudy", "temperature": 64.1 }
            ]
        },
        "daily": {
            "summary": "Light rain on Sunday.",
            "icon": "rain",
            "data": [
                { "time": 1539662400, "summary": "Dry", "icon": "clear-day", "temperatureHigh": 66.2, "temperatureLow": 48.0 },
                { "time": 1539748800, "summary": "Rain", "icon": "rain", "temperatureMax": 55.9 }
            ]
        },
        "flags": { "units": "us" }
    }"#;

    #[test]
    fn parses_full_response() {
        let report = parse_forecast(FORECAST, &brooklyn(), Units::Auto).unwrap();

        assert_eq!(report.timezone, "America/New_York");
        assert_eq!(report.utc_offset_hours, -4.0);
        assert_eq!(report.units, Units::Us);
        assert_eq!(report.currently.summary, "Partly Cloudy");
        assert_eq!(report.currently.temperature, Some(61.3));
        assert_eq!(report.currently.apparent_temperature, Some(60.8));
        assert_eq!(report.hourly.temperatures(), vec![59.0, 62.5, 64.1]);
        assert_eq!(report.daily.temperatures(), vec![66.2, 55.9]);
        assert_eq!(report.location, brooklyn());
    }

    #[test]
    fn missing_timezone_means_no_data() {
        let err = parse_forecast(r#"{"latitude": 0, "longitude": 0}"#, &brooklyn(), Units::Si)
            .unwrap_err();
        assert!(err.to_string().contains("No data for location: Brooklyn, NY, USA"));
    }

    #[test]
    fn missing_flags_fall_back_to_requested_units() {
        let body = r#"{
            "timezone": "Europe/Oslo",
            "offset": 2,
            "currently": { "time": 0, "temperature": 4.0 }
        }"#;
        let report = parse_forecast(body, &brooklyn(), Units::Si).unwrap();
        assert_eq!(report.units, Units::Si);
        assert!(report.hourly.data.is_empty());
        assert!(report.daily.data.is_empty());
    }

    #[test]
    fn out_of_range_timestamp_is_an_error() {
        let body = r#"{
            "timezone": "UTC",
            "currently": { "time": 0, "temperature": 4.0 },
            "hourly": { "data": [ { "time": 9223372036854775807, "temperature": 1.0 } ] }
        }"#;
        let err = parse_forecast(body, &brooklyn(), Units::Si).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Bad hourly data"), "{msg}");
        assert!(msg.contains("out of range"), "{msg}");
    }

    #[test]
    fn humidity_and_wind_are_kept() {
        let report = parse_forecast(FORECAST, &brooklyn(), Units::Auto).unwrap();
        assert_eq!(report.currently.humidity, Some(0.62));
        assert_eq!(report.currently.wind_speed, Some(7.1));
    }

    #[test]
    fn missing_currently_is_an_error() {
        let err = parse_forecast(r#"{"timezone": "UTC"}"#, &brooklyn(), Units::Si).unwrap_err();
        assert!(err.to_string().contains("no current conditions"));
    }

    #[test]
    fn requires_api_key() {
        let err = DarkSkyProvider::new(ServiceSettings::new(DEFAULT_BASE_URL)).unwrap_err();
        assert!(err.to_string().contains("requires an API key"));

        let err = DarkSkyProvider::new(ServiceSettings::new(DEFAULT_BASE_URL).with_api_key(""))
            .unwrap_err();
        assert!(err.to_string().contains("requires an API key"));
    }

    #[test]
    fn url_has_key_and_coordinates() {
        let provider = DarkSkyProvider::new(
            ServiceSettings::new("http://localhost:9000/forecast/").with_api_key("KEY"),
        )
        .unwrap();
        assert_eq!(
            provider.forecast_url(&brooklyn()),
            "http://localhost:9000/forecast/KEY/40.6781784,-73.9441579"
        );
    }
}
