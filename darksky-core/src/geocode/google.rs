use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    Location,
    http::{ServiceSettings, redact, success_body},
};

use super::Geocoder;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Google Maps Geocoding API client.
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    settings: ServiceSettings,
    http: Client,
}

impl GoogleGeocoder {
    pub fn new(settings: ServiceSettings) -> Result<Self> {
        let http = settings.client()?;
        Ok(Self { settings, http })
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn find(&self, query: &str) -> Result<Location> {
        let mut params = vec![("address", query)];
        if let Some(key) = self.settings.api_key.as_deref() {
            params.push(("key", key));
        }

        let req = self
            .http
            .get(&self.settings.base_url)
            .query(&params)
            .build()
            .context("Failed to build geocode request")?;
        debug!(
            "GET {}",
            redact(req.url().as_str(), self.settings.api_key.as_deref())
        );

        let res = self
            .http
            .execute(req)
            .await
            .context("Failed to send request to the Google geocoding API")?;

        let body = success_body(res, "Geocode").await?;
        parse_geocode(&body, query)
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeoResult>,
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    formatted_address: String,
    geometry: GeoGeometry,
}

#[derive(Debug, Deserialize)]
struct GeoGeometry {
    location: GeoLatLng,
}

#[derive(Debug, Deserialize)]
struct GeoLatLng {
    lat: f64,
    lng: f64,
}

/// Decode a geocoding response body, keeping the first result.
pub fn parse_geocode(body: &str, query: &str) -> Result<Location> {
    let parsed: GeoResponse =
        serde_json::from_str(body).context("Failed to parse geocode JSON")?;

    match parsed.status.as_str() {
        "OK" | "ZERO_RESULTS" | "" => {}
        status => {
            return Err(anyhow!(
                "Geocode API returned {status} for \"{query}\": {}",
                parsed.error_message.as_deref().unwrap_or("no details"),
            ));
        }
    }

    let first = parsed
        .results
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No results from geocode API for \"{query}\""))?;

    Ok(Location {
        address: first.formatted_address,
        lat: first.geometry.location.lat,
        lng: first.geometry.location.lng,
    })
}
