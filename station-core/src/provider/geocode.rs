//! OpenWeather geocoding: city name → coordinates, and back.

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::StationError,
    model::{Coordinates, ResolvedCity},
};

use super::openweather::truncate_body;

pub const DEFAULT_GEO_BASE_URL: &str = "https://api.openweathermap.org/geo/1.0";

#[derive(Debug, Clone)]
pub struct Geocoder {
    api_key: String,
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct GeoMatch {
    lat: f64,
    lon: f64,
    name: String,
    #[serde(default)]
    country: String,
}

impl Geocoder {
    pub fn new(api_key: String, base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http }
    }

    pub async fn resolve_city(&self, name: &str) -> Result<ResolvedCity, StationError> {
        let first = self
            .lookup("direct", &[("q", name)])
            .await
            .map_err(StationError::provider)?
            .ok_or_else(|| StationError::NotFound(name.to_string()))?;

        tracing::debug!(city = name, lat = first.lat, lon = first.lon, "resolved city");

        Ok(ResolvedCity {
            coordinates: Coordinates::new(first.lat, first.lon),
            name: first.name,
            country: first.country,
        })
    }

    /// Falls back to the formatted coordinates on any failure.
    pub async fn resolve_name(&self, coordinates: Coordinates) -> String {
        let lat = coordinates.latitude.to_string();
        let lon = coordinates.longitude.to_string();

        match self.lookup("reverse", &[("lat", lat.as_str()), ("lon", lon.as_str())]).await {
            Ok(Some(place)) if place.country.is_empty() => place.name,
            Ok(Some(place)) => format!("{}, {}", place.name, place.country),
            Ok(None) => {
                tracing::debug!(%lat, %lon, "reverse geocode returned no matches");
                coordinates.display_name()
            }
            Err(e) => {
                tracing::debug!("reverse geocode failed: {e:#}");
                coordinates.display_name()
            }
        }
    }

    async fn lookup(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Option<GeoMatch>> {
        let url = format!("{}/{endpoint}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("limit", "1"), ("appid", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather geocoding ({endpoint})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather geocoding response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather geocoding ({}) failed with status {}: {}",
                endpoint,
                status,
                truncate_body(&body),
            ));
        }

        let matches: Vec<GeoMatch> =
            serde_json::from_str(&body).context("Failed to parse OpenWeather geocoding JSON")?;

        Ok(matches.into_iter().next())
    }
}
