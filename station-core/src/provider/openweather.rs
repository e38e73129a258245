use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::StationError,
    model::{Coordinates, CurrentConditions, ForecastPoint, ResolvedCity, WeatherReport},
};

use super::{
    WeatherProvider,
    geocode::{DEFAULT_GEO_BASE_URL, Geocoder},
};

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// OpenWeather reports up to 10 km and omits the field in some responses.
const DEFAULT_VISIBILITY_M: u32 = 10_000;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    geocoder: Geocoder,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        let http = Client::new();
        Self {
            geocoder: Geocoder::new(api_key.clone(), DEFAULT_GEO_BASE_URL, http.clone()),
            api_key,
            base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            http,
        }
    }

    pub fn with_base_urls(mut self, geo_base_url: &str, weather_base_url: &str) -> Self {
        self.geocoder = Geocoder::new(self.api_key.clone(), geo_base_url, self.http.clone());
        self.base_url = weather_base_url.trim_end_matches('/').to_string();
        self
    }

    async fn fetch_current(&self, coordinates: Coordinates) -> Result<CurrentConditions> {
        let parsed: OwCurrentResponse = self.get_json("weather", coordinates).await?;

        let (condition_code, description) = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| (w.id, w.description))
            .unwrap_or_default();

        Ok(CurrentConditions {
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            visibility_m: parsed.visibility.unwrap_or(DEFAULT_VISIBILITY_M),
            condition_code,
            description,
        })
    }

    async fn fetch_forecast(&self, coordinates: Coordinates) -> Result<Vec<ForecastPoint>> {
        let parsed: OwForecastResponse = self.get_json("forecast", coordinates).await?;

        let points = parsed
            .list
            .into_iter()
            .map(|entry| ForecastPoint {
                timestamp: entry.dt,
                temperature_c: entry.main.temp,
                condition_code: entry.weather.first().map(|w| w.id).unwrap_or_default(),
            })
            .collect();

        Ok(points)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, coordinates: Coordinates) -> Result<T> {
        let url = format!("{}/{endpoint}", self.base_url);
        let lat = coordinates.latitude.to_string();
        let lon = coordinates.longitude.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({endpoint})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {endpoint} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                endpoint,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).with_context(|| format!("Failed to parse OpenWeather {endpoint} JSON"))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    feels_like: f64,
    #[serde(default)]
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u16,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize, Default)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
    visibility: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn resolve_city(&self, name: &str) -> Result<ResolvedCity, StationError> {
        self.geocoder.resolve_city(name).await
    }

    async fn resolve_name(&self, coordinates: Coordinates) -> String {
        self.geocoder.resolve_name(coordinates).await
    }

    async fn fetch(&self, coordinates: Coordinates) -> Result<WeatherReport, StationError> {
        let (current, forecast) =
            tokio::try_join!(self.fetch_current(coordinates), self.fetch_forecast(coordinates))
                .map_err(StationError::provider)?;

        tracing::info!(
            lat = coordinates.latitude,
            lon = coordinates.longitude,
            points = forecast.len(),
            "fetched weather"
        );

        Ok(WeatherReport { current, forecast })
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
