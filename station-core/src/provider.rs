use crate::{
    Config,
    demo::DemoSynthesizer,
    error::StationError,
    model::{Coordinates, ResolvedCity, WeatherReport},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc, time::Duration};

pub mod geocode;
pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Forward-geocode a city name, using the first match only.
    async fn resolve_city(&self, name: &str) -> Result<ResolvedCity, StationError>;

    /// Best-effort reverse geocoding; never fails.
    async fn resolve_name(&self, coordinates: Coordinates) -> String;

    /// Current conditions and forecast, both or nothing.
    async fn fetch(&self, coordinates: Coordinates) -> Result<WeatherReport, StationError>;
}

/// Where snapshots come from.
#[derive(Debug, Clone)]
pub enum Backend {
    Live(Arc<dyn WeatherProvider>),
    Demo(DemoSynthesizer),
}

impl Backend {
    pub fn is_demo(&self) -> bool {
        matches!(self, Backend::Demo(_))
    }

    pub fn demo(config: &Config) -> Self {
        Backend::Demo(DemoSynthesizer::new(Duration::from_millis(config.demo_delay_ms)))
    }
}

/// Live OpenWeather backend when a real key is configured, demo otherwise.
pub fn backend_from_config(config: &Config) -> Backend {
    match config.api_key() {
        Some(key) => {
            let provider = OpenWeatherProvider::new(key.to_owned())
                .with_base_urls(&config.geo_base_url, &config.weather_base_url);
            Backend::Live(Arc::new(provider))
        }
        None => {
            tracing::info!("no OpenWeather API key configured, using demo data");
            Backend::demo(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, PLACEHOLDER_API_KEY};

    #[test]
    fn missing_key_selects_demo() {
        let cfg = Config::default();
        assert!(backend_from_config(&cfg).is_demo());
    }

    #[test]
    fn placeholder_key_selects_demo() {
        let cfg = Config { api_key: Some(PLACEHOLDER_API_KEY.to_string()), ..Config::default() };
        assert!(backend_from_config(&cfg).is_demo());
    }

    #[test]
    fn real_key_selects_live() {
        let cfg = Config { api_key: Some("KEY".to_string()), ..Config::default() };
        assert!(!backend_from_config(&cfg).is_demo());
    }

    #[test]
    fn demo_delay_comes_from_config() {
        let cfg = Config { demo_delay_ms: 250, ..Config::default() };
        match Backend::demo(&cfg) {
            Backend::Demo(synth) => assert_eq!(synth.delay(), Duration::from_millis(250)),
            Backend::Live(_) => panic!("expected demo backend"),
        }
    }
}
