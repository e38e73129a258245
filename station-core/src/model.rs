use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// "12.34, 56.78"
    pub fn display_name(&self) -> String {
        format!("{:.2}, {:.2}", self.latitude, self.longitude)
    }
}

/// First forward-geocoding match for a city name.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCity {
    pub coordinates: Coordinates,
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub visibility_m: u32,
    pub condition_code: u16,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Unix seconds.
    pub timestamp: i64,
    pub temperature_c: f64,
    pub condition_code: u16,
}

impl ForecastPoint {
    pub fn time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.timestamp, 0).unwrap_or_default()
    }
}

/// Current conditions plus forecast, as returned by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastPoint>,
}

/// The data set backing one render cycle.
///
/// Built once by a fetch or by the demo synthesizer and never modified
/// afterwards; a new fetch replaces it as a whole.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    city_name: String,
    current: CurrentConditions,
    forecast: Vec<ForecastPoint>,
}

impl WeatherSnapshot {
    pub fn new(city_name: impl Into<String>, report: WeatherReport) -> Self {
        Self {
            city_name: city_name.into(),
            current: report.current,
            forecast: report.forecast,
        }
    }

    pub fn city_name(&self) -> &str {
        &self.city_name
    }

    pub fn current(&self) -> &CurrentConditions {
        &self.current
    }

    pub fn forecast(&self) -> &[ForecastPoint] {
        &self.forecast
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_display_uses_two_decimals() {
        let coords = Coordinates::new(12.3456, -56.789);
        assert_eq!(coords.display_name(), "12.35, -56.79");
    }

    #[test]
    fn forecast_point_time_from_unix_seconds() {
        let point = ForecastPoint { timestamp: 86_400, temperature_c: 0.0, condition_code: 800 };
        assert_eq!(point.time().to_rfc3339(), "1970-01-02T00:00:00+00:00");
    }
}
