#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use station_core::{
    Coordinates, CurrentConditions, Dashboard, DashboardView, ForecastPoint, StationError,
    WeatherProvider, WeatherReport, model::ResolvedCity,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Loading,
    LoadingHidden,
    Error(String),
    ErrorHidden,
    Rendered(DashboardView),
    Clock,
}

/// Dashboard that remembers everything it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingDashboard {
    pub events: Vec<Event>,
    pub loading: bool,
    pub error: Option<String>,
    pub content: Option<DashboardView>,
}

impl RecordingDashboard {
    pub fn renders(&self) -> Vec<&DashboardView> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Rendered(view) => Some(view),
                _ => None,
            })
            .collect()
    }
}

impl Dashboard for RecordingDashboard {
    fn show_loading(&mut self) {
        self.events.push(Event::Loading);
        self.loading = true;
        self.error = None;
        self.content = None;
    }

    fn hide_loading(&mut self) {
        self.events.push(Event::LoadingHidden);
        self.loading = false;
    }

    fn show_error(&mut self, message: &str) {
        self.events.push(Event::Error(message.to_string()));
        self.error = Some(message.to_string());
        self.content = None;
    }

    fn hide_error(&mut self) {
        self.events.push(Event::ErrorHidden);
        self.error = None;
    }

    fn render(&mut self, view: &DashboardView) {
        self.events.push(Event::Rendered(view.clone()));
        self.content = Some(view.clone());
    }

    fn show_clock(&mut self, _now: DateTime<Local>) {
        self.events.push(Event::Clock);
    }
}

pub fn report(temperature_c: f64, condition_code: u16) -> WeatherReport {
    let start = 1_792_108_800;
    WeatherReport {
        current: CurrentConditions {
            temperature_c,
            feels_like_c: temperature_c - 1.0,
            humidity_pct: 70,
            wind_speed_mps: 3.0,
            visibility_m: 10_000,
            condition_code,
            description: "light rain".to_string(),
        },
        forecast: (0..40)
            .map(|i| ForecastPoint {
                timestamp: start + i * 3 * 3600,
                temperature_c: temperature_c + (i % 5) as f64,
                condition_code,
            })
            .collect(),
    }
}

/// In-memory provider with per-city latency.
#[derive(Debug, Default)]
pub struct FakeProvider {
    pub cities: HashMap<String, Coordinates>,
    pub delays: HashMap<String, Duration>,
    pub place_name: Option<String>,
    pub fail_fetch: bool,
    pub resolve_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
}

impl FakeProvider {
    pub fn with_city(mut self, name: &str, lat: f64, lon: f64) -> Self {
        self.cities.insert(name.to_string(), Coordinates::new(lat, lon));
        self
    }

    pub fn with_delay(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst) + self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn resolve_city(&self, name: &str) -> Result<ResolvedCity, StationError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(name) {
            tokio::time::sleep(*delay).await;
        }
        let coordinates =
            *self.cities.get(name).ok_or_else(|| StationError::NotFound(name.to_string()))?;
        Ok(ResolvedCity { coordinates, name: name.to_string(), country: "XX".to_string() })
    }

    async fn resolve_name(&self, coordinates: Coordinates) -> String {
        self.place_name.clone().unwrap_or_else(|| coordinates.display_name())
    }

    async fn fetch(&self, coordinates: Coordinates) -> Result<WeatherReport, StationError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch {
            return Err(StationError::Provider("status 500".to_string()));
        }
        Ok(report(coordinates.latitude / 4.0, 500))
    }
}
