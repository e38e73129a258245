//! Presentation layer.
//!
//! Builders turn a [`WeatherSnapshot`] into plain view structs; a
//! [`Dashboard`] implementation puts them on screen. Every render replaces
//! whatever was shown before.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Timelike};
use rand::Rng;
use serde::Serialize;

use crate::{
    hash::city_hash,
    icons,
    model::{ForecastPoint, WeatherSnapshot},
};

pub const HOURLY_ENTRIES: usize = 8;
pub const MAX_DAYS: usize = 7;

/// Output sink for the station.
pub trait Dashboard: Send {
    /// Show the loading indicator and hide both content and error panel.
    fn show_loading(&mut self);
    fn hide_loading(&mut self);
    /// Show an error and hide content.
    fn show_error(&mut self, message: &str);
    fn hide_error(&mut self);
    fn render(&mut self, view: &DashboardView);
    fn show_clock(&mut self, now: DateTime<Local>);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Headline {
    pub city_name: String,
    pub temperature: i64,
    pub icon: &'static str,
    pub description: String,
    pub wind_speed_mps: f64,
    pub humidity_pct: u8,
    pub visibility_km: f64,
    pub feels_like: i64,
}

impl Headline {
    pub fn from_snapshot(snapshot: &WeatherSnapshot) -> Self {
        let current = snapshot.current();
        Self {
            city_name: snapshot.city_name().to_string(),
            temperature: round_half_up(current.temperature_c),
            icon: icons::icon(current.condition_code),
            description: current.description.clone(),
            wind_speed_mps: current.wind_speed_mps,
            humidity_pct: current.humidity_pct,
            visibility_km: f64::from(current.visibility_m) / 1000.0,
            feels_like: round_half_up(current.feels_like_c),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyEntry {
    /// Local hour of day, 0-23.
    pub hour: u32,
    pub icon: &'static str,
    pub temperature: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    /// Short weekday name, e.g. "Mon".
    pub day_name: String,
    pub icon: &'static str,
    pub min_c: f64,
    pub max_c: f64,
}

impl DailySummary {
    pub fn high(&self) -> i64 {
        round_half_up(self.max_c)
    }

    pub fn low(&self) -> i64 {
        round_half_up(self.min_c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AirQualityLevel {
    Good,
    Moderate,
    Poor,
}

impl AirQualityLevel {
    pub fn from_index(index: u32) -> Self {
        match index {
            0..=50 => AirQualityLevel::Good,
            51..=100 => AirQualityLevel::Moderate,
            _ => AirQualityLevel::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AirQualityLevel::Good => "Good",
            AirQualityLevel::Moderate => "Moderate",
            AirQualityLevel::Poor => "Poor",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AirQualityLevel::Good => "Air quality is satisfactory",
            AirQualityLevel::Moderate => "Air quality is acceptable",
            AirQualityLevel::Poor => "Air quality may affect health",
        }
    }

    /// Style class for sinks that theme by level.
    pub fn class(&self) -> &'static str {
        match self {
            AirQualityLevel::Good => "aqi-good",
            AirQualityLevel::Moderate => "aqi-moderate",
            AirQualityLevel::Poor => "aqi-poor",
        }
    }
}

/// Synthetic air-quality indicator; there is no real AQI source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AirQuality {
    pub index: u32,
    pub level: AirQualityLevel,
}

impl AirQuality {
    pub fn from_index(index: u32) -> Self {
        Self { index, level: AirQualityLevel::from_index(index) }
    }

    /// `25 + hash % 75` for a named city, random in `[20, 120)` otherwise.
    pub fn for_city<R: Rng + ?Sized>(city_name: Option<&str>, rng: &mut R) -> Self {
        let index = match city_name {
            Some(name) => 25 + city_hash(name) % 75,
            None => rng.gen_range(20..120),
        };
        Self::from_index(index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub headline: Headline,
    pub hourly: Vec<HourlyEntry>,
    pub daily: Vec<DailySummary>,
    pub air_quality: AirQuality,
}

impl DashboardView {
    pub fn build<Tz: TimeZone>(snapshot: &WeatherSnapshot, tz: &Tz) -> Self {
        Self {
            headline: Headline::from_snapshot(snapshot),
            hourly: hourly_strip(snapshot.forecast(), tz),
            daily: weekly_rollup(snapshot.forecast(), tz),
            air_quality: AirQuality::for_city(Some(snapshot.city_name()), &mut rand::thread_rng()),
        }
    }
}

pub fn hourly_strip<Tz: TimeZone>(forecast: &[ForecastPoint], tz: &Tz) -> Vec<HourlyEntry> {
    forecast
        .iter()
        .take(HOURLY_ENTRIES)
        .map(|point| HourlyEntry {
            hour: point.time().with_timezone(tz).hour(),
            icon: icons::icon(point.condition_code),
            temperature: round_half_up(point.temperature_c),
        })
        .collect()
}

/// Group points by local calendar day, in order of first appearance.
pub fn weekly_rollup<Tz: TimeZone>(forecast: &[ForecastPoint], tz: &Tz) -> Vec<DailySummary> {
    let mut days: Vec<DailySummary> = Vec::new();

    for point in forecast {
        let local = point.time().with_timezone(tz);
        let date = local.date_naive();

        match days.iter_mut().find(|day| day.date == date) {
            Some(day) => {
                day.min_c = day.min_c.min(point.temperature_c);
                day.max_c = day.max_c.max(point.temperature_c);
            }
            None => days.push(DailySummary {
                date,
                day_name: date.weekday().to_string(),
                icon: icons::icon(point.condition_code),
                min_c: point.temperature_c,
                max_c: point.temperature_c,
            }),
        }
    }

    days.truncate(MAX_DAYS);
    days
}

/// "Friday, October 17, 2026 at 09:05 AM"
pub fn format_clock<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%A, %B %-d, %Y at %I:%M %p").to_string()
}

/// Rounds .5 towards positive infinity, so -2.5 becomes -2.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
