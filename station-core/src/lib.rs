//! Core library for the `station` weather dashboard.
//!
//! This crate defines:
//! - Configuration handling
//! - Geocoding and weather fetching over OpenWeather, plus offline demo data
//! - The presentation model and the `Dashboard` output sink
//! - The `WeatherStation` orchestrator that ties user actions together
//!
//! It is used by `station-cli`, but any other front end can drive it by
//! implementing `Dashboard`.

pub mod config;
pub mod dashboard;
pub mod demo;
pub mod error;
pub mod hash;
pub mod icons;
pub mod location;
pub mod model;
pub mod provider;
pub mod station;

pub use config::Config;
pub use dashboard::{Dashboard, DashboardView};
pub use error::{GeolocationError, StationError};
pub use location::Locator;
pub use model::{Coordinates, CurrentConditions, ForecastPoint, WeatherReport, WeatherSnapshot};
pub use provider::{Backend, WeatherProvider};
pub use station::{StationState, WeatherStation};
