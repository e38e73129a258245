//! Current-position lookup.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, sync::Arc, time::Duration};

use crate::{Config, error::GeolocationError, model::Coordinates};

pub const DEFAULT_IP_LOCATOR_URL: &str = "https://ipapi.co/json/";
pub const LOCATE_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait Locator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;

    /// Checked before a lookup starts; `false` means no lookup is attempted.
    fn is_supported(&self) -> bool {
        true
    }
}

/// Always reports the same configured position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator(pub Coordinates);

#[async_trait]
impl Locator for FixedLocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.0)
    }
}

/// Location access turned off by the user.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedLocator;

#[async_trait]
impl Locator for DeniedLocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::PermissionDenied)
    }
}

/// No location capability at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedLocator;

#[async_trait]
impl Locator for UnsupportedLocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }

    fn is_supported(&self) -> bool {
        false
    }
}

/// Approximate position from the caller's public IP address.
#[derive(Debug, Clone)]
pub struct IpLocator {
    url: String,
    timeout: Duration,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new(DEFAULT_IP_LOCATOR_URL)
    }
}

impl IpLocator {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), timeout: LOCATE_TIMEOUT, http: Client::new() }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Locator for IpLocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        let res = self
            .http
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(classify_transport)?;

        if !res.status().is_success() {
            tracing::debug!("IP location lookup returned status {}", res.status());
            return Err(GeolocationError::PositionUnavailable);
        }

        let body: IpLookupResponse = res.json().await.map_err(classify_transport)?;

        match body {
            IpLookupResponse { latitude: Some(latitude), longitude: Some(longitude), error: false, .. } => {
                Ok(Coordinates::new(latitude, longitude))
            }
            other => {
                tracing::debug!(reason = ?other.reason, "IP location lookup gave no position");
                Err(GeolocationError::PositionUnavailable)
            }
        }
    }
}

fn classify_transport(err: reqwest::Error) -> GeolocationError {
    tracing::debug!("IP location lookup failed: {err}");
    if err.is_timeout() {
        GeolocationError::Timeout
    } else {
        GeolocationError::PositionUnavailable
    }
}

/// Fixed position if configured, otherwise an IP lookup unless disabled.
pub fn locator_from_config(config: &Config) -> Arc<dyn Locator> {
    match (config.location, config.allow_location) {
        (Some(coordinates), _) => Arc::new(FixedLocator(coordinates)),
        (None, false) => Arc::new(DeniedLocator),
        (None, true) => Arc::new(IpLocator::default()),
    }
}
