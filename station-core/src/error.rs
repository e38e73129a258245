use thiserror::Error;

/// Text shown for every search or fetch failure.
pub const FETCH_FAILED_MESSAGE: &str = "Unable to fetch weather data. Please try again.";

/// Text shown when a search is submitted without a city.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a city name";

/// Failures of the platform location capability.
///
/// The numeric codes follow the standard geolocation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("location request timed out")]
    Timeout,
    #[error("location lookup is not supported")]
    Unsupported,
}

impl GeolocationError {
    pub fn code(&self) -> Option<u8> {
        match self {
            GeolocationError::PermissionDenied => Some(1),
            GeolocationError::PositionUnavailable => Some(2),
            GeolocationError::Timeout => Some(3),
            GeolocationError::Unsupported => None,
        }
    }

    /// Unknown codes are reported as a timeout.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => GeolocationError::PermissionDenied,
            2 => GeolocationError::PositionUnavailable,
            _ => GeolocationError::Timeout,
        }
    }

    pub fn user_message(&self) -> String {
        let reason = match self {
            GeolocationError::Unsupported => {
                return "Geolocation is not supported on this system".to_string();
            }
            GeolocationError::PermissionDenied => "Please allow location access.",
            GeolocationError::PositionUnavailable => "Location unavailable.",
            GeolocationError::Timeout => "Location request timed out.",
        };

        format!("Unable to get your location. {reason}")
    }
}

#[derive(Debug, Error)]
pub enum StationError {
    #[error("no city name given")]
    EmptyInput,

    #[error("city '{0}' not found")]
    NotFound(String),

    #[error("weather provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Geolocation(#[from] GeolocationError),

    /// The request was superseded by a newer one.
    #[error("request superseded by a newer one")]
    Cancelled,
}

impl StationError {
    /// Flatten an `anyhow` chain into a provider error.
    pub fn provider(err: anyhow::Error) -> Self {
        StationError::Provider(format!("{err:#}"))
    }

    /// Message for the error panel.
    pub fn user_message(&self) -> String {
        match self {
            StationError::EmptyInput => EMPTY_INPUT_MESSAGE.to_string(),
            StationError::NotFound(_) | StationError::Provider(_) => {
                FETCH_FAILED_MESSAGE.to_string()
            }
            StationError::Geolocation(err) => err.user_message(),
            StationError::Cancelled => String::new(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, StationError::Cancelled)
    }
}
