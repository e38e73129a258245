use std::{fmt, process::ExitCode, sync::Arc};

use clap::{Parser, Subcommand};
use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Select, Text};
use station_core::{
    Backend, Config, Coordinates, StationError, WeatherStation,
    location::{FixedLocator, Locator, locator_from_config},
    provider::backend_from_config,
};

use crate::render::TerminalDashboard;

type Station = WeatherStation<TerminalDashboard>;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "station", version, about = "Weather station dashboard")]
pub struct Cli {
    /// Use generated demo data even when an API key is configured.
    #[arg(long, global = true)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the OpenWeather API key and location preferences.
    Configure,

    /// Show weather for a city.
    Search {
        /// City name, e.g. "New York".
        #[arg(required = true)]
        city: Vec<String>,
    },

    /// Show weather for the current location.
    Locate {
        /// Latitude to use instead of looking up the location.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude to use instead of looking up the location.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// Show weather for one of the preset cities.
    Quick {
        /// Preset to show; prompts when absent.
        city: Option<String>,
    },

    /// Menu of presets, search and location (default).
    Interactive,
}

#[derive(Debug, Clone)]
enum MenuChoice {
    City(String),
    Search,
    Locate,
    Quit,
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuChoice::City(city) => write!(f, "{city}"),
            MenuChoice::Search => f.write_str("Search for a city..."),
            MenuChoice::Locate => f.write_str("Use my location"),
            MenuChoice::Quit => f.write_str("Quit"),
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let Cli { demo, command } = self;

        match command.unwrap_or(Command::Interactive) {
            Command::Configure => configure().map(|()| ExitCode::SUCCESS),
            Command::Search { city } => {
                let (_, station) = session(demo, None)?;
                Ok(one_shot(station.search(&city.join(" ")).await))
            }
            Command::Locate { lat, lon } => {
                let locator: Option<Arc<dyn Locator>> = match lat.zip(lon) {
                    Some((lat, lon)) => Some(Arc::new(FixedLocator(Coordinates::new(lat, lon)))),
                    None => None,
                };
                let (_, station) = session(demo, locator)?;
                Ok(one_shot(station.locate().await))
            }
            Command::Quick { city } => {
                let (config, station) = session(demo, None)?;
                let city = match city {
                    Some(city) => city,
                    None => Select::new("Pick a city:", config.quick_cities.clone()).prompt()?,
                };
                Ok(one_shot(station.quick_pick(&city).await))
            }
            Command::Interactive => {
                let (config, station) = session(demo, None)?;
                interactive(&station, &config).await.map(|()| ExitCode::SUCCESS)
            }
        }
    }
}

fn session(demo: bool, locator: Option<Arc<dyn Locator>>) -> anyhow::Result<(Config, Station)> {
    let config = Config::load()?.with_env_overrides();
    let station = build_station(&config, demo, locator);
    Ok((config, station))
}

fn build_station(config: &Config, demo: bool, locator: Option<Arc<dyn Locator>>) -> Station {
    let backend = if demo { Backend::demo(config) } else { backend_from_config(config) };

    if backend.is_demo() {
        eprintln!(
            "Demo mode: showing generated weather. Run `station configure` to add an OpenWeather API key."
        );
    }

    let locator = locator.unwrap_or_else(|| locator_from_config(config));
    WeatherStation::new(backend, TerminalDashboard::new()).with_locator(locator)
}

/// The dashboard has already shown the error; this only sets the exit status.
fn one_shot(result: Result<(), StationError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("weather request failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn configure() -> anyhow::Result<()> {
    // No env overrides here, they must never be written to disk.
    let mut config = Config::load()?;

    let key = Password::new("OpenWeather API key (empty for demo mode):")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;
    let key = key.trim();
    config.api_key = (!key.is_empty()).then(|| key.to_string());

    config.allow_location = Confirm::new("Allow looking up your location from your IP address?")
        .with_default(config.allow_location)
        .prompt()?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn interactive(station: &Station, config: &Config) -> anyhow::Result<()> {
    let clock = station.start_clock();

    if let Err(e) = station.open().await {
        tracing::debug!("startup view failed: {e}");
    }

    let outcome = loop {
        let header = station.dashboard().lock().clock().map(str::to_owned).unwrap_or_default();

        let mut options: Vec<MenuChoice> =
            config.quick_cities.iter().cloned().map(MenuChoice::City).collect();
        options.extend([MenuChoice::Search, MenuChoice::Locate, MenuChoice::Quit]);

        let prompt = format!("{header}\nWhat would you like to see?");
        let choice = match Select::new(prompt.trim_start(), options).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break Ok(()),
            Err(e) => break Err(e.into()),
        };

        let result = match choice {
            MenuChoice::City(city) => station.quick_pick(&city).await,
            MenuChoice::Search => match Text::new("City:").prompt() {
                Ok(city) => station.search(&city).await,
                Err(InquireError::OperationCanceled) => continue,
                Err(e) => break Err(e.into()),
            },
            MenuChoice::Locate => station.locate().await,
            MenuChoice::Quit => break Ok(()),
        };

        if let Err(e) = result {
            tracing::debug!("action failed: {e}");
        }
    };

    station.shutdown();
    clock.await?;
    outcome
}
