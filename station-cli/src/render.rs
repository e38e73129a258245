use std::io::{self, Write};

use chrono::{DateTime, Local};
use station_core::{
    Dashboard, DashboardView,
    dashboard::{AirQualityLevel, format_clock},
};

/// Dashboard drawn as plain text on stdout.
#[derive(Debug, Default)]
pub struct TerminalDashboard {
    clock: Option<String>,
}

impl TerminalDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last clock reading, for prompts.
    pub fn clock(&self) -> Option<&str> {
        self.clock.as_deref()
    }

    fn draw(&self, view: &DashboardView) -> io::Result<()> {
        let mut out = io::stdout().lock();
        let h = &view.headline;

        writeln!(out)?;
        if let Some(clock) = &self.clock {
            writeln!(out, "{clock}")?;
        }
        writeln!(out, "📍 {}", h.city_name)?;
        writeln!(out, "   {} {}°  {}", h.icon, h.temperature, h.description)?;
        writeln!(
            out,
            "   Wind {:.1} m/s · Humidity {}% · Visibility {:.1} km · Feels like {}°",
            h.wind_speed_mps, h.humidity_pct, h.visibility_km, h.feels_like
        )?;

        writeln!(out)?;
        writeln!(out, "Hourly")?;
        let hours: Vec<String> = view
            .hourly
            .iter()
            .map(|entry| format!("{:>2}:00 {} {:>3}°", entry.hour, entry.icon, entry.temperature))
            .collect();
        writeln!(out, "   {}", hours.join("  "))?;

        writeln!(out)?;
        writeln!(out, "Next days")?;
        for day in &view.daily {
            writeln!(out, "   {}  {}  {:>3}° / {:>3}°", day.day_name, day.icon, day.high(), day.low())?;
        }

        let aqi = view.air_quality;
        let marker = match aqi.level {
            AirQualityLevel::Good => "🟢",
            AirQualityLevel::Moderate => "🟡",
            AirQualityLevel::Poor => "🔴",
        };
        writeln!(out)?;
        writeln!(
            out,
            "Air quality {marker} {} {} - {}",
            aqi.index,
            aqi.level.label(),
            aqi.level.description()
        )?;

        out.flush()
    }
}

impl Dashboard for TerminalDashboard {
    fn show_loading(&mut self) {
        eprintln!("Loading weather data...");
    }

    fn hide_loading(&mut self) {}

    fn show_error(&mut self, message: &str) {
        eprintln!("✖ {message}");
    }

    fn hide_error(&mut self) {}

    fn render(&mut self, view: &DashboardView) {
        if let Err(e) = self.draw(view) {
            tracing::warn!("failed to draw dashboard: {e}");
        }
    }

    fn show_clock(&mut self, now: DateTime<Local>) {
        self.clock = Some(format_clock(&now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn clock_is_kept_for_prompts() {
        let mut dashboard = TerminalDashboard::new();
        assert!(dashboard.clock().is_none());

        let now = Local.with_ymd_and_hms(2026, 10, 17, 14, 30, 0).unwrap();
        dashboard.show_clock(now);
        assert_eq!(dashboard.clock(), Some("Saturday, October 17, 2026 at 02:30 PM"));
    }
}
