//! Condition code → glyph and description lookup.
//!
//! Codes follow OpenWeather's condition bands: 2xx thunderstorm, 3xx drizzle,
//! 5xx rain, 6xx snow, 7xx atmosphere, 800 clear, 80x clouds.

pub const DEFAULT_ICON: &str = "🌤️";
pub const DEFAULT_DESCRIPTION: &str = "partly cloudy";

pub fn icon(code: u16) -> &'static str {
    match code {
        // clear
        800 => "☀️",

        // clouds
        801 => "🌤️",
        802 => "⛅",
        803 => "🌥️",
        804 => "☁️",

        // rain
        500 | 520 => "🌦️",
        501 | 521 | 522 | 531 => "🌧️",
        502..=504 => "⛈️",

        // drizzle
        300..=302 | 310..=314 | 321 => "🌦️",

        // thunderstorm
        210 | 211 | 221 => "🌩️",
        200..=202 | 212 | 230..=232 => "⛈️",

        // snow
        601 | 602 | 621 | 622 => "❄️",
        600 | 611..=613 | 615 | 616 | 620 => "🌨️",

        // atmosphere
        701 | 721 | 741 => "🌫️",
        711 | 731 | 751 | 761 | 771 => "💨",
        762 => "🌋",
        781 => "🌪️",

        _ => DEFAULT_ICON,
    }
}

/// Lowercase description for the codes the demo synthesizer produces.
pub fn description(code: u16) -> &'static str {
    match code {
        800 => "clear sky",
        801 => "few clouds",
        802 => "scattered clouds",
        500 => "light rain",
        501 => "moderate rain",
        600 => "light snow",
        701 => "mist",
        _ => DEFAULT_DESCRIPTION,
    }
}
