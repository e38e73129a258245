//! Offline demo data.
//!
//! Used when no API key is configured. Everything categorical (condition,
//! humidity, wind, visibility) is derived from [`city_hash`] so a city always
//! looks the same; temperatures wiggle randomly around a city-specific base.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::{
    hash::city_hash,
    icons,
    model::{CurrentConditions, ForecastPoint, WeatherReport, WeatherSnapshot},
};

/// Representative condition codes, indexed by the city hash.
pub const DEMO_CONDITIONS: [u16; 7] = [800, 801, 802, 500, 501, 600, 701];

/// City shown when a demo session opens.
pub const DEMO_CITY_NAME: &str = "Demo City";

/// Display name used for demo data requested through the location flow.
pub const DEMO_LOCATION_NAME: &str = "Your Location";

pub const DEFAULT_DEMO_DELAY: Duration = Duration::from_secs(1);

const HOURLY_POINTS: usize = 8;
const EXTENDED_POINTS: usize = 32;
const HOUR: i64 = 3600;

#[derive(Debug, Clone)]
pub struct DemoSynthesizer {
    delay: Duration,
}

impl Default for DemoSynthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_DEMO_DELAY)
    }
}

impl DemoSynthesizer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Synthesize a snapshot after the simulated network delay.
    pub async fn generate(&self, city: &str) -> WeatherSnapshot {
        tokio::time::sleep(self.delay).await;
        let snapshot = synthesize(city, Utc::now(), &mut rand::thread_rng());
        tracing::debug!(city, "generated demo weather");
        snapshot
    }
}

pub fn synthesize<R: Rng + ?Sized>(city: &str, now: DateTime<Utc>, rng: &mut R) -> WeatherSnapshot {
    let hash = city_hash(city) as usize;
    let base = 15.0 + (hash % 20) as f64;
    let condition_code = condition_at(hash);

    let current = CurrentConditions {
        temperature_c: base + rng.gen_range(-3.0..3.0),
        feels_like_c: base + rng.gen_range(-2.0..2.0),
        humidity_pct: (40 + hash % 40) as u8,
        wind_speed_mps: 1.0 + (hash % 8) as f64 / 2.0,
        visibility_m: (8000 + hash % 5000) as u32,
        condition_code,
        description: icons::description(condition_code).to_string(),
    };

    let start = now.timestamp();
    let mut forecast = Vec::with_capacity(HOURLY_POINTS + EXTENDED_POINTS);

    for i in 0..HOURLY_POINTS {
        forecast.push(ForecastPoint {
            timestamp: start + i as i64 * HOUR,
            temperature_c: base + (i as f64 * 0.5).sin() * 3.0 + rng.gen_range(-2.0..2.0),
            condition_code: condition_at(hash + i),
        });
    }

    for i in 0..EXTENDED_POINTS {
        let day = i / 8;
        let drift = (day as f64 * 0.3).sin() * 5.0;
        forecast.push(ForecastPoint {
            timestamp: start + (i + HOURLY_POINTS) as i64 * HOUR,
            temperature_c: base + drift + rng.gen_range(-4.0..4.0),
            condition_code: condition_at(hash + i + day),
        });
    }

    WeatherSnapshot::new(city, WeatherReport { current, forecast })
}

fn condition_at(index: usize) -> u16 {
    DEMO_CONDITIONS[index % DEMO_CONDITIONS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn sample(city: &str) -> WeatherSnapshot {
        let now = DateTime::from_timestamp(1_760_000_000, 0).unwrap();
        synthesize(city, now, &mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn always_forty_points() {
        for city in ["", "Berlin", "Demo City", "Your Location", "Ushuaia"] {
            assert_eq!(sample(city).forecast().len(), 40);
        }
    }

    #[test]
    fn categorical_fields_follow_hash() {
        // city_hash("Berlin") = 1986302914
        let snapshot = sample("Berlin");
        let current = snapshot.current();
        assert_eq!(current.condition_code, 801);
        assert_eq!(current.description, "few clouds");
        assert_eq!(current.humidity_pct, 40 + 34);
        assert_eq!(current.wind_speed_mps, 1.0 + 2.0 / 2.0);
        assert_eq!(current.visibility_m, 8000 + 2914);
        assert_eq!(snapshot.city_name(), "Berlin");
    }

    #[test]
    fn temperatures_stay_near_base() {
        // base = 15 + 14
        let snapshot = sample("Berlin");
        let current = snapshot.current();
        assert!((26.0..32.0).contains(&current.temperature_c));
        assert!((27.0..31.0).contains(&current.feels_like_c));
        for point in snapshot.forecast() {
            assert!((29.0 - 9.0..29.0 + 9.0).contains(&point.temperature_c));
        }
    }

    #[test]
    fn forecast_is_hourly_from_now() {
        let snapshot = sample("Paris");
        let points = snapshot.forecast();
        assert_eq!(points[0].timestamp, 1_760_000_000);
        for pair in points.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, HOUR);
        }
    }

    #[test]
    fn forecast_conditions_rotate_through_set() {
        let hash = city_hash("Berlin") as usize;
        let points = sample("Berlin");
        let points = points.forecast();
        for (i, point) in points.iter().take(HOURLY_POINTS).enumerate() {
            assert_eq!(point.condition_code, DEMO_CONDITIONS[(hash + i) % 7]);
        }
        // extended point 9 sits in day 1
        assert_eq!(points[HOURLY_POINTS + 9].condition_code, DEMO_CONDITIONS[(hash + 9 + 1) % 7]);
    }

    #[test]
    fn same_city_same_categories_across_runs() {
        let now = Utc::now();
        let a = synthesize("Oslo", now, &mut StdRng::seed_from_u64(1));
        let b = synthesize("Oslo", now, &mut StdRng::seed_from_u64(2));
        assert_eq!(a.current().condition_code, b.current().condition_code);
        assert_eq!(a.current().humidity_pct, b.current().humidity_pct);
        let codes = |s: &WeatherSnapshot| s.forecast().iter().map(|p| p.condition_code).collect::<Vec<_>>();
        assert_eq!(codes(&a), codes(&b));
    }

    #[tokio::test]
    async fn generate_waits_for_delay() {
        let synth = DemoSynthesizer::new(Duration::from_millis(30));
        let started = std::time::Instant::now();
        let snapshot = synth.generate("Lisbon").await;
        assert!(started.elapsed() >= Duration::from_millis(30));
        assert_eq!(snapshot.forecast().len(), 40);
    }
}
