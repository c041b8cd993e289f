// Shared fixtures for the integration tests
#![allow(dead_code)]

use std::path::Path;

use serde_json::{json, Value};
use weather_insight::client::WeatherApiClient;
use weather_insight::config::Config;
use weather_insight::dashboard::DashboardController;

/// Controller pointed at a mock backend, exporting into `export_dir`
pub fn controller_for(base_url: &str, export_dir: &Path) -> DashboardController {
    let config = Config {
        api_url: base_url.to_string(),
        export_dir: export_dir.to_path_buf(),
        ..Config::default()
    };
    DashboardController::new(WeatherApiClient::new(base_url.to_string()), config)
}

pub fn cities_body() -> Value {
    json!({
        "success": true,
        "cities": [
            {"city": "London", "country": "United Kingdom"},
            {"city": "Paris", "country": "France"},
            {"city": "Reykjavik"}
        ]
    })
}

/// January/February 2024 for London, with 2024-01-02 delivered twice
///
/// The second copy carries a time of day and different values; only the
/// first one may survive.
pub fn weather_body_with_duplicate() -> Value {
    json!({
        "success": true,
        "city": "London",
        "start_date": "2024-01-01",
        "end_date": "2024-02-02",
        "source": "database",
        "summary": {
            "total_days": 5,
            "avg_max_temp": 9.0,
            "avg_min_temp": 3.0,
            "total_rainfall": 20.0,
            "rainy_days": 2,
            "avg_sunshine": 2.0
        },
        "data": [
            {"date": "2024-01-01", "temperature_max": 8.0, "temperature_min": 2.0, "rain_sum": 0.0, "sunshine_duration": 7200.0},
            {"date": "2024-01-02", "temperature_max": 10.0, "temperature_min": 4.0, "rain_sum": 12.5, "sunshine_duration": 3600.0},
            {"date": "2024-01-02T12:00:00", "temperature_max": 99.0, "temperature_min": 99.0, "rain_sum": 99.0, "sunshine_duration": 0.0},
            {"date": "2024-02-01", "temperature_max": 12.0, "temperature_min": null, "rain_sum": 3.0, "sunshine_duration": null},
            {"date": "2024-02-02", "temperature_max": "n/a", "temperature_min": 6.0, "rain_sum": 0.5, "sunshine_duration": 10800.0}
        ]
    })
}

/// `days` consecutive days starting 2023-01-01
pub fn weather_body_days(city: &str, days: u64) -> Value {
    let start = chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let data: Vec<Value> = (0..days)
        .map(|i| {
            let date = start + chrono::Days::new(i);
            json!({
                "date": date.format("%Y-%m-%d").to_string(),
                "temperature_max": 20.0,
                "temperature_min": 10.0,
                "rain_sum": 0.0,
                "sunshine_duration": 3600.0
            })
        })
        .collect();

    json!({
        "success": true,
        "city": city,
        "source": "api",
        "data": data
    })
}
