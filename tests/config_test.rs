// Config loading from the environment

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serial_test::serial;
use weather_insight::config::Config;

const VARS: [&str; 4] = [
    "WEATHER_API_URL",
    "WEATHER_API_TIMEOUT_SECS",
    "EXPORT_DIR",
    "NOTIFICATION_DISMISS_SECS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_when_unset() {
    clear_env();

    let config = Config::from_env().unwrap();
    assert_eq!(config.api_url, "http://127.0.0.1:5000");
    assert_eq!(config.api_timeout(), Duration::from_secs(30));
    assert_eq!(config.export_dir, PathBuf::from("."));
    assert_eq!(config.notification_dismiss(), Duration::from_secs(5));
}

#[test]
#[serial]
fn test_values_from_env() {
    clear_env();
    env::set_var("WEATHER_API_URL", "http://weather.internal:8080");
    env::set_var("WEATHER_API_TIMEOUT_SECS", "5");
    env::set_var("EXPORT_DIR", "/tmp/exports");
    env::set_var("NOTIFICATION_DISMISS_SECS", "12");

    let config = Config::from_env().unwrap();
    assert_eq!(config.api_url, "http://weather.internal:8080");
    assert_eq!(config.api_timeout_secs, 5);
    assert_eq!(config.export_dir, PathBuf::from("/tmp/exports"));
    assert_eq!(config.notification_dismiss_secs, 12);

    clear_env();
}

#[test]
#[serial]
fn test_unparseable_numbers_fall_back() {
    clear_env();
    env::set_var("WEATHER_API_TIMEOUT_SECS", "soon");
    env::set_var("NOTIFICATION_DISMISS_SECS", "-1");

    let config = Config::from_env().unwrap();
    assert_eq!(config.api_timeout_secs, 30);
    assert_eq!(config.notification_dismiss_secs, 5);

    clear_env();
}
