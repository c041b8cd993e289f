use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_timeout_secs: u64,
    pub export_dir: PathBuf,
    pub notification_dismiss_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            api_url: env::var("WEATHER_API_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:5000".to_string()),
            api_timeout_secs: env::var("WEATHER_API_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            export_dir: PathBuf::from(env::var("EXPORT_DIR").unwrap_or_else(|_| ".".to_string())),
            notification_dismiss_secs: env::var("NOTIFICATION_DISMISS_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
        })
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub fn notification_dismiss(&self) -> Duration {
        Duration::from_secs(self.notification_dismiss_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5000".to_string(),
            api_timeout_secs: 30,
            export_dir: PathBuf::from("."),
            notification_dismiss_secs: 5,
        }
    }
}
