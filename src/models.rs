use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::{
    deserialize_lenient_f64, deserialize_lenient_string, deserialize_lenient_vec,
    parse_calendar_date,
};

// Wire models consumed from the weather backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Raw date as sent by the backend; see [`WeatherRecord::calendar_date`]
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub temperature_max: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub temperature_min: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub rain_sum: Option<f64>,
    /// Seconds of sunshine
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub sunshine_duration: Option<f64>,
}

impl WeatherRecord {
    /// Calendar day of the record in UTC, `None` when the date does not parse
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }

    /// Sunshine converted from seconds to hours
    pub fn sunshine_hours(&self) -> Option<f64> {
        self.sunshine_duration.map(|secs| secs / 3600.0)
    }

    pub fn field(&self, field: WeatherField) -> Option<f64> {
        match field {
            WeatherField::TemperatureMax => self.temperature_max,
            WeatherField::TemperatureMin => self.temperature_min,
            WeatherField::RainSum => self.rain_sum,
            WeatherField::SunshineDuration => self.sunshine_duration,
        }
    }
}

/// Selects which measurement an aggregation reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherField {
    TemperatureMax,
    TemperatureMin,
    RainSum,
    SunshineDuration,
}

impl WeatherField {
    pub fn label(&self) -> &'static str {
        match self {
            WeatherField::TemperatureMax => "Max Temperature (°C)",
            WeatherField::TemperatureMin => "Min Temperature (°C)",
            WeatherField::RainSum => "Rainfall (mm)",
            WeatherField::SunshineDuration => "Sunshine (s)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    #[serde(default)]
    pub total_days: usize,
    #[serde(default)]
    pub avg_max_temp: f64,
    #[serde(default)]
    pub avg_min_temp: f64,
    #[serde(default)]
    pub total_rainfall: f64,
    #[serde(default)]
    pub rainy_days: usize,
    #[serde(default, alias = "avg_sunshine")]
    pub avg_sunshine_hours: f64,
    #[serde(default)]
    pub hot_days: usize,
    #[serde(default)]
    pub cold_days: usize,
    #[serde(default)]
    pub heavy_rain_days: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub city: String,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CitiesResponse {
    pub success: bool,
    #[serde(default)]
    pub cities: Vec<City>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Where the backend got the records from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Database,
    Api,
    /// Any source name this client does not know
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherDataResponse {
    pub success: bool,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub source: DataSource,
    #[serde(default)]
    pub summary: Option<SummaryStats>,
    #[serde(default, deserialize_with = "deserialize_lenient_vec")]
    pub data: Vec<WeatherRecord>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CitySuggestionsResponse {
    pub success: bool,
    #[serde(default)]
    pub suggestions: Vec<CitySuggestion>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub duplicate_check: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

// Derived views, recomputed on every load
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket {
    /// "Mon YYYY", e.g. "Jan 2025"
    pub month_key: String,
    pub year: i32,
    pub month: u32,
    pub values: Vec<f64>,
    pub average: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalSlot {
    pub month: u32,
    pub label: &'static str,
    /// 0.0 when no record contributed
    pub avg_max: f64,
    pub avg_min: f64,
    pub max_count: usize,
    pub min_count: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ExtremeStats {
    pub hot_days: usize,
    pub very_hot_days: usize,
    pub cold_days: usize,
    pub very_cold_days: usize,
    pub rainy_days: usize,
    pub heavy_rain_days: usize,
    pub dry_days: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub days: usize,
    pub avg_max_temp: Option<f64>,
    pub avg_min_temp: Option<f64>,
    pub total_rainfall: f64,
}

/// Meteorological season, December through February counting as winter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Autumn];

    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonSummary {
    pub season: Season,
    pub days: usize,
    pub avg_max_temp: Option<f64>,
    pub avg_min_temp: Option<f64>,
    pub total_rainfall: f64,
}

/// One temperature bucket `[lower, upper)`; the last bucket also holds `upper`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub max_count: usize,
    pub min_count: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ClimateFigures {
    pub avg_daily_rainfall: Option<f64>,
    /// Highest max minus lowest min
    pub temperature_range: Option<f64>,
    pub total_sunshine_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureRecord {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataRange {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub total_days: usize,
    pub years: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub page_number: usize,
    pub page_size: usize,
    pub total_records: usize,
    pub total_pages: usize,
    pub has_first: bool,
    pub has_prev: bool,
    pub has_next: bool,
    pub has_last: bool,
    pub records: Vec<WeatherRecord>,
}

impl PageView {
    /// 1-based index of the first record on this page, 0 for an empty dataset
    pub fn first_index(&self) -> usize {
        if self.records.is_empty() {
            0
        } else {
            (self.page_number - 1) * self.page_size + 1
        }
    }

    pub fn last_index(&self) -> usize {
        if self.records.is_empty() {
            0
        } else {
            self.first_index() + self.records.len() - 1
        }
    }
}
