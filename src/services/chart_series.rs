use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::models::{WeatherField, WeatherRecord};
use crate::services::monthly_aggregator::aggregate_monthly;
use crate::services::statistics::{extreme_stats, seasonal_averages};

/// The four dashboard charts, named the way the page ids them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChartId {
    #[serde(rename = "temperatureChart")]
    Temperature,
    #[serde(rename = "rainfallChart")]
    Rainfall,
    #[serde(rename = "seasonalChart")]
    Seasonal,
    #[serde(rename = "extremeChart")]
    Extremes,
}

impl ChartId {
    pub const ALL: [ChartId; 4] = [
        ChartId::Temperature,
        ChartId::Rainfall,
        ChartId::Seasonal,
        ChartId::Extremes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartId::Temperature => "temperatureChart",
            ChartId::Rainfall => "rainfallChart",
            ChartId::Seasonal => "seasonalChart",
            ChartId::Extremes => "extremeChart",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == value)
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    /// One point per chart label; `None` where the series has no value
    pub points: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub id: ChartId,
    pub title: String,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCharts {
    pub temperature: ChartData,
    pub rainfall: ChartData,
    pub seasonal: ChartData,
    pub extremes: ChartData,
}

impl DashboardCharts {
    /// Build every chart from already-deduplicated records
    pub fn build(records: &[WeatherRecord]) -> Self {
        Self {
            temperature: temperature_chart(records),
            rainfall: rainfall_chart(records),
            seasonal: seasonal_chart(records),
            extremes: extremes_chart(records),
        }
    }

    pub fn get(&self, id: ChartId) -> &ChartData {
        match id {
            ChartId::Temperature => &self.temperature,
            ChartId::Rainfall => &self.rainfall,
            ChartId::Seasonal => &self.seasonal,
            ChartId::Extremes => &self.extremes,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChartData> {
        ChartId::ALL.into_iter().map(move |id| self.get(id))
    }
}

/// Monthly max and min averages on a shared month axis
fn temperature_chart(records: &[WeatherRecord]) -> ChartData {
    let max_buckets = aggregate_monthly(records, WeatherField::TemperatureMax);
    let min_buckets = aggregate_monthly(records, WeatherField::TemperatureMin);

    let mut axis: BTreeMap<(i32, u32), (String, Option<f64>, Option<f64>)> = BTreeMap::new();
    for bucket in max_buckets {
        axis.entry((bucket.year, bucket.month))
            .or_insert_with(|| (bucket.month_key.clone(), None, None))
            .1 = Some(bucket.average);
    }
    for bucket in min_buckets {
        axis.entry((bucket.year, bucket.month))
            .or_insert_with(|| (bucket.month_key.clone(), None, None))
            .2 = Some(bucket.average);
    }

    let mut labels = Vec::with_capacity(axis.len());
    let mut max_points = Vec::with_capacity(axis.len());
    let mut min_points = Vec::with_capacity(axis.len());
    for (label, max, min) in axis.into_values() {
        labels.push(label);
        max_points.push(max);
        min_points.push(min);
    }

    ChartData {
        id: ChartId::Temperature,
        title: "Monthly Average Temperature".to_string(),
        labels,
        series: vec![
            Series {
                label: format!("Avg {}", WeatherField::TemperatureMax.label()),
                points: max_points,
            },
            Series {
                label: format!("Avg {}", WeatherField::TemperatureMin.label()),
                points: min_points,
            },
        ],
    }
}

fn rainfall_chart(records: &[WeatherRecord]) -> ChartData {
    let buckets = aggregate_monthly(records, WeatherField::RainSum);

    ChartData {
        id: ChartId::Rainfall,
        title: "Monthly Average Rainfall".to_string(),
        labels: buckets.iter().map(|b| b.month_key.clone()).collect(),
        series: vec![Series {
            label: format!("Avg Daily {}", WeatherField::RainSum.label()),
            points: buckets.iter().map(|b| Some(b.average)).collect(),
        }],
    }
}

fn seasonal_chart(records: &[WeatherRecord]) -> ChartData {
    let slots = seasonal_averages(records);

    ChartData {
        id: ChartId::Seasonal,
        title: "Seasonal Temperature Pattern".to_string(),
        labels: slots.iter().map(|s| s.label.to_string()).collect(),
        series: vec![
            Series {
                label: format!("Avg {}", WeatherField::TemperatureMax.label()),
                points: slots.iter().map(|s| Some(s.avg_max)).collect(),
            },
            Series {
                label: format!("Avg {}", WeatherField::TemperatureMin.label()),
                points: slots.iter().map(|s| Some(s.avg_min)).collect(),
            },
        ],
    }
}

fn extremes_chart(records: &[WeatherRecord]) -> ChartData {
    let stats = extreme_stats(records);
    let counts = [
        ("Hot Days (>30°C)", stats.hot_days),
        ("Cold Days (<10°C)", stats.cold_days),
        ("Rainy Days (>1mm)", stats.rainy_days),
        ("Heavy Rain (>10mm)", stats.heavy_rain_days),
    ];

    ChartData {
        id: ChartId::Extremes,
        title: "Extreme Weather Days".to_string(),
        labels: counts.iter().map(|(label, _)| label.to_string()).collect(),
        series: vec![Series {
            label: "Days".to_string(),
            points: counts.iter().map(|(_, n)| Some(*n as f64)).collect(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, max: Option<f64>, min: Option<f64>, rain: Option<f64>) -> WeatherRecord {
        WeatherRecord {
            date: date.to_string(),
            temperature_max: max,
            temperature_min: min,
            rain_sum: rain,
            sunshine_duration: None,
        }
    }

    #[test]
    fn test_chart_ids() {
        assert_eq!(ChartId::Temperature.as_str(), "temperatureChart");
        assert_eq!(ChartId::parse("extremeChart"), Some(ChartId::Extremes));
        assert_eq!(ChartId::parse("pieChart"), None);
    }

    #[test]
    fn test_temperature_axis_is_union_of_months() {
        let records = vec![
            record("2024-12-01", Some(10.0), None, None),
            record("2025-01-01", None, Some(-2.0), None),
            record("2025-01-02", Some(4.0), Some(0.0), None),
        ];

        let chart = DashboardCharts::build(&records).temperature;
        assert_eq!(chart.labels, vec!["Dec 2024", "Jan 2025"]);
        assert_eq!(chart.series[0].label, "Avg Max Temperature (°C)");
        assert_eq!(chart.series[1].label, "Avg Min Temperature (°C)");
        assert_eq!(chart.series[0].points, vec![Some(10.0), Some(4.0)]);
        assert_eq!(chart.series[1].points, vec![None, Some(-1.0)]);
    }

    #[test]
    fn test_extremes_chart_counts() {
        let records = vec![
            record("2024-07-01", Some(31.0), Some(20.0), Some(12.0)),
            record("2024-07-02", Some(29.0), Some(9.0), Some(0.5)),
        ];

        let chart = DashboardCharts::build(&records).extremes;
        assert_eq!(chart.labels.len(), 4);
        assert_eq!(
            chart.series[0].points,
            vec![Some(1.0), Some(1.0), Some(1.0), Some(1.0)]
        );
    }

    #[test]
    fn test_seasonal_chart_has_twelve_labels() {
        let charts = DashboardCharts::build(&[]);
        assert_eq!(charts.seasonal.labels.len(), 12);
        assert!(charts.temperature.is_empty());
        assert!(charts.rainfall.is_empty());
        assert_eq!(charts.iter().count(), 4);
    }
}
