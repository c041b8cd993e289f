use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Datelike;

use crate::models::{
    ClimateFigures, DataRange, ExtremeStats, HistogramBin, Season, SeasonSummary, SeasonalSlot,
    SummaryStats, TemperatureRecord, WeatherRecord, YearSummary,
};
use crate::utils::{mean, round1};

pub const HOT_DAY_THRESHOLD_C: f64 = 30.0;
pub const VERY_HOT_DAY_THRESHOLD_C: f64 = 35.0;
pub const COLD_DAY_THRESHOLD_C: f64 = 10.0;
pub const VERY_COLD_DAY_THRESHOLD_C: f64 = 5.0;
pub const RAINY_DAY_THRESHOLD_MM: f64 = 1.0;
pub const HEAVY_RAIN_THRESHOLD_MM: f64 = 10.0;

pub const TEMPERATURE_BINS: usize = 20;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn count_where(records: &[WeatherRecord], pred: impl Fn(&WeatherRecord) -> bool) -> usize {
    records.iter().filter(|&r| pred(r)).count()
}

/// Count days crossing each fixed threshold; missing values never match
pub fn extreme_stats(records: &[WeatherRecord]) -> ExtremeStats {
    ExtremeStats {
        hot_days: count_where(records, |r| {
            r.temperature_max.is_some_and(|t| t > HOT_DAY_THRESHOLD_C)
        }),
        very_hot_days: count_where(records, |r| {
            r.temperature_max.is_some_and(|t| t > VERY_HOT_DAY_THRESHOLD_C)
        }),
        cold_days: count_where(records, |r| {
            r.temperature_min.is_some_and(|t| t < COLD_DAY_THRESHOLD_C)
        }),
        very_cold_days: count_where(records, |r| {
            r.temperature_min.is_some_and(|t| t < VERY_COLD_DAY_THRESHOLD_C)
        }),
        rainy_days: count_where(records, |r| {
            r.rain_sum.is_some_and(|v| v > RAINY_DAY_THRESHOLD_MM)
        }),
        heavy_rain_days: count_where(records, |r| {
            r.rain_sum.is_some_and(|v| v > HEAVY_RAIN_THRESHOLD_MM)
        }),
        dry_days: count_where(records, |r| r.rain_sum.is_some_and(|v| v == 0.0)),
    }
}

/// Summary cards recomputed from the deduplicated records
///
/// Averages and totals are rounded to one decimal; a measure with no values
/// at all reports 0.
pub fn summarize(records: &[WeatherRecord]) -> SummaryStats {
    let temps_max: Vec<f64> = records.iter().filter_map(|r| r.temperature_max).collect();
    let temps_min: Vec<f64> = records.iter().filter_map(|r| r.temperature_min).collect();
    let rainfall: Vec<f64> = records.iter().filter_map(|r| r.rain_sum).collect();
    let sunshine: Vec<f64> = records.iter().filter_map(|r| r.sunshine_duration).collect();

    let extremes = extreme_stats(records);

    SummaryStats {
        total_days: records.len(),
        avg_max_temp: mean(&temps_max).map(round1).unwrap_or(0.0),
        avg_min_temp: mean(&temps_min).map(round1).unwrap_or(0.0),
        total_rainfall: round1(rainfall.iter().sum()),
        rainy_days: extremes.rainy_days,
        avg_sunshine_hours: mean(&sunshine)
            .map(|secs| round1(secs / 3600.0))
            .unwrap_or(0.0),
        hot_days: extremes.hot_days,
        cold_days: extremes.cold_days,
        heavy_rain_days: extremes.heavy_rain_days,
    }
}

/// Twelve month-of-year slots averaging max/min temperature across all years
///
/// A slot with no contributing record reports 0.0; check `max_count` /
/// `min_count` to tell that apart from a real zero.
pub fn seasonal_averages(records: &[WeatherRecord]) -> Vec<SeasonalSlot> {
    let mut max_by_month: [Vec<f64>; 12] = Default::default();
    let mut min_by_month: [Vec<f64>; 12] = Default::default();

    for record in records {
        let Some(date) = record.calendar_date() else {
            continue;
        };
        let idx = date.month0() as usize;
        if let Some(t) = record.temperature_max {
            max_by_month[idx].push(t);
        }
        if let Some(t) = record.temperature_min {
            min_by_month[idx].push(t);
        }
    }

    MONTH_LABELS
        .iter()
        .enumerate()
        .map(|(idx, label)| SeasonalSlot {
            month: idx as u32 + 1,
            label: *label,
            avg_max: mean(&max_by_month[idx]).map(round1).unwrap_or(0.0),
            avg_min: mean(&min_by_month[idx]).map(round1).unwrap_or(0.0),
            max_count: max_by_month[idx].len(),
            min_count: min_by_month[idx].len(),
        })
        .collect()
}

/// Per-year averages and rainfall totals, ascending by year
pub fn yearly_comparison(records: &[WeatherRecord]) -> Vec<YearSummary> {
    #[derive(Default)]
    struct YearAccumulator {
        days: usize,
        temps_max: Vec<f64>,
        temps_min: Vec<f64>,
        rainfall: f64,
    }

    let mut by_year: BTreeMap<i32, YearAccumulator> = BTreeMap::new();
    for record in records {
        let Some(date) = record.calendar_date() else {
            continue;
        };
        let acc = by_year.entry(date.year()).or_default();
        acc.days += 1;
        acc.temps_max.extend(record.temperature_max);
        acc.temps_min.extend(record.temperature_min);
        acc.rainfall += record.rain_sum.unwrap_or(0.0);
    }

    by_year
        .into_iter()
        .map(|(year, acc)| YearSummary {
            year,
            days: acc.days,
            avg_max_temp: mean(&acc.temps_max).map(round1),
            avg_min_temp: mean(&acc.temps_min).map(round1),
            total_rainfall: round1(acc.rainfall),
        })
        .collect()
}

/// Winter, spring, summer and autumn across all years, always in that order
pub fn seasonal_summaries(records: &[WeatherRecord]) -> Vec<SeasonSummary> {
    let mut by_season: HashMap<Season, (usize, Vec<f64>, Vec<f64>, f64)> = HashMap::new();
    for record in records {
        let Some(date) = record.calendar_date() else {
            continue;
        };
        let entry = by_season.entry(Season::from_month(date.month())).or_default();
        entry.0 += 1;
        entry.1.extend(record.temperature_max);
        entry.2.extend(record.temperature_min);
        entry.3 += record.rain_sum.unwrap_or(0.0);
    }

    Season::ALL
        .into_iter()
        .map(|season| {
            let (days, maxes, mins, rain) = by_season.remove(&season).unwrap_or_default();
            SeasonSummary {
                season,
                days,
                avg_max_temp: mean(&maxes).map(round1),
                avg_min_temp: mean(&mins).map(round1),
                total_rainfall: round1(rain),
            }
        })
        .collect()
}

/// Histogram of daily max and min temperatures over shared, equal-width bins
///
/// The bins span the lowest to the highest temperature of either series.
/// Empty when there are no temperatures or `bins` is 0.
pub fn temperature_distribution(records: &[WeatherRecord], bins: usize) -> Vec<HistogramBin> {
    let maxes: Vec<f64> = records.iter().filter_map(|r| r.temperature_max).collect();
    let mins: Vec<f64> = records.iter().filter_map(|r| r.temperature_min).collect();

    let all = maxes.iter().chain(&mins);
    let (Some(mut lo), Some(mut hi)) = (
        all.clone().copied().reduce(f64::min),
        all.copied().reduce(f64::max),
    ) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let bin_of = |v: f64| (((v - lo) / width).floor() as usize).min(bins - 1);

    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lo + i as f64 * width,
            upper: lo + (i + 1) as f64 * width,
            max_count: 0,
            min_count: 0,
        })
        .collect();
    for v in maxes {
        histogram[bin_of(v)].max_count += 1;
    }
    for v in mins {
        histogram[bin_of(v)].min_count += 1;
    }
    histogram
}

/// Average daily rainfall, overall temperature range and total sunshine
pub fn climate_figures(records: &[WeatherRecord]) -> ClimateFigures {
    let rainfall: Vec<f64> = records.iter().filter_map(|r| r.rain_sum).collect();
    let highest = records.iter().filter_map(|r| r.temperature_max).reduce(f64::max);
    let lowest = records.iter().filter_map(|r| r.temperature_min).reduce(f64::min);
    let sunshine_secs: f64 = records.iter().filter_map(|r| r.sunshine_duration).sum();

    ClimateFigures {
        avg_daily_rainfall: mean(&rainfall).map(round1),
        temperature_range: highest.zip(lowest).map(|(hi, lo)| round1(hi - lo)),
        total_sunshine_hours: round1(sunshine_secs / 3600.0),
    }
}

/// Highest temperature_max on record, first occurrence wins ties
pub fn record_high(records: &[WeatherRecord]) -> Option<TemperatureRecord> {
    records
        .iter()
        .filter_map(|r| Some((r.calendar_date()?, r.temperature_max?)))
        .fold(None, |best: Option<TemperatureRecord>, (date, value)| match best {
            Some(b) if b.value >= value => Some(b),
            _ => Some(TemperatureRecord { date, value }),
        })
}

/// Lowest temperature_min on record, first occurrence wins ties
pub fn record_low(records: &[WeatherRecord]) -> Option<TemperatureRecord> {
    records
        .iter()
        .filter_map(|r| Some((r.calendar_date()?, r.temperature_min?)))
        .fold(None, |best: Option<TemperatureRecord>, (date, value)| match best {
            Some(b) if b.value <= value => Some(b),
            _ => Some(TemperatureRecord { date, value }),
        })
}

/// Span of dated records; `None` when no date parses
pub fn data_range(records: &[WeatherRecord]) -> Option<DataRange> {
    let dates: Vec<_> = records.iter().filter_map(|r| r.calendar_date()).collect();
    let first_date = *dates.iter().min()?;
    let last_date = *dates.iter().max()?;
    let years: BTreeSet<i32> = dates.iter().map(|d| d.year()).collect();

    Some(DataRange {
        first_date,
        last_date,
        total_days: dates.len(),
        years: years.into_iter().collect(),
    })
}
