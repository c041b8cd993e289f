use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::{MonthBucket, WeatherField, WeatherRecord};
use crate::utils::{mean, round1};

/// Group deduplicated records by calendar month and average one field
///
/// Buckets come back in chronological order keyed on (year, month), so
/// "Dec 2024" precedes "Jan 2025". Records missing the field, or whose date
/// does not parse, contribute nothing; months left empty are omitted.
pub fn aggregate_monthly(records: &[WeatherRecord], field: WeatherField) -> Vec<MonthBucket> {
    let mut by_month: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();

    for record in records {
        let (Some(date), Some(value)) = (record.calendar_date(), record.field(field)) else {
            continue;
        };
        by_month
            .entry((date.year(), date.month()))
            .or_default()
            .push(value);
    }

    by_month
        .into_iter()
        .filter_map(|((year, month), values)| {
            let average = round1(mean(&values)?);
            Some(MonthBucket {
                month_key: month_key(year, month),
                year,
                month,
                count: values.len(),
                average,
                values,
            })
        })
        .collect()
}

/// "Mon YYYY" label for a month
pub fn month_key(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{month:02} {year}"))
}
