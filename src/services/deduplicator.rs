use std::collections::HashSet;

use tracing::debug;

use crate::models::WeatherRecord;

/// Collapse records sharing a calendar day, keeping the first one seen
///
/// This is the only dedup pass in the crate: the table, the exports and every
/// chart aggregation read its output. Records whose date does not parse are
/// kept in place, each as its own key.
pub fn deduplicate(records: &[WeatherRecord]) -> Vec<WeatherRecord> {
    let mut seen_dates = HashSet::with_capacity(records.len());
    let mut unique = Vec::with_capacity(records.len());
    let mut duplicate_count = 0;
    let mut unparseable_count = 0;

    for record in records {
        match record.calendar_date() {
            Some(date) => {
                if seen_dates.insert(date) {
                    unique.push(record.clone());
                } else {
                    duplicate_count += 1;
                }
            }
            None => {
                unparseable_count += 1;
                unique.push(record.clone());
            }
        }
    }

    if duplicate_count > 0 {
        debug!("Removed {} duplicate records", duplicate_count);
    }
    if unparseable_count > 0 {
        debug!(
            "Passed through {} records with unparseable dates",
            unparseable_count
        );
    }

    unique
}
