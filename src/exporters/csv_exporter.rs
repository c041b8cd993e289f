use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::error::DashboardError;
use crate::exporters::filename_component;
use crate::models::WeatherRecord;
use crate::utils::round1;

pub const CSV_HEADER: [&str; 5] = [
    "Date",
    "Max Temperature (°C)",
    "Min Temperature (°C)",
    "Rainfall (mm)",
    "Sunshine (hours)",
];

const MISSING: &str = "N/A";

/// Write deduplicated records as CSV, one row per record
pub fn write_csv<W: io::Write>(records: &[WeatherRecord], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for record in records {
        let date = record
            .calendar_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| record.date.clone());

        wtr.write_record([
            date,
            format_value(record.temperature_max),
            format_value(record.temperature_min),
            format_value(record.rain_sum),
            format_value(record.sunshine_hours()),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// `weather_<city>_<start>_to_<end>.csv`
pub fn csv_filename(city: &str, start_date: NaiveDate, end_date: NaiveDate) -> String {
    format!(
        "weather_{}_{}_to_{}.csv",
        filename_component(city),
        start_date.format("%Y-%m-%d"),
        end_date.format("%Y-%m-%d")
    )
}

/// Write the CSV into `dir` and return the file path
pub fn export_csv(
    records: &[WeatherRecord],
    dir: &Path,
    city: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<PathBuf, DashboardError> {
    if records.is_empty() {
        return Err(DashboardError::render("no data to export"));
    }

    let path = dir.join(csv_filename(city, start_date, end_date));
    debug!("Writing CSV export to {}", path.display());

    write_file(&path, |file| write_csv(records, file))?;

    info!("Exported {} records to {}", records.len(), path.display());
    Ok(path)
}

/// Write through a `.partial` sibling and rename it into place
///
/// A failed write removes the partial file, so no truncated export is left behind.
fn write_file<F>(path: &Path, write: F) -> Result<(), DashboardError>
where
    F: FnOnce(File) -> Result<(), csv::Error>,
{
    let partial = path.with_extension("csv.partial");
    let file = File::create(&partial).map_err(|e| write_error(path, e))?;

    let result = write(file)
        .map_err(DashboardError::from)
        .and_then(|()| fs::rename(&partial, path).map_err(|e| write_error(path, e)));

    if result.is_err() {
        if let Err(e) = fs::remove_file(&partial) {
            warn!("Could not remove {}: {}", partial.display(), e);
        }
    }
    result
}

fn write_error(path: &Path, err: io::Error) -> DashboardError {
    DashboardError::render(format!("could not write {}: {err}", path.display()))
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}", round1(v)),
        None => MISSING.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_string(records: &[WeatherRecord]) -> String {
        let mut buf = Vec::new();
        write_csv(records, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_row() {
        let csv = to_string(&[]);
        assert_eq!(
            csv.lines().next().unwrap(),
            "Date,Max Temperature (°C),Min Temperature (°C),Rainfall (mm),Sunshine (hours)"
        );
    }

    #[test]
    fn test_missing_value_and_sunshine_hours() {
        let record = WeatherRecord {
            date: "2024-05-01T00:00:00".to_string(),
            temperature_max: None,
            temperature_min: Some(11.25),
            rain_sum: Some(0.0),
            sunshine_duration: Some(3600.0),
        };

        let csv = to_string(&[record]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "2024-05-01,N/A,11.3,0.0,1.0");
    }

    #[test]
    fn test_unparseable_date_written_raw() {
        let record = WeatherRecord {
            date: "someday".to_string(),
            ..Default::default()
        };

        let csv = to_string(&[record]);
        assert_eq!(csv.lines().nth(1).unwrap(), "someday,N/A,N/A,N/A,N/A");
    }

    fn sample() -> Vec<WeatherRecord> {
        vec![WeatherRecord {
            date: "2024-05-01".to_string(),
            temperature_max: Some(18.0),
            ..Default::default()
        }]
    }

    #[test]
    fn test_export_into_missing_directory_is_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not-created");
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let err = export_csv(&sample(), &missing, "Oslo", day, day).unwrap_err();
        match err {
            DashboardError::Render(message) => assert!(message.starts_with("could not write")),
            other => panic!("Expected Render error, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather_Oslo.csv");

        let err = write_file(&path, |_file| {
            Err(csv::Error::from(io::Error::other("disk full")))
        })
        .unwrap_err();

        assert!(matches!(err, DashboardError::Render(_)));
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_export_leaves_only_final_file() {
        let dir = tempfile::tempdir().unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let path = export_csv(&sample(), dir.path(), "Oslo", day, day).unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        let csv = fs::read_to_string(path).unwrap();
        assert_eq!(csv.lines().nth(1).unwrap(), "2024-05-01,18.0,N/A,N/A,N/A");
    }

    #[test]
    fn test_csv_filename() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert_eq!(
            csv_filename("New York", start, end),
            "weather_New_York_2024-01-01_to_2024-06-30.csv"
        );
    }
}
