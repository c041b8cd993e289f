use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;

use crate::error::DashboardError;

pub const MIN_CITY_LEN: usize = 2;
pub const MAX_RANGE_DAYS: i64 = 365 * 10;

static DATE_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// City and date range exactly as the user entered them
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalysisRequest {
    pub city: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub city: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl AnalysisRequest {
    pub fn new(
        city: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    /// Check the request against `today`; nothing is sent to the backend unless this passes
    pub fn validate(&self, today: NaiveDate) -> Result<ValidatedRequest, DashboardError> {
        let city = self.city.trim();
        if city.is_empty() {
            return Err(DashboardError::validation("Please select a city"));
        }
        if city.chars().count() < MIN_CITY_LEN {
            return Err(DashboardError::validation("City name too short"));
        }

        let start_date = parse_request_date(&self.start_date)?;
        let end_date = parse_request_date(&self.end_date)?;

        if start_date > end_date {
            return Err(DashboardError::validation(
                "Start date cannot be after end date",
            ));
        }
        if start_date > today {
            return Err(DashboardError::validation(
                "Start date cannot be in the future",
            ));
        }
        if (end_date - start_date).num_days() > MAX_RANGE_DAYS {
            return Err(DashboardError::validation(format!(
                "Date range cannot exceed {} years",
                MAX_RANGE_DAYS / 365
            )));
        }

        Ok(ValidatedRequest {
            city: city.to_string(),
            start_date,
            end_date,
        })
    }
}

fn parse_request_date(value: &str) -> Result<NaiveDate, DashboardError> {
    let value = value.trim();
    if !DATE_FORMAT.is_match(value) {
        return Err(DashboardError::validation(
            "Invalid date format. Please use YYYY-MM-DD",
        ));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| DashboardError::validation("Invalid date format. Please use YYYY-MM-DD"))
}
