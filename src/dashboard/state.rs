use chrono::NaiveDate;
use tracing::warn;

use crate::dashboard::notification::Notification;
use crate::dashboard::validation::ValidatedRequest;
use crate::models::{
    ClimateFigures, DataRange, DataSource, ExtremeStats, HistogramBin, PageView, SeasonSummary,
    SeasonalSlot, SummaryStats, TemperatureRecord, WeatherDataResponse, WeatherRecord, YearSummary,
};
use crate::services::statistics::{
    climate_figures, data_range, extreme_stats, record_high, record_low, seasonal_averages,
    seasonal_summaries, summarize, temperature_distribution, yearly_comparison, TEMPERATURE_BINS,
};
use crate::services::{deduplicate, DashboardCharts, Paginator};

/// Everything derived from one successful weather-data response
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub city: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub source: DataSource,
    /// Records as received, before deduplication
    pub raw_count: usize,
    /// Deduplicated records; every view below is built from these
    pub records: Vec<WeatherRecord>,
    pub summary: SummaryStats,
    pub backend_summary: Option<SummaryStats>,
    pub extremes: ExtremeStats,
    pub seasonal: Vec<SeasonalSlot>,
    pub seasons: Vec<SeasonSummary>,
    pub yearly: Vec<YearSummary>,
    pub distribution: Vec<HistogramBin>,
    pub figures: ClimateFigures,
    pub charts: DashboardCharts,
    pub record_high: Option<TemperatureRecord>,
    pub record_low: Option<TemperatureRecord>,
    pub data_range: Option<DataRange>,
}

impl LoadedDataset {
    pub fn from_response(request: &ValidatedRequest, response: WeatherDataResponse) -> Self {
        let raw_count = response.data.len();
        let records = deduplicate(&response.data);
        let summary = summarize(&records);

        if let Some(backend) = &response.summary {
            if backend.total_days != 0 && backend.total_days != summary.total_days {
                warn!(
                    "Backend summary covers {} days but {} remain after deduplication; showing the deduplicated figures",
                    backend.total_days, summary.total_days
                );
            }
        }

        Self {
            city: response.city.unwrap_or_else(|| request.city.clone()),
            start_date: request.start_date,
            end_date: request.end_date,
            source: response.source,
            raw_count,
            summary,
            backend_summary: response.summary,
            extremes: extreme_stats(&records),
            seasonal: seasonal_averages(&records),
            seasons: seasonal_summaries(&records),
            yearly: yearly_comparison(&records),
            distribution: temperature_distribution(&records, TEMPERATURE_BINS),
            figures: climate_figures(&records),
            charts: DashboardCharts::build(&records),
            record_high: record_high(&records),
            record_low: record_low(&records),
            data_range: data_range(&records),
            records,
        }
    }

    pub fn duplicates_removed(&self) -> usize {
        self.raw_count - self.records.len()
    }
}

/// Application state owned by the dashboard controller
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub dataset: Option<LoadedDataset>,
    pub paginator: Paginator,
    /// A request is in flight
    pub loading: bool,
    pub notification: Option<Notification>,
}

impl DashboardState {
    /// Replace the dataset and reset pagination to page 1
    pub fn load(&mut self, dataset: LoadedDataset) {
        self.paginator = Paginator::new(dataset.records.len());
        self.dataset = Some(dataset);
    }

    pub fn page_view(&self) -> Option<PageView> {
        self.dataset
            .as_ref()
            .map(|dataset| self.paginator.view(&dataset.records))
    }
}
