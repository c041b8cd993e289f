//! Dashboard controller: owns the application state and turns user actions
//! into fetches, derived views and notifications.

pub mod notification;
pub mod state;
pub mod validation;

pub use notification::{Notification, NotificationKind};
pub use state::{DashboardState, LoadedDataset};
pub use validation::{AnalysisRequest, ValidatedRequest};

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, instrument, warn};

use crate::client::WeatherApiClient;
use crate::config::Config;
use crate::error::DashboardError;
use crate::exporters::{self, ChartRenderer};
use crate::fetch_error::FetchError;
use crate::models::{City, CitySuggestion, HealthStatus, PageView, WeatherDataResponse};
use crate::services::ChartId;

/// Identifies one analysis request; only the latest issued token may update the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Applied(Notification),
    Failed(Notification),
    /// A newer request was issued while this one was in flight; nothing changed
    Stale,
}

impl AnalysisOutcome {
    pub fn notification(&self) -> Option<&Notification> {
        match self {
            AnalysisOutcome::Applied(n) | AnalysisOutcome::Failed(n) => Some(n),
            AnalysisOutcome::Stale => None,
        }
    }
}

pub struct DashboardController {
    client: WeatherApiClient,
    config: Config,
    state: Mutex<DashboardState>,
    latest_token: AtomicU64,
}

impl DashboardController {
    pub fn new(client: WeatherApiClient, config: Config) -> Self {
        Self {
            client,
            config,
            state: Mutex::new(DashboardState::default()),
            latest_token: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: Config) -> Result<Self, FetchError> {
        let client = WeatherApiClient::with_timeout(config.api_url.clone(), config.api_timeout())?;
        Ok(Self::new(client, config))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // Never held across an await
    fn state(&self) -> MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Issue a fresh token, superseding any request still in flight
    pub fn issue_token(&self) -> RequestToken {
        let mut state = self.state();
        state.loading = true;
        RequestToken(self.latest_token.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, token: RequestToken) -> bool {
        self.latest_token.load(Ordering::SeqCst) == token.0
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn notification(&self) -> Option<Notification> {
        self.state().notification.clone()
    }

    fn notify(&self, notification: Notification) -> Notification {
        self.state().notification = Some(notification.clone());
        notification
    }

    fn fail(&self, err: DashboardError) -> Notification {
        warn!("Dashboard action failed: {}", err);
        self.notify(err.notification(self.config.notification_dismiss()))
    }

    #[instrument(skip(self))]
    pub async fn load_cities(&self) -> Result<Vec<City>, Notification> {
        match self.client.fetch_cities().await {
            Ok(cities) => {
                info!("Loaded {} cities", cities.len());
                Ok(cities)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    #[instrument(skip(self))]
    pub async fn suggest_cities(&self, query: &str) -> Result<Vec<CitySuggestion>, Notification> {
        self.client
            .fetch_city_suggestions(query)
            .await
            .map_err(|e| self.fail(e.into()))
    }

    /// Backend health; an unhealthy backend is still `Ok`, an unreachable one is a notification
    #[instrument(skip(self))]
    pub async fn check_health(&self) -> Result<HealthStatus, Notification> {
        match self.client.health().await {
            Ok(health) => {
                if !health.is_healthy() {
                    warn!("Backend status is {}", health.status);
                }
                Ok(health)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Validate, fetch and load a dataset
    ///
    /// Errors never escape: they become the returned notification and the
    /// previous dataset stays on screen.
    #[instrument(skip(self, request), fields(city = %request.city))]
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisOutcome {
        let validated = match request.validate(Utc::now().date_naive()) {
            Ok(v) => v,
            Err(e) => return AnalysisOutcome::Failed(self.fail(e)),
        };

        let token = self.issue_token();
        debug!("Issued request token {:?}", token);

        let result = self
            .client
            .fetch_weather_data(&validated.city, validated.start_date, validated.end_date)
            .await;

        self.apply_result(token, &validated, result)
    }

    /// Apply a finished fetch if `token` is still the latest one
    pub fn apply_result(
        &self,
        token: RequestToken,
        request: &ValidatedRequest,
        result: Result<WeatherDataResponse, FetchError>,
    ) -> AnalysisOutcome {
        // Token check and state update share one lock
        let mut state = self.state();
        if !self.is_latest(token) {
            debug!("Dropping stale response for token {:?}", token);
            return AnalysisOutcome::Stale;
        }

        let dismiss = self.config.notification_dismiss();
        state.loading = false;

        let outcome = match result {
            Ok(response) => {
                let dataset = LoadedDataset::from_response(request, response);
                let message = format!(
                    "Loaded {} days of weather data for {} (source: {:?})",
                    dataset.records.len(),
                    dataset.city,
                    dataset.source
                );
                info!(
                    "{} ({} duplicates removed)",
                    message,
                    dataset.duplicates_removed()
                );
                state.load(dataset);
                AnalysisOutcome::Applied(Notification::success(message, dismiss))
            }
            Err(e) => {
                let err = DashboardError::from(e);
                warn!("Analysis for {} failed: {}", request.city, err);
                AnalysisOutcome::Failed(err.notification(dismiss))
            }
        };

        state.notification = outcome.notification().cloned();
        outcome
    }

    pub fn dataset(&self) -> Option<LoadedDataset> {
        self.state().dataset.clone()
    }

    pub fn page_view(&self) -> Option<PageView> {
        self.state().page_view()
    }

    pub fn current_page(&self) -> usize {
        self.state().paginator.current_page()
    }

    pub fn go_to_page(&self, page: usize) -> bool {
        self.state().paginator.go_to(page)
    }

    pub fn first_page(&self) -> bool {
        self.state().paginator.first()
    }

    pub fn prev_page(&self) -> bool {
        self.state().paginator.prev()
    }

    pub fn next_page(&self) -> bool {
        self.state().paginator.next()
    }

    pub fn last_page(&self) -> bool {
        self.state().paginator.last()
    }

    /// Write the current table to CSV in the configured export directory
    pub fn export_csv(&self) -> Result<PathBuf, Notification> {
        let state = self.state();
        let result = match &state.dataset {
            Some(ds) => exporters::export_csv(
                &ds.records,
                &self.config.export_dir,
                &ds.city,
                ds.start_date,
                ds.end_date,
            ),
            None => Err(DashboardError::render("no data to export")),
        };
        drop(state);

        match result {
            Ok(path) => {
                self.notify(Notification::success(
                    format!("CSV exported to {}", path.display()),
                    self.config.notification_dismiss(),
                ));
                Ok(path)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Render one chart through `renderer` and save it as PNG
    pub fn export_chart(
        &self,
        id: ChartId,
        renderer: &dyn ChartRenderer,
    ) -> Result<PathBuf, Notification> {
        self.export_chart_on(id, renderer, Utc::now().date_naive())
    }

    pub fn export_chart_on(
        &self,
        id: ChartId,
        renderer: &dyn ChartRenderer,
        date: NaiveDate,
    ) -> Result<PathBuf, Notification> {
        let state = self.state();
        let result = match &state.dataset {
            Some(ds) => exporters::export_chart(
                ds.charts.get(id),
                renderer,
                &self.config.export_dir,
                &ds.city,
                date,
            ),
            None => Err(DashboardError::render(format!("chart {id} not found"))),
        };
        drop(state);

        match result {
            Ok(path) => {
                self.notify(Notification::success(
                    format!("Chart saved to {}", path.display()),
                    self.config.notification_dismiss(),
                ));
                Ok(path)
            }
            Err(e) => Err(self.fail(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataSource, WeatherRecord};

    fn controller() -> DashboardController {
        DashboardController::new(
            WeatherApiClient::new("http://127.0.0.1:9".to_string()),
            Config::default(),
        )
    }

    fn request(city: &str) -> ValidatedRequest {
        ValidatedRequest {
            city: city.to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        }
    }

    fn response(days: u32) -> WeatherDataResponse {
        WeatherDataResponse {
            success: true,
            city: None,
            start_date: None,
            end_date: None,
            source: DataSource::Database,
            summary: None,
            data: (1..=days)
                .map(|d| WeatherRecord {
                    date: format!("2024-01-{d:02}"),
                    temperature_max: Some(d as f64),
                    ..Default::default()
                })
                .collect(),
            error: None,
            suggestions: Vec::new(),
        }
    }

    #[test]
    fn test_tokens_increase() {
        let controller = controller();
        let first = controller.issue_token();
        let second = controller.issue_token();
        assert!(second > first);
        assert!(controller.is_latest(second));
        assert!(!controller.is_latest(first));
    }

    #[test]
    fn test_stale_response_does_not_overwrite() {
        let controller = controller();
        let older = controller.issue_token();
        let newer = controller.issue_token();

        let outcome = controller.apply_result(newer, &request("Berlin"), Ok(response(3)));
        assert!(matches!(outcome, AnalysisOutcome::Applied(_)));

        let outcome = controller.apply_result(older, &request("Madrid"), Ok(response(9)));
        assert_eq!(outcome, AnalysisOutcome::Stale);

        let dataset = controller.dataset().unwrap();
        assert_eq!(dataset.city, "Berlin");
        assert_eq!(dataset.records.len(), 3);
    }

    #[test]
    fn test_concurrent_apply_keeps_newest() {
        let controller = controller();

        for round in 0..200 {
            let older = controller.issue_token();

            std::thread::scope(|s| {
                s.spawn(|| controller.apply_result(older, &request("Madrid"), Ok(response(9))));
                s.spawn(|| {
                    let newer = controller.issue_token();
                    controller.apply_result(newer, &request("Berlin"), Ok(response(3)))
                });
            });

            let dataset = controller.dataset().unwrap();
            assert_eq!(dataset.city, "Berlin", "round {round}");
            assert_eq!(dataset.records.len(), 3);
            assert!(!controller.is_loading());
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend_health_is_notification() {
        let controller = controller();
        let notification = controller.check_health().await.unwrap_err();
        assert!(notification.is_error());
        assert!(notification.message.starts_with("Network error"));
    }

    #[test]
    fn test_stale_error_is_dropped_too() {
        let controller = controller();
        let older = controller.issue_token();
        let newer = controller.issue_token();

        controller.apply_result(newer, &request("Berlin"), Ok(response(2)));
        let outcome = controller.apply_result(
            older,
            &request("Berlin"),
            Err(FetchError::Api("boom".to_string())),
        );
        assert_eq!(outcome, AnalysisOutcome::Stale);
        assert_eq!(
            controller.notification().unwrap().kind,
            NotificationKind::Success
        );
    }

    #[test]
    fn test_failure_keeps_previous_dataset() {
        let controller = controller();
        let token = controller.issue_token();
        controller.apply_result(token, &request("Berlin"), Ok(response(5)));

        let token = controller.issue_token();
        let outcome = controller.apply_result(
            token,
            &request("Berlin"),
            Err(FetchError::Api("No weather data available".to_string())),
        );

        match outcome {
            AnalysisOutcome::Failed(n) => {
                assert!(n.is_error());
                assert_eq!(n.message, "No weather data available");
            }
            other => panic!("Expected failure, got {:?}", other),
        }
        assert!(!controller.is_loading());
        assert_eq!(controller.dataset().unwrap().records.len(), 5);
    }

    #[test]
    fn test_pagination_through_controller() {
        let controller = controller();
        let token = controller.issue_token();
        let mut big = response(0);
        for i in 0..120 {
            let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i);
            big.data.push(WeatherRecord {
                date: date.format("%Y-%m-%d").to_string(),
                ..Default::default()
            });
        }
        controller.apply_result(token, &request("Berlin"), Ok(big));

        assert_eq!(controller.current_page(), 1);
        assert!(controller.last_page());
        assert_eq!(controller.current_page(), 3);
        assert!(!controller.go_to_page(4));
        assert_eq!(controller.current_page(), 3);

        let view = controller.page_view().unwrap();
        assert_eq!(view.records.len(), 20);
        assert_eq!(view.total_pages, 3);
    }

    #[test]
    fn test_export_without_data_is_render_error() {
        let controller = controller();
        let notification = controller.export_csv().unwrap_err();
        assert!(notification.is_error());
        assert!(notification.message.contains("no data to export"));
    }

    #[tokio::test]
    async fn test_validation_error_never_reaches_network() {
        let controller = controller();
        let outcome = controller
            .analyze(&AnalysisRequest::new("X", "2024-01-01", "2024-01-02"))
            .await;

        match outcome {
            AnalysisOutcome::Failed(n) => assert_eq!(n.message, "City name too short"),
            other => panic!("Expected failure, got {:?}", other),
        }
        assert!(!controller.is_loading());
    }
}
