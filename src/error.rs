use crate::dashboard::{Notification, NotificationKind};
use crate::fetch_error::FetchError;
use std::time::Duration;

/// Errors surfaced by dashboard actions
///
/// None of these are fatal: the controller converts each into a transient
/// [`Notification`] at the boundary of the action that raised it.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("{0}")]
    Api(String),
    #[error("{0}")]
    Validation(String),
    #[error("Export failed: {0}")]
    Render(String),
}

impl DashboardError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn render<S: Into<String>>(message: S) -> Self {
        Self::Render(message.into())
    }

    pub fn notification(&self, dismiss_after: Duration) -> Notification {
        Notification {
            kind: NotificationKind::Error,
            message: self.to_string(),
            dismiss_after,
        }
    }
}

impl From<FetchError> for DashboardError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Api(message) => DashboardError::Api(message),
            FetchError::Status { status, body } if body.is_empty() => {
                DashboardError::Network(format!("server responded with {status}"))
            }
            FetchError::Status { status, body } => {
                DashboardError::Network(format!("server responded with {status}: {body}"))
            }
            other => DashboardError::Network(other.to_string()),
        }
    }
}

impl From<csv::Error> for DashboardError {
    fn from(err: csv::Error) -> Self {
        DashboardError::Render(format!("CSV export: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_keeps_backend_message() {
        let err: DashboardError = FetchError::Api("No weather data available".to_string()).into();
        assert!(matches!(err, DashboardError::Api(_)));
        assert_eq!(err.to_string(), "No weather data available");
    }

    #[test]
    fn test_status_error_is_network() {
        let err: DashboardError = FetchError::Status {
            status: 500,
            body: "Server error: boom".to_string(),
        }
        .into();
        assert!(matches!(err, DashboardError::Network(_)));
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_notification_is_error_kind() {
        let err = DashboardError::validation("Please select a city");
        let notification = err.notification(Duration::from_secs(5));
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(notification.message, "Please select a city");
        assert_eq!(notification.dismiss_after, Duration::from_secs(5));
    }
}
