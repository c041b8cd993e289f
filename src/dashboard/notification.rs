use std::fmt;
use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

/// Transient user-facing message, dismissed after `dismiss_after`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    #[serde(skip)]
    pub dismiss_after: Duration,
}

impl Notification {
    pub fn success<S: Into<String>>(message: S, dismiss_after: Duration) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
            dismiss_after,
        }
    }

    pub fn info<S: Into<String>>(message: S, dismiss_after: Duration) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
            dismiss_after,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            NotificationKind::Success => "✓",
            NotificationKind::Info => "i",
            NotificationKind::Error => "✗",
        };
        write!(f, "{} {}", prefix, self.message)
    }
}
