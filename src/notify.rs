//! Toast notifications.
//!
//! Producers (the trigger coordinator, informational shortcuts) send
//! [`Notification`]s through a cloneable [`Notifier`]; the UI drains the
//! receiving end and shows the latest one until it expires.

use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// How long a success toast stays up.
pub const SUCCESS_DURATION: Duration = Duration::from_secs(2);

/// How long an error toast stays up.
pub const ERROR_DURATION: Duration = Duration::from_secs(3);

/// How long an informational toast stays up.
pub const INFO_DURATION: Duration = Duration::from_secs(2);

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

impl NotificationLevel {
    /// Returns the level as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
    pub duration: Duration,
}

impl Notification {
    /// Notification posted after a query lands successfully.
    pub fn query_succeeded() -> Self {
        Self {
            level: NotificationLevel::Success,
            title: "Query Executed".to_string(),
            description: "Data loaded successfully".to_string(),
            duration: SUCCESS_DURATION,
        }
    }

    /// Notification posted after a query fails.
    pub fn query_failed() -> Self {
        Self {
            level: NotificationLevel::Error,
            title: "Query Error".to_string(),
            description: "Failed to execute query".to_string(),
            duration: ERROR_DURATION,
        }
    }

    /// An informational notification.
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            title: title.into(),
            description: description.into(),
            duration: INFO_DURATION,
        }
    }

    /// An error notification outside of query execution.
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            description: description.into(),
            duration: ERROR_DURATION,
        }
    }

    /// Returns the single-line form shown in the toast.
    pub fn message(&self) -> String {
        format!("{}: {}", self.title, self.description)
    }
}

/// Sending half of the notification channel.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    /// Posts a notification. Dropped silently once the UI has gone away.
    pub fn notify(&self, notification: Notification) {
        debug!("Notification: {}", notification.message());
        let _ = self.tx.send(notification);
    }
}

/// Creates a notification channel.
pub fn channel() -> (Notifier, mpsc::UnboundedReceiver<Notification>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Notifier { tx }, rx)
}
