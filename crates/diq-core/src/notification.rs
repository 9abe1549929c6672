//! Transient user-facing notifications.
//!
//! Every operation outcome that the user should see goes through a
//! [`NotificationSink`]. The terminal front end renders them; tests collect
//! them.

use std::sync::Mutex;

use serde::Serialize;
use strum::Display;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Error,
}

/// A message plus its severity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    /// RFC 3339 creation time
    pub timestamp: String,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }
}

/// Receiver for user-facing notifications.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Sink that keeps every notification, in order.
#[derive(Debug, Default)]
pub struct CollectingNotificationSink {
    received: Mutex<Vec<Notification>>,
}

impl CollectingNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// The most recent notification, if any.
    pub fn last(&self) -> Option<Notification> {
        self.received
            .lock()
            .ok()
            .and_then(|guard| guard.last().cloned())
    }

    /// Messages only, for compact assertions.
    pub fn messages(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|n| n.message)
            .collect()
    }
}

impl NotificationSink for CollectingNotificationSink {
    fn notify(&self, notification: Notification) {
        if let Ok(mut guard) = self.received.lock() {
            guard.push(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_keeps_order() {
        let sink = CollectingNotificationSink::new();
        sink.notify(Notification::success("Logged in"));
        sink.notify(Notification::error("Failed to load decisions"));

        assert_eq!(sink.messages(), vec!["Logged in", "Failed to load decisions"]);
        assert_eq!(sink.last().unwrap().severity, Severity::Error);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Success.to_string(), "success");
        assert_eq!(Severity::Error.to_string(), "error");
    }
}
