use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An alert addressed to the provider. The only transition is unread → read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    #[serde(default, alias = "actionUrl")]
    pub action_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
    #[default]
    #[serde(other)]
    Info,
}

pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

/// Flags the notification with `id` as read. Returns whether anything changed.
pub fn mark_read_in(notifications: &mut [Notification], id: &str) -> bool {
    match notifications.iter_mut().find(|n| n.id == id && !n.read) {
        Some(notification) => {
            notification.read = true;
            true
        }
        None => false,
    }
}

/// Reverts [`mark_read_in`] for one notification.
pub fn mark_unread_in(notifications: &mut [Notification], id: &str) -> bool {
    match notifications.iter_mut().find(|n| n.id == id && n.read) {
        Some(notification) => {
            notification.read = false;
            true
        }
        None => false,
    }
}
