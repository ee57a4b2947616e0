//! Notifications module - alert feed and read state.

mod notifications_model;

pub use notifications_model::{mark_read_in, mark_unread_in, unread_count, Notification, NotificationKind};
