//! Settings module - notification channels and display currency.

mod settings_model;

pub use settings_model::{SettingsToggle, UserSettings};
