use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::DEFAULT_CURRENCY;

/// Notification channels and display preferences. Saved as a whole.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSettings {
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub transaction_alerts: bool,
    pub weekly_summary: bool,
    pub two_factor_enabled: bool,
    pub preferred_currency: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            push_notifications: false,
            transaction_alerts: true,
            weekly_summary: true,
            two_factor_enabled: false,
            preferred_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// A boolean preference that can be flipped from the settings view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsToggle {
    EmailNotifications,
    PushNotifications,
    TransactionAlerts,
    WeeklySummary,
    TwoFactor,
}

impl SettingsToggle {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().replace('-', "_").to_ascii_lowercase().as_str() {
            "email_notifications" | "email" => Some(Self::EmailNotifications),
            "push_notifications" | "push" => Some(Self::PushNotifications),
            "transaction_alerts" | "alerts" => Some(Self::TransactionAlerts),
            "weekly_summary" | "summary" => Some(Self::WeeklySummary),
            "two_factor_enabled" | "two_factor" | "2fa" => Some(Self::TwoFactor),
            _ => None,
        }
    }
}

impl UserSettings {
    /// Copy of these settings with one flag flipped.
    pub fn toggled(&self, toggle: SettingsToggle) -> Self {
        let mut next = self.clone();
        let flag = match toggle {
            SettingsToggle::EmailNotifications => &mut next.email_notifications,
            SettingsToggle::PushNotifications => &mut next.push_notifications,
            SettingsToggle::TransactionAlerts => &mut next.transaction_alerts,
            SettingsToggle::WeeklySummary => &mut next.weekly_summary,
            SettingsToggle::TwoFactor => &mut next.two_factor_enabled,
        };
        *flag = !*flag;
        next
    }

    pub fn with_currency(mut self, currency: &str) -> Self {
        self.preferred_currency = currency.trim().to_ascii_uppercase();
        self
    }

    /// Settings echoed back by a save, if the payload actually carries them.
    ///
    /// Keys missing from a partial echo keep the values of `submitted`.
    pub fn from_echo(payload: &Value, submitted: &UserSettings) -> Option<UserSettings> {
        let echoed = payload.as_object()?;
        let mut merged = serde_json::to_value(submitted).ok()?;
        let target = merged.as_object_mut()?;

        let mut matched = false;
        for (key, value) in echoed {
            if let Some(slot) = target.get_mut(key) {
                *slot = value.clone();
                matched = true;
            }
        }
        if !matched {
            return None;
        }
        serde_json::from_value(merged).ok()
    }
}
