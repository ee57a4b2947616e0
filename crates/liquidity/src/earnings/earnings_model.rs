//! Earnings domain models.

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::format::{format_date, DateStyle};

/// Accrued earnings of the provider. The zeroed default doubles as the
/// fallback when the series cannot be loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EarningsData {
    #[serde(alias = "dailyEarnings")]
    pub daily_earnings: Vec<DailyEarning>,
    #[serde(alias = "totalEarnings")]
    pub total_earnings: Decimal,
    #[serde(alias = "projectedAnnual")]
    pub projected_annual: Decimal,
    #[serde(alias = "averageDaily")]
    pub average_daily: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyEarning {
    #[serde(deserialize_with = "deserialize_day")]
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub apy: Decimal,
}

/// Accepts `2025-01-01` as well as full timestamps, keeping the date part.
fn deserialize_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .or_else(|_| {
            let day = raw.get(..10).unwrap_or(raw);
            NaiveDate::parse_from_str(day, "%Y-%m-%d")
        })
        .map_err(|_| serde::de::Error::custom(format!("invalid earnings date '{}'", raw)))
}

/// One point of the earnings and APY charts.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub amount: Decimal,
    pub apy: Decimal,
}

impl EarningsData {
    /// APY of the most recent day, or zero without data.
    pub fn current_apy(&self) -> Decimal {
        self.daily_earnings
            .last()
            .map(|day| day.apy)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn chart_series(&self) -> Vec<ChartPoint> {
        self.daily_earnings
            .iter()
            .map(|day| ChartPoint {
                label: day
                    .date
                    .and_hms_opt(0, 0, 0)
                    .map(|dt| format_date(dt.and_utc(), DateStyle::Short))
                    .unwrap_or_else(|| day.date.to_string()),
                amount: day.amount,
                apy: day.apy,
            })
            .collect()
    }

    /// The last `count` days, newest first.
    pub fn recent(&self, count: usize) -> Vec<DailyEarning> {
        self.daily_earnings
            .iter()
            .rev()
            .take(count)
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.daily_earnings.is_empty()
    }
}
