//! Display formatting for amounts, percentages, addresses and dates.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

/// How a timestamp is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `Jan 5, 2025`
    Short,
    /// `January 5, 2025 14:30`
    Long,
    /// `3 hours ago`
    Relative,
}

/// `$1,234.56`; negative amounts render as `-$1,234.56`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{}${}.{}", sign, group_thousands(whole), fraction)
}

/// Percentages arrive already scaled (12.5 means 12.5%).
pub fn format_percentage(value: Decimal) -> String {
    format!("{:.2}%", value.round_dp(2))
}

/// Compact rendering for large counts: `950`, `12.3K`, `4.5M`, `1.2B`.
pub fn format_large_number(value: Decimal) -> String {
    let thousand = Decimal::from(1_000);
    let whole = value.round_dp(0);
    if whole.abs() < thousand {
        return format!("{:.0}", whole);
    }

    // Pick the band from the rounded mantissa so 999_999 reads 1.0M.
    for (unit, suffix) in [(thousand, "K"), (Decimal::from(1_000_000), "M")] {
        let scaled = (value / unit).round_dp(1);
        if scaled.abs() < thousand {
            return format!("{:.1}{}", scaled, suffix);
        }
    }
    format!("{:.1}B", (value / Decimal::from(1_000_000_000)).round_dp(1))
}

/// `0x1234...abcd`. Short inputs are returned unchanged.
pub fn truncate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

pub fn format_date(timestamp: DateTime<Utc>, style: DateStyle) -> String {
    format_date_at(timestamp, style, Utc::now())
}

/// Same as [`format_date`] with an explicit reference time for relative dates.
pub fn format_date_at(timestamp: DateTime<Utc>, style: DateStyle, now: DateTime<Utc>) -> String {
    match style {
        DateStyle::Short => timestamp.format("%b %-d, %Y").to_string(),
        DateStyle::Long => timestamp.format("%B %-d, %Y %H:%M").to_string(),
        DateStyle::Relative => format_relative(timestamp, now),
    }
}

fn format_relative(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - timestamp;
    if elapsed < Duration::minutes(1) {
        return "just now".to_string();
    }
    if elapsed < Duration::hours(1) {
        return plural(elapsed.num_minutes(), "minute");
    }
    if elapsed < Duration::days(1) {
        return plural(elapsed.num_hours(), "hour");
    }
    if elapsed < Duration::days(7) {
        return plural(elapsed.num_days(), "day");
    }
    format_date_at(timestamp, DateStyle::Short, now)
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
