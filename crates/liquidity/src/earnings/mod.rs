//! Earnings module - accrual series and chart data.

mod earnings_model;

pub use earnings_model::{ChartPoint, DailyEarning, EarningsData};
