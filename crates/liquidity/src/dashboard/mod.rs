//! Dashboard module - cached queries and mutations for the provider views.

mod dashboard_service;
mod dashboard_traits;

pub use dashboard_service::DashboardService;
pub use dashboard_traits::DashboardServiceTrait;
