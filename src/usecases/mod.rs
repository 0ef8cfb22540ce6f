pub mod dashboard_service;
pub mod metrics;
pub mod search;
pub mod series;
