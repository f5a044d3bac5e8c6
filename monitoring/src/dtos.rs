use serde::{Deserialize, Serialize};

pub(crate) const MAX_METRICS_PER_REPORT: usize = 50;
pub(crate) const KNOWN_METRICS: [&str; 6] = ["CLS", "FCP", "FID", "INP", "LCP", "TTFB"];

#[derive(Debug, Deserialize)]
pub struct VitalsReport {
    pub page: String,
    pub metrics: Vec<ReportedMetric>,
}

#[derive(Debug, Deserialize)]
pub struct ReportedMetric {
    pub name: String,
    pub value: f64,
    pub rating: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VitalsAccepted {
    pub accepted: usize,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub name: Option<String>,
    pub page: Option<String>,
    /// Look-back window; defaults to 24 hours.
    pub hours: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
}
