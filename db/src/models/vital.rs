use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single web-vitals sample reported by a browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebVital {
    pub name: String,
    pub value: f64,
    pub rating: Option<String>,
    pub page: String,
    pub recorded_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct VitalSummary {
    pub name: String,
    pub samples: i64,
    pub average: f64,
    pub p75: f64,
}
