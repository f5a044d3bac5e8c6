use std::sync::Arc;

use actix_web::{Responder, get, post, web};
use chrono::{Duration, Utc};
use common::{
    error::{AppError, Res},
    http::Success,
};
use db::{dtos::vital::VitalFilter, models::vital::WebVital};
use sqlx::PgPool;

use crate::{
    dtos::{
        HealthResponse, KNOWN_METRICS, MAX_METRICS_PER_REPORT, SummaryQuery, VitalsAccepted,
        VitalsReport,
    },
    reporter::MetricsHandle,
};

/// Liveness probe. Reports whether the database answers.
#[get("/health")]
pub async fn get_health(pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    let database = db::ping(&pool).await;
    Success::ok(HealthResponse {
        status: if database { "ok" } else { "degraded" },
        database,
    })
}

/// Accepts a batch of web-vitals samples from a browser.
///
/// Samples are queued and written in the background. A report that does not
/// fit in the queue answers 429 and queues nothing.
#[post("/vitals")]
pub async fn post_vitals(
    metrics: web::Data<MetricsHandle>,
    req: web::Json<VitalsReport>,
) -> Res<impl Responder> {
    let report = req.into_inner();
    let vitals = validate_report(report)?;
    let accepted = metrics.record_all(vitals)?;
    Success::with_message("Queued", VitalsAccepted { accepted })
}

/// Per-metric sample count, average and p75 over a look-back window.
#[get("")]
pub async fn get_summary(
    pool: web::Data<Arc<PgPool>>,
    query: web::Query<SummaryQuery>,
) -> Res<impl Responder> {
    let query = query.into_inner();
    let hours = query.hours.unwrap_or(24).clamp(1, 24 * 90);
    let filter = VitalFilter {
        name: query.name.map(|n| n.to_uppercase()),
        page: query.page,
        starting_after: Some((Utc::now() - Duration::hours(hours)).naive_utc()),
        ending_before: None,
    };
    let summary = db::vital::get_summary(pool.get_ref().as_ref(), filter).await?;
    Success::ok(summary)
}

fn validate_report(report: VitalsReport) -> Res<Vec<WebVital>> {
    if report.metrics.is_empty() || report.metrics.len() > MAX_METRICS_PER_REPORT {
        return Err(AppError::BadRequest(format!(
            "A report carries between 1 and {} metrics",
            MAX_METRICS_PER_REPORT
        )));
    }

    let page = report.page.trim().to_string();
    if page.is_empty() {
        return Err(AppError::BadRequest("Page is required".to_string()));
    }

    let recorded_at = Utc::now().naive_utc();
    report
        .metrics
        .into_iter()
        .map(|metric| {
            let name = metric.name.trim().to_uppercase();
            if !KNOWN_METRICS.contains(&name.as_str()) {
                return Err(AppError::BadRequest(format!("Unknown metric '{}'", metric.name)));
            }
            if !metric.value.is_finite() || metric.value < 0.0 {
                return Err(AppError::BadRequest(format!(
                    "Metric {} has an invalid value",
                    name
                )));
            }
            Ok(WebVital {
                name,
                value: metric.value,
                rating: metric.rating,
                page: page.clone(),
                recorded_at,
            })
        })
        .collect()
}
