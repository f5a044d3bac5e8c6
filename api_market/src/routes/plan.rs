use std::sync::Arc;

use actix_web::{Responder, get, web};
use common::{
    error::{AppError, Res},
    http::Success,
    jwt::JwtClaims,
};
use entitlement::AccessLevel;
use sqlx::PgPool;

use crate::{
    dtos::plan::{CurrentSubscriptionResponse, PlanResponse},
    service,
};

/// Lists the active plans, cheapest first.
///
/// # Output
/// - Success: every active plan with its access level, display label and color
/// - Error: 500 if a stored plan carries an unknown access level
#[get("/plans")]
pub async fn get_plans(pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    let plans = db::plan::get_active_plans(pool.get_ref().as_ref()).await?;

    let plans = plans
        .into_iter()
        .map(|plan| {
            let access_level = plan.access_level.parse::<AccessLevel>().map_err(|e| {
                AppError::Internal(format!("Plan {} has {}", plan.id, e))
            })?;
            Ok(PlanResponse {
                id: plan.id,
                name: plan.name,
                access_level,
                label: access_level.label(),
                color: access_level.color(),
                monthly_credits: plan.monthly_credits,
                price_cents: plan.price_cents,
            })
        })
        .collect::<Res<Vec<_>>>()?;

    Success::ok(plans)
}

/// Returns the caller's active subscription, or 404 when there is none.
#[get("")]
pub async fn get_current(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let row = db::subscription::get_active_subscription_by_user_id(
        pool.get_ref().as_ref(),
        &claims.user_id,
    )
    .await?
    .ok_or_else(|| AppError::NotFound("No active subscription".to_string()))?;

    let subscription = service::access::to_subscription(&row)?;
    let level = subscription.access_level;
    Success::ok(CurrentSubscriptionResponse {
        plan_id: subscription.plan_id,
        access_level: level,
        label: level.label(),
        color: level.color(),
        status: row.status,
        credits_remaining: subscription.credits_remaining,
        credits_used_this_period: subscription.credits_used_this_period,
        current_period_end: row.current_period_end,
    })
}
