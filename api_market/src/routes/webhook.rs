use std::sync::Arc;

use actix_web::{HttpRequest, Responder, post, web};
use common::{
    env_config::Config,
    error::{AppError, Res},
    http::Success,
};
use sqlx::PgPool;

use crate::service::billing;

/// Receives Stripe billing events.
///
/// Called by Stripe, not by the frontend. Configure
/// `https://<host>/api/marketplace-subscriptions/webhook` in the Stripe
/// dashboard for the `customer.subscription.created`, `.updated` and
/// `.deleted` events and put the signing secret in `STRIPE_WEBHOOK_SECRET`.
///
/// # Output
/// - Success: 200 once the event is applied (or deliberately ignored)
/// - Error: 400 for a missing or invalid signature
#[post("/webhook")]
pub async fn post_webhook(
    payload: String,
    req: HttpRequest,
    config: web::Data<Arc<Config>>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let signature = req
        .headers()
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Stripe signature missing".to_string()))?;

    let event = billing::construct_event(&payload, signature, &config.stripe_webhook_secret)?;
    billing::process_event(&pool, event).await?;

    Success::ok("Webhook processed successfully")
}
