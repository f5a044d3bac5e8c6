use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime};
use common::error::{AppError, Res};
use db::dtos::subscription::SubscriptionUpsert;
use sqlx::PgPool;
use stripe::{Event, EventObject, EventType, Expandable, Subscription, Webhook};
use uuid::Uuid;

/// Metadata key the checkout flow stores the marketplace user id under.
pub(crate) const USER_ID_METADATA_KEY: &str = "user_id";

/// Verifies the signature and parses the webhook payload.
pub(crate) fn construct_event(payload: &str, signature: &str, webhook_secret: &str) -> Res<Event> {
    Webhook::construct_event(payload, signature, webhook_secret).map_err(|e| {
        log::error!("Error constructing webhook event: {}", e);
        AppError::BadRequest(format!("Webhook Error: {}", e))
    })
}

/// Applies a billing event to the stored subscriptions.
///
/// Events that can't be tied to a user or a known plan are logged and
/// acknowledged; retrying them would never succeed.
pub(crate) async fn process_event(pool: &PgPool, event: Event) -> Res<()> {
    log::info!("Processing webhook event: {}", event.type_);

    match (event.type_, event.data.object) {
        (
            EventType::CustomerSubscriptionCreated | EventType::CustomerSubscriptionUpdated,
            EventObject::Subscription(subscription),
        ) => sync_subscription(pool, &subscription).await,
        (EventType::CustomerSubscriptionDeleted, EventObject::Subscription(subscription)) => {
            let id = subscription.id.to_string();
            match db::subscription::update_status_by_stripe_id(pool, &id, "canceled").await? {
                Some(sub) => log::info!("Subscription {} of user {} canceled", id, sub.user_id),
                None => log::warn!("Canceled subscription {} is not on record", id),
            }
            Ok(())
        }
        (event_type, _) => {
            log::info!("Unhandled event type: {}", event_type);
            Ok(())
        }
    }
}

async fn sync_subscription(pool: &PgPool, subscription: &Subscription) -> Res<()> {
    let sub_id = subscription.id.to_string();
    let Some(user_id) = user_id_from_metadata(&subscription.metadata) else {
        log::warn!("Subscription {} carries no usable user_id metadata", sub_id);
        return Ok(());
    };
    let Some(plan_id) = subscription
        .items
        .data
        .first()
        .and_then(|item| item.price.as_ref())
        .map(|price| price.id.to_string())
    else {
        log::warn!("Subscription {} has no priced item", sub_id);
        return Ok(());
    };
    let Some(plan) = db::plan::get_plan_by_id(pool, &plan_id).await? else {
        log::warn!("Subscription {} is on unknown plan {}", sub_id, plan_id);
        return Ok(());
    };

    let current_period_end = period_end(subscription.current_period_end)?;
    let customer_id = match &subscription.customer {
        Expandable::Id(id) => id.to_string(),
        Expandable::Object(customer) => customer.id.to_string(),
    };

    let stored = db::subscription::upsert_subscription(
        pool,
        SubscriptionUpsert {
            user_id,
            stripe_subscription_id: sub_id,
            stripe_customer_id: customer_id,
            plan_id: plan.id,
            access_level: plan.access_level,
            status: subscription.status.to_string(),
            period_credits: plan.monthly_credits,
            current_period_end,
        },
    )
    .await?;

    log::info!(
        "Synced subscription {} for user {}: plan={} status={} credits={}",
        stored.stripe_subscription_id,
        stored.user_id,
        stored.plan_id,
        stored.status,
        stored.credits_remaining
    );
    Ok(())
}

pub(crate) fn user_id_from_metadata(metadata: &HashMap<String, String>) -> Option<Uuid> {
    metadata
        .get(USER_ID_METADATA_KEY)
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
}

pub(crate) fn period_end(timestamp: i64) -> Res<NaiveDateTime> {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| AppError::BadRequest(format!("Invalid period end {}", timestamp)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_user_id_from_metadata() {
        let user_id = Uuid::new_v4();
        let mut metadata = HashMap::new();
        metadata.insert(USER_ID_METADATA_KEY.to_string(), format!(" {} ", user_id));
        assert_eq!(user_id_from_metadata(&metadata), Some(user_id));

        metadata.insert(USER_ID_METADATA_KEY.to_string(), "not-a-uuid".to_string());
        assert_eq!(user_id_from_metadata(&metadata), None);
        assert_eq!(user_id_from_metadata(&HashMap::new()), None);
    }

    #[test]
    fn converts_period_end() {
        let end = period_end(1_735_689_600).unwrap();
        assert_eq!(end.to_string(), "2025-01-01 00:00:00");
        assert!(period_end(i64::MAX).is_err());
    }

    #[test]
    fn bad_signature_is_rejected() {
        let res = construct_event("{}", "t=1,v1=deadbeef", "whsec_test");
        assert!(matches!(res, Err(AppError::BadRequest(_))));
    }
}
