use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{dtos::subscription::SubscriptionUpsert, models::subscription::MarketplaceSubscription};

pub async fn get_active_subscription_by_user_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: &Uuid,
) -> Res<Option<MarketplaceSubscription>> {
    sqlx::query_as::<_, MarketplaceSubscription>(
        "SELECT * FROM marketplace_subscriptions WHERE user_id = $1 AND status IN ('active', 'trialing')",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

/// Inserts or replaces the user's subscription.
///
/// Credits are refilled only when the billing period or plan changes, so
/// repeated webhook deliveries for the same period keep the balance.
pub async fn upsert_subscription<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: SubscriptionUpsert,
) -> Res<MarketplaceSubscription> {
    sqlx::query_as::<_, MarketplaceSubscription>(
        r#"
        INSERT INTO marketplace_subscriptions
            (user_id, stripe_subscription_id, stripe_customer_id, plan_id, access_level, status,
             credits_remaining, credits_used_this_period, current_period_end)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 0, $8)
        ON CONFLICT (user_id) DO UPDATE SET
            stripe_subscription_id = EXCLUDED.stripe_subscription_id,
            stripe_customer_id = EXCLUDED.stripe_customer_id,
            access_level = EXCLUDED.access_level,
            status = EXCLUDED.status,
            credits_remaining = CASE
                WHEN marketplace_subscriptions.current_period_end <> EXCLUDED.current_period_end
                  OR marketplace_subscriptions.plan_id <> EXCLUDED.plan_id
                THEN EXCLUDED.credits_remaining
                ELSE marketplace_subscriptions.credits_remaining
            END,
            credits_used_this_period = CASE
                WHEN marketplace_subscriptions.current_period_end <> EXCLUDED.current_period_end
                  OR marketplace_subscriptions.plan_id <> EXCLUDED.plan_id
                THEN 0
                ELSE marketplace_subscriptions.credits_used_this_period
            END,
            plan_id = EXCLUDED.plan_id,
            current_period_end = EXCLUDED.current_period_end,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(data.user_id)
    .bind(data.stripe_subscription_id)
    .bind(data.stripe_customer_id)
    .bind(data.plan_id)
    .bind(data.access_level)
    .bind(data.status)
    .bind(data.period_credits)
    .bind(data.current_period_end)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn update_status_by_stripe_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    stripe_subscription_id: &str,
    status: &str,
) -> Res<Option<MarketplaceSubscription>> {
    sqlx::query_as::<_, MarketplaceSubscription>(
        "UPDATE marketplace_subscriptions SET status = $1, updated_at = NOW() WHERE stripe_subscription_id = $2 RETURNING *",
    )
    .bind(status)
    .bind(stripe_subscription_id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

/// Deducts `cost` credits in one statement.
/// Returns `None` when the balance doesn't cover the cost; nothing is written then.
pub async fn deduct_credits<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: &Uuid,
    cost: i64,
) -> Res<Option<MarketplaceSubscription>> {
    sqlx::query_as::<_, MarketplaceSubscription>(
        r#"
        UPDATE marketplace_subscriptions
        SET credits_remaining = credits_remaining - $1,
            credits_used_this_period = credits_used_this_period + $1,
            updated_at = NOW()
        WHERE user_id = $2
          AND status IN ('active', 'trialing')
          AND credits_remaining >= $1
        RETURNING *
        "#,
    )
    .bind(cost)
    .bind(user_id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}
