use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct MarketplaceSubscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stripe_subscription_id: String,
    pub stripe_customer_id: String,
    pub plan_id: String,
    pub access_level: String,
    pub status: String,
    pub credits_remaining: i64,
    pub credits_used_this_period: i64,
    pub current_period_end: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
