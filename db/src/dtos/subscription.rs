use chrono::NaiveDateTime;
use uuid::Uuid;

/// Billing state pushed by the payment provider.
pub struct SubscriptionUpsert {
    pub user_id: Uuid,
    pub stripe_subscription_id: String,
    pub stripe_customer_id: String,
    pub plan_id: String,
    pub access_level: String,
    pub status: String,
    /// Balance granted at the start of a billing period.
    pub period_credits: i64,
    pub current_period_end: NaiveDateTime,
}
