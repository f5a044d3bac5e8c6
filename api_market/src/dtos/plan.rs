use chrono::NaiveDateTime;
use entitlement::AccessLevel;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: String,
    pub name: String,
    pub access_level: AccessLevel,
    pub label: &'static str,
    pub color: &'static str,
    pub monthly_credits: i64,
    pub price_cents: i64,
}

#[derive(Debug, Serialize)]
pub struct CurrentSubscriptionResponse {
    pub plan_id: String,
    pub access_level: AccessLevel,
    pub label: &'static str,
    pub color: &'static str,
    pub status: String,
    pub credits_remaining: i64,
    pub credits_used_this_period: i64,
    pub current_period_end: NaiveDateTime,
}
