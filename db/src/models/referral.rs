use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ReferralClick {
    pub id: Uuid,
    pub affiliate_id: Uuid,
    pub code: String,
    pub session_id: Uuid,
    pub ip_address: String,
    pub user_agent: String,
    pub expires_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}
