use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub access_level: String,
    pub monthly_credits: i64,
    pub price_cents: i64,
    pub active: bool,
    pub created_at: NaiveDateTime,
}
