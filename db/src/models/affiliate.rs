use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Affiliate {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub email: String,
    pub commission_bps: i32,
    pub status: String,
    pub clicks: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
