use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Comparison {
    pub id: Uuid,
    pub session_id: String,
    pub user_id: Option<Uuid>,
    pub product_ids: Vec<Uuid>,
    pub differences_only: bool,
    pub created_at: NaiveDateTime,
}
