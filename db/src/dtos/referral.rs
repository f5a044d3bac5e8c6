use chrono::NaiveDateTime;
use uuid::Uuid;

pub struct ClickCreate {
    pub affiliate_id: Uuid,
    pub code: String,
    pub session_id: Uuid,
    pub ip_address: String,
    pub user_agent: String,
    pub expires_at: NaiveDateTime,
}
