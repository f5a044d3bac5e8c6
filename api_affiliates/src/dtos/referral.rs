use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct Attribution {
    /// False when the browser was already attributed and nothing was recorded.
    pub attributed: bool,
    pub session_id: Option<Uuid>,
    pub expires_at: Option<NaiveDateTime>,
}
