use uuid::Uuid;

pub struct ComparisonCreate {
    pub session_id: String,
    pub user_id: Option<Uuid>,
    pub product_ids: Vec<Uuid>,
    pub differences_only: bool,
}
