use compare::ComparisonTable;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub product_ids: Vec<Uuid>,
    #[serde(default)]
    pub differences_only: bool,
    /// Browser session the comparison belongs to; a new one is issued when absent.
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    pub comparison_id: Uuid,
    pub session_id: String,
    pub differences_only: bool,
    #[serde(flatten)]
    pub table: ComparisonTable,
}
