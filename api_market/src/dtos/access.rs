use entitlement::{AccessLevel, DownloadDecision};
use serde::Serialize;
use uuid::Uuid;

/// What a download of the product would do for the caller, without doing it.
#[derive(Debug, Serialize)]
pub struct AccessPreview {
    pub product_id: Uuid,
    pub price_cents: i64,
    pub required_level: AccessLevel,
    pub required_label: &'static str,
    pub can_access: bool,
    /// Cost under the caller's plan, reported even when the plan includes the product.
    pub credit_cost: u32,
    pub included_in_plan: bool,
    pub has_enough_credits: bool,
    pub credits_remaining: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DownloadReceipt {
    pub product_id: Uuid,
    #[serde(flatten)]
    pub decision: DownloadDecision,
    pub credits_charged: u32,
    pub credits_remaining: i64,
}
