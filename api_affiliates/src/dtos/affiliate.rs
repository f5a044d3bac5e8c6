use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateAffiliateRequest {
    pub code: String,
    pub name: String,
    pub email: String,
    /// Basis points; 1000 (10%) when omitted.
    pub commission_bps: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAffiliateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub commission_bps: Option<i32>,
    pub status: Option<String>,
}
