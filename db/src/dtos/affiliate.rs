pub struct AffiliateCreate {
    pub code: String,
    pub name: String,
    pub email: String,
    pub commission_bps: i32,
}

#[derive(Default)]
pub struct AffiliateUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub commission_bps: Option<i32>,
    pub status: Option<String>,
}
