use chrono::NaiveDateTime;

#[derive(Debug, Default)]
pub struct VitalFilter {
    pub name: Option<String>,
    pub page: Option<String>,
    pub starting_after: Option<NaiveDateTime>,
    pub ending_before: Option<NaiveDateTime>,
}
