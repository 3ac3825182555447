use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionResult {
    pub checkout_tomorrow: bool,
    pub next_checkin_date: Option<NaiveDate>,
}
