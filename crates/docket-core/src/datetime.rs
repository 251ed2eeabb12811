use std::sync::OnceLock;

use chrono::{Local, NaiveDate};
use regex::Regex;

// The canonical form is the exact pattern, not "anything chrono accepts":
// 2025-4-8 is rejected even though it names a real date.
pub fn is_canonical_date(text: &str) -> bool {
    static CANONICAL: OnceLock<Regex> = OnceLock::new();
    let re = CANONICAL
        .get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static date pattern compiles"));
    re.is_match(text)
}

pub fn parse_canonical_date(text: &str) -> Option<NaiveDate> {
    if !is_canonical_date(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    date.signed_duration_since(today).num_days()
}
