use chrono::{Duration, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref TODAY_RE: Regex = Regex::new(r"(?i)\b(?:today|just\s+posted|new)\b").unwrap();
    static ref YESTERDAY_RE: Regex = Regex::new(r"(?i)\byesterday\b").unwrap();
    /// "30+ Days Ago" only bounds the date from one side.
    static ref OPEN_ENDED_RE: Regex = Regex::new(r"\d+\s*\+").unwrap();
    static ref RELATIVE_RE: Regex =
        Regex::new(r"(?i)\b(\d+)\s*(hour|hr|day|week|wk|month)s?\s+ago\b").unwrap();
    static ref ISO_DATE_RE: Regex = Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap();
    static ref US_DATE_RE: Regex = Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").unwrap();
}

/// Resolves a `postedOn` string against `base`, the scrape date.
///
/// - "Posted Today" / "Just Posted": `base`
/// - "Posted Yesterday": `base - 1 day`
/// - "Posted N Days Ago", "N weeks ago", "N hours ago" (same day), "N months ago" (30 days each)
/// - "2025-03-14", "03/14/2025": that date
/// - "30+ Days Ago" and anything else: None
pub fn parse_posted_on(raw: &str, base: NaiveDate) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(caps) = ISO_DATE_RE.captures(trimmed) {
        let year: i32 = caps.get(1)?.as_str().parse().ok()?;
        let month: u32 = caps.get(2)?.as_str().parse().ok()?;
        let day: u32 = caps.get(3)?.as_str().parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = US_DATE_RE.captures(trimmed) {
        let month: u32 = caps.get(1)?.as_str().parse().ok()?;
        let day: u32 = caps.get(2)?.as_str().parse().ok()?;
        let year: i32 = caps.get(3)?.as_str().parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if OPEN_ENDED_RE.is_match(trimmed) {
        debug!(raw = trimmed, "open-ended posted date ignored");
        return None;
    }

    if YESTERDAY_RE.is_match(trimmed) {
        return base.checked_sub_signed(Duration::days(1));
    }

    if TODAY_RE.is_match(trimmed) {
        return Some(base);
    }

    let caps = RELATIVE_RE.captures(trimmed)?;
    let amount: i64 = caps.get(1)?.as_str().parse().ok()?;
    let days = match caps.get(2)?.as_str().to_ascii_lowercase().as_str() {
        "hour" | "hr" => 0,
        "day" => amount,
        "week" | "wk" => amount.checked_mul(7)?,
        _ => amount.checked_mul(30)?,
    };
    base.checked_sub_signed(Duration::try_days(days)?)
}
