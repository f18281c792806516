use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;

use crate::{parse::page_props, record::PromoStatus};

static ENDED_ON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)promotion ended.*?on\s+(\d{1,2}/\d{1,2}/\d{4})")
        .expect("Invalid promotion ended pattern")
});

/// Decides whether the promotion on a page is over and, if possible, when it ended.
///
/// The page text ("promotion ended", "expired") and a structured `end_date` in the past
/// both mark the promo as expired. A date written in the text wins over the structured one.
pub fn detect_expiration(
    html: &str,
    blocks: &[Value],
    now: DateTime<Utc>,
) -> (PromoStatus, Option<String>) {
    let mut status = PromoStatus::Active;
    let mut expiration_date = None;

    let lower = html.to_lowercase();
    if lower.contains("promotion ended") || lower.contains("expired") {
        status = PromoStatus::Expired;
        expiration_date = ENDED_ON
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
    }

    for end in blocks.iter().filter_map(structured_end_date) {
        if end.with_timezone(&Utc) < now {
            status = PromoStatus::Expired;
            expiration_date.get_or_insert_with(|| end.format("%m/%d/%Y").to_string());
        }
    }

    (status, expiration_date)
}

fn structured_end_date(block: &Value) -> Option<DateTime<FixedOffset>> {
    let raw = page_props(block)?
        .get("promo_data")?
        .get("end_date")?
        .as_str()?;
    parse_end_date(raw)
}

/// Accepts RFC 3339 timestamps plus bare date-times and dates, which are read as UTC.
/// Anything else is ignored.
pub fn parse_end_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date);
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    Some(naive.and_utc().fixed_offset())
}
