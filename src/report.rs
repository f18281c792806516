use std::fmt::Write;

use crate::{record::PromoRecord, store::RecordStore};

const ORGANIZATION_WIDTH: usize = 33;

/// Fixed-width table of every stored promo, ordered by code.
pub fn format_listing(store: &RecordStore) -> String {
    if store.is_empty() {
        return "No promos found yet. Run a search first.\n".to_string();
    }

    let mut out = format!("\nFound {} promos:\n\n", store.len());
    let _ = writeln!(out, "{:<8} {:<35} {:<12} URL", "Code", "Organization", "Status");
    let _ = writeln!(out, "{}", "-".repeat(95));

    for record in store.records() {
        let organization: String = record
            .organization_or_unknown()
            .chars()
            .take(ORGANIZATION_WIDTH)
            .collect();
        let _ = writeln!(
            out,
            "{:<8} {:<35} {:<12} {}",
            record.code,
            organization,
            record.status.to_string(),
            record.url
        );
    }
    out
}

/// One line per record matching an organization lookup.
pub fn format_matches(query: &str, matches: &[&PromoRecord]) -> String {
    if matches.is_empty() {
        return format!("No matches found for '{query}'\n");
    }

    let mut out = format!("\nFound {} matches for '{query}':\n", matches.len());
    for record in matches {
        let _ = writeln!(
            out,
            "  {}: {} - {}",
            record.code,
            record.organization_or_unknown(),
            record.url
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::record::PromoStatus;

    fn record(code: &str, organization: Option<&str>, status: PromoStatus) -> PromoRecord {
        PromoRecord {
            code: code.into(),
            url: format!("https://www.alaskaair.com/promo/{code}"),
            organization_name: organization.map(Into::into),
            discovered_at: NaiveDateTime::parse_from_str(
                "2024-05-01T00:00:00",
                "%Y-%m-%dT%H:%M:%S",
            )
            .unwrap(),
            status,
            expiration_date: None,
        }
    }

    #[test]
    fn empty_listing_hints_at_search() {
        let store = RecordStore::new("unused.json");
        assert!(format_listing(&store).starts_with("No promos found yet"));
    }

    #[test]
    fn listing_is_sorted_and_fixed_width() {
        let mut store = RecordStore::new("unused.json");
        store.insert(record("CS2344", Some("University of Washington"), PromoStatus::Expired));
        store.insert(record(
            "AS2300",
            Some("An Organization With A Really Very Long Name"),
            PromoStatus::Active,
        ));
        store.insert(record("AS2301", None, PromoStatus::Active));

        let listing = format_listing(&store);
        let rows: Vec<&str> = listing
            .lines()
            .filter(|line| line.starts_with("AS") || line.starts_with("CS"))
            .collect();

        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("AS2300   An Organization With A Really Ver   ACTIVE"));
        assert!(!rows[0].contains("Long Name"));
        assert!(rows[1].starts_with("AS2301   Unknown"));
        assert!(rows[2].contains("EXPIRED"));
        for row in &rows {
            assert!(matches!(row[45..57].trim_end(), "ACTIVE" | "EXPIRED"));
            assert!(row[58..].starts_with("https://"));
        }
    }

    #[test]
    fn matches_list_codes_and_urls() {
        let washington = record("CS2344", Some("University of Washington"), PromoStatus::Active);
        let out = format_matches("washington", &[&washington]);
        assert!(out.contains("CS2344: University of Washington - https://www.alaskaair.com/promo/CS2344"));
        assert_eq!(
            format_matches("nobody", &[]),
            "No matches found for 'nobody'\n"
        );
    }
}
