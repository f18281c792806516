use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use tokio::task::spawn_blocking;

use crate::{expiry, record::PromoStatus, Error, Result};

/// Email domains and university names found in the visible text, tried in order.
static EMAIL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)@(\w+)\.edu",
        r"(?i)@(\w+)\.com",
        r"(?i)@(\w+)\.org",
        r"(?i)university\s+of\s+(\w+)",
        r"(?i)(\w+)\s+university",
    ])
});

/// Phrases promo pages use to address the members of an organization, tried in order.
static PHRASE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)Only.*?members who work at ([^,]+)",
        r"(?i)([^,]+) discover a quicker way",
        r"(?i)([^,]+) employees",
        r"(?i)([^,]+) staff",
    ])
});

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).expect("Invalid organization pattern"))
        .collect()
}

/// What a promo page says about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDetails {
    pub organization_name: Option<String>,
    pub status: PromoStatus,
    pub expiration_date: Option<String>,
}

/// Parses the page on the blocking pool, `Html` can't be held across an await.
pub(crate) async fn parse_page_blocking(html: String, now: DateTime<Utc>) -> Result<PageDetails> {
    let details = spawn_blocking(move || parse_page(&html, now)).await??;
    Ok(details)
}

/// Extracts the organization and expiration info from a page already known to be a promo page.
pub fn parse_page(html: &str, now: DateTime<Utc>) -> Result<PageDetails> {
    let doc = Html::parse_document(html);
    let blocks = structured_data(&doc)?;

    let organization_name = extract_organization(&doc, &blocks);
    let (status, expiration_date) = expiry::detect_expiration(html, &blocks, now);

    Ok(PageDetails {
        organization_name,
        status,
        expiration_date,
    })
}

/// Every `<script type="application/json">` block that holds valid JSON.
/// Blocks that fail to parse are skipped.
pub fn structured_data(doc: &Html) -> Result<Vec<Value>> {
    let script_selector = create_selector(r#"script[type="application/json"]"#)?;

    let blocks = doc
        .select(&script_selector)
        .filter_map(|script| {
            let raw = script.text().collect::<String>();
            serde_json::from_str::<Value>(&raw).ok()
        })
        .collect();
    Ok(blocks)
}

/// The `props.pageProps` object of a structured-data block, if it has one.
pub(crate) fn page_props(block: &Value) -> Option<&Value> {
    block.get("props")?.get("pageProps")
}

/// Runs the heuristics in priority order: structured data, then email/university
/// patterns, then member phrases. The first hit wins.
pub fn extract_organization(doc: &Html, blocks: &[Value]) -> Option<String> {
    if let Some(name) = blocks.iter().find_map(organization_from_block) {
        return Some(name);
    }

    let text = visible_text(doc).to_lowercase();
    if let Some(name) = first_capture(&EMAIL_PATTERNS, &text) {
        return Some(title_case(name));
    }
    first_capture(&PHRASE_PATTERNS, &text).map(|name| title_case(name.trim()))
}

fn organization_from_block(block: &Value) -> Option<String> {
    let props = page_props(block)?;
    ["content", "promo_data"].iter().find_map(|section| {
        props
            .get(section)?
            .get("company_name")?
            .as_str()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    })
}

fn first_capture<'t>(patterns: &[Regex], text: &'t str) -> Option<&'t str> {
    patterns
        .iter()
        .find_map(|re| re.captures(text)?.get(1))
        .map(|m| m.as_str())
}

/// Text a reader would see. Script, style and template contents are left out,
/// `noscript` fallbacks are kept.
fn visible_text(doc: &Html) -> String {
    let mut text = String::new();
    for node in doc.root_element().descendants() {
        let Some(chunk) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .is_some_and(|el| matches!(el.name(), "script" | "style" | "template"));
        if !hidden {
            text.push_str(chunk);
        }
    }
    text
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_alpha = false;
    for ch in input.chars() {
        if prev_alpha {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        prev_alpha = ch.is_alphabetic();
    }
    out
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}
