use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromoStatus {
    #[default]
    Active,
    Expired,
}

impl PromoStatus {
    pub fn is_expired(self) -> bool {
        self == PromoStatus::Expired
    }
}

impl fmt::Display for PromoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromoStatus::Active => f.write_str("ACTIVE"),
            PromoStatus::Expired => f.write_str("EXPIRED"),
        }
    }
}

/// Everything known about a code that was confirmed as a promo page.
///
/// The aliases let results files written by the older python tool load as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoRecord {
    #[serde(alias = "promo_code")]
    pub code: String,
    pub url: String,
    #[serde(alias = "company_name")]
    pub organization_name: Option<String>,
    #[serde(alias = "found_date")]
    pub discovered_at: NaiveDateTime,
    #[serde(default)]
    pub status: PromoStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
}

impl PromoRecord {
    pub fn organization_or_unknown(&self) -> &str {
        self.organization_name.as_deref().unwrap_or("Unknown")
    }
}
