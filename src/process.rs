use std::time::Duration;

use chrono::{Local, Utc};
use rand::Rng;
use tracing::{debug, error, info};

use crate::{
    codes::{generate_codes, select_codes},
    config::ScanConfig,
    info_time,
    parse::parse_page_blocking,
    record::PromoRecord,
    request::{Fetched, PromoClient},
    store::RecordStore,
    Result, SAVE_EVERY,
};

/// Which part of the code space a scan should cover.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub max_codes: Option<usize>,
    pub start_from: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Codes left after applying the scan options.
    pub total: usize,
    pub checked: usize,
    /// Codes already in the store.
    pub skipped: usize,
    pub found: usize,
}

/// Walks the code space one request at a time and records every promo page it finds.
#[derive(Debug)]
pub struct Scanner {
    client: PromoClient,
    store: RecordStore,
    delay: Duration,
    prefixes: Vec<String>,
}

impl Scanner {
    pub fn new(config: &ScanConfig, store: RecordStore) -> Result<Self> {
        let client = PromoClient::new(&config.base_url, config.timeout, &config.user_agent)?;
        Ok(Self {
            client,
            store,
            delay: config.delay,
            prefixes: config.prefixes.clone(),
        })
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Checks every selected code that isn't stored yet.
    /// The store is saved after every `SAVE_EVERY` discoveries and once more at the end.
    pub async fn scan(&mut self, options: &ScanOptions) -> ScanSummary {
        let start_time = Local::now();
        let codes = select_codes(
            generate_codes(self.prefixes.as_slice()),
            options.start_from.as_deref(),
            options.max_codes,
        );

        let mut summary = ScanSummary {
            total: codes.len(),
            ..Default::default()
        };
        info!("Searching {} promo codes...", summary.total);

        for (idx, code) in codes.iter().enumerate() {
            if self.store.contains(code) {
                summary.skipped += 1;
                continue;
            }

            info!("[{}/{}] Checking {code}...", idx + 1, summary.total);
            summary.checked += 1;

            if let Some(record) = self.check_code_logged(code).await {
                self.store.insert(record);
                summary.found += 1;

                if summary.found % SAVE_EVERY == 0 {
                    self.save().await;
                }
            }

            self.pause().await;
        }

        self.save().await;
        info_time!(
            start_time,
            "Search complete! Found {} new promos",
            summary.found
        );
        summary
    }

    /// Fetches a single code and builds its record if the page is a real promo page.
    /// `Ok(None)` means the code has no promo behind it.
    pub async fn check_code(&self, code: &str) -> Result<Option<PromoRecord>> {
        let (url, html) = match self.client.fetch(code).await? {
            Fetched::Promo { url, html } => (url, html),
            Fetched::NotPromo { .. } => {
                debug!("{code} - Not a valid promo page");
                return Ok(None);
            }
            Fetched::Status { status, .. } => {
                debug!("{code} - HTTP {status}");
                return Ok(None);
            }
        };

        let details = parse_page_blocking(html, Utc::now()).await?;
        let record = PromoRecord {
            code: code.to_string(),
            url: url.to_string(),
            organization_name: details.organization_name,
            discovered_at: Local::now().naive_local(),
            status: details.status,
            expiration_date: details.expiration_date,
        };

        if record.status.is_expired() {
            info!(
                "Found: {code} - {} ({})",
                record.organization_or_unknown(),
                record.status
            );
        } else {
            info!("Found: {code} - {}", record.organization_or_unknown());
        }
        Ok(Some(record))
    }

    async fn check_code_logged(&self, code: &str) -> Option<PromoRecord> {
        match self.check_code(code).await {
            Ok(record) => record,
            Err(err) => {
                error!("{code} - Request failed: {err}");
                None
            }
        }
    }

    async fn save(&self) {
        if let Err(err) = self.store.save().await {
            error!("Error saving results: {err}");
        }
    }

    async fn pause(&self) {
        if self.delay.is_zero() {
            return;
        }
        let pause = jittered_delay(self.delay, &mut rand::rng());
        tokio::time::sleep(pause).await;
    }
}

/// The base delay scaled by a random factor in [0.5, 1.5].
fn jittered_delay(delay: Duration, rng: &mut impl Rng) -> Duration {
    delay.mul_f64(rng.random_range(0.5..=1.5))
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn jitter_stays_within_half_and_one_and_a_half_delay() {
        let mut rng = StdRng::seed_from_u64(7);
        let delay = Duration::from_millis(1000);

        let pauses: Vec<_> = (0..1000).map(|_| jittered_delay(delay, &mut rng)).collect();
        assert!(pauses
            .iter()
            .all(|p| *p >= Duration::from_millis(500) && *p <= Duration::from_millis(1500)));

        // Not a fixed interval.
        assert!(pauses.iter().any(|p| *p < Duration::from_millis(900)));
        assert!(pauses.iter().any(|p| *p > Duration::from_millis(1100)));
    }

    #[test]
    fn zero_delay_has_no_jitter() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(jittered_delay(Duration::ZERO, &mut rng), Duration::ZERO);
    }
}
