use std::{path::PathBuf, time::Duration};

use crate::{
    Error, Result, BASE_URL, DEFAULT_DELAY_SECS, PROMO_PREFIXES, REQUEST_TIMEOUT_SECS,
    RESULTS_FILE, USER_AGENT,
};

/// Settings shared by every mode of the scanner.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub base_url: String,
    pub results_file: PathBuf,
    /// Base delay between two requests, jittered by the scanner.
    pub delay: Duration,
    pub timeout: Duration,
    pub user_agent: String,
    pub prefixes: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            results_file: PathBuf::from(RESULTS_FILE),
            delay: Duration::from_secs_f64(DEFAULT_DELAY_SECS),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
            prefixes: PROMO_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl ScanConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_results_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.results_file = path.into();
        self
    }

    /// Negative, NaN or infinite delays are rejected.
    pub fn with_delay_secs(mut self, secs: f64) -> Result<Self> {
        self.delay = Duration::try_from_secs_f64(secs).map_err(|_| Error::InvalidDelay(secs))?;
        Ok(self)
    }

    pub fn with_prefixes<S: Into<String>>(mut self, prefixes: impl IntoIterator<Item = S>) -> Self {
        self.prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = ScanConfig::default();
        assert_eq!(config.base_url, BASE_URL);
        assert_eq!(config.delay, Duration::from_secs(1));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.prefixes.len(), 6);
    }

    #[test]
    fn rejects_negative_delay() {
        assert!(matches!(
            ScanConfig::default().with_delay_secs(-1.0),
            Err(Error::InvalidDelay(_))
        ));
        let config = ScanConfig::default().with_delay_secs(2.5).unwrap();
        assert_eq!(config.delay, Duration::from_millis(2500));
    }
}
