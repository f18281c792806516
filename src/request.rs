use std::time::Duration;

use reqwest::{Client, StatusCode};
use url::Url;

use crate::{Result, PROMO_MARKERS};

/// Result of a single promo page request.
#[derive(Debug)]
pub enum Fetched {
    /// 200 response that mentions one of the promo markers.
    Promo { url: Url, html: String },
    /// 200 response that looks like a generic page.
    NotPromo { url: Url },
    /// Anything other than 200.
    Status { url: Url, status: StatusCode },
}

/// Thin wrapper around a `reqwest::Client` that knows where promo pages live.
#[derive(Debug, Clone)]
pub struct PromoClient {
    client: Client,
    base_url: Url,
}

impl PromoClient {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        // Without the trailing slash `join` would replace the last path segment.
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{base_url}/"))?
        };

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn promo_url(&self, code: &str) -> Result<Url> {
        Ok(self.base_url.join(code)?)
    }

    /// Requests the promo page for `code` and classifies the response.
    pub async fn fetch(&self, code: &str) -> Result<Fetched> {
        let url = self.promo_url(code)?;
        let res = self.client.get(url.clone()).send().await?;

        let status = res.status();
        if status != StatusCode::OK {
            return Ok(Fetched::Status { url, status });
        }

        let html = res.text().await?;
        if is_promo_page(&html) {
            Ok(Fetched::Promo { url, html })
        } else {
            Ok(Fetched::NotPromo { url })
        }
    }
}

/// Generic error and landing pages come back as 200 too, so the body has to mention a promo.
pub fn is_promo_page(body: &str) -> bool {
    let body = body.to_lowercase();
    PROMO_MARKERS.iter().any(|marker| body.contains(marker))
}
