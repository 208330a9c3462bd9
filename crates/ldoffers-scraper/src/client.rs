//! HTTP page client: fetches a page and runs offer extraction on it.

use std::time::Duration;

use ldoffers_core::{AppConfig, OfferRecord};
use reqwest::{Client, StatusCode, Url};

use crate::error::ScraperError;
use crate::html::extract_script_blocks;
use crate::jsonld::extract_offers;
use crate::retry::retry_with_backoff;

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// A downloaded page, before any JSON-LD processing.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was requested.
    pub url: String,
    /// Where the request ended up after redirects.
    pub final_url: String,
    pub status: u16,
    pub html: String,
}

/// Fetches pages with a browser-like user agent and extracts ticket offers
/// from their JSON-LD.
///
/// Transient failures (HTTP 429, network errors, timeouts) are retried with
/// exponential backoff. Other non-2xx responses are not errors: the body is
/// still scanned, the way a browser would still render the error page.
#[derive(Debug, Clone)]
pub struct PageClient {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl PageClient {
    /// Creates a `PageClient` with a per-request timeout, `User-Agent`, and
    /// retry policy. `max_retries = 0` disables retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Creates a `PageClient` from the shared application config.
    ///
    /// # Errors
    ///
    /// Same as [`PageClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.render_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    /// Downloads `url` and returns its HTML.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `url` is not an absolute http(s) URL
    ///   (no request is made).
    /// - [`ScraperError::RateLimited`] on HTTP 429 after all retries.
    /// - [`ScraperError::Http`] on network, timeout, or body-decoding failure
    ///   after all retries.
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage, ScraperError> {
        let parsed = parse_page_url(url)?;

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let parsed = parsed.clone();
            async move {
                let response = self
                    .client
                    .get(parsed.clone())
                    .header(reqwest::header::ACCEPT, HTML_ACCEPT)
                    .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                    .send()
                    .await?;
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.trim().parse::<u64>().ok());
                    return Err(ScraperError::RateLimited {
                        domain: parsed.host_str().unwrap_or_default().to_owned(),
                        retry_after_secs,
                    });
                }

                if !status.is_success() {
                    tracing::warn!(
                        url = %parsed,
                        status = status.as_u16(),
                        "page returned non-success status; scanning body anyway"
                    );
                }

                let final_url = response.url().to_string();
                let html = response.text().await?;

                Ok(FetchedPage {
                    url: parsed.to_string(),
                    final_url,
                    status: status.as_u16(),
                    html,
                })
            }
        })
        .await
    }

    /// Downloads `url` and returns the body of each JSON-LD script, in
    /// document order.
    ///
    /// # Errors
    ///
    /// Same as [`PageClient::fetch_page`].
    pub async fn fetch_script_blocks(&self, url: &str) -> Result<Vec<String>, ScraperError> {
        let page = self.fetch_page(url).await?;
        Ok(extract_script_blocks(&page.html))
    }

    /// Full pipeline: fetch, locate JSON-LD, extract offers.
    ///
    /// # Errors
    ///
    /// Fetch errors as in [`PageClient::fetch_page`], plus
    /// [`ScraperError::Extraction`] when the page has no usable JSON-LD or
    /// no `Event` with offers.
    pub async fn scrape_offers(&self, url: &str) -> Result<Vec<OfferRecord>, ScraperError> {
        tracing::info!(url, "scraping page");
        let blocks = self.fetch_script_blocks(url).await?;
        tracing::debug!(url, script_blocks = blocks.len(), "extracting JSON-LD data");

        let offers = extract_offers(&blocks)?;
        tracing::info!(url, offers = offers.len(), "extracted offers");
        Ok(offers)
    }
}

/// Accepts only absolute `http`/`https` URLs.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] with the parse failure or the
/// rejected scheme.
pub fn parse_page_url(url: &str) -> Result<Url, ScraperError> {
    let parsed = Url::parse(url.trim()).map_err(|e| ScraperError::InvalidUrl {
        url: url.to_owned(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ScraperError::InvalidUrl {
            url: url.to_owned(),
            reason: format!("unsupported scheme \"{other}\""),
        }),
    }
}
