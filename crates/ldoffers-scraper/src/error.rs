use thiserror::Error;

use crate::jsonld::ExtractionError;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// `retry_after_secs` is the delta-seconds form of `Retry-After`, when
    /// the response carried one.
    #[error("rate limited by {domain}")]
    RateLimited {
        domain: String,
        retry_after_secs: Option<u64>,
    },

    #[error("invalid page URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}
