pub mod client;
pub mod error;
pub mod html;
pub mod jsonld;
mod retry;

pub use client::{parse_page_url, FetchedPage, PageClient};
pub use error::ScraperError;
pub use html::extract_script_blocks;
pub use jsonld::{extract_offers, ExtractionError};
