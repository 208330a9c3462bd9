use std::io::Read;
use std::path::Path;

use anyhow::Context;
use ldoffers_core::{AppConfig, OffersResponse};
use ldoffers_scraper::{extract_offers, extract_script_blocks, PageClient};

pub(crate) async fn scrape_url(config: &AppConfig, url: &str) -> anyhow::Result<OffersResponse> {
    let client = PageClient::from_config(config)?;
    let offers = client
        .scrape_offers(url)
        .await
        .with_context(|| format!("failed to scrape {url}"))?;
    Ok(OffersResponse { offers })
}

pub(crate) fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

pub(crate) fn offers_from_html(html: &str) -> anyhow::Result<OffersResponse> {
    let blocks = extract_script_blocks(html);
    tracing::debug!(script_blocks = blocks.len(), "found JSON-LD scripts");
    let offers = extract_offers(&blocks)?;
    Ok(OffersResponse { offers })
}

/// Input is a JSON array of strings, one per script body.
pub(crate) fn offers_from_script_list(input: &str) -> anyhow::Result<OffersResponse> {
    let blocks: Vec<String> =
        serde_json::from_str(input).context("expected a JSON array of script strings")?;
    let offers = extract_offers(&blocks)?;
    Ok(OffersResponse { offers })
}
