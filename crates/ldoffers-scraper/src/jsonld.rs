//! Offer extraction from schema.org JSON-LD.
//!
//! Pure and synchronous: no I/O, no logging, no shared state. The pipeline
//! runs in two phases so that a malformed block is a per-item outcome
//! (`None`) while the aggregate failures are terminal for the call:
//!
//! 1. [`parse_script_blocks`] maps each raw script body to `Option<Value>`.
//!    Malformed bodies and bodies that parse to a falsy top-level value
//!    (`null`, `false`, `0`, `""`) both become `None`.
//! 2. [`extract_offers_from_nodes`] flattens the survivors one level, picks
//!    the first `Event` with offers, and maps those offers to
//!    [`OfferRecord`]s.

use ldoffers_core::offers::is_truthy;
use ldoffers_core::OfferRecord;
use serde_json::Value;
use thiserror::Error;

/// Terminal outcomes of an extraction call.
///
/// The `Display` strings are the error messages returned to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// No script block parsed to a truthy JSON value, or there were no
    /// blocks at all.
    #[error("No JSON-LD data found")]
    NoStructuredDataFound,

    /// JSON-LD was present but no node is an `Event` with offers.
    #[error("No offers found in JSON-LD data")]
    NoOffersFound,
}

/// Extracts normalized offers from the text of every
/// `<script type="application/ld+json">` element, in document order.
///
/// # Errors
///
/// - [`ExtractionError::NoStructuredDataFound`] if no entry is valid JSON
///   with a truthy top-level value.
/// - [`ExtractionError::NoOffersFound`] if no flattened node qualifies.
pub fn extract_offers<S: AsRef<str>>(
    script_texts: &[S],
) -> Result<Vec<OfferRecord>, ExtractionError> {
    extract_offers_from_nodes(parse_script_blocks(script_texts))
}

/// Phase 1: parse every block, keeping a `None` slot for malformed ones.
///
/// A block whose top-level value is falsy (`null`, `false`, a numeric zero,
/// or `""`) carries no structured data and gets a `None` slot too.
#[must_use]
pub fn parse_script_blocks<S: AsRef<str>>(script_texts: &[S]) -> Vec<Option<Value>> {
    script_texts
        .iter()
        .map(|text| {
            serde_json::from_str::<Value>(text.as_ref())
                .ok()
                .filter(is_truthy)
        })
        .collect()
}

/// Phase 2: aggregate check, flatten, select, and map.
///
/// # Errors
///
/// Same as [`extract_offers`].
pub fn extract_offers_from_nodes(
    parsed: Vec<Option<Value>>,
) -> Result<Vec<OfferRecord>, ExtractionError> {
    let nodes: Vec<Value> = parsed.into_iter().flatten().collect();
    if nodes.is_empty() {
        return Err(ExtractionError::NoStructuredDataFound);
    }

    let candidates = flatten_nodes(nodes);
    let event = candidates
        .iter()
        .find(|node| is_event_with_offers(node))
        .ok_or(ExtractionError::NoOffersFound)?;

    Ok(offer_entries(&event["offers"])
        .iter()
        .map(OfferRecord::from_ld_offer)
        .collect())
}

/// Flattens exactly one level: a top-level array contributes its elements,
/// anything else contributes itself.
#[must_use]
pub fn flatten_nodes(nodes: Vec<Value>) -> Vec<Value> {
    let mut flat = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Value::Array(items) => flat.extend(items),
            other => flat.push(other),
        }
    }
    flat
}

/// `@type` must be exactly the string `"Event"`. An array-valued `@type`
/// such as `["Event", "MusicEvent"]` does not match.
fn is_event_with_offers(node: &Value) -> bool {
    node.get("@type").and_then(Value::as_str) == Some("Event")
        && node.get("offers").is_some_and(has_offers)
}

fn has_offers(offers: &Value) -> bool {
    match offers {
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => false,
    }
}

/// A bare `Offer` object is treated as a one-element list.
fn offer_entries(offers: &Value) -> &[Value] {
    match offers {
        Value::Array(items) => items,
        single => std::slice::from_ref(single),
    }
}

#[cfg(test)]
#[path = "jsonld_test.rs"]
mod tests;
