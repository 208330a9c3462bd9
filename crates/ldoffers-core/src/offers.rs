use serde::Serialize;
use serde_json::Value;

/// Value substituted for a missing or falsy `inventoryLevel`.
pub const DEFAULT_INVENTORY_LEVEL: &str = "0";

/// One ticket tier taken from a schema.org `Event`'s `offers`.
///
/// Every field except `inventory_level` is forwarded exactly as it appeared in
/// the page's JSON-LD. `None` means the key was absent and is omitted on
/// output; an explicit JSON `null` is kept as `Some(Value::Null)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    /// Not validated: publishers emit numbers, strings, or ranges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_currency: Option<Value>,
    /// Usually a schema.org URI such as `https://schema.org/InStock`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<Value>,
    pub inventory_level: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<Value>,
}

impl OfferRecord {
    /// Builds a record from one entry of an `offers` array.
    ///
    /// Non-object entries yield a record with every passthrough field absent.
    #[must_use]
    pub fn from_ld_offer(offer: &Value) -> Self {
        let field = |key: &str| offer.get(key).cloned();

        let inventory_level = offer
            .get("inventoryLevel")
            .filter(|v| is_truthy(v))
            .cloned()
            .unwrap_or_else(|| Value::String(DEFAULT_INVENTORY_LEVEL.to_string()));

        Self {
            name: field("name"),
            price: field("price"),
            price_currency: field("priceCurrency"),
            availability: field("availability"),
            inventory_level,
            valid_from: field("validFrom"),
        }
    }
}

/// JSON truthiness: `null`, `false`, `""`, and numeric zero are falsy.
/// Arrays and objects are truthy even when empty.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Success body of the scrape endpoint: `{ "offers": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OffersResponse {
    pub offers: Vec<OfferRecord>,
}
