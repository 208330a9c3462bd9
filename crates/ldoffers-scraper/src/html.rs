//! Locating `<script type="application/ld+json">` bodies in raw HTML.

use std::sync::LazyLock;

use regex::Regex;

/// Scans the document left to right. Alternatives are tried in order at each
/// position, so an HTML comment (an unterminated one runs to the end of the
/// document) or a non-JSON-LD script element is consumed whole and any
/// JSON-LD markup inside it never matches. Only the `ld` group is kept.
static LD_SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?is)<!--(?:.*?-->|.*)",
        r#"|<script\b[^>]*?\stype\s*=\s*(?:"application/ld\+json"|'application/ld\+json'|application/ld\+json\b)[^>]*>(?P<ld>.*?)</script\s*>"#,
        r"|<script\b[^>]*>.*?</script\s*>",
    ))
    .expect("valid regex")
});

/// Returns the raw body of every JSON-LD script element, in document order.
///
/// Bodies are not entity-decoded (HTML leaves script text alone). Empty
/// bodies are kept so callers see one entry per element. Elements inside
/// commented-out markup or inside another script's text are not elements
/// and are skipped.
#[must_use]
pub fn extract_script_blocks(html: &str) -> Vec<String> {
    LD_SCRIPT_RE
        .captures_iter(html)
        .filter_map(|cap| cap.name("ld"))
        .map(|m| strip_wrappers(m.as_str()).to_string())
        .collect()
}

/// Removes a surrounding `<!-- -->` or `<![CDATA[ ]]>` wrapper, which some
/// CMS templates emit around inline JSON.
fn strip_wrappers(body: &str) -> &str {
    let trimmed = body.trim();
    for (open, close) in [("<!--", "-->"), ("<![CDATA[", "]]>")] {
        if let Some(inner) = trimmed
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner;
        }
    }
    body
}
