//! Format-sniffing extraction of candidate addresses from a feed body
//!
//! The upstream has served a JSON API, an HTML page with a results widget
//! and plain text dumps at different times. Each shape has an
//! [`ExtractionStrategy`]; [`extract`] runs them in priority order and stops
//! at the first one that yields at least one valid address.

use std::fmt;
use std::net::Ipv4Addr;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::ip::dedup_valid;

/// Keys searched, in order, for the address array of a JSON object
pub const DATA_KEYS: &[&str] = &["data", "ips", "result", "list", "info"];

/// Keys searched, in order, for the address inside a JSON array element
pub const IP_KEYS: &[&str] = &["ip", "host", "address", "addr"];

/// `<textarea id="result">…</textarea>`, the results widget of the HTML feed
static RESULTS_CONTAINER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<textarea\b[^>]*?\bid\s*=\s*(?:"result"|'result'|result)(?:[\s/][^>]*)?>(.*?)</textarea\s*>"#,
    )
    .expect("results container regex is valid")
});

/// Maximal runs of dot-joined digit groups
///
/// Matching whole runs keeps `1.2.3.4.5` a single (invalid) token instead of
/// letting a valid-looking prefix through.
static DOTTED_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)+").expect("dotted run regex is valid"));

/// One way of reading candidates out of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionStrategy {
    /// JSON object with a known data key, or a JSON array
    Structured,
    /// HTML page with a results container
    Markup,
    /// Any text, scanned for dotted quads
    Freeform,
}

impl ExtractionStrategy {
    /// Strategies in the order they are attempted
    pub const PRIORITY: [ExtractionStrategy; 3] = [
        ExtractionStrategy::Structured,
        ExtractionStrategy::Markup,
        ExtractionStrategy::Freeform,
    ];

    /// Read raw candidates out of `body`
    ///
    /// Returns `None` when the body does not have this strategy's shape.
    pub fn candidates(&self, body: &str) -> Option<Candidates> {
        match self {
            ExtractionStrategy::Structured => structured(body),
            ExtractionStrategy::Markup => markup(body),
            ExtractionStrategy::Freeform => freeform(body),
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExtractionStrategy::Structured => "structured",
            ExtractionStrategy::Markup => "markup",
            ExtractionStrategy::Freeform => "freeform",
        })
    }
}

/// Raw output of a strategy, before validation
#[derive(Debug, Clone, PartialEq)]
pub enum Candidates {
    /// JSON array elements (strings or mappings)
    Structured(Vec<Value>),
    /// Plain text fragments
    Raw(Vec<String>),
}

impl Candidates {
    /// Normalize to textual candidates
    ///
    /// Mappings contribute their first present [`IP_KEYS`] field; elements of
    /// any other shape contribute nothing.
    pub fn into_strings(self) -> Vec<String> {
        match self {
            Candidates::Raw(items) => items,
            Candidates::Structured(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Object(map) => IP_KEYS
                        .iter()
                        .find_map(|key| map.get(*key).and_then(Value::as_str))
                        .map(|s| s.trim().to_string()),
                    _ => None,
                })
                .collect(),
        }
    }
}

/// Result of a successful extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub strategy: ExtractionStrategy,
    /// Validated, deduplicated, first-seen order
    pub ips: Vec<Ipv4Addr>,
}

/// Run every strategy in priority order and keep the first non-empty result
pub fn extract(body: &str) -> Option<Extraction> {
    ExtractionStrategy::PRIORITY.iter().find_map(|strategy| {
        let candidates = strategy.candidates(body)?;
        let ips = dedup_valid(candidates.into_strings());
        if ips.is_empty() {
            tracing::trace!("{} extraction yielded no valid addresses", strategy);
            None
        } else {
            Some(Extraction {
                strategy: *strategy,
                ips,
            })
        }
    })
}

fn structured(body: &str) -> Option<Candidates> {
    let items = match serde_json::from_str::<Value>(body.trim()).ok()? {
        Value::Array(items) => items,
        Value::Object(mut map) => DATA_KEYS.iter().find_map(|key| match map.remove(*key) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        })?,
        _ => return None,
    };
    Some(Candidates::Structured(items))
}

fn markup(body: &str) -> Option<Candidates> {
    let inner = RESULTS_CONTAINER.captures(body)?.get(1)?.as_str();
    let lines = inner
        .lines()
        .map(|line| decode_entities(line.trim()))
        .filter(|line| !line.is_empty())
        .collect();
    Some(Candidates::Raw(lines))
}

fn freeform(body: &str) -> Option<Candidates> {
    let runs: Vec<String> = DOTTED_RUN
        .find_iter(body)
        .map(|m| m.as_str().to_string())
        .collect();
    if runs.is_empty() { None } else { Some(Candidates::Raw(runs)) }
}

/// Decode the handful of named entities that show up around addresses
///
/// Deliberately partial: numeric references such as `&#46;` are left as-is,
/// so a line using them fails IPv4 validation and is dropped.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}
