//! Customer identifier recognition in free text
//!
//! Users either paste a bare identifier or mention one after a keyword
//! ("what about customer C03PVPPHOY?"). Recognition is two-staged:
//!
//! 1. A keyword (`CUST_ID`, `customer`, `user`, `id`, any case) followed by
//!    optional spaces or colons, then a run of letters and digits. The run is
//!    the candidate.
//! 2. Otherwise, a message that is nothing but 10 or more letters and digits
//!    is itself the candidate.
//!
//! The keyword may sit inside a longer word, so "identity" yields `entity`,
//! and any bare 10+ character word is taken as an identifier. A candidate
//! that matches no record is harmless: the lookup reports it as not found.

use once_cell::sync::Lazy;
use regex::Regex;

static KEYWORD_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:CUST_ID|customer|user|id)[\s:]*([A-Z0-9]+)")
        .expect("keyword identifier pattern is valid")
});

static BARE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[A-Z0-9]{10,}$").expect("bare identifier pattern is valid"));

/// Extract a candidate customer identifier from a chat message
///
/// # Examples
///
/// ```
/// use scoremate::extractor::extract_identifier;
///
/// assert_eq!(
///     extract_identifier("tell me about customer C03PVPPHOY"),
///     Some("C03PVPPHOY".to_string())
/// );
/// assert_eq!(extract_identifier("C03PVPPHOY"), Some("C03PVPPHOY".to_string()));
/// assert_eq!(extract_identifier("hello there"), None);
/// ```
pub fn extract_identifier(message: &str) -> Option<String> {
    if let Some(captures) = KEYWORD_ID.captures(message) {
        return captures.get(1).map(|m| m.as_str().to_string());
    }

    let trimmed = message.trim();
    if BARE_ID.is_match(trimmed) {
        return Some(trimmed.to_string());
    }

    None
}
