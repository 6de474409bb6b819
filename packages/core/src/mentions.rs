//! Extraction of email mentions from free-form message text.

use std::sync::LazyLock;

use regex::Regex;

/// Return every email-shaped token in `text`, left to right.
///
/// Matches are non-overlapping and returned as they appear, duplicates
/// included; callers deduplicate when merging with other recipient sources.
/// The token shape is intentionally narrower than [`crate::validation::is_valid_email`]:
/// alphanumeric local part, `@`, and a dotted alphanumeric domain.
pub fn extract_emails(text: &str) -> Vec<String> {
    MENTION_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// `[a-zA-Z0-9]+@[a-zA-Z0-9\.]+\.[a-zA-Z0-9]+`
static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9]+@[a-zA-Z0-9\.]+\.[a-zA-Z0-9]+").expect("invalid mention regex")
});
