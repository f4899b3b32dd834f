//! Cleanup passes for raw line text.
//!
//! Two strengths are provided. [`filter_all`] keeps only letters, digits and
//! whitespace and is used wherever content is matched as words (capitalization
//! heuristics, classifier input). [`filter_xml`] only drops characters that are
//! unsafe in markup and keeps punctuation, so line endings can still be inspected.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Runs of whitespace
    static ref RE_WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Replace everything that is not alphanumeric with a space and collapse whitespace.
///
/// # Examples
///
/// ```
/// use doc_sections::text::filter_all;
///
/// assert_eq!(filter_all("  \"Smith v. Jones,\"  (1999)"), "Smith v Jones 1999");
/// ```
pub fn filter_all(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    collapse(&replaced)
}

/// Drop control characters and markup-unsafe characters (`<`, `>`, `&`), collapse whitespace.
///
/// # Examples
///
/// ```
/// use doc_sections::text::filter_xml;
///
/// assert_eq!(filter_xml("Affirmed <b>in part</b>."), "Affirmed bin part/b.");
/// ```
pub fn filter_xml(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '&'))
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    collapse(&kept)
}

fn collapse(text: &str) -> String {
    RE_WHITESPACE.replace_all(text.trim(), " ").into_owned()
}
