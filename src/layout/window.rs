//! Sliding-window aggregation of structure tokens.
//!
//! The window of line `j` covers lines `j - size ..= j + size` of the same
//! page, clipped to the page bounds. Windows never cross a page boundary.

use crate::layout::line::Page;
use std::ops::Range;

/// Render a window offset: negative and zero offsets as plain integers,
/// positive offsets with a leading `+`.
///
/// # Examples
///
/// ```
/// use doc_sections::layout::format_offset;
///
/// assert_eq!(format_offset(-1), "-1");
/// assert_eq!(format_offset(0), "0");
/// assert_eq!(format_offset(2), "+2");
/// ```
pub fn format_offset(offset: isize) -> String {
    if offset > 0 {
        format!("+{}", offset)
    } else {
        offset.to_string()
    }
}

/// Index range of the window around `index` on a page of `len` lines.
pub fn window_bounds(index: usize, len: usize, size: usize) -> Range<usize> {
    let start = index.saturating_sub(size);
    let end = index.saturating_add(size).saturating_add(1).min(len);
    start.min(end)..end
}

/// Window string for one line: every neighbour's tokens resolved relative to
/// `index`, neighbours in rank order, tokens in annotation order.
pub fn window_string(page: &Page, index: usize, size: usize) -> String {
    let mut parts: Vec<String> = Vec::new();
    for k in window_bounds(index, page.len(), size) {
        let offset = k as isize - index as isize;
        parts.extend(page.lines[k].structure.iter().map(|t| t.resolve(offset)));
    }
    parts.join(" ")
}
