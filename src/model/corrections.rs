//! Reload of hand-corrected classifications.
//!
//! A corrections file is an exported training file after review: one
//! `<label> ...` line per document line, in page then rank order.

use crate::config::SectionLabels;
use crate::error::{Error, Result};
use crate::layout::Document;
use std::fs;
use std::path::Path;

/// Outcome of applying a corrections file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionReport {
    /// Document lines compared against the file
    pub lines: usize,
    /// Lines whose section index was changed
    pub corrections: usize,
    /// Share of compared lines that were already correct, in percent
    pub accuracy: f64,
}

/// Overwrite section indices with the labels of a corrections file.
///
/// Each document line is paired with the next file line. A file shorter
/// than the document is reported with a warning and the remaining lines are
/// left as they are.
///
/// # Errors
///
/// [`Error::Persistence`] if the file cannot be read.
pub fn apply_corrections(
    doc: &mut Document,
    labels: &SectionLabels,
    path: impl AsRef<Path>,
) -> Result<CorrectionReport> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::persistence(path, e))?;
    let mut source = text.lines();

    let mut lines = 0;
    let mut corrections = 0;
    'pages: for (page_idx, page) in doc.pages.iter_mut().enumerate() {
        for (line_idx, line) in page.lines.iter_mut().enumerate() {
            let Some(entry) = source.next() else {
                log::warn!("Ran out of classification lines.");
                break 'pages;
            };
            let label = entry.split_whitespace().next().unwrap_or("");
            let index = labels.index_of(label);
            if line.section != index {
                log::warn!(
                    "[{:03}:{:02}] Classed as: {}; should be: {}",
                    page_idx + 1,
                    line_idx,
                    labels.label(line.section),
                    label
                );
                line.section = index;
                corrections += 1;
            }
            lines += 1;
        }
    }

    let accuracy = if lines == 0 {
        100.0
    } else {
        (lines - corrections) as f64 * 100.0 / lines as f64
    };
    log::warn!(
        "Correction count: {}:{} ({:.0}% accuracy)",
        corrections,
        lines,
        accuracy
    );
    Ok(CorrectionReport {
        lines,
        corrections,
        accuracy,
    })
}
