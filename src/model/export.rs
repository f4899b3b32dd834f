//! Export of classified documents as training data.

use crate::config::SectionLabels;
use crate::error::{Error, Result};
use crate::layout::{Document, Line};
use crate::text::filter_all;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Training file name for a source document.
///
/// The prefix is added unless already present and the extension becomes `.txt`.
///
/// # Examples
///
/// ```
/// use doc_sections::model::training_file_name;
///
/// assert_eq!(training_file_name("bc_", "smith_v_jones.json"), "bc_smith_v_jones.txt");
/// assert_eq!(training_file_name("bc_", "bc_opinion"), "bc_opinion.txt");
/// ```
pub fn training_file_name(prefix: &str, source: &str) -> String {
    let name = if source.starts_with(prefix) {
        source.to_string()
    } else {
        format!("{}{}", prefix, source)
    };
    match name.rfind('.') {
        Some(dot) if dot > prefix.len() => format!("{}.txt", &name[..dot]),
        _ => format!("{}.txt", name),
    }
}

/// Training sample for one classified line: `<label> <content> <window>`.
pub fn training_line(line: &Line, labels: &SectionLabels) -> String {
    let content = filter_all(&line.content);
    [labels.label(line.section), content.as_str(), line.window.trim()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write every line of a classified document as a training sample.
///
/// Returns the number of lines written.
pub fn export_training_data(
    doc: &Document,
    labels: &SectionLabels,
    path: impl AsRef<Path>,
) -> Result<usize> {
    let path = path.as_ref();
    let write = || -> std::io::Result<usize> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = BufWriter::new(File::create(path)?);
        let mut count = 0;
        for line in doc.lines() {
            writeln!(out, "{}", training_line(line, labels))?;
            count += 1;
        }
        out.flush()?;
        Ok(count)
    };
    let count = write().map_err(|e| Error::persistence(path, e))?;
    log::info!("Exported {} training lines to {}", count, path.display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_file_name_without_extension() {
        assert_eq!(training_file_name("bc_", "opinion"), "bc_opinion.txt");
    }

    #[test]
    fn test_training_line() {
        let labels = SectionLabels::default();
        let mut line = Line::new("I. INTRODUCTION", 0);
        line.section = labels.index_of("heading");
        line.window = "text0 capsline0 ".to_string();
        assert_eq!(training_line(&line, &labels), "heading I INTRODUCTION text0 capsline0");

        let blank = Line::new("", 1);
        assert_eq!(training_line(&blank, &labels), "none");
    }
}
