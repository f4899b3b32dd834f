//! Line and page representation for section classification.
//!
//! Geometry and typography arrive pre-computed from the upstream layout stage.
//! The classification pass only writes the structure tokens, the window string
//! and the section index of each line.

use crate::layout::structure::StructureToken;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Kind of line, as determined by the layout stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    /// No visible characters
    Blank,
    /// Body text
    Text,
    /// Footnote or endnote text
    Note,
    /// Running page header
    Header,
    /// Running page footer
    Footer,
}

/// Set of [`LineType`] flags carried by a line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineTypes(BTreeSet<LineType>);

impl LineTypes {
    /// Empty flag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flag, returning the updated set.
    pub fn with(mut self, kind: LineType) -> Self {
        self.0.insert(kind);
        self
    }

    /// Add a flag.
    pub fn insert(&mut self, kind: LineType) {
        self.0.insert(kind);
    }

    /// Whether a flag is set.
    pub fn contains(&self, kind: LineType) -> bool {
        self.0.contains(&kind)
    }

    /// True if `kind` is the only flag set.
    pub fn is_only(&self, kind: LineType) -> bool {
        self.0.len() == 1 && self.contains(kind)
    }

    /// Number of flags set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no flag is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<LineType> for LineTypes {
    fn from_iter<T: IntoIterator<Item = LineType>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One line of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Raw text content
    pub content: String,
    /// Type flags
    #[serde(default)]
    pub types: LineTypes,
    /// Sequence number in extraction order
    pub seq: usize,
    /// Position in reading (rank) order
    pub rank: usize,
    /// Horizontal start of the text
    pub x: f32,
    /// Horizontal end of the text
    pub x_max: f32,
    /// Vertical distance to the previous line
    pub spacing: f32,
    /// Dominant font size in points
    pub font_size: f32,

    /// Generic structure tokens, offsets unresolved
    #[serde(default)]
    pub structure: Vec<StructureToken>,
    /// Neighbourhood structure with offsets resolved relative to this line
    #[serde(default)]
    pub window: String,
    /// Index of the assigned section label (0 = unclassified)
    #[serde(default)]
    pub section: usize,
}

impl Line {
    /// Create a text line with default geometry.
    ///
    /// Geometry is meant to be filled in by the caller; this is mostly useful
    /// in tests and for building documents programmatically.
    pub fn new(content: impl Into<String>, rank: usize) -> Self {
        Self {
            content: content.into(),
            types: LineTypes::new().with(LineType::Text),
            seq: rank,
            rank,
            x: 0.0,
            x_max: 0.0,
            spacing: 12.0,
            font_size: 12.0,
            structure: Vec::new(),
            window: String::new(),
            section: 0,
        }
    }

    /// Set the type flags.
    pub fn with_types(mut self, types: LineTypes) -> Self {
        self.types = types;
        self
    }

    /// Set the horizontal extent.
    pub fn with_extent(mut self, x: f32, x_max: f32) -> Self {
        self.x = x;
        self.x_max = x_max;
        self
    }

    /// Set spacing and font size.
    pub fn with_typography(mut self, spacing: f32, font_size: f32) -> Self {
        self.spacing = spacing;
        self.font_size = font_size;
        self
    }

    /// Set the extraction sequence number.
    pub fn with_seq(mut self, seq: usize) -> Self {
        self.seq = seq;
        self
    }

    /// Width of the text.
    pub fn width(&self) -> f32 {
        self.x_max - self.x
    }

    /// True if the line carries the blank flag.
    pub fn is_blank(&self) -> bool {
        self.types.contains(LineType::Blank)
    }
}

/// One page of lines in rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-based)
    pub number: u32,
    /// Left text margin
    pub left_margin: f32,
    /// Right text margin
    pub right_margin: f32,
    /// Width of one indentation step
    pub indent: f32,
    /// Rank of the first note line, if the page has notes
    #[serde(default)]
    pub note_first_rank: Option<usize>,
    /// Lines in rank order
    pub lines: Vec<Line>,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32, left_margin: f32, right_margin: f32, indent: f32) -> Self {
        Self {
            number,
            left_margin,
            right_margin,
            indent,
            note_first_rank: None,
            lines: Vec::new(),
        }
    }

    /// Set the rank at which notes begin.
    pub fn with_notes_from(mut self, rank: usize) -> Self {
        self.note_first_rank = Some(rank);
        self
    }

    /// Append a line.
    pub fn push(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True if the page has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Width of the text area.
    pub fn text_width(&self) -> f32 {
        self.right_margin - self.left_margin
    }
}

/// A paginated document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Display name used in status messages
    #[serde(default)]
    pub name: String,
    /// Pages in order
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a document from pages.
    pub fn new(name: impl Into<String>, pages: Vec<Page>) -> Self {
        Self {
            name: name.into(),
            pages,
        }
    }

    /// Total number of lines over all pages.
    pub fn line_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    /// Iterate all lines in page then rank order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }

    /// Iterate all lines mutably in page then rank order.
    pub fn lines_mut(&mut self) -> impl Iterator<Item = &mut Line> {
        self.pages.iter_mut().flat_map(|p| p.lines.iter_mut())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "<unnamed>")
        } else {
            write!(f, "{}", self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_types() {
        let types = LineTypes::new().with(LineType::Text);
        assert!(types.is_only(LineType::Text));

        let types = types.with(LineType::Note);
        assert!(!types.is_only(LineType::Text));
        assert!(types.contains(LineType::Note));
        assert_eq!(types.len(), 2);
    }

    #[test]
    fn test_line_types_serde() {
        let types: LineTypes = [LineType::Header, LineType::Blank].into_iter().collect();
        let json = serde_json::to_string(&types).unwrap();
        assert_eq!(json, r#"["blank","header"]"#);
        let back: LineTypes = serde_json::from_str(&json).unwrap();
        assert_eq!(back, types);
    }

    #[test]
    fn test_document_counts() {
        let mut page = Page::new(1, 72.0, 540.0, 36.0);
        page.push(Line::new("one", 0));
        page.push(Line::new("two", 1));
        assert_eq!(page.text_width(), 468.0);
        let doc = Document::new("doc", vec![page.clone(), page]);
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.lines().count(), 4);
        assert_eq!(doc.to_string(), "doc");
    }

    #[test]
    fn test_line_deserializes_without_outputs() {
        let json = r#"{"content":"Hello","seq":0,"rank":0,"x":72,"x_max":300,"spacing":12,"font_size":11}"#;
        let line: Line = serde_json::from_str(json).unwrap();
        assert!(line.types.is_empty());
        assert!(line.structure.is_empty());
        assert_eq!(line.section, 0);
        assert_eq!(line.width(), 228.0);
    }
}
