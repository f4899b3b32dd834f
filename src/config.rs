//! Configuration for section classification.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default sliding-window half width (lines before and after the current line).
pub const DEFAULT_WINDOW_SIZE: usize = 2;

/// Category used for all section models in this deployment.
pub const DEFAULT_CATEGORY: &str = "Sections";

/// Ordered list of section labels.
///
/// The position of a label is the category index stored on a classified line.
/// Index 0 is reserved for lines that could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SectionLabels(Vec<String>);

impl From<Vec<String>> for SectionLabels {
    fn from(labels: Vec<String>) -> Self {
        Self::new(labels)
    }
}

impl From<SectionLabels> for Vec<String> {
    fn from(labels: SectionLabels) -> Self {
        labels.0
    }
}

impl Default for SectionLabels {
    fn default() -> Self {
        Self::new(
            [
                "none",
                "caption",
                "title",
                "heading",
                "body",
                "quote",
                "note",
                "signature",
                "header",
                "footer",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        )
    }
}

impl SectionLabels {
    /// Create a label list. An empty list gets the `none` placeholder at index 0.
    pub fn new(labels: Vec<String>) -> Self {
        if labels.is_empty() {
            Self(vec!["none".to_string()])
        } else {
            Self(labels)
        }
    }

    /// Index of a label, or 0 (unclassified) when unknown.
    ///
    /// # Examples
    ///
    /// ```
    /// use doc_sections::config::SectionLabels;
    ///
    /// let labels = SectionLabels::default();
    /// assert_eq!(labels.index_of("heading"), 3);
    /// assert_eq!(labels.index_of("no-such-label"), 0);
    /// ```
    pub fn index_of(&self, label: &str) -> usize {
        self.0.iter().position(|l| l == label).unwrap_or(0)
    }

    /// Label at an index, falling back to the unclassified label.
    pub fn label(&self, index: usize) -> &str {
        self.0.get(index).unwrap_or(&self.0[0])
    }

    /// Number of labels including the unclassified slot.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; index 0 is always present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate labels in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }
}

/// Section classification configuration.
///
/// Loadable from JSON; fields missing from the file keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    /// Current model snapshot. A `.gz` suffix selects the compressed format.
    pub model_path: PathBuf,

    /// Where the previous model is moved when a new one is trained.
    pub backup_model_path: PathBuf,

    /// Stop-word list, one word per line.
    pub stop_words_path: PathBuf,

    /// Lines on each side of the current line included in its window.
    pub window_size: usize,

    /// Directory scanned for training files.
    pub training_dir: PathBuf,

    /// Only files whose name starts with this prefix are used for training.
    pub training_prefix: String,

    /// Category all partitions are trained and scored under.
    pub category: String,

    /// Ordered section labels.
    pub section_labels: SectionLabels,

    /// Maximum documents handled per batch run (0 = unlimited).
    pub max_documents: usize,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            model_path: PathBuf::from("models/sections.model.gz"),
            backup_model_path: PathBuf::from("models/sections.model.bak.gz"),
            stop_words_path: PathBuf::from("models/stopwords.txt"),
            window_size: DEFAULT_WINDOW_SIZE,
            training_dir: PathBuf::from("training"),
            training_prefix: "bc_".to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            section_labels: SectionLabels::default(),
            max_documents: 0,
        }
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::persistence(path, e))?;
        serde_json::from_str(&text).map_err(|e| {
            Error::InvalidArgument(format!("bad configuration '{}': {}", path.display(), e))
        })
    }

    /// Set the model snapshot path.
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    /// Set the backup model path.
    pub fn with_backup_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.backup_model_path = path.into();
        self
    }

    /// Set the stop-word list path.
    pub fn with_stop_words_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.stop_words_path = path.into();
        self
    }

    /// Set the window half width.
    pub fn with_window_size(mut self, size: usize) -> Self {
        self.window_size = size;
        self
    }

    /// Set the training directory and file prefix.
    pub fn with_training(mut self, dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        self.training_dir = dir.into();
        self.training_prefix = prefix.into();
        self
    }

    /// Set the section labels.
    pub fn with_section_labels(mut self, labels: SectionLabels) -> Self {
        self.section_labels = labels;
        self
    }

    /// Limit the number of documents per batch run.
    pub fn with_max_documents(mut self, max: usize) -> Self {
        self.max_documents = max;
        self
    }
}
