//! Two-phase line classification of a document.
//!
//! ```text
//! Document
//!     ↓
//! [annotate_document] (structure tokens per line, begin/end markers)
//!     ↓
//! [window_string] (neighbour tokens, offsets resolved per line)
//!     ↓
//! filter_all(content) + " " + window
//!     ↓
//! [PartitionClassifier] → section index
//! ```
//!
//! Annotation finishes for every line of every page before the first window
//! is built, so a window always sees complete neighbour structure.

use crate::classifier::{PartitionClassifier, WordStore};
use crate::config::{SectionConfig, SectionLabels};
use crate::error::Result;
use crate::layout::{annotate_document, window_string, Document};
use crate::pipeline::status::StatusSink;
use crate::text::{filter_all, Tokenizer};
use std::sync::Arc;
use std::time::Instant;

/// Lines classified between two progress updates.
const PROGRESS_INTERVAL: usize = 10;

/// Classifies every line of a document into a section.
///
/// The wrapped classifier is an immutable model snapshot, so one
/// `SectionClassifier` can serve any number of documents.
#[derive(Debug, Clone)]
pub struct SectionClassifier {
    classifier: PartitionClassifier,
    category: String,
    labels: SectionLabels,
    window_size: usize,
}

impl SectionClassifier {
    /// Create a driver around an existing classifier.
    pub fn new(classifier: PartitionClassifier, config: &SectionConfig) -> Self {
        Self {
            classifier,
            category: config.category.clone(),
            labels: config.section_labels.clone(),
            window_size: config.window_size,
        }
    }

    /// Load the stop-word list and the current model named by the configuration.
    ///
    /// # Errors
    ///
    /// Fails if the stop-word list cannot be read or the model cannot be
    /// loaded. A missing model file is not an error (see [`WordStore::load`]).
    pub fn from_config(config: &SectionConfig) -> Result<Self> {
        let tokenizer = Tokenizer::from_file(&config.stop_words_path)?;
        let store = WordStore::load(&config.model_path)?;
        let classifier = PartitionClassifier::new(Arc::new(store), Arc::new(tokenizer));
        Ok(Self::new(classifier, config))
    }

    /// The underlying partition classifier.
    pub fn classifier(&self) -> &PartitionClassifier {
        &self.classifier
    }

    /// Section labels used to map partitions to indices.
    pub fn labels(&self) -> &SectionLabels {
        &self.labels
    }

    /// Window half width.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Annotate and classify every line of a document in place.
    ///
    /// On return each line holds its structure tokens, its window string and
    /// its section index. Progress goes to `status`.
    pub fn classify_lines(&self, doc: &mut Document, status: &dyn StatusSink) -> Result<()> {
        status.announce("Working...");
        annotate_document(doc);

        let pages = doc.pages.len();
        let mut count = 0usize;
        status.announce(&format!("Working [page=0/{}, line={}]", pages, count));

        for (i, page) in doc.pages.iter_mut().enumerate() {
            let start = Instant::now();
            status.announce(&format!("Working [page={}/{}, line={}]", i + 1, pages, count));

            for j in 0..page.len() {
                let window = window_string(page, j, self.window_size);
                let line = &mut page.lines[j];
                line.section = self.classify_line(&line.content, &window)?;
                line.window = window;

                count += 1;
                if count % PROGRESS_INTERVAL == 0 {
                    status.announce(&format!(
                        "Working [page={}/{}, line={}]",
                        i + 1,
                        pages,
                        count
                    ));
                }
            }
            status.announce(&format!(
                "Page classification time: {}ms",
                start.elapsed().as_millis()
            ));
        }
        Ok(())
    }

    /// Classify one line from its content and resolved window string.
    ///
    /// Returns the section index; 0 when no partition scores above zero or
    /// the winning partition is not a known label.
    pub fn classify_line(&self, content: &str, window: &str) -> Result<usize> {
        let message = format!("{} {}", filter_all(content), window);
        let section = self.classifier.classify(&self.category, &message)?;
        log::debug!("Classified: {:?} >>> {}", section, message);
        Ok(section.map(|s| self.labels.index_of(&s)).unwrap_or(0))
    }
}
