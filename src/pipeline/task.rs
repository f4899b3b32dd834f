//! Batch sectioning of several documents with one shared classifier.

use crate::config::SectionConfig;
use crate::error::{Error, Result};
use crate::layout::Document;
use crate::pipeline::classify::SectionClassifier;
use crate::pipeline::status::StatusSink;

/// A document that could not be classified.
#[derive(Debug)]
pub struct DocumentFailure {
    /// Document name
    pub name: String,
    /// Why it failed
    pub error: Error,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Names of the documents classified, in processing order
    pub classified: Vec<String>,
    /// Documents skipped because classification failed
    pub failures: Vec<DocumentFailure>,
}

impl BatchReport {
    /// Number of documents attempted.
    pub fn attempted(&self) -> usize {
        self.classified.len() + self.failures.len()
    }
}

/// Batch driver.
///
/// The classifier is built once and reused for every document of the run.
/// A document whose classification fails is announced, recorded and skipped;
/// persistence and data-source failures abort the whole run.
#[derive(Debug)]
pub struct SectionTask {
    classifier: SectionClassifier,
    max_documents: usize,
}

impl SectionTask {
    /// Create a task around a ready classifier.
    pub fn new(classifier: SectionClassifier, config: &SectionConfig) -> Self {
        Self {
            classifier,
            max_documents: config.max_documents,
        }
    }

    /// Create a task, loading the model and stop words named by the configuration.
    pub fn from_config(config: &SectionConfig) -> Result<Self> {
        Ok(Self::new(SectionClassifier::from_config(config)?, config))
    }

    /// The shared classifier.
    pub fn classifier(&self) -> &SectionClassifier {
        &self.classifier
    }

    /// Classify a batch of documents in place.
    ///
    /// At most `max_documents` documents are attempted when the limit is non-zero.
    pub fn run(&self, docs: &mut [Document], status: &dyn StatusSink) -> Result<BatchReport> {
        status.announce("Starting");
        let mut report = BatchReport::default();
        if docs.is_empty() {
            status.announce("No documents for sectioning");
            return Ok(report);
        }

        let limit = if self.max_documents == 0 {
            docs.len()
        } else {
            self.max_documents.min(docs.len())
        };

        for doc in docs.iter_mut().take(limit) {
            let name = doc.to_string();
            status.announce(&name);

            match self.classifier.classify_lines(doc, status) {
                Ok(()) => {
                    status.announce(&format!("Classified {}", name));
                    report.classified.push(name);
                },
                Err(e) if e.is_fatal() => {
                    status.announce(&format!("Failed {}: {}", name, e));
                    return Err(e);
                },
                Err(e) => {
                    log::warn!("Skipping {}: {}", name, e);
                    status.announce(&format!("Failed {}: {}", name, e));
                    report.failures.push(DocumentFailure { name, error: e });
                },
            }
        }
        log::info!(
            "Section task complete: {} classified, {} failed",
            report.classified.len(),
            report.failures.len()
        );
        Ok(report)
    }
}
