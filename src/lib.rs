// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::needless_range_loop)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # doc_sections
//!
//! Line-level section classification for paginated documents.
//!
//! Each line of a document is assigned to a structural section (title, heading,
//! body, quote, note, ...) by combining layout features of the line and its
//! neighbours with a partitioned naive-Bayes model over the line's text.
//!
//! ## Core Features
//!
//! - **Structure Annotation**: indentation, width, alignment, font size, spacing,
//!   page position, capitalization, legal keywords and line endings as tokens
//! - **Sliding Window**: neighbouring structure with offsets relative to each line
//! - **Partition Classifier**: Laplace-smoothed naive Bayes over stemmed,
//!   stop-word filtered tokens, scored against a shared immutable model
//! - **Training**: corpus training, model analysis, training-data export and
//!   correction reload
//! - **Persistence**: JSON model snapshots, gzip-compressed for `.gz` names
//!
//! ## Quick Start
//!
//! ```ignore
//! use doc_sections::config::SectionConfig;
//! use doc_sections::pipeline::{LogStatus, SectionClassifier};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SectionConfig::from_json_file("sections.json")?;
//! let classifier = SectionClassifier::from_config(&config)?;
//!
//! let mut doc: doc_sections::layout::Document =
//!     serde_json::from_str(&std::fs::read_to_string("opinion.json")?)?;
//! classifier.classify_lines(&mut doc, &LogStatus)?;
//!
//! for line in doc.lines() {
//!     println!("{:<10} {}", classifier.labels().label(line.section), line.content);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Text normalization
pub mod text;

// Layout model and structure features
pub mod layout;

// Bayes classifier and model store
pub mod classifier;

// Classification pipeline
pub mod pipeline;

// Model maintenance tools
pub mod model;

// Re-exports
pub use classifier::{PartitionClassifier, Trainer, WordStore};
pub use config::{SectionConfig, SectionLabels};
pub use error::{Error, Result};
pub use layout::{Document, Line, Page};
pub use pipeline::{SectionClassifier, SectionTask, StatusSink};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
