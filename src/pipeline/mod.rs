//! Document classification pipeline.
//!
//! ```text
//! Document (pages of lines with geometry)
//!     ↓
//! [SectionClassifier] (annotate → window → classify)
//!     ↓
//! Document (structure, window and section index per line)
//! ```
//!
//! [`SectionTask`] runs the classifier over a batch of documents, and every
//! stage reports progress through a [`StatusSink`].

pub mod classify;
pub mod status;
pub mod task;

pub use classify::SectionClassifier;
pub use status::{LogStatus, NullStatus, StatusSink};
pub use task::{BatchReport, DocumentFailure, SectionTask};
