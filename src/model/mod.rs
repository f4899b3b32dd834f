//! Model maintenance tools.
//!
//! - [`train`]: build a model from a labelled corpus and install it
//! - [`analyze`]: summarize the strongest words of each partition
//! - [`export`]: write a classified document as training samples
//! - [`corrections`]: reload hand-corrected labels into a classified document

pub mod analyze;
pub mod corrections;
pub mod export;
pub mod train;

pub use analyze::{analyze_model, CategorySummary, ModelAnalysis, PartitionSummary, WordSummary};
pub use corrections::{apply_corrections, CorrectionReport};
pub use export::{export_training_data, training_file_name, training_line};
pub use train::{parse_sample, train_model, TrainingReport};
